//! File discovery and identifier validation.
//!
//! Every entry of the source directory must be named `<id>.mp4`, where `<id>`
//! is an 11 character identifier drawn from `[A-Za-z0-9_-]` and the extension
//! is matched case-insensitively. A single non-conforming entry rejects the
//! whole batch before anything is written.

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of characters in a video identifier.
pub const IDENTIFIER_LEN: usize = 11;

/// Extension every source video must carry (compared case-insensitively).
pub const SOURCE_EXTENSION: &str = "mp4";

/// An 11 character opaque identifier naming one video asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Parses an identifier, rejecting anything that is not exactly 11
    /// characters from the identifier alphabet.
    pub fn parse(value: &str) -> CoreResult<Self> {
        if value.len() == IDENTIFIER_LEN && value.bytes().all(is_identifier_byte) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidIdentifier(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw video discovered in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub id: VideoId,
    pub source_path: PathBuf,
}

impl VideoItem {
    /// File name of the source video (`<id>.<ext>` with its original case).
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.{SOURCE_EXTENSION}", self.id))
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Derives the identifier from a source filename, if it follows the naming
/// convention.
pub fn identifier_from_filename(name: &str) -> Option<VideoId> {
    let (stem, ext) = name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(SOURCE_EXTENSION) {
        return None;
    }
    VideoId::parse(stem).ok()
}

/// Returns true when `name` matches `^[A-Za-z0-9_-]{11}\.[mM][pP]4$`.
pub fn is_valid_identifier_filename(name: &str) -> bool {
    identifier_from_filename(name).is_some()
}

/// Lists and validates the source directory.
///
/// Items are returned in the directory's enumeration order. The listing is
/// fully validated before returning, so callers never see a partial batch:
///
/// * `Err(CoreError::SourceNotFound)` - the directory is missing
/// * `Err(CoreError::InvalidFilename)` - an entry breaks the naming convention
/// * `Err(CoreError::NotAFile)` - a conforming name refers to a directory
///
/// # Examples
///
/// ```rust,no_run
/// use moseas_core::discover_items;
/// use std::path::Path;
///
/// for item in discover_items(Path::new("/data/raw")).unwrap() {
///     println!("{} -> {}", item.id, item.source_path.display());
/// }
/// ```
pub fn discover_items(source_dir: &Path) -> CoreResult<Vec<VideoItem>> {
    if !source_dir.is_dir() {
        return Err(CoreError::SourceNotFound(source_dir.to_path_buf()));
    }

    let mut items = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        let id = identifier_from_filename(&name)
            .ok_or_else(|| CoreError::InvalidFilename(name.to_string()))?;

        if !path.is_file() {
            return Err(CoreError::NotAFile(path));
        }

        log::debug!("Discovered video {} at {}", id, path.display());
        items.push(VideoItem {
            id,
            source_path: path,
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filenames() {
        for name in [
            "AAAAAAAAAAA.mp4",
            "dQw4w9WgXcQ.mp4",
            "a-b_c-d_e-f.MP4",
            "01234567890.Mp4",
            "___________.mP4",
        ] {
            assert!(is_valid_identifier_filename(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_filenames() {
        for name in [
            "bad name.mp4",
            "AAAAAAAAAA.mp4",
            "AAAAAAAAAAAA.mp4",
            "AAAAAAAAAAA.mkv",
            "AAAAAAAAAAA.mp4.part",
            "AAAAAAAAAAA",
            "AAAAAAAAAA!.mp4",
            ".mp4",
            "ÄAAAAAAAAAA.mp4",
        ] {
            assert!(!is_valid_identifier_filename(name), "{name} should be rejected");
        }
    }

    #[test]
    fn test_identifier_keeps_stem_case() {
        let id = identifier_from_filename("AbCdEfGhIjK.MP4").unwrap();
        assert_eq!(id.as_str(), "AbCdEfGhIjK");
    }

    #[test]
    fn test_video_id_parse() {
        assert!(VideoId::parse("dQw4w9WgXcQ").is_ok());
        assert!(matches!(
            VideoId::parse("too-short"),
            Err(CoreError::InvalidIdentifier(_))
        ));
    }
}
