//! Output directory layout management.
//!
//! Each item gets `<dest>/<id>/{video,audio,feature_extraction}`. Directories
//! are acquired through [`ensure_dir`], which honors the overwrite policy.
//!
//! **Overwrite is destructive.** With `overwrite = true` an existing directory
//! is removed recursively, together with everything inside it, before it is
//! recreated. Nothing is moved aside or backed up.

use crate::discovery::{VideoId, VideoItem};
use crate::error::{CoreResult, layout_error};

use std::fs;
use std::path::{Path, PathBuf};

pub const VIDEO_DIR: &str = "video";
pub const AUDIO_DIR: &str = "audio";
pub const FEATURE_DIR: &str = "feature_extraction";

/// Directory the feature extractor writes into, below [`FEATURE_DIR`].
pub const OPENFACE_DIR: &str = "openface";

/// Ensures `path` exists as a directory.
///
/// * `overwrite = true`: an existing directory is deleted recursively and
///   recreated empty.
/// * `overwrite = false`: an existing directory is reused with its contents.
///
/// Missing parents are created as well.
pub fn ensure_dir(path: &Path, overwrite: bool) -> CoreResult<()> {
    if path.is_dir() && overwrite {
        log::debug!("Removing existing directory {}", path.display());
        fs::remove_dir_all(path).map_err(|e| layout_error(path, e))?;
    }

    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| layout_error(path, e))?;
    }

    Ok(())
}

/// The directory tree owned by one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    id: VideoId,
    root: PathBuf,
}

impl OutputLayout {
    /// Computes the layout for `id` below `dest_root` without touching disk.
    pub fn new(dest_root: &Path, id: &VideoId) -> Self {
        Self {
            id: id.clone(),
            root: dest_root.join(id.as_str()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn video_dir(&self) -> PathBuf {
        self.root.join(VIDEO_DIR)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(AUDIO_DIR)
    }

    pub fn feature_dir(&self) -> PathBuf {
        self.root.join(FEATURE_DIR)
    }

    /// The three fixed subdirectories, in creation order.
    pub fn subdirs(&self) -> [PathBuf; 3] {
        [self.video_dir(), self.audio_dir(), self.feature_dir()]
    }

    /// `video/<id>.mp4`
    pub fn copied_video(&self) -> PathBuf {
        self.video_dir().join(format!("{}.mp4", self.id))
    }

    /// `video/<id>_30fps.mp4`
    pub fn normalized_video(&self) -> PathBuf {
        self.video_dir().join(format!("{}_30fps.mp4", self.id))
    }

    /// `audio/<id>.wav`
    pub fn extracted_audio(&self) -> PathBuf {
        self.audio_dir().join(format!("{}.wav", self.id))
    }

    /// `audio/<id>_16hz.wav`
    pub fn resampled_audio(&self) -> PathBuf {
        self.audio_dir().join(format!("{}_16hz.wav", self.id))
    }

    /// `feature_extraction/openface/`
    pub fn openface_dir(&self) -> PathBuf {
        self.feature_dir().join(OPENFACE_DIR)
    }
}

/// Builds `<dest_root>/<id>/{video,audio,feature_extraction}` for `item`.
///
/// Under `overwrite = true` the item root is wiped first, so all prior
/// outputs of the item are lost.
pub fn ensure_item_layout(
    item: &VideoItem,
    dest_root: &Path,
    overwrite: bool,
) -> CoreResult<OutputLayout> {
    let layout = OutputLayout::new(dest_root, &item.id);
    ensure_dir(layout.root(), overwrite)?;
    for subdir in layout.subdirs() {
        ensure_dir(&subdir, overwrite)?;
    }
    Ok(layout)
}
