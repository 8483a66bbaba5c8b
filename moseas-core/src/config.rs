// ============================================================================
// moseas-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration for one batch run: where the raw
// videos live, where the dataset tree is built, the overwrite policy, and
// the external executables the stages delegate to.
//
// USAGE:
// Instances of CoreConfig are created by consumers of the library (like
// moseas-cli) and passed to `run_batch`.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default location of the facial feature extraction executable, relative to
/// the working directory.
pub const DEFAULT_EXTRACTOR_PATH: &str = "bin/FeatureExtraction";

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Default number of items processed concurrently.
pub const DEFAULT_JOBS: usize = 1;

/// Upper bound for the number of concurrent items.
pub const MAX_JOBS: usize = 64;

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Configuration for a single batch run.
///
/// # Examples
///
/// ```rust
/// use moseas_core::CoreConfig;
/// use std::path::PathBuf;
///
/// let mut config = CoreConfig::new(PathBuf::from("raw"), PathBuf::from("dataset"));
/// config.overwrite = true;
/// config.jobs = 4;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Path Configuration ----
    /// Directory containing the raw `<id>.mp4` files
    pub source_dir: PathBuf,

    /// Root of the dataset tree; one directory per identifier is built below it
    pub dest_dir: PathBuf,

    // ---- Behavior ----
    /// Destroy and regenerate existing outputs instead of skipping them.
    ///
    /// This is destructive: the destination root and every per-item
    /// directory are removed recursively before being recreated.
    pub overwrite: bool,

    /// Number of items processed concurrently (stages of one item always run in order)
    pub jobs: usize,

    // ---- External Tools ----
    /// Path to the facial feature extraction executable
    pub extractor_path: PathBuf,

    /// Path to the ffmpeg executable
    pub ffmpeg_path: PathBuf,
}

impl CoreConfig {
    /// Creates a configuration with default settings for the given directories.
    pub fn new(source_dir: PathBuf, dest_dir: PathBuf) -> Self {
        Self {
            source_dir,
            dest_dir,
            overwrite: false,
            jobs: DEFAULT_JOBS,
            extractor_path: PathBuf::from(DEFAULT_EXTRACTOR_PATH),
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
        }
    }

    /// Checks the configuration for values that cannot produce a sane run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.jobs == 0 || self.jobs > MAX_JOBS {
            return Err(CoreError::Config(format!(
                "jobs must be between 1 and {MAX_JOBS}, got {}",
                self.jobs
            )));
        }

        if self.extractor_path.as_os_str().is_empty() {
            return Err(CoreError::Config(
                "extractor path must not be empty".to_string(),
            ));
        }

        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(CoreError::Config("ffmpeg path must not be empty".to_string()));
        }

        // Overwrite clears the destination recursively, so it must never
        // contain the raw videos.
        if is_within(&self.source_dir, &self.dest_dir) {
            return Err(CoreError::Config(format!(
                "source directory {} must not be the destination {} or lie inside it",
                self.source_dir.display(),
                self.dest_dir.display()
            )));
        }

        Ok(())
    }
}

/// Whether `path` is `root` or lies below it, resolving both when they exist
/// on disk and comparing components lexically otherwise.
fn is_within(path: &Path, root: &Path) -> bool {
    match (path.canonicalize(), root.canonicalize()) {
        (Ok(path), Ok(root)) => path.starts_with(root),
        _ => path.starts_with(root),
    }
}
