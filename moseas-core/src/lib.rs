//! Core library for building MOSEAS dataset directories from raw videos.
//!
//! Given a directory of `<11-char-id>.mp4` files, this crate validates the
//! batch, builds `<dest>/<id>/{video,audio,feature_extraction}` for every
//! item and runs a fixed five-stage pipeline per item: copy the raw video,
//! re-encode it to 30 fps, extract 44.1 kHz stereo PCM audio, resample that
//! audio to 16 kHz, and run an external facial feature extractor. Stages
//! whose output already exists are skipped unless overwrite is requested.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use moseas_core::{CoreConfig, LogProgressReporter, SystemExecutor, run_batch};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(PathBuf::from("/data/raw"), PathBuf::from("/data/moseas"));
//! config.extractor_path = PathBuf::from("/opt/OpenFace/build/bin/FeatureExtraction");
//!
//! let report = run_batch(&config, &SystemExecutor, &LogProgressReporter).unwrap();
//! println!("{} item(s) need attention", report.failed_items().count());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod layout;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod runner;
pub mod stages;

// Re-exports for public API
pub use config::CoreConfig;
pub use discovery::{VideoId, VideoItem, discover_items, is_valid_identifier_filename};
pub use error::{CoreError, CoreResult};
pub use external::{SystemExecutor, Tool, ToolExecutor, ToolInvocation};
pub use layout::{OutputLayout, ensure_dir, ensure_item_layout};
pub use pipeline::run_batch;
pub use progress::{BatchProgress, LogProgressReporter, NullProgressReporter, ProgressReporter};
pub use report::{BatchReport, ItemReport, OutcomeCounts, StageOutcome, StageRecord};
pub use runner::StageRunner;
pub use stages::{STAGES_PER_ITEM, StageAction, StageId};
