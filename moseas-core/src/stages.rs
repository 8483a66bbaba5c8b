//! The fixed per-item stage sequence.
//!
//! Every item runs the same five stages in order. A stage is identified by
//! its [`StageId`], knows the marker that proves it already ran, the stages
//! whose output it consumes, and how to build its [`StageAction`].

use crate::config::CoreConfig;
use crate::discovery::VideoItem;
use crate::external::{Tool, ToolInvocation, extractor, ffmpeg};
use crate::layout::OutputLayout;

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of stages every item goes through.
pub const STAGES_PER_ITEM: usize = StageId::ALL.len();

/// One step of the per-item pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    CopyVideo,
    NormalizeFramerate,
    ExtractAudio,
    ResampleAudio,
    ExtractFeatures,
}

/// How a stage's marker is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    File,
    Directory,
}

impl MarkerKind {
    pub fn exists(self, path: &Path) -> bool {
        match self {
            MarkerKind::File => path.is_file(),
            MarkerKind::Directory => path.is_dir(),
        }
    }
}

/// What running a stage actually does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageAction {
    /// In-process byte copy
    Copy { from: PathBuf, to: PathBuf },
    /// External tool run
    Invoke(ToolInvocation),
}

impl StageId {
    /// All stages, in execution order.
    pub const ALL: [StageId; 5] = [
        StageId::CopyVideo,
        StageId::NormalizeFramerate,
        StageId::ExtractAudio,
        StageId::ResampleAudio,
        StageId::ExtractFeatures,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageId::CopyVideo => "copy video",
            StageId::NormalizeFramerate => "normalize framerate",
            StageId::ExtractAudio => "extract audio",
            StageId::ResampleAudio => "resample audio",
            StageId::ExtractFeatures => "extract features",
        }
    }

    pub fn marker_kind(self) -> MarkerKind {
        match self {
            StageId::ExtractFeatures => MarkerKind::Directory,
            _ => MarkerKind::File,
        }
    }

    /// The output whose existence means this stage is done.
    pub fn marker_path(self, layout: &OutputLayout) -> PathBuf {
        match self {
            StageId::CopyVideo => layout.copied_video(),
            StageId::NormalizeFramerate => layout.normalized_video(),
            StageId::ExtractAudio => layout.extracted_audio(),
            StageId::ResampleAudio => layout.resampled_audio(),
            StageId::ExtractFeatures => layout.openface_dir(),
        }
    }

    /// Stages whose outputs this stage reads.
    ///
    /// Audio extraction reads the raw source directly, so it does not depend
    /// on the copy.
    pub fn predecessors(self) -> &'static [StageId] {
        match self {
            StageId::CopyVideo | StageId::ExtractAudio => &[],
            StageId::NormalizeFramerate => &[StageId::CopyVideo],
            StageId::ResampleAudio => &[StageId::ExtractAudio],
            StageId::ExtractFeatures => &[StageId::NormalizeFramerate],
        }
    }

    /// Builds the action for `item`. Pure: nothing is read from or written to disk.
    pub fn action(
        self,
        item: &VideoItem,
        layout: &OutputLayout,
        config: &CoreConfig,
    ) -> StageAction {
        let invoke_ffmpeg = |args: Vec<OsString>, output: PathBuf| {
            StageAction::Invoke(ToolInvocation {
                tool: Tool::Ffmpeg,
                program: config.ffmpeg_path.clone(),
                args,
                output,
            })
        };

        match self {
            StageId::CopyVideo => StageAction::Copy {
                from: item.source_path.clone(),
                to: layout.copied_video(),
            },
            StageId::NormalizeFramerate => {
                let output = layout.normalized_video();
                invoke_ffmpeg(
                    ffmpeg::normalize_framerate_args(&layout.copied_video(), &output),
                    output,
                )
            }
            StageId::ExtractAudio => {
                let output = layout.extracted_audio();
                invoke_ffmpeg(ffmpeg::extract_audio_args(&item.source_path, &output), output)
            }
            StageId::ResampleAudio => {
                let output = layout.resampled_audio();
                invoke_ffmpeg(
                    ffmpeg::resample_audio_args(&layout.extracted_audio(), &output),
                    output,
                )
            }
            StageId::ExtractFeatures => {
                let output = layout.openface_dir();
                StageAction::Invoke(ToolInvocation {
                    tool: Tool::FeatureExtractor,
                    program: config.extractor_path.clone(),
                    args: extractor::feature_extraction_args(&layout.normalized_video(), &output),
                    output,
                })
            }
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
