// ============================================================================
// moseas-core/src/report.rs
// ============================================================================
//
// REPORTING: Typed Stage Outcomes and Batch Reports
//
// Every stage produces a `StageOutcome`; outcomes are collected per item into
// an `ItemReport`, and all item reports into a `BatchReport`. Nothing is
// discarded: callers decide what a failure means (the CLI maps it onto its
// exit code).

use crate::discovery::VideoId;
use crate::error::CoreResult;
use crate::stages::StageId;

use serde::Serialize;
use std::fs;
use std::path::Path;

/// Result of one stage for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage ran and its tool exited successfully
    Completed,
    /// The marker already existed and overwrite was off
    Skipped,
    /// A predecessor failed or was blocked in this run
    Blocked { by: StageId },
    /// The tool could not be launched, exited non-zero, or the copy failed
    Failed { reason: String },
}

impl StageOutcome {
    /// Whether dependents of this stage may run.
    pub fn satisfies_dependents(&self) -> bool {
        matches!(self, StageOutcome::Completed | StageOutcome::Skipped)
    }

    pub fn is_failure(&self) -> bool {
        !self.satisfies_dependents()
    }

    /// Short lowercase label for terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            StageOutcome::Completed => "completed",
            StageOutcome::Skipped => "skipped",
            StageOutcome::Blocked { .. } => "blocked",
            StageOutcome::Failed { .. } => "failed",
        }
    }
}

/// One stage's outcome within an item report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: StageId,
    pub outcome: StageOutcome,
}

/// Everything that happened to one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub id: VideoId,
    pub stages: Vec<StageRecord>,
    /// Set when the item's directory tree could not be prepared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_error: Option<String>,
}

impl ItemReport {
    pub fn new(id: VideoId) -> Self {
        Self {
            id,
            stages: Vec::new(),
            layout_error: None,
        }
    }

    pub fn outcome(&self, stage: StageId) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|record| record.stage == stage)
            .map(|record| &record.outcome)
    }

    /// True when the layout failed or any stage did not succeed.
    pub fn has_failures(&self) -> bool {
        self.layout_error.is_some() || self.stages.iter().any(|r| r.outcome.is_failure())
    }
}

/// Tally of stage outcomes across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub completed: usize,
    pub skipped: usize,
    pub blocked: usize,
    pub failed: usize,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
    pub total_operations: usize,
    pub completed_operations: usize,
    pub elapsed_secs: f64,
}

impl BatchReport {
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for record in self.items.iter().flat_map(|item| &item.stages) {
            match record.outcome {
                StageOutcome::Completed => counts.completed += 1,
                StageOutcome::Skipped => counts.skipped += 1,
                StageOutcome::Blocked { .. } => counts.blocked += 1,
                StageOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        self.items.iter().any(ItemReport::has_failures)
    }

    /// Items that need attention, in batch order.
    pub fn failed_items(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| item.has_failures())
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
