// ============================================================================
// moseas-core/src/runner.rs
// ============================================================================
//
// STAGE RUNNER: Executes One Stage for One Item
//
// The runner decides whether a stage runs at all and turns every way it can
// go wrong into a `StageOutcome`, so a failing tool never aborts the batch.
//
// DECISION ORDER:
// 1. overwrite off and marker present  -> Skipped (no process launched)
// 2. a predecessor failed or blocked   -> Blocked (no process launched)
// 3. otherwise run the action          -> Completed or Failed
//
// A skipped stage whose predecessor marker is missing is still skipped; the
// runner only warns about it.

use crate::config::CoreConfig;
use crate::discovery::VideoItem;
use crate::error::CoreError;
use crate::external::ToolExecutor;
use crate::layout::OutputLayout;
use crate::report::{StageOutcome, StageRecord};
use crate::stages::{StageAction, StageId};

use std::fs;

/// Runs stages against a fixed configuration and executor.
pub struct StageRunner<'a> {
    config: &'a CoreConfig,
    executor: &'a dyn ToolExecutor,
}

impl<'a> StageRunner<'a> {
    pub fn new(config: &'a CoreConfig, executor: &'a dyn ToolExecutor) -> Self {
        Self { config, executor }
    }

    /// Runs `stage` for `item`.
    ///
    /// `prior` holds the outcomes of the item's earlier stages in this run
    /// and is used to resolve predecessors.
    pub fn run(
        &self,
        stage: StageId,
        item: &VideoItem,
        layout: &OutputLayout,
        prior: &[StageRecord],
    ) -> StageOutcome {
        let marker = stage.marker_path(layout);

        if !self.config.overwrite && stage.marker_kind().exists(&marker) {
            log::debug!("{}: {} already done ({})", item.id, stage, marker.display());
            self.warn_on_missing_predecessor_output(stage, item, layout);
            return StageOutcome::Skipped;
        }

        if let Some(blocker) = blocking_predecessor(stage, prior) {
            log::warn!("{}: skipping {} because {} did not succeed", item.id, stage, blocker);
            return StageOutcome::Blocked { by: blocker };
        }

        match self.execute(stage.action(item, layout, self.config)) {
            Ok(()) => {
                log::debug!("{}: {} completed", item.id, stage);
                StageOutcome::Completed
            }
            Err(e) => {
                log::error!("{}: {} failed: {}", item.id, stage, e);
                StageOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn execute(&self, action: StageAction) -> Result<(), CoreError> {
        match action {
            StageAction::Copy { from, to } => {
                log::debug!("Copying {} to {}", from.display(), to.display());
                fs::copy(&from, &to)
                    .map(|_| ())
                    .map_err(|source| CoreError::Copy { from, to, source })
            }
            StageAction::Invoke(invocation) => self.executor.execute(&invocation),
        }
    }

    fn warn_on_missing_predecessor_output(
        &self,
        stage: StageId,
        item: &VideoItem,
        layout: &OutputLayout,
    ) {
        for pred in stage.predecessors() {
            let pred_marker = pred.marker_path(layout);
            if !pred.marker_kind().exists(&pred_marker) {
                log::warn!(
                    "{}: {} output exists but its input {} is missing; treating it as done",
                    item.id,
                    stage,
                    pred_marker.display()
                );
            }
        }
    }
}

/// First predecessor of `stage` that did not succeed in this run.
fn blocking_predecessor(stage: StageId, prior: &[StageRecord]) -> Option<StageId> {
    stage.predecessors().iter().copied().find(|pred| {
        prior
            .iter()
            .any(|record| record.stage == *pred && record.outcome.is_failure())
    })
}
