//! Batch orchestration.
//!
//! [`run_batch`] validates the whole batch up front, prepares the destination
//! root, then drives every item through the five stages. Only the pre-checks
//! can fail the batch; everything after them is recorded in the returned
//! [`BatchReport`].

use crate::config::CoreConfig;
use crate::discovery::{VideoItem, discover_items};
use crate::error::{CoreError, CoreResult};
use crate::external::ToolExecutor;
use crate::layout::{ensure_dir, ensure_item_layout};
use crate::progress::{BatchProgress, ProgressReporter};
use crate::report::{BatchReport, ItemReport, StageOutcome, StageRecord};
use crate::runner::StageRunner;
use crate::stages::StageId;

use rayon::prelude::*;
use std::time::Instant;

/// Runs one batch.
///
/// # Errors
///
/// Returns an error, before anything is written, when the source directory
/// is missing or any filename is not `<11-char-id>.mp4`. Returns an error
/// when the destination root cannot be prepared. Stage and per-item layout
/// failures never produce an error; they are recorded in the report.
///
/// With `config.overwrite` the destination root itself is removed and
/// recreated, deleting everything below it.
pub fn run_batch(
    config: &CoreConfig,
    executor: &dyn ToolExecutor,
    reporter: &dyn ProgressReporter,
) -> CoreResult<BatchReport> {
    let start = Instant::now();
    config.validate()?;

    let items = discover_items(&config.source_dir)?;
    log::debug!(
        "Validated {} source file(s) in {}",
        items.len(),
        config.source_dir.display()
    );

    ensure_dir(&config.dest_dir, config.overwrite)?;

    let progress = BatchProgress::new(items.len(), reporter);
    reporter.batch_started(items.len(), progress.total());

    let runner = StageRunner::new(config, executor);
    let item_reports: Vec<ItemReport> = if config.jobs > 1 && items.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to start worker pool: {e}")))?;
        pool.install(|| {
            items
                .par_iter()
                .map(|item| process_item(item, config, &runner, &progress))
                .collect::<Vec<_>>()
        })
    } else {
        items
            .iter()
            .map(|item| process_item(item, config, &runner, &progress))
            .collect()
    };

    let report = BatchReport {
        items: item_reports,
        total_operations: progress.total(),
        completed_operations: progress.completed(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    reporter.batch_finished(&report);
    Ok(report)
}

/// Prepares one item's layout and runs its stages in order.
fn process_item(
    item: &VideoItem,
    config: &CoreConfig,
    runner: &StageRunner<'_>,
    progress: &BatchProgress<'_>,
) -> ItemReport {
    progress.announce(&item.id);
    let mut report = ItemReport::new(item.id.clone());

    let layout = match ensure_item_layout(item, &config.dest_dir, config.overwrite) {
        Ok(layout) => layout,
        Err(e) => {
            log::error!("{}: cannot prepare output directories: {}", item.id, e);
            let reason = format!("output directories unavailable: {e}");
            report.layout_error = Some(e.to_string());
            for stage in StageId::ALL {
                let outcome = StageOutcome::Failed {
                    reason: reason.clone(),
                };
                progress.advance(&item.id, stage, &outcome);
                report.stages.push(StageRecord { stage, outcome });
            }
            return report;
        }
    };

    for stage in StageId::ALL {
        let outcome = runner.run(stage, item, &layout, &report.stages);
        progress.advance(&item.id, stage, &outcome);
        report.stages.push(StageRecord { stage, outcome });
    }

    report
}
