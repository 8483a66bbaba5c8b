//! Batch progress reporting.
//!
//! The pipeline plans `items × 5` operations and advances a counter once per
//! finished stage, whatever the outcome. The counter lives in a
//! [`BatchProgress`] context that is passed to every item explicitly, so
//! parallel items share it without global state.

use crate::discovery::VideoId;
use crate::report::{BatchReport, StageOutcome};
use crate::stages::{STAGES_PER_ITEM, StageId};

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives progress events from the pipeline.
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first item, with the planned operation count.
    fn batch_started(&self, total_items: usize, total_operations: usize);

    /// Called once per item before its first stage.
    fn item_started(&self, id: &VideoId);

    /// Called after every stage; `completed` already includes this stage.
    fn stage_finished(
        &self,
        id: &VideoId,
        stage: StageId,
        outcome: &StageOutcome,
        completed: usize,
        total: usize,
    );

    /// Called once after the last item.
    fn batch_finished(&self, report: &BatchReport);
}

/// Reporter that writes progress through the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct LogProgressReporter;

impl ProgressReporter for LogProgressReporter {
    fn batch_started(&self, total_items: usize, total_operations: usize) {
        log::info!("Processing {total_items} video(s), {total_operations} operation(s)");
    }

    fn item_started(&self, id: &VideoId) {
        log::info!("Processing video with id {id}");
    }

    fn stage_finished(
        &self,
        id: &VideoId,
        stage: StageId,
        outcome: &StageOutcome,
        completed: usize,
        total: usize,
    ) {
        log::info!("[{completed}/{total}] {id}: {stage} {}", outcome.label());
    }

    fn batch_finished(&self, report: &BatchReport) {
        log::info!(
            "Finished {}/{} operation(s) in {:.1}s",
            report.completed_operations,
            report.total_operations,
            report.elapsed_secs
        );
    }
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn batch_started(&self, _total_items: usize, _total_operations: usize) {}
    fn item_started(&self, _id: &VideoId) {}
    fn stage_finished(
        &self,
        _id: &VideoId,
        _stage: StageId,
        _outcome: &StageOutcome,
        _completed: usize,
        _total: usize,
    ) {
    }
    fn batch_finished(&self, _report: &BatchReport) {}
}

/// Shared progress state for one batch run.
pub struct BatchProgress<'a> {
    total: usize,
    completed: AtomicUsize,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> BatchProgress<'a> {
    /// Plans `item_count × STAGES_PER_ITEM` operations.
    pub fn new(item_count: usize, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            total: item_count * STAGES_PER_ITEM,
            completed: AtomicUsize::new(0),
            reporter,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Announces that `id` is about to be processed.
    pub fn announce(&self, id: &VideoId) {
        self.reporter.item_started(id);
    }

    /// Counts one finished stage and returns the new completed count.
    pub fn advance(&self, id: &VideoId, stage: StageId, outcome: &StageOutcome) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.reporter
            .stage_finished(id, stage, outcome, completed, self.total);
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(usize, usize)>>,
        announced: Mutex<Vec<String>>,
    }

    impl ProgressReporter for Recorder {
        fn batch_started(&self, _: usize, _: usize) {}
        fn item_started(&self, id: &VideoId) {
            self.announced.lock().unwrap().push(id.to_string());
        }
        fn stage_finished(
            &self,
            _: &VideoId,
            _: StageId,
            _: &StageOutcome,
            completed: usize,
            total: usize,
        ) {
            self.events.lock().unwrap().push((completed, total));
        }
        fn batch_finished(&self, _: &BatchReport) {}
    }

    #[test]
    fn test_total_is_five_per_item() {
        let reporter = NullProgressReporter;
        assert_eq!(BatchProgress::new(3, &reporter).total(), 15);
        assert_eq!(BatchProgress::new(0, &reporter).total(), 0);
    }

    #[test]
    fn test_advance_counts_every_outcome() {
        let recorder = Recorder::default();
        let progress = BatchProgress::new(1, &recorder);
        let id = VideoId::parse("AAAAAAAAAAA").unwrap();
        progress.announce(&id);

        let outcomes = [
            StageOutcome::Completed,
            StageOutcome::Skipped,
            StageOutcome::Failed { reason: "boom".into() },
            StageOutcome::Blocked { by: StageId::ExtractAudio },
            StageOutcome::Completed,
        ];
        for (stage, outcome) in StageId::ALL.into_iter().zip(outcomes.iter()) {
            progress.advance(&id, stage, outcome);
        }

        assert_eq!(progress.completed(), 5);
        assert_eq!(*recorder.announced.lock().unwrap(), ["AAAAAAAAAAA"]);
        let events = recorder.events.lock().unwrap();
        assert_eq!(events.first(), Some(&(1, 5)));
        assert_eq!(events.last(), Some(&(5, 5)));
    }

    #[test]
    fn test_concurrent_advance() {
        let reporter = NullProgressReporter;
        let progress = BatchProgress::new(8, &reporter);
        let id = VideoId::parse("AAAAAAAAAAA").unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for stage in StageId::ALL {
                        progress.advance(&id, stage, &StageOutcome::Skipped);
                    }
                });
            }
        });

        assert_eq!(progress.completed(), progress.total());
    }
}
