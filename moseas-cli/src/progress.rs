// ============================================================================
// moseas-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal progress bar for a batch run
//
// `TerminalProgress` implements the core `ProgressReporter` trait with an
// indicatif bar counting finished operations (5 per video). Item
// announcements go through the logger, which prints them above the bar.
// When stderr is not a terminal the bar is hidden and only log lines remain.

use crate::terminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use moseas_core::{BatchReport, ProgressReporter, StageId, StageOutcome, VideoId};
use std::io::IsTerminal;
use std::time::Duration;

/// indicatif-backed reporter used by the `build` command.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    fn style() -> ProgressStyle {
        let term_width = console::Term::stderr().size().1 as usize;
        let template = if term_width >= 80 {
            "  ⧖ Building: [{bar:30}] {pos}/{len} operations ({elapsed_precise}) {msg}"
        } else {
            "  ⧖ [{bar:15}] {pos}/{len}"
        };
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.")
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgress {
    fn batch_started(&self, total_items: usize, total_operations: usize) {
        debug!("Planned {total_operations} operation(s) for {total_items} video(s)");
        self.bar.set_style(Self::style());
        self.bar.set_length(total_operations as u64);
        self.bar.set_position(0);
        if !self.bar.is_hidden() {
            self.bar.enable_steady_tick(Duration::from_millis(100));
        }
        terminal::set_active_progress(self.bar.clone());
    }

    fn item_started(&self, id: &VideoId) {
        info!("Processing video with id {id}");
        self.bar.set_message(id.to_string());
    }

    fn stage_finished(
        &self,
        id: &VideoId,
        stage: StageId,
        outcome: &StageOutcome,
        completed: usize,
        total: usize,
    ) {
        debug!("[{completed}/{total}] {id}: {stage} {}", outcome.label());
        self.bar.set_position(completed as u64);
    }

    fn batch_finished(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
        terminal::clear_active_progress();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_completed_operations() {
        let progress = TerminalProgress::new();
        progress.bar.set_draw_target(ProgressDrawTarget::hidden());
        progress.batch_started(2, 10);
        assert_eq!(progress.bar.length(), Some(10));

        let id = VideoId::parse("AAAAAAAAAAA").unwrap();
        progress.item_started(&id);
        progress.stage_finished(&id, StageId::CopyVideo, &StageOutcome::Completed, 1, 10);
        progress.stage_finished(&id, StageId::NormalizeFramerate, &StageOutcome::Skipped, 2, 10);
        assert_eq!(progress.bar.position(), 2);

        progress.batch_finished(&BatchReport::default());
        assert!(progress.bar.is_finished());
    }
}
