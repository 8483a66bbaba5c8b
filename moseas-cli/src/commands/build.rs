//! Implementation of the 'build' subcommand.
//!
//! This module maps the command-line arguments onto a `CoreConfig`, checks
//! that the external tools can be found, runs the batch through
//! `moseas_core::run_batch` with a terminal progress bar, and prints the
//! summary.

use crate::cli::BuildArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::progress::TerminalProgress;
use crate::terminal;

use moseas_core::external::{check_dependency, check_extractor};
use moseas_core::{BatchReport, CoreConfig, ItemReport, StageOutcome, SystemExecutor, run_batch};

use log::debug;

/// Exit status when at least one stage failed or was blocked.
pub const EXIT_STAGE_FAILURES: u8 = 2;

/// Creates the core configuration from CLI arguments.
pub fn create_core_config(args: &BuildArgs) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::new(args.source_dir.clone(), args.dest_dir.clone());
    config.overwrite = args.overwrite;
    config.jobs = args.jobs;
    config.extractor_path = args.extractor.clone();
    config.ffmpeg_path = args.ffmpeg.clone();

    config.validate()?;
    Ok(config)
}

/// Warns about external tools that cannot be found. Never aborts the run:
/// the stages that need a missing tool fail individually.
fn warn_on_missing_tools(config: &CoreConfig) {
    match check_dependency(&config.ffmpeg_path, "-version") {
        Ok(()) => debug!("ffmpeg found at {}", config.ffmpeg_path.display()),
        Err(e) => terminal::print_warning(&format!(
            "ffmpeg is not available ({e}); framerate and audio stages will fail"
        )),
    }

    match check_extractor(&config.extractor_path) {
        Ok(()) => debug!("Feature extractor found at {}", config.extractor_path.display()),
        Err(e) => terminal::print_warning(&format!(
            "Feature extractor is not available ({e}); feature extraction will fail"
        )),
    }
}

fn display_run_info(config: &CoreConfig) {
    terminal::print_section("MOSEAS build");
    terminal::print_status("Source", &config.source_dir.display().to_string(), false);
    terminal::print_status("Destination", &config.dest_dir.display().to_string(), false);
    terminal::print_status(
        "Overwrite",
        if config.overwrite { "yes" } else { "no" },
        config.overwrite,
    );
    terminal::print_status("Jobs", &config.jobs.to_string(), false);
    terminal::print_status("ffmpeg", &config.ffmpeg_path.display().to_string(), false);
    terminal::print_status("Extractor", &config.extractor_path.display().to_string(), false);

    if config.overwrite {
        terminal::print_warning(&format!(
            "Overwrite enabled: existing outputs under {} will be deleted",
            config.dest_dir.display()
        ));
    }
}

/// Describes why `item` needs attention, one line per problem.
fn item_problems(item: &ItemReport) -> Vec<String> {
    if let Some(layout_error) = &item.layout_error {
        return vec![format!("layout: {layout_error}")];
    }

    item.stages
        .iter()
        .filter_map(|record| match &record.outcome {
            StageOutcome::Failed { reason } => Some(format!("{}: {}", record.stage, reason)),
            StageOutcome::Blocked { by } => Some(format!("{}: blocked by {}", record.stage, by)),
            StageOutcome::Completed | StageOutcome::Skipped => None,
        })
        .collect()
}

fn display_summary(report: &BatchReport) {
    let counts = report.counts();

    terminal::print_section("Summary");
    terminal::print_status("Videos", &report.items.len().to_string(), false);
    terminal::print_status(
        "Operations",
        &format!("{}/{}", report.completed_operations, report.total_operations),
        false,
    );
    terminal::print_status("Completed", &counts.completed.to_string(), false);
    terminal::print_status("Skipped", &counts.skipped.to_string(), false);
    terminal::print_status("Blocked", &counts.blocked.to_string(), counts.blocked > 0);
    terminal::print_status("Failed", &counts.failed.to_string(), counts.failed > 0);
    terminal::print_status(
        "Elapsed",
        &terminal::format_duration_seconds(report.elapsed_secs),
        false,
    );

    for item in report.failed_items() {
        terminal::print_warning(&format!("Video {} did not finish", item.id));
        for problem in item_problems(item) {
            terminal::print_sub_item(&problem);
        }
    }

    if report.items.is_empty() {
        terminal::print_warning("No videos found in the source directory");
    } else if !report.has_failures() {
        terminal::print_success("All operations finished");
    }
}

/// Runs the build command and returns the batch report.
///
/// Fatal errors (invalid configuration, missing source directory, invalid
/// filenames, unusable destination) are returned as `Err`; stage failures
/// are part of the report.
pub fn run_build(args: &BuildArgs) -> CliResult<BatchReport> {
    let config = create_core_config(args)?;

    display_run_info(&config);
    warn_on_missing_tools(&config);

    terminal::print_section("Processing");
    let progress = TerminalProgress::new();
    let report = match run_batch(&config, &SystemExecutor, &progress) {
        Ok(report) => report,
        Err(e) => {
            terminal::clear_active_progress();
            return Err(e);
        }
    };

    display_summary(&report);

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .cli_with_context(|| format!("Failed to write report '{}'", path.display()))?;
        terminal::print_success(&format!("Report written to {}", path.display()));
    }

    Ok(report)
}

/// Maps a finished batch onto the process exit status.
pub fn exit_status(report: &BatchReport, allow_failures: bool) -> u8 {
    if report.has_failures() && !allow_failures {
        EXIT_STAGE_FAILURES
    } else {
        0
    }
}
