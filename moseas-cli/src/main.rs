// moseas-cli/src/main.rs
//
// Entry point for the `moseas` binary.
//
// Responsibilities:
// - Parsing command-line arguments (definitions live in cli.rs).
// - Setting up logging to the console and, with --log-dir, a run log file.
// - Dispatching to the command implementation.
// - Mapping the outcome onto the process exit status:
//   0 success, 1 fatal error, 2 stage failures (0 with --allow-failures).

use clap::Parser;
use moseas_cli::error::{CliErrorContext, CliResult, suggestion_for};
use moseas_cli::logging::{init_logging, run_log_path};
use moseas_cli::{BuildArgs, Cli, Commands, exit_status, run_build, terminal};
use owo_colors::OwoColorize;
use std::fs;
use std::process::ExitCode;

const EXIT_FATAL: u8 = 1;

/// Creates the log directory if requested and installs the logger.
fn setup_logging(verbose: bool, args: &BuildArgs) -> CliResult<()> {
    let log_file = match &args.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).cli_with_context(|| {
                format!("Failed to create log directory '{}'", dir.display())
            })?;
            Some(run_log_path(dir))
        }
        None => None,
    };

    init_logging(verbose, log_file.as_deref())?;

    if let Some(path) = &log_file {
        log::debug!("Writing run log to {}", path.display());
    }
    Ok(())
}

fn build(verbose: bool, args: BuildArgs) -> ExitCode {
    if let Err(e) = setup_logging(verbose, &args) {
        if terminal::should_use_color() {
            eprintln!("{} {}", "Error:".red().bold(), e);
        } else {
            eprintln!("Error: {e}");
        }
        return ExitCode::from(EXIT_FATAL);
    }

    match run_build(&args) {
        Ok(report) => {
            let status = exit_status(&report, args.allow_failures);
            if status != 0 {
                log::warn!(
                    "{} video(s) had failed or blocked stages",
                    report.failed_items().count()
                );
            }
            ExitCode::from(status)
        }
        Err(e) => {
            terminal::print_error("Build failed", &e.to_string(), suggestion_for(&e));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => build(cli.verbose, args),
    }
}
