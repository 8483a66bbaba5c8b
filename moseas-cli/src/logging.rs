// ============================================================================
// moseas-cli/src/logging.rs
// ============================================================================
//
// LOGGING: fern Dispatch Setup for Console and Run Log File
//
// The CLI routes everything through the `log` facade. This module installs a
// `fern` dispatcher with two outputs:
// - console: info lines verbatim (they are already styled by terminal.rs),
//   other levels prefixed with a colored tag, printed above the progress bar
// - run log file (optional): every line with a timestamp and level, ANSI
//   escapes stripped, always at debug level
//
// USAGE:
// `-v/--verbose` raises the console level from Info to Debug.

use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use log::{Level, LevelFilter};
use moseas_core::CoreError;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("moseas_build_{}.log", moseas_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("moseas_build_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log file inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("moseas_build_{}.log", get_timestamp()))
}

fn level_tag(level: Level, use_color: bool) -> String {
    let tag = format!("[{}]", level);
    if !use_color {
        return tag;
    }
    match level {
        Level::Error => tag.red().bold().to_string(),
        Level::Warn => tag.yellow().to_string(),
        Level::Info => tag.cyan().to_string(),
        Level::Debug => tag.magenta().to_string(),
        Level::Trace => tag.blue().to_string(),
    }
}

/// Installs the global logger.
///
/// Must be called at most once per process.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let use_color = terminal::should_use_color();

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| match record.level() {
            Level::Info => out.finish(format_args!("{message}")),
            level => out.finish(format_args!("{} {}", level_tag(level, use_color), message)),
        })
        .chain(fern::Output::call(|record| {
            terminal::write_line(&record.args().to_string())
        }));

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        // ffmpeg-sidecar reports its own parsing noise at info/debug
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console);

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .cli_with_context(|| format!("Failed to create log file '{}'", path.display()))?;
        let file_output = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    strip_ansi_escapes::strip_str(message.to_string())
                ))
            })
            .chain(file);
        dispatch = dispatch.chain(file_output);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_path_shape() {
        let path = run_log_path(Path::new("/tmp/logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("moseas_build_"));
        assert!(name.ends_with(".log"));
        // moseas_build_ + YYYYMMDD_HHMMSS + .log
        assert_eq!(name.len(), "moseas_build_".len() + 15 + ".log".len());
        assert_eq!(path.parent(), Some(Path::new("/tmp/logs")));
    }

    #[test]
    fn test_level_tag_plain() {
        assert_eq!(level_tag(Level::Warn, false), "[WARN]");
        assert_eq!(level_tag(Level::Error, false), "[ERROR]");
    }
}
