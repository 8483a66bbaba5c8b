// ============================================================================
// moseas-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// This module provides the terminal output styling for the CLI: section
// headers, status lines, success/warning/error lines, and the coordination
// between log output and the active progress bar.
//
// KEY COMPONENTS:
// - styling: Constants for symbols, prefixes and indentation
// - UI component functions: print_section, print_status, print_success, etc.
// - write_line: Console sink used by the logger, routed above the progress bar
//
// All UI functions emit through the `log` facade at info level so the same
// lines end up in the run log file when one is configured.

use indicatif::ProgressBar;
use log::info;
use owo_colors::OwoColorize;
use std::sync::{LazyLock, Mutex};
use unicode_width::UnicodeWidthStr;

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";

    // Section formatting
    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    // Indentation
    pub const STATUS_INDENT: &str = "  ";
    pub const SUBSECTION_INDENT: &str = "  ";
    pub const SUB_ITEM_INDENT: &str = "    ";

    pub const EMPTY_LINE: &str = "";

    /// Column the values of status lines are aligned to
    pub const STATUS_LABEL_WIDTH: usize = 15;
}

// ============================================================================
// TERMINAL STATE
// ============================================================================

/// Progress bar currently drawn on stderr, if any.
static ACTIVE_PROGRESS: LazyLock<Mutex<Option<ProgressBar>>> = LazyLock::new(|| Mutex::new(None));

/// Registers `bar` so that log lines are printed above it.
pub fn set_active_progress(bar: ProgressBar) {
    if let Ok(mut active) = ACTIVE_PROGRESS.lock() {
        *active = Some(bar);
    }
}

/// Unregisters the active progress bar.
pub fn clear_active_progress() {
    if let Ok(mut active) = ACTIVE_PROGRESS.lock() {
        active.take();
    }
}

/// Writes one console line, above the progress bar when one is visible.
pub fn write_line(line: &str) {
    let active = ACTIVE_PROGRESS.lock().ok().and_then(|guard| guard.clone());
    match active {
        Some(bar) if !bar.is_hidden() => bar.println(line),
        _ => eprintln!("{line}"),
    }
}

/// Check if color should be used (respects NO_COLOR and non-terminal stderr)
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled_stderr()
}

// ============================================================================
// UI COMPONENTS
// ============================================================================

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("{}", styling::EMPTY_LINE);
    if should_use_color() {
        info!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.to_uppercase().cyan().bold(),
            styling::SECTION_SUFFIX
        );
    } else {
        info!("{}{}{}", styling::SECTION_PREFIX, title.to_uppercase(), styling::SECTION_SUFFIX);
    }
    info!("{}", styling::EMPTY_LINE);
}

/// Print a status line (key-value pair)
///
/// # Arguments
///
/// * `label` - The label for the status line
/// * `value` - The value to display
/// * `highlight` - Whether to emphasize the value
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let formatted_label = format!("{}:{}", label, " ".repeat(status_padding(label)));

    let formatted_value = if should_use_color() && highlight {
        value.bold().to_string()
    } else {
        value.to_string()
    };

    info!("{}{} {}", styling::STATUS_INDENT, formatted_label, formatted_value);
}

/// Spaces after `label:` so values line up, measured in terminal columns.
fn status_padding(label: &str) -> usize {
    styling::STATUS_LABEL_WIDTH
        .checked_sub(label.width())
        .filter(|&padding| padding > 0)
        .unwrap_or(1)
}

/// Print an indented detail line below a warning
pub fn print_sub_item(message: &str) {
    info!("{}{}", styling::SUB_ITEM_INDENT, message);
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        info!("{}{} {}", styling::SUBSECTION_INDENT, styling::SUCCESS_SYMBOL, message.green());
    } else {
        info!("{}{} {}", styling::SUBSECTION_INDENT, styling::SUCCESS_SYMBOL, message);
    }
}

/// Print a non-fatal problem the user should know about
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!(
            "{}{} {}",
            styling::SUBSECTION_INDENT,
            styling::WARNING_SYMBOL.yellow().bold(),
            message.yellow()
        );
    } else {
        info!("{}{} {}", styling::SUBSECTION_INDENT, styling::WARNING_SYMBOL, message);
    }
}

/// Print an error message with context
///
/// # Arguments
///
/// * `title` - The error title
/// * `message` - The error message
/// * `suggestion` - Optional suggestion for fixing the error
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        // Only the title text is red, not the symbol
        info!("{} {}", styling::ERROR_SYMBOL, title.red().bold());
    } else {
        info!("{} {}", styling::ERROR_SYMBOL, title);
    }

    info!("{}", styling::EMPTY_LINE);
    info!("  Message:  {}", message);

    if let Some(suggestion_text) = suggestion {
        info!("{}", styling::EMPTY_LINE);
        info!("  Suggestion: {}", suggestion_text);
    }

    info!("{}", styling::EMPTY_LINE);
}

/// Formats a duration in seconds as `HH:MM:SS`.
pub fn format_duration_seconds(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
