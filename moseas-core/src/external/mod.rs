// ============================================================================
// moseas-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and the Feature Extractor
//
// This module encapsulates every process launched by the pipeline. Stages
// describe what they want to run as a `ToolInvocation` (an explicit argv,
// never a shell string) and hand it to a `ToolExecutor`.
//
// KEY COMPONENTS:
// - ToolInvocation: program, argument list and expected output of one run
// - ToolExecutor: trait abstracting process execution (mockable in tests)
// - SystemExecutor: real implementation (ffmpeg-sidecar / std::process)
// - Dependency checking functions
//
// DESIGN PHILOSOPHY:
// Consumers can provide their own executor implementation for testing or
// specialized behavior; `run_batch` only sees the trait.

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Argument builders and execution for ffmpeg
pub mod ffmpeg;

/// Argument builder and execution for the facial feature extractor
pub mod extractor;

// ============================================================================
// INVOCATIONS
// ============================================================================

/// External executables the pipeline delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Ffmpeg,
    FeatureExtractor,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Ffmpeg => f.write_str("ffmpeg"),
            Tool::FeatureExtractor => f.write_str("feature extractor"),
        }
    }
}

/// A fully built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: Tool,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// File or directory the tool is expected to produce
    pub output: PathBuf,
}

impl ToolInvocation {
    /// Short name used in log lines and error messages.
    pub fn label(&self) -> String {
        let program = self
            .program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        format!("{} ({})", self.tool, program)
    }

    /// Whether `flag` appears verbatim in the argument list.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// EXECUTION ABSTRACTION
// ============================================================================

/// Runs external tools on behalf of the stage runner.
///
/// Implementations block until the process exits. `Ok(())` means the tool
/// exited successfully; launch failures and non-zero exits are errors.
pub trait ToolExecutor: Send + Sync {
    fn execute(&self, invocation: &ToolInvocation) -> CoreResult<()>;
}

/// Executor that launches real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor;

impl ToolExecutor for SystemExecutor {
    fn execute(&self, invocation: &ToolInvocation) -> CoreResult<()> {
        match invocation.tool {
            Tool::Ffmpeg => ffmpeg::run(invocation),
            Tool::FeatureExtractor => extractor::run(invocation),
        }
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `program` can be launched by running it with `version_arg`.
///
/// * `Err(CoreError::CommandStart)` - the program is missing or not executable
pub fn check_dependency(program: &Path, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(program)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", program.display());
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::debug!("Dependency '{}' not found.", program.display());
            }
            Err(CoreError::CommandStart(program.display().to_string(), e))
        }
    }
}

/// Checks that the feature extractor exists as a file.
///
/// The extractor has no side-effect free version flag, so only its presence
/// is verified. Bare names are looked up on `PATH`.
pub fn check_extractor(program: &Path) -> CoreResult<()> {
    let found = if program.components().count() > 1 || program.is_absolute() {
        program.is_file()
    } else {
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
            || program.is_file()
    };

    if found {
        Ok(())
    } else {
        Err(CoreError::CommandStart(
            program.display().to_string(),
            io::Error::new(io::ErrorKind::NotFound, "executable not found"),
        ))
    }
}

/// Keeps the last `max_lines` non-empty lines of tool output for error reports.
pub(crate) fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[cfg(all(test, unix))]
pub(crate) mod test_support {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Writes an executable `/bin/sh` script standing in for an external tool.
    pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
