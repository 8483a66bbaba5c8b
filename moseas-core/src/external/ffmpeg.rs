// ============================================================================
// moseas-core/src/external/ffmpeg.rs
// ============================================================================
//
// FFMPEG: Argument Builders and Sidecar Execution
//
// Builds the argument lists for the three ffmpeg stages and runs them through
// ffmpeg-sidecar, forwarding ffmpeg's own error lines to the log.

use super::{ToolInvocation, tail_lines};
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::ffi::OsString;
use std::path::Path;

/// Frame rate every normalized video is re-encoded to.
pub const TARGET_FPS: u32 = 30;

/// Sample rate of the extracted PCM audio.
pub const EXTRACT_SAMPLE_RATE: u32 = 44_100;

/// Channel count of the extracted PCM audio.
pub const EXTRACT_CHANNELS: u32 = 2;

/// Sample rate of the resampled audio.
pub const RESAMPLE_RATE: u32 = 16_000;

/// Options shared by every invocation: errors only, no stdin, overwrite target.
///
/// The `level+` prefix keeps the `[error]` tags ffmpeg-sidecar parses log
/// levels from.
fn base_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> =
        ["-hide_banner", "-loglevel", "level+error", "-nostdin", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
    args.push(input.as_os_str().to_os_string());
    args
}

fn push_all(args: &mut Vec<OsString>, values: &[&str]) {
    args.extend(values.iter().map(OsString::from));
}

/// `-i <input> -filter:v fps=30 <output>`
pub fn normalize_framerate_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base_args(input);
    push_all(&mut args, &["-filter:v", &format!("fps={TARGET_FPS}")]);
    args.push(output.as_os_str().to_os_string());
    args
}

/// `-i <input> -vn -acodec pcm_s16le -ar 44100 -ac 2 <output>`
pub fn extract_audio_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base_args(input);
    push_all(
        &mut args,
        &[
            "-vn",
            "-acodec",
            "pcm_s16le",
            "-ar",
            &EXTRACT_SAMPLE_RATE.to_string(),
            "-ac",
            &EXTRACT_CHANNELS.to_string(),
        ],
    );
    args.push(output.as_os_str().to_os_string());
    args
}

/// `-i <input> -ar 16000 <output>`
pub fn resample_audio_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base_args(input);
    push_all(&mut args, &["-ar", &RESAMPLE_RATE.to_string()]);
    args.push(output.as_os_str().to_os_string());
    args
}

/// Spawns ffmpeg through ffmpeg-sidecar and waits for it to exit.
pub(crate) fn run(invocation: &ToolInvocation) -> CoreResult<()> {
    let label = invocation.label();
    log::debug!("Running ffmpeg command: {invocation}");

    let mut cmd = FfmpegCommand::new_with_path(&invocation.program);
    cmd.args(&invocation.args);

    let mut child = cmd.spawn().map_err(|e| command_start_error(&label, e))?;

    let events = match child.iter() {
        Ok(events) => events,
        Err(e) => {
            let _ = child.kill();
            return Err(CoreError::OperationFailed(format!(
                "Failed to read output of {label}: {e}"
            )));
        }
    };

    let mut error_lines = Vec::new();
    for event in events {
        match event {
            // Untagged lines come from tools that print before ffmpeg's own
            // logger is set up, e.g. a missing input file.
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal | LogLevel::Unknown, line)
            | FfmpegEvent::Error(line) => {
                log::debug!("ffmpeg: {line}");
                error_lines.push(line);
            }
            FfmpegEvent::Log(LogLevel::Warning, line) => log::debug!("ffmpeg warning: {line}"),
            _ => {}
        }
    }

    let status = child
        .wait()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to wait for {label}: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(command_failed_error(
            label,
            status,
            tail_lines(&error_lines.join("\n"), 5),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_normalize_framerate_args() {
        let args = normalize_framerate_args(Path::new("v/a.mp4"), Path::new("v/a_30fps.mp4"));
        assert_eq!(
            strings(&args),
            [
                "-hide_banner", "-loglevel", "level+error", "-nostdin", "-y", "-i", "v/a.mp4",
                "-filter:v", "fps=30", "v/a_30fps.mp4",
            ]
        );
    }

    #[test]
    fn test_extract_audio_args() {
        let args = extract_audio_args(Path::new("raw/a.mp4"), Path::new("audio/a.wav"));
        let args = strings(&args);
        assert_eq!(args[6], "raw/a.mp4");
        assert_eq!(
            &args[7..],
            ["-vn", "-acodec", "pcm_s16le", "-ar", "44100", "-ac", "2", "audio/a.wav"]
        );
    }

    #[test]
    fn test_resample_audio_args() {
        let args = resample_audio_args(Path::new("audio/a.wav"), Path::new("audio/a_16hz.wav"));
        let args = strings(&args);
        assert_eq!(&args[6..], ["audio/a.wav", "-ar", "16000", "audio/a_16hz.wav"]);
    }

    #[test]
    fn test_paths_with_spaces_stay_single_arguments() {
        let args = resample_audio_args(
            Path::new("my data/a.wav"),
            Path::new("out dir; rm -rf x/a_16hz.wav"),
        );
        let args = strings(&args);
        assert!(args.contains(&"my data/a.wav".to_string()));
        assert_eq!(args.last().unwrap(), "out dir; rm -rf x/a_16hz.wav");
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::external::test_support::write_script;
        use crate::external::{SystemExecutor, Tool, ToolExecutor};
        use std::fs;
        use tempfile::tempdir;

        fn invocation(program: &Path, dir: &Path) -> ToolInvocation {
            ToolInvocation {
                tool: Tool::Ffmpeg,
                program: program.to_path_buf(),
                args: normalize_framerate_args(&dir.join("in.mp4"), &dir.join("out.mp4")),
                output: dir.join("out.mp4"),
            }
        }

        #[test]
        fn test_failure_carries_untagged_stderr() {
            let dir = tempdir().unwrap();
            let program = write_script(
                dir.path(),
                "ffmpeg",
                "echo 'in.mp4: No such file or directory' >&2\nexit 1",
            );

            let err = run(&invocation(&program, dir.path())).unwrap_err();
            assert!(matches!(err, CoreError::CommandFailed(..)));
            assert!(err.to_string().contains("No such file or directory"), "{err}");
        }

        #[test]
        fn test_failure_carries_tagged_error_lines() {
            let dir = tempdir().unwrap();
            let program = write_script(
                dir.path(),
                "ffmpeg",
                "echo '[warning] deprecated pixel format' >&2\n\
                 echo '[error] Invalid data found when processing input' >&2\n\
                 exit 1",
            );

            let err = SystemExecutor.execute(&invocation(&program, dir.path())).unwrap_err();
            let message = err.to_string();
            assert!(message.contains("Invalid data found"), "{message}");
            assert!(!message.contains("deprecated pixel format"), "{message}");
        }

        #[test]
        fn test_success_passes_error_loglevel() {
            let dir = tempdir().unwrap();
            let argv = dir.path().join("argv.txt");
            let program = write_script(
                dir.path(),
                "ffmpeg",
                &format!("echo \"$@\" > '{}'\nexit 0", argv.display()),
            );

            run(&invocation(&program, dir.path())).unwrap();
            let recorded = fs::read_to_string(&argv).unwrap();
            assert!(recorded.contains("-loglevel level+error"), "{recorded}");
        }
    }
}
