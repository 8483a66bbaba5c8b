//! Facial feature extractor invocation.
//!
//! The extractor is an OpenFace-style `FeatureExtraction` binary. It is run
//! against the 30 fps video and writes its CSV/HOG/aligned-face output into
//! `feature_extraction/openface/`.

use super::{ToolInvocation, tail_lines};
use crate::error::{CoreResult, command_failed_error, command_start_error};

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// Flags requesting 2D/3D landmarks, head pose, action units and gaze, with
/// multi-view detection tuned for in-the-wild footage.
pub const EXTRACTOR_FLAGS: [&str; 9] = [
    "-q",
    "-2Dfp",
    "-3Dfp",
    "-pose",
    "-aus",
    "-gaze",
    "-multi-view",
    "1",
    "-wild",
];

/// `-f <video> <flags...> -out_dir <out_dir>`
pub fn feature_extraction_args(video: &Path, out_dir: &Path) -> Vec<OsString> {
    let mut args = vec![OsString::from("-f"), video.as_os_str().to_os_string()];
    args.extend(EXTRACTOR_FLAGS.iter().map(OsString::from));
    args.push(OsString::from("-out_dir"));
    args.push(out_dir.as_os_str().to_os_string());
    args
}

/// Runs the extractor to completion, capturing its output.
pub(crate) fn run(invocation: &ToolInvocation) -> CoreResult<()> {
    let label = invocation.label();
    log::debug!("Running feature extraction command: {invocation}");

    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| command_start_error(&label, e))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log::trace!("extractor: {line}");
    }

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(command_failed_error(label, output.status, tail_lines(&stderr, 5)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_extraction_args() {
        let args: Vec<String> = feature_extraction_args(
            Path::new("video/a_30fps.mp4"),
            Path::new("feature_extraction/openface"),
        )
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

        assert_eq!(
            args,
            [
                "-f", "video/a_30fps.mp4", "-q", "-2Dfp", "-3Dfp", "-pose", "-aus", "-gaze",
                "-multi-view", "1", "-wild", "-out_dir", "feature_extraction/openface",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        use crate::error::CoreError;
        use crate::external::Tool;
        use crate::external::test_support::write_script;

        let dir = tempfile::tempdir().unwrap();
        let program = write_script(
            dir.path(),
            "FeatureExtraction",
            "echo 'Processing video' \n\
             echo 'Could not open video/a_30fps.mp4' >&2\n\
             exit 2",
        );
        let invocation = ToolInvocation {
            tool: Tool::FeatureExtractor,
            program,
            args: feature_extraction_args(
                &dir.path().join("a_30fps.mp4"),
                &dir.path().join("openface"),
            ),
            output: dir.path().join("openface"),
        };

        let err = run(&invocation).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed(..)));
        let message = err.to_string();
        assert!(message.contains("Could not open video/a_30fps.mp4"), "{message}");
        assert!(!message.contains("Processing video"), "{message}");
    }
}
