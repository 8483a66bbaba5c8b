// moseas-core/tests/common/mod.rs
//
// Shared helpers for the pipeline integration tests.

#![allow(dead_code)]

use moseas_core::{CoreResult, Tool, ToolExecutor, ToolInvocation};
use moseas_core::error::CoreError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Executor that records every invocation and fakes the tool's output.
///
/// ffmpeg invocations write a small file at the expected output path, the
/// feature extractor creates its output directory with a CSV inside. Tools
/// listed in `failing` exit with an error and produce nothing.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<ToolInvocation>>,
    failing: Vec<Tool>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(tools: &[Tool]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: tools.to_vec(),
        }
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ToolExecutor for RecordingExecutor {
    fn execute(&self, invocation: &ToolInvocation) -> CoreResult<()> {
        self.calls.lock().unwrap().push(invocation.clone());

        if self.failing.contains(&invocation.tool) {
            return Err(CoreError::OperationFailed(format!(
                "simulated {} failure",
                invocation.tool
            )));
        }

        match invocation.tool {
            Tool::Ffmpeg => {
                let input = invocation
                    .args
                    .iter()
                    .position(|arg| arg == "-i")
                    .and_then(|i| invocation.args.get(i + 1))
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .unwrap_or_default();
                fs::write(&invocation.output, format!("ffmpeg output from {input}"))?;
            }
            Tool::FeatureExtractor => {
                fs::create_dir_all(&invocation.output)?;
                fs::write(invocation.output.join("features.csv"), "frame,x_0,y_0\n1,0.5,0.5\n")?;
            }
        }
        Ok(())
    }
}

/// Creates a dummy file with some content and returns its path.
pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(format!("raw video {filename}").as_bytes())
        .expect("Failed to write dummy content");
    file_path
}

/// Reads every file below `root` into (relative path, bytes), sorted.
pub fn snapshot_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.push((rel, fs::read(&path).unwrap()));
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
