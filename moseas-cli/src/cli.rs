// moseas-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use moseas_core::config::{DEFAULT_EXTRACTOR_PATH, DEFAULT_FFMPEG_PATH, DEFAULT_JOBS, MAX_JOBS};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "MOSEAS: dataset directory builder",
    long_about = "Builds the per-video MOSEAS directory tree (copied video, 30 fps video, \
                  44.1 kHz and 16 kHz audio, facial features) from a directory of \
                  <youtube-id>.mp4 files using ffmpeg and an external feature extractor."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output for troubleshooting
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds the dataset tree for every video in SOURCE_DIR under DEST_DIR
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory containing the raw <11-char-id>.mp4 files
    #[arg(required = true, value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Root directory of the dataset tree
    #[arg(required = true, value_name = "DEST_DIR")]
    pub dest_dir: PathBuf,

    /// Delete and regenerate existing outputs, including DEST_DIR itself (destructive)
    #[arg(long)]
    pub overwrite: bool,

    /// Path to the facial feature extraction executable
    #[arg(
        long,
        value_name = "PATH",
        env = "MOSEAS_EXTRACTOR",
        default_value = DEFAULT_EXTRACTOR_PATH
    )]
    pub extractor: PathBuf,

    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH", env = "MOSEAS_FFMPEG", default_value = DEFAULT_FFMPEG_PATH)]
    pub ffmpeg: PathBuf,

    /// Number of videos processed concurrently
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = DEFAULT_JOBS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_JOBS as u64)
    )]
    pub jobs: usize,

    /// Optional: Directory for a run log file (moseas_build_<timestamp>.log)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: Write the batch report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Exit with status 0 even when some stages failed
    #[arg(long)]
    pub allow_failures: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_build(args: &[&str]) -> BuildArgs {
        let cli = Cli::try_parse_from(args).expect("arguments should parse");
        match cli.command {
            Commands::Build(build_args) => build_args,
        }
    }

    #[test]
    fn test_parse_build_basic_args() {
        let args = parse_build(&["moseas", "build", "raw", "dataset"]);
        assert_eq!(args.source_dir, PathBuf::from("raw"));
        assert_eq!(args.dest_dir, PathBuf::from("dataset"));
        assert!(!args.overwrite);
        assert_eq!(args.jobs, 1);
        assert!(args.log_dir.is_none());
        assert!(args.report.is_none());
        assert!(!args.allow_failures);
    }

    #[test]
    fn test_parse_build_all_options() {
        let cli = Cli::try_parse_from([
            "moseas",
            "-v",
            "build",
            "raw",
            "dataset",
            "--overwrite",
            "--extractor",
            "/opt/openface/FeatureExtraction",
            "--ffmpeg",
            "/usr/local/bin/ffmpeg",
            "--jobs",
            "4",
            "--log-dir",
            "logs",
            "--report",
            "report.json",
            "--allow-failures",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Build(args) = cli.command;
        assert!(args.overwrite);
        assert_eq!(args.extractor, PathBuf::from("/opt/openface/FeatureExtraction"));
        assert_eq!(args.ffmpeg, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(args.jobs, 4);
        assert_eq!(args.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(args.report, Some(PathBuf::from("report.json")));
        assert!(args.allow_failures);
    }

    #[test]
    fn test_jobs_out_of_range_rejected() {
        for jobs in ["0", "65"] {
            let args = ["moseas", "build", "raw", "dataset", "--jobs", jobs];
            assert!(Cli::try_parse_from(args).is_err(), "--jobs {jobs} should be rejected");
        }
    }

    #[test]
    fn test_missing_destination_rejected() {
        assert!(Cli::try_parse_from(["moseas", "build", "raw"]).is_err());
    }
}
