//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `build` command.
/// This command builds the per-video dataset tree from a directory of raw videos.
pub mod build;
