//! Tooling & Integration Layer
//!
//! Command-line entry points over the library. Argument parsing stays thin; all
//! behavior lives in contexts, commands, and the workflow runner.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
