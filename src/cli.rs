// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `rund`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rund",
    version,
    about = "Run a graph of commands in parallel topological order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph file (TOML).
    ///
    /// Default: `Rund.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Validate the graph and print its canonical order without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the graph in Graphviz DOT format and exit.
    #[arg(long, conflicts_with = "dry_run")]
    pub dot: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUND_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
