// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `makefile-provisioner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "makefile-provisioner",
    version,
    about = "Run a make target in a directory and stream its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the provisioner file (TOML).
    ///
    /// Default: `Provisioner.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Provisioner.toml")]
    pub config: String,

    /// Validate the configuration and exit without running anything.
    #[arg(long)]
    pub validate_only: bool,

    /// Build tool to invoke instead of `[settings].program`.
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// Bytes of trailing output to keep for error reports.
    #[arg(long, value_name = "BYTES")]
    pub capture_limit: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MAKEFILE_PROVISIONER_LOG` or a default level will be used.
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
