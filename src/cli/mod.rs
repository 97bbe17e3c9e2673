//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RunCommand, ServeCommand, ValidateCommand};
use std::ffi::OsString;

/// In-memory data-flow pipeline executor
#[derive(Debug, Parser, Clone)]
#[command(name = "dataflow")]
#[command(version = "0.1.0")]
#[command(about = "Route payloads through pipelines of targets and trace every step")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the data-flow HTTP API
    Serve(ServeCommand),

    /// Run flows locally against simulated targets
    Run(RunCommand),

    /// Validate a pipelines file
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
