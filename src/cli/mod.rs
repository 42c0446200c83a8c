//! CLI module
//!
//! Provides the `serve` subcommand that runs the HTTP API server.

pub mod serve;

use clap::{Parser, Subcommand};

/// Pointdeck - planning poker collaboration backend
#[derive(Parser)]
#[command(name = "pointdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
