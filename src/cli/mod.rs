//! CLI module for the registry gateway
//!
//! Provides subcommands for:
//! - `serve`: run the HTTP gateway
//! - `set-alias`: point a model alias at a version
//! - `latest-run-id`: print the run behind a model's newest version

pub mod registry;
pub mod serve;

use clap::{Parser, Subcommand};

/// Registry Gateway - HTTP facade over a model registry and serving launcher
#[derive(Parser)]
#[command(name = "registry-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway
    Serve,

    /// Point a model alias at a version
    SetAlias(registry::SetAliasArgs),

    /// Print the run id of a model's numerically greatest version
    LatestRunId(registry::LatestRunIdArgs),
}
