//! Candela Workbench
//!
//! Command-line front end for the Candela session toolkit. Drives a session
//! against the bundled sim engine: probe the environment, import a dataset
//! and train, resume from a snapshot, inspect bridge properties.

mod workbench;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "candela")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Stream spans to a running Tracy profiler
    #[cfg(feature = "tracy")]
    #[arg(long)]
    pub tracy: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check engine version compatibility and runtime support
    Doctor,
    /// Import a dataset and run a training session
    Train {
        /// Dataset directory or transforms file
        #[arg(long)]
        dataset: PathBuf,

        /// Steps to run before stopping
        #[arg(long, default_value_t = 500)]
        steps: u32,

        /// Write a snapshot here once training stops
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Bridge property overrides, object.property=value
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
    },
    /// Load a snapshot and continue training it
    Resume {
        /// Snapshot to restore
        #[arg(long)]
        snapshot: PathBuf,

        /// Steps to run before stopping
        #[arg(long, default_value_t = 500)]
        steps: u32,

        /// Write the continued snapshot here
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },
    /// List registered bridge properties with their current values
    Props,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = workbench::run(args) {
        eprintln!("candela: {}", e);
        std::process::exit(1);
    }
}
