//! `swfix` command-line entry point.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::parse()            -- clap argument parsing
//!  └─ commands::run_command   -- resolves paths, runs the engine
//!       ├─ ui / complete      -> FixSession
//!       ├─ verify             -> SystemVerifier
//!       ├─ restore            -> FixSession::restore_backups
//!       └─ watch              -> GameWatcher
//! ```
//!
//! The exit code carries the result: 0 when the command achieved
//! something (at least one step applied, all checks passed, the game was
//! found), 1 otherwise.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

fn main() -> ExitCode {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    commands::run_command(cli::Cli::parse())
}
