//! Command-line argument definitions.
//!
//! Every subcommand resolves the install on its own; the positional
//! directory and the `--game-dir`/`--settings-dir` flags are overrides for
//! players whose install the auto-detection cannot see (custom Steam
//! library drives, moved Documents folders).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "swfix",
    about = "DX12 fix toolkit for STAR WARS Battlefront II (2017)",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply the UI artifact fix (settings files only, no elevation needed)
    Ui(UiArgs),
    /// Apply the complete DX12 fix (game config, settings, registry flags)
    Complete(CompleteArgs),
    /// Check the OS, install, and disk before fixing
    Verify(VerifyArgs),
    /// Put the backed-up settings files back
    Restore(RestoreArgs),
    /// Wait for the game to launch, then raise its process priority
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct UiArgs {
    /// Settings directory (default: auto-detect under Documents)
    pub settings_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Game installation directory (default: auto-detect)
    pub game_dir: Option<PathBuf>,
    /// Settings directory (default: auto-detect under Documents)
    #[arg(long)]
    pub settings_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Game installation directory (default: auto-detect)
    pub game_dir: Option<PathBuf>,
    /// Settings directory (default: auto-detect under Documents)
    #[arg(long)]
    pub settings_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Settings directory (default: auto-detect under Documents)
    pub settings_dir: Option<PathBuf>,
    /// Game installation directory (default: auto-detect)
    #[arg(long)]
    pub game_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Game installation directory (default: auto-detect)
    pub game_dir: Option<PathBuf>,
    /// How long to wait for the game process, in seconds
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
}
