//! swfix-engine library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `swfix` / `swfix-gui` binaries share the same module tree.
//!
//! # What does the engine do? (for beginners)
//!
//! [`swfix_core`] describes *what* the fix changes: which settings lines,
//! which registry values, which files.  This crate is the part that touches
//! a real machine:
//!
//! 1. Finds the game install and the per-user settings directory
//!    (`infrastructure::resolver`).
//! 2. Copies each file aside before patching it (`infrastructure::backup`).
//! 3. Loads, patches, and atomically rewrites the settings files
//!    (`infrastructure::settings_io`, driven by `application::apply_fixes`).
//! 4. Writes the registry mitigation flags and, on request, waits for the
//!    game process and raises its scheduling priority.
//!
//! Everything OS-specific sits behind a trait (`RegistryWriter`,
//! `ProcessInspector`, `SystemProbe`) so the fix logic runs and tests the
//! same on every platform; only the adapters in `infrastructure` are
//! compiled per target.

/// Application layer: the fix, watch, and verify use cases.
pub mod application;

/// Infrastructure layer: filesystem, process, and registry adapters.
pub mod infrastructure;

pub use application::apply_fixes::{FixSession, RegistryError, RegistryWriter};
pub use application::verify_system::{OsInfo, SystemProbe, SystemVerifier};
pub use application::watch_game::{
    GameWatcher, ProcessError, ProcessHit, ProcessInspector, WatchOutcome,
};
pub use infrastructure::backup::BackupStore;
pub use infrastructure::resolver::{game_finder, settings_finder, FixPaths, InstallFinder};
