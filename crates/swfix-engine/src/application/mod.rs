//! Application layer use cases for the fix engine.
//!
//! # What use cases does the engine have?
//!
//! - **`apply_fixes`** – Runs a fix as a sequence of independent steps
//!   (backups, settings patches, the profile template, registry flags) and
//!   tallies each step into a `FixReport`.  A failed step never aborts the
//!   run.  Registry access goes through the injected `RegistryWriter`.
//!
//! - **`watch_game`** – Polls for the game process after a fix and raises
//!   its scheduling priority once it appears.  Process access goes through
//!   the injected `ProcessInspector`.
//!
//! - **`verify_system`** – Pre-flight checks (OS version, elevation, game
//!   install, settings dir, disk space, backup dir) rendered as a
//!   `VerifyReport`.  System facts come from the injected `SystemProbe`.

pub mod apply_fixes;
pub mod verify_system;
pub mod watch_game;
