//! Infrastructure layer for the fix engine.
//!
//! Contains everything that touches the machine: path discovery, file I/O,
//! backups, and the OS adapters behind the application-layer traits.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `swfix_core`; the application layer only reaches back for plain data
//! types (`FixPaths`, the store structs), never for OS adapters — those are
//! injected as trait objects.
//!
//! # Sub-modules
//!
//! - **`resolver`** – Ordered-candidate discovery of the game install and
//!   the per-user settings directory, and the `FixPaths` value that carries
//!   the result through a run.
//!
//! - **`settings_io`** – Loads settings files into `SettingsDocument` and
//!   writes them back via a sibling temp file + rename.
//!
//! - **`backup`** – One `<name>.backup` copy per patched file under a
//!   `Backups/` directory, restored on demand.
//!
//! - **`registry`** – `RegistryWriter` implementations.  On Windows it
//!   writes the real HKLM/HKCU values; elsewhere it reports unsupported.
//!
//! - **`process`** – `ProcessInspector` implementations.  On Windows it
//!   walks a Toolhelp32 snapshot; elsewhere it reports unsupported.
//!
//! - **`probe`** – `SystemProbe` implementations for the verify use case.

pub mod backup;
pub mod probe;
pub mod process;
pub mod registry;
pub mod resolver;
pub mod settings_io;
