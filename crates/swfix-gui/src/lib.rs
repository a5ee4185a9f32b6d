//! swfix-gui library entry point.
//!
//! Re-exports the public modules so that the binary in `main.rs` and the
//! tests share the same module tree.  `bridge` holds the desktop command
//! surface, `config` the saved game/settings paths.

pub mod bridge;
pub mod config;
