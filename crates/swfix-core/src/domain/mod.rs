//! Domain entities for the DX12 fix.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no file system, no registry, no process APIs.  Everything
//! here can be compiled and tested on any platform.
//!
//! The split mirrors how the fix actually works:
//!
//! - **`document`** – a settings file held in memory as an ordered sequence
//!   of lines, plus the remove-then-append edit operation.
//! - **`plan`** – the catalog of edits and registry flags that make up the
//!   UI artifact fix and the complete DX12 fix.
//! - **`report`** – per-step outcomes and the tallies shown to the user.

/// Line-oriented settings documents — the core patch primitive.
///
/// See [`document::SettingsDocument`] for the main type.
pub mod document;
pub mod plan;
pub mod report;
