//! Platform-specific process inspector implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; [`platform_process_inspector`] hands the
//! binaries the right one.

use std::sync::Arc;

use crate::application::watch_game::{ProcessError, ProcessHit, ProcessInspector};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// The real process inspector for this platform.
///
/// Non-Windows builds get [`UnsupportedProcessInspector`]; the watcher
/// reports the watch as unavailable instead of pretending to poll.
pub fn platform_process_inspector() -> Arc<dyn ProcessInspector> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsProcessInspector)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedProcessInspector)
    }
}

/// Inspector for platforms without the Toolhelp32 APIs.
pub struct UnsupportedProcessInspector;

impl ProcessInspector for UnsupportedProcessInspector {
    fn processes_named(&self, _name: &str) -> Result<Vec<ProcessHit>, ProcessError> {
        Err(ProcessError::Unsupported(std::env::consts::OS.to_string()))
    }

    fn boost_priority(&self, _pid: u32) -> Result<(), ProcessError> {
        Err(ProcessError::Unsupported(std::env::consts::OS.to_string()))
    }
}
