//! Platform-specific system probe implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; [`platform_probe`] hands the binaries the
//! right one.

use std::path::Path;
use std::sync::Arc;

use crate::application::verify_system::{OsInfo, SystemProbe};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// The real system probe for this platform.
pub fn platform_probe() -> Arc<dyn SystemProbe> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsSystemProbe)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(PortableSystemProbe)
    }
}

/// Probe for platforms without the Windows APIs: reports the OS family
/// and leaves the Windows-specific facts unknown.
pub struct PortableSystemProbe;

impl SystemProbe for PortableSystemProbe {
    fn os_info(&self) -> OsInfo {
        OsInfo {
            family: std::env::consts::OS.to_string(),
            major: None,
            build: None,
        }
    }

    fn is_elevated(&self) -> Option<bool> {
        None
    }

    fn free_space(&self, _path: &Path) -> Option<u64> {
        None
    }
}
