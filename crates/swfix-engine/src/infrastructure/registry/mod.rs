//! Platform-specific registry writer implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; [`platform_registry_writer`] hands the
//! binaries the right one.

use std::sync::Arc;

use swfix_core::RegistryFlag;

use crate::application::apply_fixes::{RegistryError, RegistryWriter};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// The real registry writer for this platform.
///
/// Non-Windows builds get [`UnsupportedRegistryWriter`], whose errors the
/// orchestration tallies as skipped steps — useful when the file-side fixes
/// run under Proton.
pub fn platform_registry_writer() -> Arc<dyn RegistryWriter> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsRegistryWriter)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedRegistryWriter)
    }
}

/// Registry writer for platforms without a Windows registry.
///
/// Every write reports [`RegistryError::Unsupported`].  Also handy in tests
/// that exercise the skip path on any host.
pub struct UnsupportedRegistryWriter;

impl RegistryWriter for UnsupportedRegistryWriter {
    fn set_flag(&self, _flag: &RegistryFlag) -> Result<(), RegistryError> {
        Err(RegistryError::Unsupported(std::env::consts::OS.to_string()))
    }
}
