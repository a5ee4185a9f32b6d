//! Mock system probe for tests.
//!
//! # Why a mock probe?
//!
//! The real probe reads the registry, checks the process token, and
//! queries free disk space. None of that is deterministic (or even
//! available off Windows), so verifier tests build a [`MockSystemProbe`]
//! describing exactly the machine they want to simulate.
//!
//! # Usage in tests
//!
//! [`MockSystemProbe::windows_11`] is a healthy baseline; the `with_*`
//! builders dial individual facts up or down:
//!
//! ```ignore
//! let probe = MockSystemProbe::windows_11().with_elevated(Some(false));
//! ```

use std::path::Path;

use crate::application::verify_system::{OsInfo, SystemProbe};

/// A [`SystemProbe`] that answers from canned values.
#[derive(Debug, Clone)]
pub struct MockSystemProbe {
    pub family: String,
    pub major: Option<u32>,
    pub build: Option<u32>,
    pub elevated: Option<bool>,
    pub free: Option<u64>,
}

impl MockSystemProbe {
    /// An elevated Windows 11 box with plenty of disk, the happy path.
    pub fn windows_11() -> Self {
        Self {
            family: "windows".to_string(),
            major: Some(10),
            build: Some(22_631),
            elevated: Some(true),
            free: Some(64 * 1024 * 1024 * 1024),
        }
    }

    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family.to_string();
        self
    }

    pub fn with_version(mut self, major: Option<u32>, build: Option<u32>) -> Self {
        self.major = major;
        self.build = build;
        self
    }

    pub fn with_elevated(mut self, elevated: Option<bool>) -> Self {
        self.elevated = elevated;
        self
    }

    pub fn with_free_space(mut self, free: Option<u64>) -> Self {
        self.free = free;
        self
    }
}

impl SystemProbe for MockSystemProbe {
    fn os_info(&self) -> OsInfo {
        OsInfo {
            family: self.family.clone(),
            major: self.major,
            build: self.build,
        }
    }

    fn is_elevated(&self) -> Option<bool> {
        self.elevated
    }

    fn free_space(&self, _path: &Path) -> Option<u64> {
        self.free
    }
}
