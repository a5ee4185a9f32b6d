//! Mock registry writer for unit testing.
//!
//! The real writer touches HKLM/HKCU on the test machine and needs
//! elevation for half of its keys, so tests record writes in memory
//! instead.  Each flag passed to `set_flag` is pushed into a
//! `Mutex<Vec<RegistryFlag>>` for assertions; set `should_fail` to make
//! every write report access-denied and exercise the failed-step path.

use std::sync::Mutex;

use swfix_core::RegistryFlag;

use crate::application::apply_fixes::{RegistryError, RegistryWriter};

/// Records every flag written; optionally denies all writes.
#[derive(Default)]
pub struct MockRegistryWriter {
    /// Flags in write order.
    pub flags: Mutex<Vec<RegistryFlag>>,
    /// When `true`, every write returns [`RegistryError::AccessDenied`].
    pub should_fail: bool,
}

impl MockRegistryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that denies every write, like an un-elevated HKLM attempt.
    pub fn denying() -> Self {
        Self {
            flags: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }
}

impl RegistryWriter for MockRegistryWriter {
    fn set_flag(&self, flag: &RegistryFlag) -> Result<(), RegistryError> {
        if self.should_fail {
            return Err(RegistryError::AccessDenied {
                key: flag.key_path.clone(),
            });
        }
        self.flags.lock().unwrap().push(flag.clone());
        Ok(())
    }
}
