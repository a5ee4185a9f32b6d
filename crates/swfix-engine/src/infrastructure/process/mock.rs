//! Mock process inspector for unit testing.
//!
//! The real inspector walks the live process table, so a test could only
//! ever find itself.  The mock scripts the scans instead: each call to
//! `processes_named` pops the next hit list from a queue (an exhausted
//! queue scans empty, like a machine where the game never starts), and
//! every boost lands in a `Mutex<Vec<u32>>` for assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::watch_game::{ProcessError, ProcessHit, ProcessInspector};

/// Scripted process scans and a boost call log.
#[derive(Default)]
pub struct MockProcessInspector {
    /// One scripted response per `processes_named` call.
    pub scans: Mutex<VecDeque<Vec<ProcessHit>>>,
    /// Pids passed to `boost_priority`, in call order.
    pub boosted: Mutex<Vec<u32>>,
    /// When `true`, every boost returns [`ProcessError::Priority`].
    pub fail_boost: bool,
    /// When `true`, every scan returns [`ProcessError::Snapshot`].
    pub fail_scans: bool,
}

impl MockProcessInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the scan responses, first call first.
    pub fn with_scans(scans: Vec<Vec<ProcessHit>>) -> Self {
        Self {
            scans: Mutex::new(scans.into()),
            ..Self::default()
        }
    }
}

impl ProcessInspector for MockProcessInspector {
    /// Pops the next scripted scan and filters it by `name`, matching the
    /// case-insensitive comparison the Windows inspector performs.
    fn processes_named(&self, name: &str) -> Result<Vec<ProcessHit>, ProcessError> {
        if self.fail_scans {
            return Err(ProcessError::Snapshot("mock failure".to_string()));
        }
        let hits = self.scans.lock().unwrap().pop_front().unwrap_or_default();
        Ok(hits
            .into_iter()
            .filter(|hit| hit.name.eq_ignore_ascii_case(name))
            .collect())
    }

    fn boost_priority(&self, pid: u32) -> Result<(), ProcessError> {
        if self.fail_boost {
            return Err(ProcessError::Priority {
                pid,
                message: "mock failure".to_string(),
            });
        }
        self.boosted.lock().unwrap().push(pid);
        Ok(())
    }
}
