//! GameWatcher: waits for the game process and raises its priority.
//!
//! The original fix package offered to sit in the background after
//! patching, spot the game the moment the player launches it, and bump it
//! to HIGH priority so the DX12 shader warm-up stutters less.  The watcher
//! here polls an injected [`ProcessInspector`] until the deadline; not
//! seeing the game is a normal outcome, not an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

/// How long `GameWatcher::new` waits for the game to appear.
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(300);

/// Pause between process scans.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Error type for process inspection.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// This build cannot inspect processes (non-Windows).
    #[error("process inspection is not supported on {0}")]
    Unsupported(String),
    /// The process list snapshot failed.
    #[error("failed to snapshot the process list: {0}")]
    Snapshot(String),
    #[error("failed to open process {pid}: {message}")]
    Open { pid: u32, message: String },
    #[error("failed to raise priority of process {pid}: {message}")]
    Priority { pid: u32, message: String },
}

/// One running process matched by image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHit {
    pub pid: u32,
    pub name: String,
}

/// Read-mostly process access: enumerate by name, raise priority.
///
/// Each supported platform provides an implementation in the
/// infrastructure layer; tests script a mock.
pub trait ProcessInspector: Send + Sync {
    /// All running processes whose image name equals `name`
    /// (ASCII case-insensitive, the way Windows compares image names).
    fn processes_named(&self, name: &str) -> Result<Vec<ProcessHit>, ProcessError>;

    /// Moves the process to the HIGH priority class.
    fn boost_priority(&self, pid: u32) -> Result<(), ProcessError>;
}

/// What a watch ended with.  Only `Unavailable` is abnormal; a timeout
/// just means the player never launched the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The game appeared and its priority was raised.
    Boosted { pid: u32, name: String },
    /// The game appeared but the priority boost failed; still a find.
    Found { pid: u32, name: String },
    /// The deadline passed without a matching process.
    TimedOut,
    /// Process inspection is impossible on this platform.
    Unavailable(String),
}

/// Polls for the game process until it shows up or the deadline passes.
pub struct GameWatcher {
    inspector: Arc<dyn ProcessInspector>,
    timeout: Duration,
    interval: Duration,
}

impl GameWatcher {
    /// Watcher with the default 5 minute deadline and 2 second poll.
    pub fn new(inspector: Arc<dyn ProcessInspector>) -> Self {
        Self::with_timing(inspector, DEFAULT_WATCH_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_timing(
        inspector: Arc<dyn ProcessInspector>,
        timeout: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            inspector,
            timeout,
            interval,
        }
    }

    /// Blocks until a process matching one of `names` appears, then boosts
    /// it.  Transient scan errors are logged and polling continues; an
    /// unsupported platform ends the watch immediately.
    pub fn wait_for_launch(&self, names: &[&str]) -> WatchOutcome {
        let deadline = Instant::now() + self.timeout;
        info!(timeout_secs = self.timeout.as_secs(), "watching for the game process");
        loop {
            for name in names {
                match self.inspector.processes_named(name) {
                    Ok(hits) => {
                        if let Some(hit) = hits.into_iter().next() {
                            return self.boost(hit);
                        }
                    }
                    Err(e @ ProcessError::Unsupported(_)) => {
                        warn!(error = %e, "process watching unavailable");
                        return WatchOutcome::Unavailable(e.to_string());
                    }
                    Err(e) => {
                        warn!(process = name, error = %e, "process scan failed, retrying");
                    }
                }
            }
            if Instant::now() >= deadline {
                info!("game did not launch before the deadline");
                return WatchOutcome::TimedOut;
            }
            std::thread::sleep(self.interval);
        }
    }

    fn boost(&self, hit: ProcessHit) -> WatchOutcome {
        match self.inspector.boost_priority(hit.pid) {
            Ok(()) => {
                info!(pid = hit.pid, name = %hit.name, "raised game process priority");
                WatchOutcome::Boosted {
                    pid: hit.pid,
                    name: hit.name,
                }
            }
            Err(e) => {
                warn!(pid = hit.pid, error = %e, "priority boost failed");
                WatchOutcome::Found {
                    pid: hit.pid,
                    name: hit.name,
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
