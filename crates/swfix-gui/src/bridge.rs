//! Desktop command bridge: exposes the fix engine to a UI shell.
//!
//! Every function here is shaped like a `#[tauri::command]` handler: it
//! takes the shared [`AppState`], returns a JSON-friendly DTO wrapped in
//! [`CommandResult`], and never panics across the boundary.  The binary in
//! `main.rs` drives the same surface headless; a full Tauri build would
//! register these functions with `tauri::Builder` unchanged.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The engine's report types carry Rust enums; the DTOs flatten them to
//! plain `String` fields so the frontend gets stable JSON without knowing
//! Rust enum encodings.  Any change to a DTO here must be mirrored in the
//! frontend's TypeScript interfaces.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>` so
//! every response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.  The
//! frontend can always check `result.success` without a try/catch around
//! the `invoke` call.
//!
//! # One worker at a time
//!
//! `apply_fix` and `restore_backups` share the `fix_running` guard.  A fix
//! in flight cannot be cancelled; the UI disables its buttons and waits
//! for [`FixEvent::Completed`].  The guard clears before `Completed` is
//! emitted, so a completion handler may immediately start the next run.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use swfix_core::{CheckReport, CheckStatus, FixReport, StepReport, StepStatus, VerifyReport};
use swfix_engine::infrastructure::probe::platform_probe;
use swfix_engine::infrastructure::registry::platform_registry_writer;
use swfix_engine::{FixPaths, FixSession, RegistryWriter, SystemProbe, SystemVerifier};

use crate::config::{config_file_path, load_config_from, save_config_to, GuiConfig};

/// Buffered events per subscriber; a UI that falls this far behind has
/// bigger problems than a lagged progress line.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between commands via `tauri::State`.
///
/// `config` and `fix_running` are Tokio mutexes because commands run on
/// the async runtime; a `std::sync::Mutex` would block the worker thread
/// while waiting for the lock.
pub struct AppState {
    /// The saved paths, as last loaded or edited.
    pub config: Mutex<GuiConfig>,
    /// True while a fix or restore worker is running.
    pub fix_running: Mutex<bool>,
    /// Push channel for fix progress events.
    pub events: broadcast::Sender<FixEvent>,
    /// Where the config persists; `None` when the platform dir is unknown.
    config_file: Option<PathBuf>,
    /// Registry access used by fix runs.
    registry: Arc<dyn RegistryWriter>,
    /// System facts used by verification.
    probe: Arc<dyn SystemProbe>,
}

impl AppState {
    /// State backed by the saved config file and the real platform
    /// capabilities.  A missing config file is a first run; a corrupt one
    /// is logged and replaced by defaults rather than crashing the shell.
    pub fn new() -> Arc<Self> {
        let config_file = match config_file_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "no config directory; paths will not be saved");
                None
            }
        };
        let config = match &config_file {
            Some(path) => match load_config_from(path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "could not load saved paths; starting with defaults");
                    GuiConfig::default()
                }
            },
            None => GuiConfig::default(),
        };
        Self::assemble(config, config_file, platform_registry_writer(), platform_probe())
    }

    /// State with explicit parts; lets tests swap the capabilities and the
    /// config file location.
    pub fn with_parts(
        config: GuiConfig,
        config_file: Option<PathBuf>,
        registry: Arc<dyn RegistryWriter>,
        probe: Arc<dyn SystemProbe>,
    ) -> Arc<Self> {
        Self::assemble(config, config_file, registry, probe)
    }

    fn assemble(
        config: GuiConfig,
        config_file: Option<PathBuf>,
        registry: Arc<dyn RegistryWriter>,
        probe: Arc<dyn SystemProbe>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            config: Mutex::new(config),
            fix_running: Mutex::new(false),
            events,
            config_file,
            registry,
            probe,
        })
    }

    /// A receiver for fix progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<FixEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: FixEvent) {
        // A send error only means no UI is subscribed right now.
        let _ = self.events.send(event);
    }
}

// ── Events and DTOs (Presentation layer) ──────────────────────────────────────

/// Which fix the UI asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    Ui,
    Complete,
}

impl FixKind {
    /// Human-readable name used in logs and event messages.
    pub fn label(self) -> &'static str {
        match self {
            FixKind::Ui => "UI artifact",
            FixKind::Complete => "complete DX12",
        }
    }
}

/// Push events the UI subscribes to while a fix runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixEvent {
    Started { kind: FixKind },
    Log { message: String },
    Completed { summary: FixReportDto },
}

/// DTO for the saved or detected install paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsDto {
    pub game_path: Option<String>,
    pub settings_path: Option<String>,
}

impl From<&GuiConfig> for PathsDto {
    fn from(config: &GuiConfig) -> Self {
        Self {
            game_path: config.game_path.clone(),
            settings_path: config.settings_path.clone(),
        }
    }
}

impl From<&FixPaths> for PathsDto {
    fn from(paths: &FixPaths) -> Self {
        Self {
            game_path: paths.game_dir.as_ref().map(|p| p.display().to_string()),
            settings_path: paths.settings_dir.as_ref().map(|p| p.display().to_string()),
        }
    }
}

/// DTO for one step of a fix report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDto {
    pub name: String,
    /// `"applied"`, `"skipped"`, or `"failed"`.
    pub status: String,
    /// Skip or failure reason; absent for applied steps.
    pub reason: Option<String>,
}

impl From<&StepReport> for StepDto {
    fn from(step: &StepReport) -> Self {
        let (status, reason) = match &step.status {
            StepStatus::Applied => ("applied", None),
            StepStatus::Skipped(reason) => ("skipped", Some(reason.clone())),
            StepStatus::Failed(reason) => ("failed", Some(reason.clone())),
        };
        Self {
            name: step.name.clone(),
            status: status.to_string(),
            reason,
        }
    }
}

/// DTO for a whole fix or restore run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReportDto {
    pub steps: Vec<StepDto>,
    pub summary: String,
    pub succeeded: bool,
}

impl From<&FixReport> for FixReportDto {
    fn from(report: &FixReport) -> Self {
        Self {
            steps: report.steps().iter().map(StepDto::from).collect(),
            summary: report.summary(),
            succeeded: report.succeeded(),
        }
    }
}

/// DTO for one pre-fix system check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCheckDto {
    pub name: String,
    /// `"pass"`, `"warn"`, `"fail"`, or `"unknown"`.
    pub status: String,
    pub detail: String,
}

impl From<&CheckReport> for VerifyCheckDto {
    fn from(check: &CheckReport) -> Self {
        let status = match check.status {
            CheckStatus::Pass => "pass",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Unknown => "unknown",
        };
        Self {
            name: check.name.clone(),
            status: status.to_string(),
            detail: check.detail.clone(),
        }
    }
}

/// DTO for a whole verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReportDto {
    pub checks: Vec<VerifyCheckDto>,
    pub summary: String,
    pub all_passed: bool,
}

impl From<&VerifyReport> for VerifyReportDto {
    fn from(report: &VerifyReport) -> Self {
        Self {
            checks: report.checks().iter().map(VerifyCheckDto::from).collect(),
            summary: report.summary(),
            all_passed: report.all_passed(),
        }
    }
}

/// Unified response wrapper used by all bridge commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Bridge commands ───────────────────────────────────────────────────────────

/// Returns the saved paths for the UI path inputs.
pub async fn load_paths(state: Arc<AppState>) -> CommandResult<PathsDto> {
    let config = state.config.lock().await;
    CommandResult::ok(PathsDto::from(&*config))
}

/// Saves the paths typed in the UI.
pub async fn save_paths(state: Arc<AppState>, paths: PathsDto) -> CommandResult<()> {
    let mut config = state.config.lock().await;
    config.game_path = paths.game_path;
    config.settings_path = paths.settings_path;

    let Some(file) = &state.config_file else {
        return CommandResult::err("no config directory on this platform");
    };
    match save_config_to(file, &config) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(format!("failed to save paths: {e}")),
    }
}

/// Runs the install auto-detection and returns what it found, without
/// persisting anything.  The UI fills its inputs from the result and the
/// player saves explicitly.
pub async fn autodetect_paths(_state: Arc<AppState>) -> CommandResult<PathsDto> {
    // Detection probes the filesystem, so it stays off the async runtime.
    match tokio::task::spawn_blocking(FixPaths::discover).await {
        Ok(paths) => CommandResult::ok(PathsDto::from(&paths)),
        Err(e) => CommandResult::err(format!("detection worker panicked: {e}")),
    }
}

/// Runs the pre-fix system checks against the saved paths.
pub async fn verify_paths(state: Arc<AppState>) -> CommandResult<VerifyReportDto> {
    let paths = resolved_paths(&state).await;
    let probe = Arc::clone(&state.probe);
    let joined = tokio::task::spawn_blocking(move || SystemVerifier::new(probe).run(&paths)).await;
    match joined {
        Ok(report) => CommandResult::ok(VerifyReportDto::from(&report)),
        Err(e) => CommandResult::err(format!("verification worker panicked: {e}")),
    }
}

/// Starts a fix worker.  Refused while another fix or restore is running;
/// completion is signalled by [`FixEvent::Completed`] on the event channel,
/// not by this function's return.
pub async fn apply_fix(state: Arc<AppState>, kind: FixKind) -> CommandResult<()> {
    {
        let mut running = state.fix_running.lock().await;
        if *running {
            return CommandResult::err("a fix is already running");
        }
        *running = true;
    }

    state.emit(FixEvent::Started { kind });
    info!(kind = kind.label(), "fix requested");

    let worker_state = Arc::clone(&state);
    tokio::spawn(async move {
        let paths = resolved_paths(&worker_state).await;
        worker_state.emit(FixEvent::Log {
            message: format!("applying the {} fix", kind.label()),
        });

        let registry = Arc::clone(&worker_state.registry);
        let joined = tokio::task::spawn_blocking(move || {
            let session = FixSession::new(paths, registry);
            match kind {
                FixKind::Ui => session.run_ui_fix(),
                FixKind::Complete => session.run_complete_fix(),
            }
        })
        .await;

        let summary = match joined {
            Ok(report) => FixReportDto::from(&report),
            Err(e) => {
                warn!(error = %e, "fix worker panicked");
                FixReportDto {
                    steps: Vec::new(),
                    summary: format!("fix worker panicked: {e}"),
                    succeeded: false,
                }
            }
        };

        // Clear the guard before announcing completion so a handler reacting
        // to Completed can immediately start the next run.
        *worker_state.fix_running.lock().await = false;
        worker_state.emit(FixEvent::Completed { summary });
    });

    CommandResult::ok(())
}

/// Restores the backed-up settings files.  Shares the single-worker guard
/// with [`apply_fix`] but runs to completion before returning.
pub async fn restore_backups(state: Arc<AppState>) -> CommandResult<FixReportDto> {
    {
        let mut running = state.fix_running.lock().await;
        if *running {
            return CommandResult::err("a fix is already running");
        }
        *running = true;
    }

    let paths = resolved_paths(&state).await;
    let registry = Arc::clone(&state.registry);
    let joined =
        tokio::task::spawn_blocking(move || FixSession::new(paths, registry).restore_backups())
            .await;

    *state.fix_running.lock().await = false;

    match joined {
        Ok(report) => CommandResult::ok(FixReportDto::from(&report)),
        Err(e) => CommandResult::err(format!("restore worker panicked: {e}")),
    }
}

/// Saved paths act as overrides; absent ones fall back to auto-detection.
async fn resolved_paths(state: &AppState) -> FixPaths {
    let config = state.config.lock().await.clone();
    tokio::task::spawn_blocking(move || fix_paths_from(&config))
        .await
        .unwrap_or_default()
}

fn fix_paths_from(config: &GuiConfig) -> FixPaths {
    FixPaths::with_overrides(
        config.game_path.as_ref().map(PathBuf::from),
        config.settings_path.as_ref().map(PathBuf::from),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
