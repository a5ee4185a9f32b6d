//! FixSession: runs a fix as a tally of independent steps.
//!
//! Every fix is the same shape: back up the files about to change, patch
//! each settings file per its [`FixPlan`], write the generated profile, set
//! the registry flags.  Each step lands in a [`FixReport`] as applied,
//! skipped, or failed — **a failed step never aborts the run**, because a
//! player with a permission problem on one file still wants the other four
//! fixes.
//!
//! This use case sits at the application layer and delegates registry
//! access to a [`RegistryWriter`] trait object; the platform-specific
//! implementations are in the infrastructure layer.  File I/O goes through
//! the concrete `settings_io` and `backup` adapters since plain files need
//! no per-platform indirection.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use swfix_core::{
    complete_fix_plans, mitigation_flags, ui_fix_plans, ui_fix_profile, ui_registry_flags,
    FixPlan, FixReport, RegistryFlag, SettingsDocument, SettingsTarget, StepReport, StepStatus,
    TargetRoot,
};

use crate::infrastructure::backup::BackupStore;
use crate::infrastructure::resolver::FixPaths;
use crate::infrastructure::settings_io;

/// Error type for registry flag writes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// This build has no registry to write to (non-Windows).
    #[error("registry writes are not supported on {0}")]
    Unsupported(String),
    /// The key could not be created or written with the current privileges.
    /// HKLM flags need an elevated process.
    #[error("access denied writing registry key {key}")]
    AccessDenied { key: String },
    /// Any other OS-level failure.
    #[error("registry write to {key} failed: {message}")]
    Os { key: String, message: String },
}

/// Write-only registry access.
///
/// The toolkit never reads registry state back; flags are asserted blindly
/// and re-asserted on every run.  Each supported platform provides an
/// implementation in the infrastructure layer.
pub trait RegistryWriter: Send + Sync {
    /// Creates the flag's key if needed and sets its value.
    fn set_flag(&self, flag: &RegistryFlag) -> Result<(), RegistryError>;
}

/// The files a fix run may touch, in restore order.
const PATCHED_TARGETS: [SettingsTarget; 3] = [
    SettingsTarget::BootOptions,
    SettingsTarget::ProfileOptions,
    SettingsTarget::GameConfig,
];

/// One fix run against a resolved set of paths.
pub struct FixSession {
    paths: FixPaths,
    registry: Arc<dyn RegistryWriter>,
}

impl FixSession {
    pub fn new(paths: FixPaths, registry: Arc<dyn RegistryWriter>) -> Self {
        Self { paths, registry }
    }

    pub fn paths(&self) -> &FixPaths {
        &self.paths
    }

    /// The UI artifact fix: both settings files, the profile template, and
    /// the per-user registry flags.  Needs no elevation.
    pub fn run_ui_fix(&self) -> FixReport {
        info!("running UI artifact fix");
        let mut report = FixReport::new();
        report.push(self.backup_step(
            "Back up settings files",
            &[SettingsTarget::BootOptions, SettingsTarget::ProfileOptions],
        ));
        for plan in ui_fix_plans() {
            report.push(self.apply_plan(&plan));
        }
        report.push(self.write_ui_profile());
        report.push(self.registry_step("UI registry flags", &ui_registry_flags()));
        info!(summary = %report.summary(), "UI artifact fix finished");
        report
    }

    /// The complete DX12 fix: CFG mitigation, the game config, and
    /// everything the UI fix does.
    pub fn run_complete_fix(&self) -> FixReport {
        info!("running complete DX12 fix");
        let mut report = FixReport::new();
        report.push(self.registry_step("CFG mitigation flags", &mitigation_flags()));
        report.push(self.backup_step("Back up settings files", &PATCHED_TARGETS));
        for plan in complete_fix_plans() {
            report.push(self.apply_plan(&plan));
        }
        report.push(self.write_ui_profile());
        report.push(self.registry_step("UI registry flags", &ui_registry_flags()));
        info!(summary = %report.summary(), "complete DX12 fix finished");
        report
    }

    /// Puts every backed-up file back, one step per target file.
    pub fn restore_backups(&self) -> FixReport {
        info!("restoring settings files from backups");
        let mut report = FixReport::new();
        for target in PATCHED_TARGETS {
            report.push(self.restore_step(target));
        }
        info!(summary = %report.summary(), "restore finished");
        report
    }

    /// Patches one settings file.  A missing file is patched from empty
    /// (the game recreates defaults around whatever exists), a missing
    /// root directory skips the step.
    pub fn apply_plan(&self, plan: &FixPlan) -> StepReport {
        let Some(path) = self.paths.resolve_target(plan.target) else {
            warn!(step = plan.name, "target directory not resolved, skipping");
            return StepReport::skipped(plan.name, missing_root_reason(plan.target.root()));
        };

        let document = match settings_io::load_settings(&path) {
            Ok(Some(document)) => document,
            Ok(None) => SettingsDocument::new(),
            Err(e) => {
                warn!(step = plan.name, error = %e, "could not load settings file");
                return StepReport {
                    name: plan.name.to_string(),
                    status: status_for_io(e.io_kind(), e.to_string()),
                };
            }
        };

        match settings_io::save_settings(&path, &document.applied(&plan.batch)) {
            Ok(()) => {
                info!(step = plan.name, file = %path.display(), edits = plan.batch.len(), "applied");
                StepReport::applied(plan.name)
            }
            Err(e) => {
                warn!(step = plan.name, error = %e, "could not write settings file");
                StepReport {
                    name: plan.name.to_string(),
                    status: status_for_io(e.io_kind(), e.to_string()),
                }
            }
        }
    }

    /// Writes the generated UI-optimized profile next to the live one.
    pub fn write_ui_profile(&self) -> StepReport {
        const STEP: &str = "UI fix profile";
        let Some(path) = self.paths.ui_profile_path() else {
            return StepReport::skipped(STEP, missing_root_reason(TargetRoot::SettingsDir));
        };
        match settings_io::save_settings(&path, &ui_fix_profile()) {
            Ok(()) => {
                info!(step = STEP, file = %path.display(), "applied");
                StepReport::applied(STEP)
            }
            Err(e) => {
                warn!(step = STEP, error = %e, "could not write profile");
                StepReport {
                    name: STEP.to_string(),
                    status: status_for_io(e.io_kind(), e.to_string()),
                }
            }
        }
    }

    /// Copies each target file into its root's backup store.  Applied when
    /// at least one file was copied; files that do not exist yet are fine.
    fn backup_step(&self, name: &str, targets: &[SettingsTarget]) -> StepReport {
        let mut copied = 0;
        for &target in targets {
            let (Some(path), Some(dir)) = (
                self.paths.resolve_target(target),
                self.paths.backup_dir(target.root()),
            ) else {
                continue;
            };
            match BackupStore::new(dir).backup(&path) {
                Ok(Some(stored)) => {
                    info!(file = %path.display(), backup = %stored.display(), "backed up");
                    copied += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(step = name, error = %e, "backup failed");
                    return StepReport {
                        name: name.to_string(),
                        status: status_for_io(e.io_kind(), e.to_string()),
                    };
                }
            }
        }
        if copied > 0 {
            StepReport::applied(name)
        } else {
            StepReport::skipped(name, "no files to back up")
        }
    }

    /// Writes a group of registry flags as one step.  The first error
    /// decides the step's status; an unsupported platform is a skip, not a
    /// failure.
    fn registry_step(&self, name: &str, flags: &[RegistryFlag]) -> StepReport {
        for flag in flags {
            match self.registry.set_flag(flag) {
                Ok(()) => {}
                Err(e @ RegistryError::Unsupported(_)) => {
                    warn!(step = name, error = %e, "registry writes unsupported, skipping");
                    return StepReport::skipped(name, e.to_string());
                }
                Err(e) => {
                    warn!(step = name, error = %e, "registry write failed");
                    return StepReport::failed(name, e.to_string());
                }
            }
        }
        info!(step = name, flags = flags.len(), "applied");
        StepReport::applied(name)
    }

    fn restore_step(&self, target: SettingsTarget) -> StepReport {
        let name = format!("Restore {}", target.file_name());
        let (Some(path), Some(dir)) = (
            self.paths.resolve_target(target),
            self.paths.backup_dir(target.root()),
        ) else {
            return StepReport::skipped(name, missing_root_reason(target.root()));
        };
        match BackupStore::new(dir).restore(&path) {
            Ok(true) => {
                info!(file = %path.display(), "restored");
                StepReport::applied(name)
            }
            Ok(false) => StepReport::skipped(name, "no backup stored"),
            Err(e) => {
                warn!(error = %e, "restore failed");
                StepReport {
                    name,
                    status: status_for_io(e.io_kind(), e.to_string()),
                }
            }
        }
    }
}

/// The step-status taxonomy for file errors: a missing file or directory
/// means "nothing to fix here", anything else is a real failure.
fn status_for_io(kind: io::ErrorKind, message: String) -> StepStatus {
    match kind {
        io::ErrorKind::NotFound => StepStatus::Skipped(message),
        _ => StepStatus::Failed(message),
    }
}

fn missing_root_reason(root: TargetRoot) -> &'static str {
    match root {
        TargetRoot::GameDir => "game directory not found",
        TargetRoot::SettingsDir => "settings directory not found",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::mock::MockRegistryWriter;
    use crate::infrastructure::registry::UnsupportedRegistryWriter;
    use std::fs;
    use std::path::Path;
    use swfix_core::domain::plan::{game_config_plan, ui_boot_plan};
    use swfix_core::RegistryData;

    /// A settings tree the way the game leaves it: boot options and a
    /// profile in Documents, the config under the install's Scripts dir.
    fn make_session(tmp: &Path) -> (FixSession, Arc<MockRegistryWriter>) {
        let game = tmp.join("game");
        let settings = tmp.join("settings");
        fs::create_dir_all(game.join("Scripts")).unwrap();
        fs::create_dir_all(&settings).unwrap();
        fs::write(
            settings.join("BootOptions"),
            "GstRender.EnableDx12 0\nGstAudio.MusicVolume 0.5\n",
        )
        .unwrap();
        fs::write(
            settings.join("ProfileOptions_profile"),
            "GstRender.ResolutionScale 0.800000\n",
        )
        .unwrap();
        fs::write(
            game.join("Scripts").join("Win32Game.cfg"),
            "GstRender.Dx12Enabled 0\n",
        )
        .unwrap();

        let registry = Arc::new(MockRegistryWriter::new());
        let paths = FixPaths {
            game_dir: Some(game),
            settings_dir: Some(settings),
        };
        (
            FixSession::new(paths, Arc::clone(&registry) as Arc<dyn RegistryWriter>),
            registry,
        )
    }

    // ── apply_plan ────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_plan_patches_file_and_preserves_other_lines() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());

        // Act
        let step = session.apply_plan(&ui_boot_plan());

        // Assert
        assert_eq!(step.status, StepStatus::Applied);
        let text = fs::read_to_string(tmp.path().join("settings").join("BootOptions")).unwrap();
        assert!(text.starts_with("GstAudio.MusicVolume 0.5\n"));
        assert!(text.contains("GstRender.EnableDx12 1\n"));
        assert!(!text.contains("GstRender.EnableDx12 0"));
    }

    #[test]
    fn test_apply_plan_creates_missing_settings_file() {
        // Arrange – fresh install: directory exists, file does not
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());
        fs::remove_file(tmp.path().join("settings").join("BootOptions")).unwrap();

        // Act
        let step = session.apply_plan(&ui_boot_plan());

        // Assert
        assert_eq!(step.status, StepStatus::Applied);
        let text = fs::read_to_string(tmp.path().join("settings").join("BootOptions")).unwrap();
        assert!(text.contains("GstRender.UI.DisableScaling 1\n"));
    }

    #[test]
    fn test_apply_plan_skips_when_root_unresolved() {
        let registry = Arc::new(MockRegistryWriter::new());
        let session = FixSession::new(FixPaths::default(), registry);

        let step = session.apply_plan(&game_config_plan());

        assert!(matches!(step.status, StepStatus::Skipped(_)));
    }

    // ── Full runs ─────────────────────────────────────────────────────────────

    #[test]
    fn test_run_ui_fix_applies_every_step() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (session, registry) = make_session(tmp.path());

        // Act
        let report = session.run_ui_fix();

        // Assert – backup, 4 plans, profile, registry flags
        assert_eq!(report.steps().len(), 7);
        assert_eq!(report.applied_count(), 7);
        assert!(report.succeeded());

        let settings = tmp.path().join("settings");
        assert!(settings.join("Backups").join("BootOptions.backup").is_file());
        assert!(settings
            .join("Backups")
            .join("ProfileOptions_profile.backup")
            .is_file());
        assert!(settings.join("UI_Fix_Profile").is_file());
        assert_eq!(registry.flags.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_run_complete_fix_mirrors_original_step_order() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (session, registry) = make_session(tmp.path());

        // Act
        let report = session.run_complete_fix();

        // Assert – mitigation, backup, 5 plans, profile, UI flags
        assert_eq!(report.steps().len(), 9);
        assert_eq!(report.steps()[0].name, "CFG mitigation flags");
        assert_eq!(report.applied_count(), 9);

        // Mitigation flags are QWORDs, UI flags DWORDs; both groups landed.
        let flags = registry.flags.lock().unwrap();
        let qwords = flags
            .iter()
            .filter(|f| matches!(f.data, RegistryData::Qword(_)))
            .count();
        assert_eq!(qwords, 2);
        assert_eq!(flags.len(), 4);

        let cfg = fs::read_to_string(tmp.path().join("game/Scripts/Win32Game.cfg")).unwrap();
        assert!(cfg.contains("GstRender.Dx12Enabled 1\n"));
    }

    #[test]
    fn test_fix_is_idempotent_on_disk() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());
        let boot = tmp.path().join("settings").join("BootOptions");

        // Act
        session.run_ui_fix();
        let after_first = fs::read(&boot).unwrap();
        let report = session.run_ui_fix();
        let after_second = fs::read(&boot).unwrap();

        // Assert – same bytes, and the rerun still counts as applied
        assert_eq!(after_first, after_second);
        assert!(report.succeeded());
    }

    #[test]
    fn test_registry_failure_does_not_stop_file_steps() {
        // Arrange – a registry that denies every write
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());
        let session = FixSession::new(
            session.paths().clone(),
            Arc::new(MockRegistryWriter::denying()),
        );

        // Act
        let report = session.run_complete_fix();

        // Assert – both registry steps failed, all 7 file steps applied
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.applied_count(), 7);
        assert!(report.succeeded());
    }

    #[test]
    fn test_registry_unsupported_is_a_skip_not_a_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());
        let session = FixSession::new(
            session.paths().clone(),
            Arc::new(UnsupportedRegistryWriter),
        );

        let report = session.run_ui_fix();

        assert_eq!(report.failed_count(), 0);
        assert!(matches!(
            report.steps().last().unwrap().status,
            StepStatus::Skipped(_)
        ));
    }

    // ── Restore ───────────────────────────────────────────────────────────────

    #[test]
    fn test_restore_backups_round_trips_original_bytes() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());
        let boot = tmp.path().join("settings").join("BootOptions");
        let original = fs::read(&boot).unwrap();

        // Act – fix, then undo
        session.run_complete_fix();
        assert_ne!(fs::read(&boot).unwrap(), original);
        let report = session.restore_backups();

        // Assert
        assert_eq!(fs::read(&boot).unwrap(), original);
        assert_eq!(report.applied_count(), 3);
    }

    #[test]
    fn test_restore_without_backups_skips_every_step() {
        let tmp = tempfile::tempdir().unwrap();
        let (session, _) = make_session(tmp.path());

        let report = session.restore_backups();

        assert_eq!(report.applied_count(), 0);
        assert!(!report.succeeded());
        assert_eq!(report.skipped_count(), 3);
    }
}
