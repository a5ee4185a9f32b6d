//! SystemVerifier: pre-flight checks before a fix run.
//!
//! Six checks, rendered as a [`VerifyReport`]: OS version, elevation, game
//! install, settings directory, free disk space, and backup-directory
//! writability.  Warnings never block — an un-elevated run still fixes
//! every file, it just cannot set the HKLM mitigation flags.
//!
//! System facts come from an injected [`SystemProbe`]; the filesystem
//! checks run directly against [`FixPaths`].

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use swfix_core::{CheckReport, CheckStatus, TargetRoot, VerifyReport};

use crate::infrastructure::resolver::FixPaths;

/// First Windows 11 build number; the major version stayed at 10.
const WIN11_FIRST_BUILD: u32 = 22000;

/// Backups and temp files need this much headroom.
pub const MIN_FREE_SPACE_BYTES: u64 = 100 * 1024 * 1024;

/// Version facts about the running system.
///
/// `major` and `build` are only known on Windows 10 and newer; their
/// absence on a Windows system marks something older.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    /// OS family, `std::env::consts::OS` style: "windows", "linux", ...
    pub family: String,
    pub major: Option<u32>,
    pub build: Option<u32>,
}

/// Read-only system facts for the verify use case.
///
/// Each supported platform provides an implementation in the
/// infrastructure layer; anything unknowable is `None`, never a guess.
pub trait SystemProbe: Send + Sync {
    fn os_info(&self) -> OsInfo;

    /// Whether the process runs elevated; `None` where that has no meaning.
    fn is_elevated(&self) -> Option<bool>;

    /// Free bytes on the volume holding `path`.
    fn free_space(&self, path: &Path) -> Option<u64>;
}

/// Runs the pre-flight checks against a probe and a set of paths.
pub struct SystemVerifier {
    probe: Arc<dyn SystemProbe>,
}

impl SystemVerifier {
    pub fn new(probe: Arc<dyn SystemProbe>) -> Self {
        Self { probe }
    }

    pub fn run(&self, paths: &FixPaths) -> VerifyReport {
        let mut report = VerifyReport::new();
        report.push(self.check_os());
        report.push(self.check_elevation());
        report.push(check_game_install(paths));
        report.push(check_settings_dir(paths));
        report.push(self.check_free_space(paths));
        report.push(check_backup_dir(paths));
        report
    }

    fn check_os(&self) -> CheckReport {
        const NAME: &str = "Operating system";
        let os = self.probe.os_info();
        if os.family != "windows" {
            return CheckReport::new(
                NAME,
                CheckStatus::Fail,
                format!("{} is not supported; the DX12 fix targets Windows 10/11", os.family),
            );
        }
        match os.major {
            Some(major) if major >= 10 => {
                let build = os.build.unwrap_or(0);
                let label = if build >= WIN11_FIRST_BUILD {
                    "Windows 11"
                } else {
                    "Windows 10"
                };
                let detail = match os.build {
                    Some(build) => format!("{label} (build {build})"),
                    None => label.to_string(),
                };
                CheckReport::new(NAME, CheckStatus::Pass, detail)
            }
            _ => CheckReport::new(
                NAME,
                CheckStatus::Warn,
                "could not confirm Windows 10 or newer; DX12 needs Windows 10+",
            ),
        }
    }

    fn check_elevation(&self) -> CheckReport {
        const NAME: &str = "Administrator privileges";
        match self.probe.is_elevated() {
            Some(true) => CheckReport::new(NAME, CheckStatus::Pass, "running elevated"),
            Some(false) => CheckReport::new(
                NAME,
                CheckStatus::Warn,
                "not elevated; the HKLM mitigation flags will fail, file fixes still work",
            ),
            None => CheckReport::new(
                NAME,
                CheckStatus::Unknown,
                "elevation state unavailable on this platform",
            ),
        }
    }

    fn check_free_space(&self, paths: &FixPaths) -> CheckReport {
        const NAME: &str = "Free disk space";
        let Some(dir) = paths.settings_dir.as_deref().or(paths.game_dir.as_deref()) else {
            return CheckReport::new(NAME, CheckStatus::Unknown, "no directory to check");
        };
        match self.probe.free_space(dir) {
            Some(bytes) if bytes >= MIN_FREE_SPACE_BYTES => CheckReport::new(
                NAME,
                CheckStatus::Pass,
                format!("{} MB free", bytes / (1024 * 1024)),
            ),
            Some(bytes) => CheckReport::new(
                NAME,
                CheckStatus::Warn,
                format!(
                    "only {} MB free; backups and temp files need about {} MB",
                    bytes / (1024 * 1024),
                    MIN_FREE_SPACE_BYTES / (1024 * 1024)
                ),
            ),
            None => CheckReport::new(
                NAME,
                CheckStatus::Unknown,
                "free space could not be determined",
            ),
        }
    }
}

fn check_game_install(paths: &FixPaths) -> CheckReport {
    const NAME: &str = "Game installation";
    match paths.game_executable() {
        Some(exe) if exe.is_file() => {
            CheckReport::new(NAME, CheckStatus::Pass, format!("found {}", exe.display()))
        }
        Some(exe) => CheckReport::new(
            NAME,
            CheckStatus::Fail,
            format!("{} does not exist", exe.display()),
        ),
        None => CheckReport::new(
            NAME,
            CheckStatus::Fail,
            "no game installation found in the known locations",
        ),
    }
}

fn check_settings_dir(paths: &FixPaths) -> CheckReport {
    const NAME: &str = "Settings directory";
    match paths.settings_dir.as_deref() {
        Some(dir) if dir.is_dir() => {
            CheckReport::new(NAME, CheckStatus::Pass, dir.display().to_string())
        }
        Some(dir) => CheckReport::new(
            NAME,
            CheckStatus::Fail,
            format!("{} does not exist (run the game once to create it)", dir.display()),
        ),
        None => CheckReport::new(
            NAME,
            CheckStatus::Fail,
            "settings directory not found (run the game once to create it)",
        ),
    }
}

fn check_backup_dir(paths: &FixPaths) -> CheckReport {
    const NAME: &str = "Backup directory";
    let backup_dir = paths
        .backup_dir(TargetRoot::SettingsDir)
        .or_else(|| paths.backup_dir(TargetRoot::GameDir));
    let Some(dir) = backup_dir else {
        return CheckReport::new(NAME, CheckStatus::Unknown, "no backup directory to probe");
    };
    match probe_writable(&dir) {
        Ok(()) => CheckReport::new(
            NAME,
            CheckStatus::Pass,
            format!("{} is writable", dir.display()),
        ),
        Err(e) => CheckReport::new(
            NAME,
            CheckStatus::Fail,
            format!("cannot write to {}: {}", dir.display(), e),
        ),
    }
}

/// Creates the directory if needed and round-trips a probe file.
fn probe_writable(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(".write_probe");
    fs::write(&probe, b"probe")?;
    fs::remove_file(&probe)
}

/// The GUI's quick path check: a human-readable issue per unusable path.
/// An empty list means both paths are good to go.
pub fn verify_paths(paths: &FixPaths) -> Vec<String> {
    let mut issues = Vec::new();
    match paths.game_executable() {
        Some(exe) if exe.is_file() => {}
        Some(exe) => issues.push(format!("game executable not found at {}", exe.display())),
        None => issues.push("game installation not found".to_string()),
    }
    match paths.settings_dir.as_deref() {
        Some(dir) if dir.is_dir() => {}
        Some(dir) => issues.push(format!("settings directory {} does not exist", dir.display())),
        None => issues.push("settings directory not found".to_string()),
    }
    issues
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::probe::mock::MockSystemProbe;
    use std::fs;
    use std::path::PathBuf;
    use swfix_core::GAME_EXECUTABLE;

    /// A healthy Windows 11 machine with a full install tree on disk.
    fn make_fixture() -> (tempfile::TempDir, FixPaths, Arc<MockSystemProbe>) {
        let tmp = tempfile::tempdir().unwrap();
        let game = tmp.path().join("game");
        let settings = tmp.path().join("settings");
        fs::create_dir_all(&game).unwrap();
        fs::create_dir_all(&settings).unwrap();
        fs::write(game.join(GAME_EXECUTABLE), b"MZ").unwrap();
        let paths = FixPaths {
            game_dir: Some(game),
            settings_dir: Some(settings),
        };
        (tmp, paths, Arc::new(MockSystemProbe::windows_11()))
    }

    #[test]
    fn test_all_checks_pass_on_a_healthy_system() {
        // Arrange
        let (_tmp, paths, probe) = make_fixture();
        let verifier = SystemVerifier::new(probe);

        // Act
        let report = verifier.run(&paths);

        // Assert
        assert_eq!(report.checks().len(), 6);
        assert!(report.all_passed());
        assert_eq!(report.pass_count(), 6);
        assert_eq!(report.summary(), "6/6 checks passed");
    }

    #[test]
    fn test_os_check_recognizes_windows_11_by_build_number() {
        let (_tmp, paths, _) = make_fixture();
        let verifier = SystemVerifier::new(Arc::new(MockSystemProbe::windows_11()));

        let report = verifier.run(&paths);

        assert!(report.checks()[0].detail.contains("Windows 11"));
    }

    #[test]
    fn test_os_check_fails_on_non_windows() {
        let (_tmp, paths, _) = make_fixture();
        let probe = Arc::new(MockSystemProbe::windows_11().with_family("linux"));
        let verifier = SystemVerifier::new(probe);

        let report = verifier.run(&paths);

        assert_eq!(report.checks()[0].status, CheckStatus::Fail);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_os_check_warns_on_unconfirmed_windows_version() {
        // Pre-Windows-10 systems have no CurrentMajorVersionNumber value.
        let (_tmp, paths, _) = make_fixture();
        let probe = Arc::new(MockSystemProbe::windows_11().with_version(None, None));
        let verifier = SystemVerifier::new(probe);

        let report = verifier.run(&paths);

        assert_eq!(report.checks()[0].status, CheckStatus::Warn);
        assert!(report.all_passed());
    }

    #[test]
    fn test_unelevated_run_warns_but_does_not_block() {
        let (_tmp, paths, _) = make_fixture();
        let probe = Arc::new(MockSystemProbe::windows_11().with_elevated(Some(false)));
        let verifier = SystemVerifier::new(probe);

        let report = verifier.run(&paths);

        assert_eq!(report.checks()[1].status, CheckStatus::Warn);
        assert!(report.all_passed());
    }

    #[test]
    fn test_missing_game_install_fails_the_check() {
        let (_tmp, mut paths, probe) = make_fixture();
        paths.game_dir = None;
        let verifier = SystemVerifier::new(probe);

        let report = verifier.run(&paths);

        assert_eq!(report.checks()[2].status, CheckStatus::Fail);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_low_disk_space_warns() {
        let (_tmp, paths, _) = make_fixture();
        let probe = Arc::new(
            MockSystemProbe::windows_11().with_free_space(Some(MIN_FREE_SPACE_BYTES - 1)),
        );
        let verifier = SystemVerifier::new(probe);

        let report = verifier.run(&paths);

        assert_eq!(report.checks()[4].status, CheckStatus::Warn);
    }

    #[test]
    fn test_unwritable_backup_dir_fails_the_check() {
        // Arrange – a file sits where the Backups directory should go
        let (tmp, paths, probe) = make_fixture();
        fs::write(tmp.path().join("settings").join("Backups"), b"a file").unwrap();
        let verifier = SystemVerifier::new(probe);

        // Act
        let report = verifier.run(&paths);

        // Assert
        assert_eq!(report.checks()[5].status, CheckStatus::Fail);
    }

    // ── verify_paths ──────────────────────────────────────────────────────────

    #[test]
    fn test_verify_paths_is_empty_for_a_complete_tree() {
        let (_tmp, paths, _) = make_fixture();

        assert!(verify_paths(&paths).is_empty());
    }

    #[test]
    fn test_verify_paths_names_each_problem() {
        let paths = FixPaths {
            game_dir: Some(PathBuf::from("/nonexistent/game")),
            settings_dir: None,
        };

        let issues = verify_paths(&paths);

        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("game executable not found"));
        assert!(issues[1].contains("settings directory not found"));
    }
}
