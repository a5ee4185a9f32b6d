//! Ordered-candidate discovery of the game and settings directories.
//!
//! Both finders follow the same rule: walk a fixed candidate list in order
//! and take the first directory that contains a marker file.  **Not finding
//! anything is a normal answer (`None`), never an error** — a missing game
//! install just means the game-side steps get skipped.
//!
//! The result of discovery is carried through a run as a [`FixPaths`]
//! value.  Nothing in the engine consults the current working directory or
//! any global after this point; callers that know better (CLI arguments,
//! the GUI's saved paths) override fields before handing the value over.

use std::path::{Path, PathBuf};

use swfix_core::{SettingsTarget, TargetRoot, GAME_EXECUTABLE, UI_FIX_PROFILE_FILE};

/// Name of the per-root directory that holds `<file>.backup` copies.
pub const BACKUP_DIR_NAME: &str = "Backups";

/// Known Steam / EA / Origin install locations, most common first.
const INSTALL_ROOTS: [&str; 8] = [
    r"C:\Program Files (x86)\Steam\steamapps\common\STAR WARS Battlefront II",
    r"C:\Program Files\Steam\steamapps\common\STAR WARS Battlefront II",
    r"D:\Steam\steamapps\common\STAR WARS Battlefront II",
    r"E:\SteamLibrary\steamapps\common\STAR WARS Battlefront II",
    r"C:\Program Files (x86)\EA Games\STAR WARS Battlefront II",
    r"C:\Program Files\EA Games\STAR WARS Battlefront II",
    r"C:\Program Files (x86)\Origin Games\STAR WARS Battlefront II",
    r"C:\Program Files\Origin Games\STAR WARS Battlefront II",
];

// ── Finder ────────────────────────────────────────────────────────────────────

/// Finds a directory by checking an ordered candidate list for a marker file.
#[derive(Debug, Clone)]
pub struct InstallFinder {
    candidates: Vec<PathBuf>,
    marker: String,
}

impl InstallFinder {
    /// Creates a finder over `candidates`, matched by the presence of
    /// `marker` as a file directly inside the candidate.
    pub fn new(candidates: Vec<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            candidates,
            marker: marker.into(),
        }
    }

    /// The candidate list, in probe order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate directory that contains the marker file.
    pub fn first_match(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find(|dir| dir.join(&self.marker).is_file())
            .cloned()
    }

    /// First candidate that exists as a directory, marker or not.
    ///
    /// Used as a fallback for the settings directory: a fresh install has
    /// the directory but none of the settings files yet.
    pub fn first_existing_dir(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|dir| dir.is_dir()).cloned()
    }
}

/// Finder for the game install directory, marked by the game executable.
///
/// Candidate order: the directory the fix binary runs from (the original
/// package was dropped into the game folder), the current working
/// directory, then the known store install roots.
pub fn game_finder() -> InstallFinder {
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    candidates.extend(INSTALL_ROOTS.iter().map(PathBuf::from));
    InstallFinder::new(candidates, GAME_EXECUTABLE)
}

/// Finder for the per-user settings directory, marked by `BootOptions`.
pub fn settings_finder() -> InstallFinder {
    let mut candidates = Vec::new();
    if let Some(home) = home_dir() {
        candidates.push(
            home.join("Documents")
                .join("STAR WARS Battlefront II")
                .join("settings"),
        );
    }
    InstallFinder::new(candidates, SettingsTarget::BootOptions.file_name())
}

/// The user's home directory, from the platform's usual variable.
fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}

// ── FixPaths ──────────────────────────────────────────────────────────────────

/// The resolved directories a fix run works against.
///
/// Either side may be absent; steps that need an absent root are tallied as
/// skipped rather than failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixPaths {
    /// Game install directory (contains the game executable).
    pub game_dir: Option<PathBuf>,
    /// Per-user settings directory under Documents.
    pub settings_dir: Option<PathBuf>,
}

impl FixPaths {
    /// Discovers both directories with the default finders.
    pub fn discover() -> Self {
        Self::with_overrides(None, None)
    }

    /// Uses the given directories where present and discovers the rest.
    ///
    /// Overrides are trusted as-is: an explicit path is never re-checked
    /// against the marker, so a caller can point the fix at an unusual
    /// layout.
    pub fn with_overrides(game_dir: Option<PathBuf>, settings_dir: Option<PathBuf>) -> Self {
        let game_dir = game_dir.or_else(|| game_finder().first_match());
        let settings_dir = settings_dir.or_else(|| {
            let finder = settings_finder();
            finder.first_match().or_else(|| finder.first_existing_dir())
        });
        Self {
            game_dir,
            settings_dir,
        }
    }

    /// The directory behind a target root, if resolved.
    pub fn resolve_root(&self, root: TargetRoot) -> Option<&Path> {
        match root {
            TargetRoot::GameDir => self.game_dir.as_deref(),
            TargetRoot::SettingsDir => self.settings_dir.as_deref(),
        }
    }

    /// Full path of a settings target, if its root is resolved.
    pub fn resolve_target(&self, target: SettingsTarget) -> Option<PathBuf> {
        let root = self.resolve_root(target.root())?;
        let mut path = root.to_path_buf();
        for component in target.relative_components() {
            path.push(component);
        }
        Some(path)
    }

    /// Where backups for files under `root` live.
    pub fn backup_dir(&self, root: TargetRoot) -> Option<PathBuf> {
        self.resolve_root(root).map(|dir| dir.join(BACKUP_DIR_NAME))
    }

    /// Expected path of the game executable, if the game dir is resolved.
    pub fn game_executable(&self) -> Option<PathBuf> {
        self.game_dir.as_ref().map(|dir| dir.join(GAME_EXECUTABLE))
    }

    /// Where the generated UI fix profile is written.
    pub fn ui_profile_path(&self) -> Option<PathBuf> {
        self.settings_dir
            .as_ref()
            .map(|dir| dir.join(UI_FIX_PROFILE_FILE))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dir_with_marker(root: &Path, name: &str, marker: Option<&str>) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(marker) = marker {
            fs::write(dir.join(marker), b"").unwrap();
        }
        dir
    }

    // ── InstallFinder ─────────────────────────────────────────────────────────

    #[test]
    fn test_first_match_returns_first_candidate_with_marker() {
        // Arrange – second and third candidates both carry the marker
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_with_marker(tmp.path(), "a", None);
        let b = dir_with_marker(tmp.path(), "b", Some("game.exe"));
        let c = dir_with_marker(tmp.path(), "c", Some("game.exe"));
        let finder = InstallFinder::new(vec![a, b.clone(), c], "game.exe");

        // Act
        let found = finder.first_match();

        // Assert – order decides, not directory names
        assert_eq!(found, Some(b));
    }

    #[test]
    fn test_first_match_returns_none_when_no_candidate_has_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_with_marker(tmp.path(), "a", None);
        let finder = InstallFinder::new(vec![a, tmp.path().join("missing")], "game.exe");

        assert_eq!(finder.first_match(), None);
    }

    #[test]
    fn test_first_match_ignores_marker_that_is_a_directory() {
        // Arrange – the marker name exists but as a subdirectory
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_with_marker(tmp.path(), "a", None);
        fs::create_dir_all(a.join("game.exe")).unwrap();
        let finder = InstallFinder::new(vec![a], "game.exe");

        // Act + Assert
        assert_eq!(finder.first_match(), None);
    }

    #[test]
    fn test_first_existing_dir_skips_nonexistent_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        let real = dir_with_marker(tmp.path(), "real", None);
        let finder = InstallFinder::new(
            vec![tmp.path().join("ghost"), real.clone()],
            "BootOptions",
        );

        assert_eq!(finder.first_existing_dir(), Some(real));
    }

    #[test]
    fn test_game_finder_falls_back_to_known_install_roots() {
        // The first candidates depend on where the test binary runs; the
        // tail must always be the fixed store locations, in order.
        let finder = game_finder();
        let candidates = finder.candidates();

        assert!(candidates.len() >= INSTALL_ROOTS.len());
        let tail = &candidates[candidates.len() - INSTALL_ROOTS.len()..];
        for (candidate, root) in tail.iter().zip(INSTALL_ROOTS) {
            assert_eq!(candidate, &PathBuf::from(root));
        }
    }

    // ── FixPaths ──────────────────────────────────────────────────────────────

    fn make_paths(tmp: &Path) -> FixPaths {
        FixPaths {
            game_dir: Some(tmp.join("game")),
            settings_dir: Some(tmp.join("settings")),
        }
    }

    #[test]
    fn test_resolve_target_joins_relative_components() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = make_paths(tmp.path());

        assert_eq!(
            paths.resolve_target(SettingsTarget::GameConfig),
            Some(tmp.path().join("game").join("Scripts").join("Win32Game.cfg"))
        );
        assert_eq!(
            paths.resolve_target(SettingsTarget::BootOptions),
            Some(tmp.path().join("settings").join("BootOptions"))
        );
    }

    #[test]
    fn test_resolve_target_is_none_when_root_unresolved() {
        let paths = FixPaths {
            game_dir: None,
            settings_dir: Some(PathBuf::from("/some/settings")),
        };

        assert_eq!(paths.resolve_target(SettingsTarget::GameConfig), None);
        assert!(paths.resolve_target(SettingsTarget::ProfileOptions).is_some());
    }

    #[test]
    fn test_backup_dir_lives_under_the_target_root() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = make_paths(tmp.path());

        assert_eq!(
            paths.backup_dir(TargetRoot::SettingsDir),
            Some(tmp.path().join("settings").join(BACKUP_DIR_NAME))
        );
    }

    #[test]
    fn test_with_overrides_trusts_explicit_paths() {
        // An override pointing at a directory without any marker is kept.
        let tmp = tempfile::tempdir().unwrap();
        let odd = dir_with_marker(tmp.path(), "odd-layout", None);

        let paths = FixPaths::with_overrides(Some(odd.clone()), Some(odd.clone()));

        assert_eq!(paths.game_dir, Some(odd.clone()));
        assert_eq!(paths.settings_dir, Some(odd));
    }

    #[test]
    fn test_ui_profile_path_is_in_the_settings_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = make_paths(tmp.path());

        assert_eq!(
            paths.ui_profile_path(),
            Some(tmp.path().join("settings").join(UI_FIX_PROFILE_FILE))
        );
    }
}
