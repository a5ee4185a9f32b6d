//! Settings file I/O: disk ⇄ [`SettingsDocument`].
//!
//! Reading a file that does not exist is `Ok(None)`, not an error — fresh
//! installs are missing most of the settings files and the fix creates
//! them.  Writes go to a sibling `<name>.tmp` first and are renamed over
//! the target, so a crash mid-write leaves the original file intact.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use swfix_core::SettingsDocument;

/// Error type for settings file operations, carrying the offending path.
#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SettingsIoError {
    /// The underlying I/O error kind, used for the step-status taxonomy.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            SettingsIoError::Read { source, .. } | SettingsIoError::Write { source, .. } => {
                source.kind()
            }
        }
    }
}

/// Loads and parses a settings file.  `Ok(None)` when the file is absent.
pub fn load_settings(path: &Path) -> Result<Option<SettingsDocument>, SettingsIoError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(SettingsDocument::parse(&text))),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsIoError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Renders and writes a settings document via temp file + rename.
///
/// Creates missing parent directories.
///
/// # Errors
///
/// Returns [`SettingsIoError::Write`] if any of the create/write/rename
/// steps fail.
pub fn save_settings(path: &Path, document: &SettingsDocument) -> Result<(), SettingsIoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsIoError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, document.render()).map_err(|source| SettingsIoError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| SettingsIoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Sibling temp file: `BootOptions` → `BootOptions.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("settings"));
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use swfix_core::EditBatch;

    #[test]
    fn test_load_settings_returns_none_for_missing_file() {
        let tmp = tempfile::tempdir().unwrap();

        let loaded = load_settings(&tmp.path().join("BootOptions")).unwrap();

        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_round_trips_the_document() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("BootOptions");
        let mut doc = SettingsDocument::parse("GstRender.EnableDx12 0\n");
        doc.apply(&EditBatch::from_pairs(&[("GstRender.EnableDx12", "1")]));

        // Act
        save_settings(&path, &doc).unwrap();
        let loaded = load_settings(&path).unwrap().unwrap();

        // Assert
        assert_eq!(loaded.render(), "GstRender.EnableDx12 1\n");
    }

    #[test]
    fn test_save_settings_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Scripts").join("Win32Game.cfg");

        save_settings(&path, &SettingsDocument::parse("GstRender.Dx12Enabled 1\n")).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_save_settings_leaves_no_temp_file_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ProfileOptions_profile");

        save_settings(&path, &SettingsDocument::parse("a 1\n")).unwrap();
        save_settings(&path, &SettingsDocument::parse("a 2\n")).unwrap();

        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("ProfileOptions_profile")]);
    }

    #[test]
    fn test_load_settings_reports_non_missing_errors() {
        // Arrange – a directory where a file is expected
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("BootOptions");
        fs::create_dir(&path).unwrap();

        // Act
        let result = load_settings(&path);

        // Assert – not silently treated as absent
        let err = result.unwrap_err();
        assert_ne!(err.io_kind(), io::ErrorKind::NotFound);
    }
}
