//! Pre-patch file backups: one `<name>.backup` copy per patched file.
//!
//! No versioning and no diffing — a second backup of the same file
//! overwrites the first, matching what players expect from the manual
//! restore flow: "put back the files from before the last fix run".
//! Backing up a file that does not exist is a silent no-op.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for backup operations, carrying the offending path.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup operation failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BackupError {
    fn io(path: &Path, source: io::Error) -> Self {
        BackupError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The underlying I/O error kind, used for the step-status taxonomy.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            BackupError::Io { source, .. } => source.kind(),
        }
    }
}

/// Byte-for-byte copies of patched files under one directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the backup of `source` lives: `<dir>/<file_name>.backup`.
    pub fn backup_path(&self, source: &Path) -> PathBuf {
        let mut name = source
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("file"));
        name.push(".backup");
        self.dir.join(name)
    }

    /// Copies `source` into the store, creating the store directory on
    /// first use.  A missing source skips silently (`Ok(None)`); an
    /// existing backup is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Io`] if the directory or the copy fails.
    pub fn backup(&self, source: &Path) -> Result<Option<PathBuf>, BackupError> {
        if !source.is_file() {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir).map_err(|e| BackupError::io(&self.dir, e))?;
        let dest = self.backup_path(source);
        fs::copy(source, &dest).map_err(|e| BackupError::io(source, e))?;
        Ok(Some(dest))
    }

    /// Copies the stored backup back over `target`.  `Ok(false)` when no
    /// backup exists for it.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Io`] if the copy fails.
    pub fn restore(&self, target: &Path) -> Result<bool, BackupError> {
        let backup = self.backup_path(target);
        if !backup.is_file() {
            return Ok(false);
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
        }
        fs::copy(&backup, target).map_err(|e| BackupError::io(target, e))?;
        Ok(true)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_then_restore_reproduces_original_bytes() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("BootOptions");
        let original = b"GstRender.EnableDx12 0\r\nGstAudio.Volume 5\r\n";
        fs::write(&file, original).unwrap();
        let store = BackupStore::new(tmp.path().join("Backups"));

        // Act – back up, clobber, restore
        let stored = store.backup(&file).unwrap();
        fs::write(&file, b"GstRender.EnableDx12 1\n").unwrap();
        let restored = store.restore(&file).unwrap();

        // Assert
        assert!(stored.is_some());
        assert!(restored);
        assert_eq!(fs::read(&file).unwrap(), original);
    }

    #[test]
    fn test_backup_of_missing_source_skips_silently() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackupStore::new(tmp.path().join("Backups"));

        let stored = store.backup(&tmp.path().join("no-such-file")).unwrap();

        assert!(stored.is_none());
        // The store directory is not created for a skipped backup.
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_restore_without_backup_returns_false() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackupStore::new(tmp.path().join("Backups"));

        assert!(!store.restore(&tmp.path().join("BootOptions")).unwrap());
    }

    #[test]
    fn test_second_backup_overwrites_the_first() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Win32Game.cfg");
        let store = BackupStore::new(tmp.path().join("Backups"));
        fs::write(&file, b"first").unwrap();
        store.backup(&file).unwrap();

        // Act
        fs::write(&file, b"second").unwrap();
        store.backup(&file).unwrap();

        // Assert – single most-recent backup per file
        assert_eq!(fs::read(store.backup_path(&file)).unwrap(), b"second");
    }

    #[test]
    fn test_backup_path_appends_suffix_to_file_name() {
        let store = BackupStore::new("/tmp/Backups");

        assert_eq!(
            store.backup_path(Path::new("/game/Scripts/Win32Game.cfg")),
            PathBuf::from("/tmp/Backups/Win32Game.cfg.backup")
        );
    }
}
