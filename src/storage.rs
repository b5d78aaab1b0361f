//! Filesystem access for envelope files.

use crate::crypto::{OsRandom, RandomSource};
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reads and atomically replaces a single file on disk.
#[derive(Clone, Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `true` if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the entire file into memory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Writes `data` to the file, replacing any previous content.
    ///
    /// Data goes to a randomly named sibling first, is synced, and is then
    /// renamed over the target, so readers see either the old file or the
    /// complete new one. Missing parent directories are created.
    ///
    /// The rename is the commit point. The parent directory is synced after
    /// it, and a failure there is only logged: the new file is already in
    /// place and reporting a failed write would be false.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if any step up to and including the rename
    /// fails. The temporary file is removed and the target is untouched.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;

        if let Err(e) = write_synced(&tmp_path, data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        if let Err(e) = self.atomic_replace(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.sync_parent();

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sync_parent(&self) {
        if let Some(parent) = self.parent() {
            if let Err(e) = sync_dir(parent) {
                warn!(dir = %parent.display(), "failed to sync directory after rename: {e}");
            }
        }
    }

    // `Path::parent` yields "" for bare file names
    fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Format: `filename.tmp.<randomhex>`
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        OsRandom.fill_bytes(&mut buf)?;

        let rand_string = buf.iter().map(|b| format!("{b:02x}")).collect::<String>();

        let file_name = self.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
        })?;

        let tmp_name = format!("{}.tmp.{}", file_name.to_string_lossy(), rand_string);

        Ok(self.path.with_file_name(tmp_name))
    }

    /// Replaces the target with `tmp_path` via `ReplaceFileW`, falling back
    /// to a plain rename when the target does not exist yet.
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> io::Result<()> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        if !self.path.exists() {
            return fs::rename(tmp_path, &self.path);
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY:
        // - Strings are valid UTF-16 and null-terminated
        // - Pointers remain valid during the call
        // - Windows does not retain the pointers after return
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// On Unix, `rename()` is atomic when both paths are on the same filesystem.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> io::Result<()> {
        fs::rename(tmp_path, &self.path)
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    // fail if the temp name is already taken
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(not(target_os = "windows"))]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

// directories cannot be opened for syncing on Windows
#[cfg(target_os = "windows")]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn load_returns_written_data() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("secret.enc"));

        storage.save(b"hello world").unwrap();

        assert_eq!(storage.load().unwrap(), b"hello world");
    }

    #[test]
    fn load_fails_with_io_error_if_missing() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("missing.enc"));

        match storage.load() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected Io error, got: {other:?}"),
        }
    }

    #[test]
    fn exists_tracks_saves() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("secret.enc"));

        assert!(!storage.exists());
        storage.save(b"data").unwrap();
        assert!(storage.exists());
    }

    #[test]
    fn random_tmp_path_is_unique_sibling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secret.enc");
        let storage = Storage::new(path.clone());

        let a = storage.random_tmp_path().unwrap();
        let b = storage.random_tmp_path().unwrap();

        assert_eq!(a.parent(), path.parent());
        assert_ne!(a, path);
        assert_ne!(a, b);
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let storage = Storage::new("/");
        assert!(matches!(storage.save(b"data"), Err(Error::Io(_))));
    }

    #[test]
    fn directory_sync_failure_is_not_fatal() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("gone").join("secret.enc"));

        // parent does not exist, so syncing it fails
        assert!(sync_dir(dir.path().join("gone").as_path()).is_err() || cfg!(windows));
        storage.sync_parent();
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secret.enc");
        let storage = Storage::new(path.clone());

        storage.save(b"first").unwrap();
        storage.save(b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn tmp_file_is_removed_after_success() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("secret.enc"));
        storage.save(b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], "secret.enc");
    }

    #[test]
    fn parent_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("secret.enc");

        Storage::new(nested.clone()).save(b"data").unwrap();

        assert!(nested.exists());
    }
}
