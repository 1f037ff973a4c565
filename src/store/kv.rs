//! A namespaced, file-backed JSON key-value store.
//!
//! Every write goes through a temp-file-then-rename so a crash mid-write
//! never corrupts an existing entry, following the same pattern as the
//! AUR response disk cache.

use crate::error::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::PathBuf;

/// What: A single namespace (subdirectory) of the on-disk store.
///
/// Inputs: None (constructed via `KvStore::open`)
///
/// Output: `KvStore` instance holding an exclusive lock on its namespace
///
/// Details:
/// - One JSON file per key, written via temp-file-then-rename
/// - The namespace lock is held for the lifetime of the handle, giving the
///   single-process-at-a-time guarantee the metadata/history/snapshot
///   stores rely on
#[derive(Debug)]
pub struct KvStore {
    dir: PathBuf,
    /// Held for the lifetime of this handle to serialize cross-process writes.
    _lock: File,
}

impl KvStore {
    /// What: Open (creating if absent) the given namespace under the
    /// facade's persistent data directory.
    ///
    /// Inputs:
    /// - `namespace`: subdirectory name under the store root
    ///
    /// Output:
    /// - `Result<KvStore>` holding the namespace's exclusive file lock
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the directory or lock file
    /// cannot be created.
    pub fn open(namespace: &str) -> Result<Self> {
        let dir = data_dir().join(namespace);
        fs::create_dir_all(&dir)?;
        let lock_path = dir.join(".lock");
        let lock_file = File::create(&lock_path)?;
        lock_file.lock_exclusive()?;
        Ok(Self { dir, _lock: lock_file })
    }

    /// Release the namespace lock. Dropping the store does this implicitly;
    /// kept as an explicit operation to mirror the history/snapshot store's
    /// `open`/`close` pair.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the unlock syscall fails.
    pub fn close(&self) -> Result<()> {
        FileExt::unlock(&self._lock)?;
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// What: Read and deserialize one entry.
    ///
    /// Inputs:
    /// - `key`: entry key within this namespace
    ///
    /// Output:
    /// - `Result<Option<T>>`, `None` if the key is absent
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`] on a malformed entry.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// What: Serialize and atomically write one entry.
    ///
    /// Inputs:
    /// - `key`: entry key within this namespace
    /// - `value`: value to serialize and persist
    ///
    /// Output:
    /// - `Result<()>`
    ///
    /// Details:
    /// - Writes to a `.json.tmp` sibling then renames over the real path, so
    ///   a crash mid-write never corrupts an existing entry
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Remove one entry; a missing key is not an error.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] on an unexpected filesystem failure.
    pub fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// All keys currently stored in this namespace (order unspecified).
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the directory cannot be read.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stripped) = name.strip_suffix(".json") {
                keys.push(stripped.to_string());
            }
        }
        Ok(keys)
    }

    /// Number of entries currently stored.
    ///
    /// # Errors
    /// Same as [`KvStore::keys`].
    pub fn count(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    /// Remove every entry in this namespace.
    ///
    /// # Errors
    /// Same as [`KvStore::keys`].
    pub fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.delete(&key)?;
        }
        Ok(())
    }
}

/// Keys may contain path-unsafe characters (e.g. `/` in a namespaced package
/// key); percent-encode anything that isn't alphanumeric, `-`, or `_`.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Root directory all on-disk stores live under.
pub(crate) fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("poxy-core")
        .join("store")
}
