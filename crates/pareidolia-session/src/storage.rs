//! Durable key/value storage for the credential pair.
//!
//! The session persists exactly two entries, [`TOKEN_KEY`] and
//! [`ROLE_KEY`]. They are always written together and removed together,
//! which is why the trait has `set_many`/`remove_many` with defaults that
//! implementations override to make the pair a single write.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rand::Rng;

use crate::StorageError;

/// Key of the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key of the persisted role discriminant.
pub const ROLE_KEY: &str = "referenceType";

/// A durable string-to-string store.
///
/// Reads never fail: an unreadable entry is an absent entry. Writes
/// report failures so the caller can surface them.
pub trait CredentialStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes several entries. Implementations should make this a single
    /// write; the default falls back to one `set` per entry.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Removes several entries, with the same caveat as `set_many`.
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Process-local storage. Nothing survives a restart; used in tests and
/// for one-off CLI invocations.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with entries, as if left over from a previous run.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CredentialStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Storage backed by a JSON object on disk.
///
/// The whole map is cached in memory and rewritten on every change. Each
/// rewrite goes to a temporary sibling file first and is then renamed over
/// the original, so a crash mid-write leaves either the old pair or the
/// new pair on disk, never half of each.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens (or prepares to create) the storage file at `path`.
    ///
    /// A missing file is an empty store; the file and its parent
    /// directory are created on the first write.
    ///
    /// # Errors
    /// - [`StorageError::Io`] — the file exists but can't be read
    /// - [`StorageError::Corrupt`] — the file isn't a JSON string map
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened credential file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the map, persists the copy, and only
    /// then swaps it in. A failed write leaves the cache untouched.
    fn update(
        &self,
        change: impl FnOnce(&mut HashMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let tmp = self.temp_path();
        let written = write_synced(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(StorageError::Io(e));
        }
        Ok(())
    }

    /// `<file>.<16 hex chars>.tmp` next to the real file.
    fn temp_path(&self) -> PathBuf {
        let suffix: u64 = rand::rng().random();
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{suffix:016x}.tmp"));
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl CredentialStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // MemoryStorage
    // =====================================================================

    #[test]
    fn test_memory_get_missing_returns_none() {
        let store = MemoryStorage::new();
        assert_eq!(store.get(TOKEN_KEY), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_set_many_then_remove_many() {
        let store = MemoryStorage::new();

        store
            .set_many(&[(TOKEN_KEY, "abc"), (ROLE_KEY, "ADMIN")])
            .unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(store.get(ROLE_KEY).as_deref(), Some("ADMIN"));

        store.remove_many(&[TOKEN_KEY, ROLE_KEY]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_remove_missing_is_ok() {
        let store = MemoryStorage::new();
        assert!(store.remove("nope").is_ok());
    }

    #[test]
    fn test_memory_with_entries_seeds_values() {
        let store = MemoryStorage::with_entries([(TOKEN_KEY, "t")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t"));
    }

    // =====================================================================
    // FileStorage
    // =====================================================================

    #[test]
    fn test_file_open_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path().join("session.json")).unwrap();

        assert_eq!(store.get(TOKEN_KEY), None);
        // Nothing is written until the first change.
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        {
            let store = FileStorage::open(&path).unwrap();
            store
                .set_many(&[(TOKEN_KEY, "abc123"), (ROLE_KEY, "PROMOTER")])
                .unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc123"));
        assert_eq!(reopened.get(ROLE_KEY).as_deref(), Some("PROMOTER"));
    }

    #[test]
    fn test_file_remove_many_clears_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStorage::open(&path).unwrap();
        store.set_many(&[(TOKEN_KEY, "a"), (ROLE_KEY, "ADMIN")]).unwrap();

        store.remove_many(&[TOKEN_KEY, ROLE_KEY]).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY), None);
        assert_eq!(reopened.get(ROLE_KEY), None);
    }

    #[test]
    fn test_file_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path().join("session.json")).unwrap();

        store.set(TOKEN_KEY, "a").unwrap();
        store.set(TOKEN_KEY, "b").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["session.json".to_string()]);
    }

    #[test]
    fn test_file_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStorage::open(&path).unwrap();
        // A directory in the way makes the final rename fail.
        fs::create_dir(&path).unwrap();

        let result = store.set_many(&[(TOKEN_KEY, "t"), (ROLE_KEY, "ADMIN")]);

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert_eq!(store.get(TOKEN_KEY), None);
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["session.json".to_string()]);
    }

    #[test]
    fn test_file_open_corrupt_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let result = FileStorage::open(&path);

        assert!(matches!(result, Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_file_open_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "\n").unwrap();

        let store = FileStorage::open(&path).unwrap();

        assert_eq!(store.get(TOKEN_KEY), None);
    }
}
