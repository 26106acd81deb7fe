//! Durable client-local key/value store.

use std::{fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error")]
    Io(#[from] io::Error),

    #[error("storage encoding error")]
    Encode(#[from] serde_json::Error),
}

/// File-backed key/value store for client-local state.
///
/// Each key maps to one JSON file under the store directory. Reads are
/// fail-soft: a missing, unreadable or corrupt value behaves like an absent
/// key, so stale state can never wedge the client.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Read and decode the value stored under `key`.
    ///
    /// Missing or corrupt values yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = fs::read_to_string(self.path_for(key)).ok()?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "discarding corrupt stored value");
                None
            }
        }
    }

    /// Serialize `value` and persist it under `key`, replacing any previous
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the file write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }

    /// Remove the value stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        if let Err(error) = fs::remove_file(self.path_for(key))
            && error.kind() != io::ErrorKind::NotFound
        {
            warn!(key, %error, "failed to remove stored value");
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        self.dir.join(format!("{name}.json"))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_then_get_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        store.set("cart", &vec![1, 2, 3])?;

        assert_eq!(store.get::<Vec<i32>>("cart"), Some(vec![1, 2, 3]));

        Ok(())
    }

    #[test]
    fn missing_key_reads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        assert_eq!(store.get::<Vec<i32>>("cart"), None);

        Ok(())
    }

    #[test]
    fn corrupt_value_reads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        fs::write(dir.path().join("cart.json"), "{not json")?;

        assert_eq!(store.get::<Vec<i32>>("cart"), None);

        Ok(())
    }

    #[test]
    fn set_replaces_previous_value() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        store.set("user", &"a@x.com")?;
        store.set("user", &"b@x.com")?;

        assert_eq!(store.get::<String>("user"), Some("b@x.com".to_string()));

        Ok(())
    }

    #[test]
    fn namespaced_keys_round_trip() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        store.set("reviews:41", &"tasty")?;

        assert_eq!(store.get::<String>("reviews:41"), Some("tasty".to_string()));

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::open(dir.path())?;

        store.set("user", &"a@x.com")?;
        store.remove("user");
        store.remove("user");

        assert_eq!(store.get::<String>("user"), None);

        Ok(())
    }
}
