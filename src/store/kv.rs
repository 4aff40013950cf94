use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Key-value persistence: one JSON blob per fixed key. Mirrors the
/// browser-local-storage model the booking data was designed around.
#[cfg_attr(test, mockall::automock)]
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File backend: one `<key>.json` per key under a directory. Keys are
/// generated internally and already filesystem-safe.
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_kv_round_trip() {
        let kv = MemoryKv::new();
        assert!(kv.get("missing").unwrap().is_none());

        kv.put("key", "value").unwrap();
        assert_eq!(kv.get("key").unwrap().as_deref(), Some("value"));

        kv.put("key", "updated").unwrap();
        assert_eq!(kv.get("key").unwrap().as_deref(), Some("updated"));

        kv.remove("key").unwrap();
        assert!(kv.get("key").unwrap().is_none());
    }

    #[test]
    fn test_file_kv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).unwrap();

        assert!(kv.get("missing").unwrap().is_none());
        kv.put("parkpulse_users", "[]").unwrap();
        assert_eq!(kv.get("parkpulse_users").unwrap().as_deref(), Some("[]"));

        kv.remove("parkpulse_users").unwrap();
        assert!(kv.get("parkpulse_users").unwrap().is_none());
        // Removing a key that never existed is fine
        kv.remove("parkpulse_users").unwrap();
    }

    #[test]
    fn test_file_kv_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let kv = FileKv::open(dir.path()).unwrap();
            kv.put("parkpulse_user", "{\"id\":\"1\"}").unwrap();
        }
        let kv = FileKv::open(dir.path()).unwrap();
        assert_eq!(
            kv.get("parkpulse_user").unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
    }
}
