use std::fs;
use std::io;
use std::path::PathBuf;

/// Durable string storage addressed by a fixed key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as `<data dir>/<key>.json`. Without a usable data
/// directory there is no medium: reads find nothing and writes are skipped.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: Option<PathBuf>,
}

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        if let Err(err) = fs::create_dir_all(&data_dir) {
            log::error!(
                target: "storage",
                "Cannot use data directory {:?}, scores will not be saved: {}",
                data_dir,
                err
            );
            return Self::unavailable();
        }
        Self {
            data_dir: Some(data_dir),
        }
    }

    fn unavailable() -> Self {
        Self { data_dir: None }
    }

    fn key_path(&self, key: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key)?;
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        match self.key_path(key) {
            Some(path) => fs::write(path, value),
            None => {
                log::trace!(target: "storage", "No storage medium; skipping write of {}", key);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub use memory::MemoryStore;


#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "click-target-storage-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = FileStore::new(dir.clone());
        assert_eq!(store.get("leaderboard"), None);

        store.set("leaderboard", "[1,2,3]").unwrap();
        assert_eq!(store.get("leaderboard").as_deref(), Some("[1,2,3]"));
        assert!(dir.join("leaderboard.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unavailable_store_skips_io() {
        let store = FileStore::unavailable();
        assert!(store.set("leaderboard", "[]").is_ok());
        assert_eq!(store.get("leaderboard"), None);
    }

    #[test]
    fn test_unusable_directory_means_no_medium() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("not-a-directory");
        fs::write(&file, "x").unwrap();

        let store = FileStore::new(file.join("nested"));
        assert!(store.set("leaderboard", "[]").is_ok());
        assert_eq!(store.get("leaderboard"), None);
        assert!(!file.join("nested").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
