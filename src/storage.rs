//! Local key-value persistence
//!
//! Handles:
//! - One JSON file per key under a data directory
//! - Trained example snapshots for the classifier
//! - The learner's profile
//!
//! Reads are fail-soft: a missing or unparsable file behaves like an absent
//! key, so a damaged data directory degrades to a fresh start instead of a
//! crash.

use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::recognize::classifier::StoredTensor;

/// Key the trained example snapshot is stored under.
pub const DATASET_KEY: &str = "knn_dataset";
/// Key the learner profile is stored under.
pub const PROFILE_KEY: &str = "profile";

/// Who is practicing.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub name: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Explorer".to_string(),
        }
    }
}

/// File-backed string store, one `<key>.json` per key.
#[derive(Clone, Debug)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        fs::create_dir_all(dir)?;
        Ok(LocalStore {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a raw value. Missing files read as None.
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Write a raw value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    /// Delete a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Load the trained example snapshot, or None when absent or damaged.
    pub fn load_dataset(&self) -> Option<FxHashMap<String, StoredTensor>> {
        let content = self.get(DATASET_KEY)?;
        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                eprintln!("⚠️  Stored examples are unreadable, starting fresh");
                None
            }
        }
    }

    /// Persist the trained example snapshot.
    pub fn save_dataset(
        &self,
        snapshot: &FxHashMap<String, StoredTensor>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.set(DATASET_KEY, &serde_json::to_string_pretty(snapshot)?)
    }

    /// Load the profile, or None when absent or damaged.
    pub fn load_profile(&self) -> Option<Profile> {
        let content = self.get(PROFILE_KEY)?;
        serde_json::from_str(&content).ok()
    }

    /// Persist the profile.
    pub fn save_profile(&self, profile: &Profile) -> Result<(), Box<dyn std::error::Error>> {
        self.set(PROFILE_KEY, &serde_json::to_string_pretty(profile)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> (LocalStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "smartsign-store-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        let store = LocalStore::open(&dir).unwrap();
        (store, dir)
    }

    #[test]
    fn test_missing_key_reads_none() {
        let (store, dir) = temp_store();
        assert_eq!(store.get("nothing"), None);
        assert!(store.load_dataset().is_none());
        assert!(store.load_profile().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_set_get_remove() {
        let (store, dir) = temp_store();
        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").as_deref(), Some("hello"));
        store.remove("greeting").unwrap();
        assert_eq!(store.get("greeting"), None);
        store.remove("greeting").unwrap();
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_dataset_round_trip() {
        let (store, dir) = temp_store();
        let mut snapshot: FxHashMap<String, StoredTensor> = FxHashMap::default();
        snapshot.insert(
            "A".to_string(),
            StoredTensor {
                data: vec![0.25; 63],
                shape: (1, 63),
            },
        );
        store.save_dataset(&snapshot).unwrap();

        let loaded = store.load_dataset().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("A").unwrap().shape, (1, 63));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_damaged_dataset_reads_none() {
        let (store, dir) = temp_store();
        store.set(DATASET_KEY, "{not valid json").unwrap();
        assert!(store.load_dataset().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_profile_round_trip() {
        let (store, dir) = temp_store();
        let profile = Profile {
            name: "Ada".to_string(),
        };
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile().unwrap().name, "Ada");
        let _ = fs::remove_dir_all(dir);
    }
}
