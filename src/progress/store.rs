//! Profile storage backends

use ahash::AHashMap;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, TrainerError};
use crate::trainer::Algorithm;

use super::{AlgorithmProgress, UserProfile};

static USER_ID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").ok());

/// User ids double as file names, so only a safe alphabet is accepted
pub fn validate_user_id(uid: &str) -> Result<()> {
    if USER_ID.as_ref().is_some_and(|re| re.is_match(uid)) {
        Ok(())
    } else {
        Err(TrainerError::InvalidUserId(uid.to_string()))
    }
}

/// Storage keyed by opaque user id
pub trait ProgressStore: Send + Sync {
    fn load(&self, uid: &str) -> Result<Option<UserProfile>>;

    fn save(&self, uid: &str, profile: &UserProfile) -> Result<()>;

    /// Whether any stored profile already uses this username
    fn is_username_taken(&self, username: &str) -> Result<bool>;

    fn load_or_default(&self, uid: &str) -> Result<UserProfile> {
        Ok(self.load(uid)?.unwrap_or_default())
    }

    /// Load (or create), change and save one profile.
    ///
    /// Nothing is saved when `change` fails. The built-in stores hold a
    /// per-user lock for the whole step; this default does not.
    fn modify(
        &self,
        uid: &str,
        change: &mut dyn FnMut(&mut UserProfile) -> Result<()>,
    ) -> Result<UserProfile> {
        let mut profile = self.load_or_default(uid)?;
        change(&mut profile)?;
        self.save(uid, &profile)?;
        Ok(profile)
    }

    /// Replace one algorithm's progress in an existing profile
    fn update_progress(
        &self,
        uid: &str,
        algorithm: Algorithm,
        progress: AlgorithmProgress,
    ) -> Result<()> {
        let mut profile = self
            .load(uid)?
            .ok_or_else(|| TrainerError::ProfileNotFound(uid.to_string()))?;
        profile.progress.insert(algorithm, progress);
        self.save(uid, &profile)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<AHashMap<String, UserProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, uid: &str) -> Result<Option<UserProfile>> {
        validate_user_id(uid)?;
        Ok(self.profiles.read().get(uid).cloned())
    }

    fn save(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        validate_user_id(uid)?;
        self.profiles
            .write()
            .insert(uid.to_string(), profile.clone());
        Ok(())
    }

    fn is_username_taken(&self, username: &str) -> Result<bool> {
        Ok(self
            .profiles
            .read()
            .values()
            .any(|p| p.username == username))
    }

    fn modify(
        &self,
        uid: &str,
        change: &mut dyn FnMut(&mut UserProfile) -> Result<()>,
    ) -> Result<UserProfile> {
        validate_user_id(uid)?;
        let mut profiles = self.profiles.write();
        let mut profile = profiles.get(uid).cloned().unwrap_or_default();
        change(&mut profile)?;
        profiles.insert(uid.to_string(), profile.clone());
        Ok(profile)
    }

    fn update_progress(
        &self,
        uid: &str,
        algorithm: Algorithm,
        progress: AlgorithmProgress,
    ) -> Result<()> {
        validate_user_id(uid)?;
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(uid)
            .ok_or_else(|| TrainerError::ProfileNotFound(uid.to_string()))?;
        profile.progress.insert(algorithm, progress);
        Ok(())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Per-file write locks shared by every store in the process
static FILE_LOCKS: Lazy<Mutex<AHashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(AHashMap::new()));

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn file_lock(path: &Path) -> Arc<Mutex<()>> {
    FILE_LOCKS
        .lock()
        .entry(path.to_path_buf())
        .or_default()
        .clone()
}

/// One pretty-printed `<uid>.json` document per user under a root directory.
///
/// Writers to the same file are serialized within a process. Across
/// processes only the rename is atomic.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        // Canonical so two stores over one directory share file locks
        let root = fs::canonicalize(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, uid: &str) -> PathBuf {
        self.root.join(format!("{}.json", uid))
    }

    fn read_file(path: &Path) -> Result<Option<UserProfile>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no profile at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temp file unique to this call, then rename
    fn write_file(&self, uid: &str, path: &Path, profile: &UserProfile) -> Result<()> {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .root
            .join(format!("{}.json.{}.{}.tmp", uid, std::process::id(), n));
        let written = fs::write(&tmp, serde_json::to_string_pretty(profile)?)
            .and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!("saved profile {}", uid);
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self, uid: &str) -> Result<Option<UserProfile>> {
        validate_user_id(uid)?;
        Self::read_file(&self.path_for(uid))
    }

    fn save(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        validate_user_id(uid)?;
        let path = self.path_for(uid);
        let lock = file_lock(&path);
        let _guard = lock.lock();
        self.write_file(uid, &path, profile)
    }

    fn modify(
        &self,
        uid: &str,
        change: &mut dyn FnMut(&mut UserProfile) -> Result<()>,
    ) -> Result<UserProfile> {
        validate_user_id(uid)?;
        let path = self.path_for(uid);
        let lock = file_lock(&path);
        let _guard = lock.lock();
        let mut profile = Self::read_file(&path)?.unwrap_or_default();
        change(&mut profile)?;
        self.write_file(uid, &path, &profile)?;
        Ok(profile)
    }

    fn update_progress(
        &self,
        uid: &str,
        algorithm: Algorithm,
        progress: AlgorithmProgress,
    ) -> Result<()> {
        validate_user_id(uid)?;
        let path = self.path_for(uid);
        let lock = file_lock(&path);
        let _guard = lock.lock();
        let mut profile = Self::read_file(&path)?
            .ok_or_else(|| TrainerError::ProfileNotFound(uid.to_string()))?;
        profile.progress.insert(algorithm, progress);
        self.write_file(uid, &path, &profile)
    }

    fn is_username_taken(&self, username: &str) -> Result<bool> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let profile = fs::read_to_string(&path)
                .map_err(TrainerError::from)
                .and_then(|text| Ok(serde_json::from_str::<UserProfile>(&text)?));
            match profile {
                Ok(p) if p.username == username => return Ok(true),
                Ok(_) => {}
                Err(e) => warn!("skipping unreadable profile {}: {}", path.display(), e),
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("abc_DEF-123").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("../etc/passwd").is_err());
        assert!(validate_user_id("a b").is_err());
        assert!(validate_user_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.load("u1").unwrap(), None);

        store.save("u1", &UserProfile::new("ada")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.is_username_taken("ada").unwrap());
        assert!(!store.is_username_taken("grace").unwrap());
    }

    #[test]
    fn test_modify_discards_failed_change() {
        let store = MemoryStore::new();
        let err = store
            .modify("u1", &mut |_: &mut UserProfile| Err(TrainerError::GameNotFinished))
            .unwrap_err();
        assert!(matches!(err, TrainerError::GameNotFinished));
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_store_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.save("u1", &UserProfile::new("ada")).unwrap();
        store
            .modify("u1", &mut |p: &mut UserProfile| {
                p.avatar = "owl".to_string();
                Ok(())
            })
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["u1.json".to_string()]);
        assert_eq!(store.load("u1").unwrap().unwrap().avatar, "owl");
    }

    #[test]
    fn test_update_progress_requires_profile() {
        let store = MemoryStore::new();
        let err = store
            .update_progress("ghost", Algorithm::BubbleSort, AlgorithmProgress::default())
            .unwrap_err();
        assert!(matches!(err, TrainerError::ProfileNotFound(_)));
    }
}
