use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::error::error_chain_fmt;

/// Where a flag lives. Session flags die with the process, permanent ones
/// survive restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Session,
    Permanent,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Session => "session",
            Scope::Permanent => "permanent",
        }
    }
}

/// The two flags the widget knows about, each pinned to its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    SubscribedThisSession,
    PermanentlyDismissed,
}

impl Flag {
    pub fn scope(&self) -> Scope {
        match self {
            Flag::SubscribedThisSession => Scope::Session,
            Flag::PermanentlyDismissed => Scope::Permanent,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Flag::SubscribedThisSession => "ghost-signup-subscribed",
            Flag::PermanentlyDismissed => "ghost-signup-dismissed",
        }
    }
}

const SET_VALUE: &str = "true";

#[derive(thiserror::Error)]
pub enum StorageError {
    #[error("Storage is not available in this environment.")]
    Unavailable,
    #[error("Failed to access the storage file.")]
    Io(#[from] std::io::Error),
    #[error("The storage file does not hold a JSON object of strings.")]
    Corrupt(#[from] serde_json::Error),
}

impl std::fmt::Debug for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// A string key-value area in the shape of browser Web Storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        items.remove(key);
        Ok(())
    }
}

/// Keeps every item in one JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Unavailable)?;
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(
                    error = ?e,
                    path = %self.path.display(),
                    "Discarding unreadable storage file"
                );
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.remove(key);
        })
    }
}

/// Stand-in for a host that has storage switched off.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Boolean flags on top of a session store and a permanent store.
///
/// Never fails: an unreadable store reads as `false` and a write that
/// cannot land is dropped with a warning.
#[derive(Clone)]
pub struct FlagStorage {
    session: Arc<dyn KeyValueStore>,
    permanent: Arc<dyn KeyValueStore>,
}

impl FlagStorage {
    pub fn new(session: Arc<dyn KeyValueStore>, permanent: Arc<dyn KeyValueStore>) -> Self {
        Self { session, permanent }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableStore), Arc::new(UnavailableStore))
    }

    fn store(&self, scope: Scope) -> &dyn KeyValueStore {
        match scope {
            Scope::Session => self.session.as_ref(),
            Scope::Permanent => self.permanent.as_ref(),
        }
    }

    pub fn get(&self, scope: Scope, key: &str) -> bool {
        match self.store(scope).get_item(key) {
            Ok(value) => value.as_deref() == Some(SET_VALUE),
            Err(e) => {
                tracing::warn!(error = ?e, scope = scope.as_str(), key, "Failed to read flag");
                false
            }
        }
    }

    pub fn set(&self, scope: Scope, key: &str) {
        if let Err(e) = self.store(scope).set_item(key, SET_VALUE) {
            tracing::warn!(error = ?e, scope = scope.as_str(), key, "Failed to write flag");
        }
    }

    pub fn clear(&self, scope: Scope, key: &str) {
        if let Err(e) = self.store(scope).remove_item(key) {
            tracing::warn!(error = ?e, scope = scope.as_str(), key, "Failed to clear flag");
        }
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        self.get(flag.scope(), flag.key())
    }

    pub fn raise(&self, flag: Flag) {
        self.set(flag.scope(), flag.key())
    }

    pub fn lower(&self, flag: Flag) {
        self.clear(flag.scope(), flag.key())
    }
}
