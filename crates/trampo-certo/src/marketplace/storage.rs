use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Namespace holding the posting catalogue.
pub const JOBS_NAMESPACE: &str = "trampo_certo_jobs";
/// Namespace holding every application.
pub const APPLICATIONS_NAMESPACE: &str = "trampo_certo_applications";
/// Namespace holding student profiles.
pub const STUDENTS_NAMESPACE: &str = "trampo_certo_students";
/// Namespace holding the signed-in account.
pub const SESSION_NAMESPACE: &str = "user";

/// Durable key-value layer. Each store owns one namespace and rewrites it wholesale.
pub trait KeyValueStore: Send + Sync {
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, namespace: &str, payload: &str) -> Result<(), StoreError>;
    fn remove(&self, namespace: &str) -> Result<(), StoreError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure for '{namespace}': {source}")]
    Io {
        namespace: String,
        #[source]
        source: io::Error,
    },
    #[error("stored snapshot for '{namespace}' is not valid JSON: {source}")]
    Corrupt {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to encode snapshot for '{namespace}': {source}")]
    Encode {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub(crate) fn read_snapshot<S, T>(storage: &S, namespace: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match storage.load(namespace)? {
        Some(payload) => serde_json::from_str(&payload)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                namespace: namespace.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub(crate) fn write_snapshot<S, T>(storage: &S, namespace: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        namespace: namespace.to_string(),
        source,
    })?;
    storage.save(namespace, &payload)
}

/// Process-local storage, the default for development and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> Vec<String> {
        let guard = self.entries.lock().unwrap_or_else(|err| err.into_inner());
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(namespace).cloned())
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StoreError> {
        self.lock()?
            .insert(namespace.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        self.lock()?.remove(namespace);
        Ok(())
    }
}

/// One JSON file per namespace under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            namespace: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.root.join(format!("{namespace}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(namespace)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StoreError> {
        let target = self.path_for(namespace);
        let staging = self.root.join(format!("{namespace}.json.tmp"));
        let io_error = |source| StoreError::Io {
            namespace: namespace.to_string(),
            source,
        };

        fs::write(&staging, payload).map_err(io_error)?;
        fs::rename(&staging, &target).map_err(io_error)
    }

    fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(namespace)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }
}
