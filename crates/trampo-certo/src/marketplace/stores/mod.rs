//! In-memory collections that flush a full snapshot to their namespace after each mutation.

mod applications;
mod jobs;
mod students;

pub use applications::ApplicationStore;
pub use jobs::JobStore;
pub use students::StudentDirectory;

use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::storage::{read_snapshot, write_snapshot, KeyValueStore, StoreError};

/// Collection contents at load time: what was persisted, or the seed when nothing was.
fn restore<S, T>(storage: &S, namespace: &str, seed: Option<Vec<T>>) -> Result<Vec<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    if let Some(records) = read_snapshot::<S, Vec<T>>(storage, namespace)? {
        debug!(namespace, count = records.len(), "restored snapshot");
        return Ok(records);
    }

    match seed {
        Some(records) => {
            write_snapshot(storage, namespace, &records)?;
            debug!(namespace, count = records.len(), "seeded empty namespace");
            Ok(records)
        }
        None => Ok(Vec::new()),
    }
}

fn lock<'a, T>(records: &'a Mutex<Vec<T>>, namespace: &str) -> Result<MutexGuard<'a, Vec<T>>, StoreError> {
    records
        .lock()
        .map_err(|_| StoreError::Unavailable(format!("{namespace} collection lock poisoned")))
}
