use std::sync::{Arc, Mutex};

use tracing::info;

use super::{lock, restore};
use crate::marketplace::domain::{fresh_id, Job, JobDraft, JobId, JUST_POSTED_LABEL};
use crate::marketplace::storage::{write_snapshot, KeyValueStore, StoreError, JOBS_NAMESPACE};

/// Posting catalogue, newest first. Postings are never edited or removed.
pub struct JobStore<S: ?Sized> {
    storage: Arc<S>,
    records: Mutex<Vec<Job>>,
}

impl<S> JobStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn load(storage: Arc<S>, seed: Option<Vec<Job>>) -> Result<Self, StoreError> {
        let records = restore(storage.as_ref(), JOBS_NAMESPACE, seed)?;
        Ok(Self {
            storage,
            records: Mutex::new(records),
        })
    }

    /// Publishes a draft at the head of the catalogue and returns the stored posting.
    pub fn add_job(&self, draft: JobDraft) -> Result<Job, StoreError> {
        let job = draft.into_job(JobId(fresh_id()), JUST_POSTED_LABEL);

        let mut records = lock(&self.records, JOBS_NAMESPACE)?;
        records.insert(0, job.clone());
        if let Err(error) = write_snapshot(self.storage.as_ref(), JOBS_NAMESPACE, &*records) {
            records.remove(0);
            return Err(error);
        }

        info!(job_id = %job.id, flex_score = job.flex_score, "job posted");
        Ok(job)
    }

    pub fn get_job_by_id(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let records = lock(&self.records, JOBS_NAMESPACE)?;
        Ok(records.iter().find(|job| &job.id == id).cloned())
    }

    pub fn list(&self) -> Result<Vec<Job>, StoreError> {
        Ok(lock(&self.records, JOBS_NAMESPACE)?.clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.records, JOBS_NAMESPACE)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
