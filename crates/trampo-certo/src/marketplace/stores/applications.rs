use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::{lock, restore};
use crate::marketplace::domain::{Application, ApplicationId, ApplicationStatus, JobId, StudentId};
use crate::marketplace::storage::{
    write_snapshot, KeyValueStore, StoreError, APPLICATIONS_NAMESPACE,
};

/// Every application, in submission order.
pub struct ApplicationStore<S: ?Sized> {
    storage: Arc<S>,
    records: Mutex<Vec<Application>>,
}

impl<S> ApplicationStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn load(storage: Arc<S>, seed: Option<Vec<Application>>) -> Result<Self, StoreError> {
        let records = restore(storage.as_ref(), APPLICATIONS_NAMESPACE, seed)?;
        Ok(Self {
            storage,
            records: Mutex::new(records),
        })
    }

    /// Appends a record unless its (job, student) pair is already present, checking and pushing
    /// under one lock. Returns `None` for a duplicate. The push is rolled back if the flush fails.
    pub fn insert_if_absent(
        &self,
        application: Application,
    ) -> Result<Option<Application>, StoreError> {
        let mut records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        if records.iter().any(|app| {
            app.job_id == application.job_id && app.student_id == application.student_id
        }) {
            return Ok(None);
        }

        records.push(application.clone());
        if let Err(error) = self.flush(&records) {
            records.pop();
            return Err(error);
        }

        info!(
            application_id = %application.id,
            job_id = %application.job_id,
            student_id = %application.student_id,
            "application recorded"
        );
        Ok(Some(application))
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        Ok(records.iter().find(|app| &app.id == id).cloned())
    }

    pub fn list(&self) -> Result<Vec<Application>, StoreError> {
        Ok(lock(&self.records, APPLICATIONS_NAMESPACE)?.clone())
    }

    pub fn by_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        let records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        Ok(records
            .iter()
            .filter(|app| &app.job_id == job_id)
            .cloned()
            .collect())
    }

    pub fn by_student(&self, student_id: &StudentId) -> Result<Vec<Application>, StoreError> {
        let records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        Ok(records
            .iter()
            .filter(|app| &app.student_id == student_id)
            .cloned()
            .collect())
    }

    pub fn exists(&self, job_id: &JobId, student_id: &StudentId) -> Result<bool, StoreError> {
        let records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        Ok(records
            .iter()
            .any(|app| &app.job_id == job_id && &app.student_id == student_id))
    }

    /// Overwrites the status field and returns the previous and updated record.
    pub fn set_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<(ApplicationStatus, Application)>, StoreError> {
        let mut records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        let Some(record) = records.iter_mut().find(|app| &app.id == id) else {
            debug!(application_id = %id, "status update for unknown application");
            return Ok(None);
        };

        let previous = record.status;
        record.status = status;
        let updated = record.clone();
        if let Err(error) = self.flush(&records) {
            if let Some(record) = records.iter_mut().find(|app| &app.id == id) {
                record.status = previous;
            }
            return Err(error);
        }

        Ok(Some((previous, updated)))
    }

    /// Deletes a record and returns it.
    pub fn remove(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let mut records = lock(&self.records, APPLICATIONS_NAMESPACE)?;
        let Some(index) = records.iter().position(|app| &app.id == id) else {
            debug!(application_id = %id, "removal of unknown application");
            return Ok(None);
        };

        let removed = records.remove(index);
        if let Err(error) = self.flush(&records) {
            records.insert(index, removed);
            return Err(error);
        }
        Ok(Some(removed))
    }

    fn flush(&self, records: &[Application]) -> Result<(), StoreError> {
        write_snapshot(self.storage.as_ref(), APPLICATIONS_NAMESPACE, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::seed;
    use crate::marketplace::storage::{read_snapshot, MemoryStore};

    fn store() -> (ApplicationStore<MemoryStore>, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let store =
            ApplicationStore::load(storage.clone(), Some(seed::applications())).expect("load");
        (store, storage)
    }

    #[test]
    fn projections_keep_submission_order() {
        let (store, _) = store();
        let ids: Vec<String> = store
            .by_job(&JobId::from("1"))
            .expect("by job")
            .into_iter()
            .map(|app| app.id.0)
            .collect();
        assert_eq!(ids, vec!["app1", "app2", "app3"]);

        let mine = store.by_student(&StudentId::from("student4")).expect("by student");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].job_id, JobId::from("2"));
    }

    #[test]
    fn set_status_reports_previous_state_and_flushes() {
        let (store, storage) = store();
        let (previous, updated) = store
            .set_status(&ApplicationId::from("app3"), ApplicationStatus::Rejected)
            .expect("update")
            .expect("record exists");

        assert_eq!(previous, ApplicationStatus::Approved);
        assert_eq!(updated.status, ApplicationStatus::Rejected);

        let persisted: Vec<Application> = read_snapshot(storage.as_ref(), APPLICATIONS_NAMESPACE)
            .expect("read")
            .expect("present");
        let app3 = persisted
            .iter()
            .find(|app| app.id.0 == "app3")
            .expect("app3 persisted");
        assert_eq!(app3.status, ApplicationStatus::Rejected);
    }

    #[test]
    fn insert_if_absent_skips_existing_pair() {
        let (store, _) = store();
        let mut duplicate = store
            .get(&ApplicationId::from("app1"))
            .expect("get")
            .expect("seeded");
        duplicate.id = ApplicationId::from("app-dup");

        assert!(store.insert_if_absent(duplicate).expect("insert").is_none());
        assert!(store
            .get(&ApplicationId::from("app-dup"))
            .expect("get")
            .is_none());
    }

    #[test]
    fn remove_deletes_exactly_one_record() {
        let (store, _) = store();
        let before = store.list().expect("list").len();

        let removed = store
            .remove(&ApplicationId::from("app2"))
            .expect("remove")
            .expect("record exists");
        assert_eq!(removed.student_id, StudentId::from("student2"));
        assert_eq!(store.list().expect("list").len(), before - 1);
        assert!(store
            .remove(&ApplicationId::from("app2"))
            .expect("remove")
            .is_none());
        assert!(!store
            .exists(&JobId::from("1"), &StudentId::from("student2"))
            .expect("exists"));
    }
}
