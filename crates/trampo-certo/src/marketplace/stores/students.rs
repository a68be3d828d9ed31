use std::sync::{Arc, Mutex};

use tracing::info;

use super::{lock, restore};
use crate::marketplace::domain::{Student, StudentId, StudentProfileUpdate};
use crate::marketplace::storage::{write_snapshot, KeyValueStore, StoreError, STUDENTS_NAMESPACE};

/// Student profiles keyed by identifier.
pub struct StudentDirectory<S: ?Sized> {
    storage: Arc<S>,
    records: Mutex<Vec<Student>>,
}

impl<S> StudentDirectory<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn load(storage: Arc<S>, seed: Option<Vec<Student>>) -> Result<Self, StoreError> {
        let records = restore(storage.as_ref(), STUDENTS_NAMESPACE, seed)?;
        Ok(Self {
            storage,
            records: Mutex::new(records),
        })
    }

    pub fn get_student_by_id(&self, id: &StudentId) -> Result<Option<Student>, StoreError> {
        let records = lock(&self.records, STUDENTS_NAMESPACE)?;
        Ok(records.iter().find(|student| &student.id == id).cloned())
    }

    pub fn list(&self) -> Result<Vec<Student>, StoreError> {
        Ok(lock(&self.records, STUDENTS_NAMESPACE)?.clone())
    }

    /// Inserts a profile, replacing any existing one with the same identifier.
    pub fn upsert(&self, student: Student) -> Result<Student, StoreError> {
        let mut records = lock(&self.records, STUDENTS_NAMESPACE)?;
        let mut candidate = records.clone();
        match candidate.iter_mut().find(|existing| existing.id == student.id) {
            Some(existing) => *existing = student.clone(),
            None => candidate.push(student.clone()),
        }
        write_snapshot(self.storage.as_ref(), STUDENTS_NAMESPACE, &candidate)?;
        *records = candidate;

        info!(student_id = %student.id, "student profile saved");
        Ok(student)
    }

    pub fn apply_update(
        &self,
        id: &StudentId,
        update: StudentProfileUpdate,
    ) -> Result<Option<Student>, StoreError> {
        let mut records = lock(&self.records, STUDENTS_NAMESPACE)?;
        let Some(index) = records.iter().position(|student| &student.id == id) else {
            return Ok(None);
        };

        let mut candidate = records.clone();
        candidate[index].apply(update);
        let updated = candidate[index].clone();
        write_snapshot(self.storage.as_ref(), STUDENTS_NAMESPACE, &candidate)?;
        *records = candidate;
        Ok(Some(updated))
    }
}
