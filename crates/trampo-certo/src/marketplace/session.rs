//! Mock sign-in: no credential checks, one signed-in account persisted under its own namespace.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{fresh_id, Student, StudentId, StudentProfileUpdate};
use super::storage::{read_snapshot, write_snapshot, KeyValueStore, StoreError, SESSION_NAMESPACE};

/// Which side of the marketplace an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Student,
    Company,
}

impl AccountKind {
    pub const fn label(self) -> &'static str {
        match self {
            AccountKind::Student => "student",
            AccountKind::Company => "company",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind-specific part of an account, tagged the way the stored `user` record is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountProfile {
    Student(StudentDetails),
    Company(CompanyDetails),
}

impl AccountProfile {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountProfile::Student(_) => AccountKind::Student,
            AccountProfile::Company(_) => AccountKind::Company,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(flatten)]
    pub profile: AccountProfile,
}

impl Account {
    pub fn kind(&self) -> AccountKind {
        self.profile.kind()
    }

    /// Name shown as the publisher of a posting.
    pub fn display_company(&self) -> &str {
        match &self.profile {
            AccountProfile::Company(details) => details
                .company_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(&self.name),
            AccountProfile::Student(_) => &self.name,
        }
    }

    /// Directory profile for a student account.
    pub fn student_profile(&self) -> Option<Student> {
        match &self.profile {
            AccountProfile::Student(details) => Some(Student {
                id: StudentId(self.id.clone()),
                name: self.name.clone(),
                email: self.email.clone(),
                university: details.university.clone(),
                course: details.course.clone(),
                semester: details.semester.clone(),
                phone: details.phone.clone(),
                bio: None,
            }),
            AccountProfile::Company(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRegistration {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub cnpj: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Sign-up payload, one variant per account kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Registration {
    Student(StudentRegistration),
    Company(CompanyRegistration),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Profile edit payload; the variant must match the signed-in account's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProfileUpdate {
    Student(StudentProfileUpdate),
    Company(CompanyProfileUpdate),
}

impl ProfileUpdate {
    pub fn kind(&self) -> AccountKind {
        match self {
            ProfileUpdate::Student(_) => AccountKind::Student,
            ProfileUpdate::Company(_) => AccountKind::Company,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no account is signed in")]
    NotAuthenticated,
    #[error("cannot apply a {update} profile update to a {account} account")]
    KindMismatch {
        account: AccountKind,
        update: AccountKind,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn overwrite(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

/// Holder of the signed-in account.
pub struct AccountSession<S: ?Sized> {
    storage: Arc<S>,
    current: Mutex<Option<Account>>,
}

impl<S> AccountSession<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn load(storage: Arc<S>) -> Result<Self, StoreError> {
        let current = read_snapshot::<S, Account>(storage.as_ref(), SESSION_NAMESPACE)?;
        Ok(Self {
            storage,
            current: Mutex::new(current),
        })
    }

    pub fn current(&self) -> Result<Option<Account>, SessionError> {
        Ok(self.lock()?.clone())
    }

    pub fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.lock()?.is_some())
    }

    /// Creates an account with a fresh identifier and signs it in.
    pub fn register(&self, registration: Registration) -> Result<Account, SessionError> {
        let account = match registration {
            Registration::Student(form) => Account {
                id: fresh_id(),
                email: form.email,
                name: form.name,
                profile: AccountProfile::Student(StudentDetails {
                    university: form.university,
                    course: form.course,
                    semester: form.semester,
                    phone: form.phone,
                }),
            },
            Registration::Company(form) => Account {
                id: fresh_id(),
                email: form.email,
                name: form.name,
                profile: AccountProfile::Company(CompanyDetails {
                    company_name: Some(form.company_name),
                    cnpj: Some(form.cnpj),
                    phone: form.phone,
                    website: form.website,
                    description: form.description,
                }),
            },
        };

        self.sign_in(account)
    }

    /// Signs in without checking credentials; the display name is the e-mail's local part.
    pub fn login(&self, email: &str, kind: AccountKind) -> Result<Account, SessionError> {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let profile = match kind {
            AccountKind::Student => AccountProfile::Student(StudentDetails::default()),
            AccountKind::Company => AccountProfile::Company(CompanyDetails::default()),
        };

        self.sign_in(Account {
            id: fresh_id(),
            email: email.to_string(),
            name,
            profile,
        })
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Account, SessionError> {
        let mut current = self.lock()?;
        let mut account = current.clone().ok_or(SessionError::NotAuthenticated)?;

        match (&mut account.profile, update) {
            (AccountProfile::Student(details), ProfileUpdate::Student(update)) => {
                if let Some(name) = update.name {
                    account.name = name;
                }
                if let Some(email) = update.email {
                    account.email = email;
                }
                overwrite(&mut details.university, update.university);
                overwrite(&mut details.course, update.course);
                overwrite(&mut details.semester, update.semester);
                overwrite(&mut details.phone, update.phone);
            }
            (AccountProfile::Company(details), ProfileUpdate::Company(update)) => {
                if let Some(name) = update.name {
                    account.name = name;
                }
                if let Some(email) = update.email {
                    account.email = email;
                }
                overwrite(&mut details.company_name, update.company_name);
                overwrite(&mut details.cnpj, update.cnpj);
                overwrite(&mut details.phone, update.phone);
                overwrite(&mut details.website, update.website);
                overwrite(&mut details.description, update.description);
            }
            (profile, update) => {
                return Err(SessionError::KindMismatch {
                    account: profile.kind(),
                    update: update.kind(),
                });
            }
        }

        write_snapshot(self.storage.as_ref(), SESSION_NAMESPACE, &account)?;
        *current = Some(account.clone());
        Ok(account)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.lock()?;
        self.storage.remove(SESSION_NAMESPACE)?;
        if let Some(account) = current.take() {
            info!(account_id = %account.id, "signed out");
        }
        Ok(())
    }

    fn sign_in(&self, account: Account) -> Result<Account, SessionError> {
        let mut current = self.lock()?;
        write_snapshot(self.storage.as_ref(), SESSION_NAMESPACE, &account)?;
        info!(account_id = %account.id, kind = %account.kind(), "signed in");
        *current = Some(account.clone());
        Ok(account)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Account>>, SessionError> {
        self.current.lock().map_err(|_| {
            SessionError::Store(StoreError::Unavailable(
                "session lock poisoned".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::storage::MemoryStore;

    fn company_registration() -> Registration {
        Registration::Company(CompanyRegistration {
            name: "Joana".to_string(),
            email: "rh@techcorp.com".to_string(),
            company_name: "TechCorp Inovação".to_string(),
            cnpj: "00.000.000/0001-00".to_string(),
            phone: None,
            website: Some("https://techcorp.example".to_string()),
            description: None,
        })
    }

    #[test]
    fn login_uses_local_part_as_name_and_persists() {
        let storage = Arc::new(MemoryStore::new());
        let session = AccountSession::load(storage.clone()).expect("load");
        assert!(!session.is_authenticated().expect("state"));

        let account = session
            .login("ana.silva@email.com", AccountKind::Student)
            .expect("login");
        assert_eq!(account.name, "ana.silva");
        assert_eq!(account.kind(), AccountKind::Student);

        let restored = AccountSession::load(storage).expect("reload");
        assert_eq!(restored.current().expect("current"), Some(account));
    }

    #[test]
    fn stored_account_uses_flat_type_tag() {
        let storage = Arc::new(MemoryStore::new());
        let session = AccountSession::load(storage.clone()).expect("load");
        session.register(company_registration()).expect("register");

        let raw = storage
            .load(SESSION_NAMESPACE)
            .expect("load")
            .expect("stored");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["type"], "company");
        assert_eq!(value["companyName"], "TechCorp Inovação");
    }

    #[test]
    fn update_profile_requires_matching_kind() {
        let storage = Arc::new(MemoryStore::new());
        let session = AccountSession::load(storage).expect("load");
        let account = session.register(company_registration()).expect("register");
        assert_eq!(account.display_company(), "TechCorp Inovação");

        match session.update_profile(ProfileUpdate::Student(StudentProfileUpdate::default())) {
            Err(SessionError::KindMismatch { account, update }) => {
                assert_eq!(account, AccountKind::Company);
                assert_eq!(update, AccountKind::Student);
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }

        let updated = session
            .update_profile(ProfileUpdate::Company(CompanyProfileUpdate {
                phone: Some("(11) 3333-4444".to_string()),
                ..CompanyProfileUpdate::default()
            }))
            .expect("update");
        match updated.profile {
            AccountProfile::Company(details) => {
                assert_eq!(details.phone.as_deref(), Some("(11) 3333-4444"));
                assert_eq!(details.cnpj.as_deref(), Some("00.000.000/0001-00"));
            }
            other => panic!("expected company profile, got {other:?}"),
        }
    }

    #[test]
    fn logout_clears_persisted_account() {
        let storage = Arc::new(MemoryStore::new());
        let session = AccountSession::load(storage.clone()).expect("load");
        session
            .login("rh@agencia.com", AccountKind::Company)
            .expect("login");

        session.logout().expect("logout");
        assert!(session.current().expect("current").is_none());
        assert!(storage.load(SESSION_NAMESPACE).expect("load").is_none());
        assert!(matches!(
            session.update_profile(ProfileUpdate::Company(CompanyProfileUpdate::default())),
            Err(SessionError::NotAuthenticated)
        ));
    }

    /// Keeps snapshots but refuses to delete them.
    struct UndeletableStore(MemoryStore);

    impl KeyValueStore for UndeletableStore {
        fn load(&self, namespace: &str) -> Result<Option<String>, StoreError> {
            self.0.load(namespace)
        }

        fn save(&self, namespace: &str, payload: &str) -> Result<(), StoreError> {
            self.0.save(namespace, payload)
        }

        fn remove(&self, namespace: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(format!("{namespace} cannot be removed")))
        }
    }

    #[test]
    fn failed_logout_keeps_the_account_signed_in() {
        let storage = Arc::new(UndeletableStore(MemoryStore::new()));
        let session = AccountSession::load(storage.clone()).expect("load");
        session
            .login("rh@agencia.com", AccountKind::Company)
            .expect("login");

        assert!(matches!(session.logout(), Err(SessionError::Store(_))));
        assert!(session.current().expect("current").is_some());
        assert!(storage.load(SESSION_NAMESPACE).expect("load").is_some());
    }
}
