use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    fresh_id, Applicant, Application, ApplicationId, ApplicationStatus, Job, JobDraft, JobId,
    Student, StudentId,
};
use super::posting::{JobPosting, PostingViolation, PublishedJob};
use super::search::{search, JobQuery, SearchParamError, SearchParams};
use super::seed;
use super::session::{Account, AccountKind, AccountSession, ProfileUpdate, Registration, SessionError};
use super::storage::{KeyValueStore, StoreError};
use super::stores::{ApplicationStore, JobStore, StudentDirectory};

/// Date format applications are stamped with.
pub const APPLIED_DATE_FORMAT: &str = "%d/%m/%Y";

/// Knobs applied when the service opens its stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketplaceOptions {
    /// Populate empty namespaces with the demo catalogue.
    pub seed_demo_data: bool,
}

impl Default for MarketplaceOptions {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

/// Result of an application attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Submitted(Application),
    /// The student already has an application for this posting; nothing changed.
    AlreadyApplied,
}

impl ApplyOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ApplyOutcome::Submitted(_))
    }

    pub fn application(&self) -> Option<&Application> {
        match self {
            ApplyOutcome::Submitted(application) => Some(application),
            ApplyOutcome::AlreadyApplied => None,
        }
    }
}

/// Application counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationTally {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl ApplicationTally {
    fn record(&mut self, status: ApplicationStatus) {
        self.total += 1;
        match status {
            ApplicationStatus::Pending => self.pending += 1,
            ApplicationStatus::Approved => self.approved += 1,
            ApplicationStatus::Rejected => self.rejected += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobApplicationCount {
    pub job_id: JobId,
    pub title: String,
    pub posted_date: String,
    pub applications: usize,
}

/// Company overview: postings with their application counts, plus totals by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyDashboard {
    pub active_jobs: usize,
    pub jobs: Vec<JobApplicationCount>,
    pub applications: ApplicationTally,
}

/// A student's application next to the posting it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentApplicationView {
    pub application: Application,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Posting(#[from] PostingViolation),
    #[error(transparent)]
    Query(#[from] SearchParamError),
}

/// Service composing the job, application, and student stores with the signed-in session.
pub struct MarketplaceService<S: ?Sized> {
    jobs: JobStore<S>,
    applications: ApplicationStore<S>,
    students: StudentDirectory<S>,
    session: AccountSession<S>,
}

impl<S> MarketplaceService<S>
where
    S: KeyValueStore + ?Sized + 'static,
{
    pub fn open(storage: Arc<S>, options: MarketplaceOptions) -> Result<Self, StoreError> {
        let seeded = options.seed_demo_data;
        let jobs = JobStore::load(storage.clone(), seeded.then(seed::jobs))?;
        let applications = ApplicationStore::load(storage.clone(), seeded.then(seed::applications))?;
        let students = StudentDirectory::load(storage.clone(), seeded.then(seed::students))?;
        let session = AccountSession::load(storage)?;

        let job_count = jobs.len()?;
        let application_count = applications.list()?.len();
        info!(
            jobs = job_count,
            applications = application_count,
            seeded,
            "marketplace stores loaded"
        );

        Ok(Self::with_stores(jobs, applications, students, session))
    }

    pub fn with_stores(
        jobs: JobStore<S>,
        applications: ApplicationStore<S>,
        students: StudentDirectory<S>,
        session: AccountSession<S>,
    ) -> Self {
        Self {
            jobs,
            applications,
            students,
            session,
        }
    }

    pub fn add_job(&self, draft: JobDraft) -> Result<Job, MarketplaceError> {
        Ok(self.jobs.add_job(draft)?)
    }

    /// Validates and scores a company's posting form, then publishes it.
    pub fn post_job(
        &self,
        posting: JobPosting,
        company: &str,
    ) -> Result<PublishedJob, MarketplaceError> {
        let scored = posting.score(company)?;
        let job = self.jobs.add_job(scored.draft)?;

        Ok(PublishedJob {
            job,
            breakdown: scored.breakdown,
            badges: scored.badges,
        })
    }

    pub fn get_job_by_id(&self, id: &JobId) -> Result<Option<Job>, MarketplaceError> {
        Ok(self.jobs.get_job_by_id(id)?)
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>, MarketplaceError> {
        Ok(self.jobs.list()?)
    }

    pub fn search_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, MarketplaceError> {
        let jobs = self.jobs.list()?;
        Ok(search(&jobs, query).into_iter().cloned().collect())
    }

    /// Parses raw query-string or command-line parameters, then searches.
    pub fn search_with_params(&self, params: SearchParams) -> Result<Vec<Job>, MarketplaceError> {
        let query = params.into_query()?;
        self.search_jobs(&query)
    }

    pub fn get_student_by_id(&self, id: &StudentId) -> Result<Option<Student>, MarketplaceError> {
        Ok(self.students.get_student_by_id(id)?)
    }

    pub fn has_applied(&self, job_id: &JobId, student_id: &StudentId) -> Result<bool, MarketplaceError> {
        Ok(self.applications.exists(job_id, student_id)?)
    }

    /// Applies with today's local date.
    pub fn apply_to_job(
        &self,
        job_id: &JobId,
        applicant: &Applicant,
    ) -> Result<ApplyOutcome, MarketplaceError> {
        self.apply_to_job_on(job_id, applicant, Local::now().date_naive())
    }

    /// Records a pending application unless one already exists for this (job, student) pair.
    /// The job id is not checked against the catalogue.
    pub fn apply_to_job_on(
        &self,
        job_id: &JobId,
        applicant: &Applicant,
        today: NaiveDate,
    ) -> Result<ApplyOutcome, MarketplaceError> {
        let application = Application {
            id: ApplicationId(fresh_id()),
            job_id: job_id.clone(),
            student_id: applicant.id.clone(),
            student_name: applicant.name.clone(),
            email: applicant.email.clone(),
            university: applicant.university.clone(),
            course: applicant.course.clone(),
            semester: applicant.semester.clone(),
            applied_date: today.format(APPLIED_DATE_FORMAT).to_string(),
            status: ApplicationStatus::Pending,
        };

        match self.applications.insert_if_absent(application)? {
            Some(stored) => Ok(ApplyOutcome::Submitted(stored)),
            None => {
                info!(job_id = %job_id, student_id = %applicant.id, "duplicate application ignored");
                Ok(ApplyOutcome::AlreadyApplied)
            }
        }
    }

    /// Sets the status of an application whatever its current state.
    pub fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, MarketplaceError> {
        let Some((previous, updated)) = self.applications.set_status(id, status)? else {
            return Ok(None);
        };

        if previous.is_terminal() && previous != status {
            warn!(
                application_id = %id,
                from = previous.label(),
                to = status.label(),
                "status changed after a final decision"
            );
        } else {
            info!(application_id = %id, from = previous.label(), to = status.label(), "application status updated");
        }

        Ok(Some(updated))
    }

    pub fn approve_application(&self, id: &ApplicationId) -> Result<Option<Application>, MarketplaceError> {
        self.update_application_status(id, ApplicationStatus::Approved)
    }

    pub fn reject_application(&self, id: &ApplicationId) -> Result<Option<Application>, MarketplaceError> {
        self.update_application_status(id, ApplicationStatus::Rejected)
    }

    /// Withdraws an application. Callers offer this only while the application is pending;
    /// the state is not checked here.
    pub fn cancel_application(&self, id: &ApplicationId) -> Result<Option<Application>, MarketplaceError> {
        let removed = self.applications.remove(id)?;

        if let Some(application) = &removed {
            if application.status.is_terminal() {
                warn!(
                    application_id = %id,
                    status = application.status.label(),
                    "cancelled an application that was already decided"
                );
            } else {
                info!(application_id = %id, "application cancelled");
            }
        }

        Ok(removed)
    }

    pub fn get_application(&self, id: &ApplicationId) -> Result<Option<Application>, MarketplaceError> {
        Ok(self.applications.get(id)?)
    }

    pub fn get_applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, MarketplaceError> {
        Ok(self.applications.by_job(job_id)?)
    }

    pub fn get_applications_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Application>, MarketplaceError> {
        Ok(self.applications.by_student(student_id)?)
    }

    /// All applications, optionally narrowed to one status.
    pub fn get_applications_by_status(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, MarketplaceError> {
        let mut applications = self.applications.list()?;
        if let Some(status) = status {
            applications.retain(|application| application.status == status);
        }
        Ok(applications)
    }

    /// A student's applications joined with their postings; postings that no longer resolve
    /// are left empty.
    pub fn student_applications(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<StudentApplicationView>, MarketplaceError> {
        let jobs = self.jobs.list()?;
        let views = self
            .applications
            .by_student(student_id)?
            .into_iter()
            .map(|application| StudentApplicationView {
                job: jobs.iter().find(|job| job.id == application.job_id).cloned(),
                status_label: application.status.student_label(),
                application,
            })
            .collect();
        Ok(views)
    }

    pub fn company_dashboard(&self) -> Result<CompanyDashboard, MarketplaceError> {
        let jobs = self.jobs.list()?;
        let applications = self.applications.list()?;

        let mut tally = ApplicationTally::default();
        for application in &applications {
            tally.record(application.status);
        }

        let rows: Vec<JobApplicationCount> = jobs
            .into_iter()
            .map(|job| JobApplicationCount {
                applications: applications
                    .iter()
                    .filter(|application| application.job_id == job.id)
                    .count(),
                job_id: job.id,
                title: job.title,
                posted_date: job.posted_date,
            })
            .collect();

        Ok(CompanyDashboard {
            active_jobs: rows.len(),
            jobs: rows,
            applications: tally,
        })
    }

    /// Registers and signs in; student accounts also get a directory profile.
    pub fn register(&self, registration: Registration) -> Result<Account, MarketplaceError> {
        let account = self.session.register(registration)?;
        if let Some(student) = account.student_profile() {
            self.students.upsert(student)?;
        }
        Ok(account)
    }

    pub fn login(&self, email: &str, kind: AccountKind) -> Result<Account, MarketplaceError> {
        Ok(self.session.login(email, kind)?)
    }

    pub fn logout(&self) -> Result<(), MarketplaceError> {
        Ok(self.session.logout()?)
    }

    pub fn current_account(&self) -> Result<Option<Account>, MarketplaceError> {
        Ok(self.session.current()?)
    }

    /// Edits the signed-in account; student edits are mirrored into the directory profile.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Account, MarketplaceError> {
        let directory_update = match &update {
            ProfileUpdate::Student(fields) => Some(fields.clone()),
            ProfileUpdate::Company(_) => None,
        };

        let account = self.session.update_profile(update)?;

        if let Some(fields) = directory_update {
            let id = StudentId(account.id.clone());
            if self.students.apply_update(&id, fields.clone())?.is_none() {
                if let Some(mut student) = account.student_profile() {
                    student.apply(fields);
                    self.students.upsert(student)?;
                }
            }
        }

        Ok(account)
    }
}
