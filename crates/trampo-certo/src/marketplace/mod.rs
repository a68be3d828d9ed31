//! Student/company job marketplace: postings with a flexibility score, faceted search, and
//! the application workflow between students and companies.
//!
//! Records live in [`stores`] backed by a [`storage::KeyValueStore`]; the
//! [`service::MarketplaceService`] composes them and [`router::marketplace_router`] exposes
//! the service over HTTP.

pub mod domain;
pub mod flex_score;
pub mod posting;
pub mod router;
pub mod search;
pub mod seed;
pub mod service;
pub mod session;
pub mod storage;
pub mod stores;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, Application, ApplicationId, ApplicationStatus, Job, JobDraft, JobId, Modality,
    Student, StudentId, StudentProfileUpdate,
};
pub use flex_score::{
    accessibility_badges, flex_score, score_breakdown, FlexLevel, FlexScoreBreakdown,
    FlexScoreInput,
};
pub use posting::{AccessibilityDocument, JobPosting, PostingViolation, PublishedJob};
pub use router::marketplace_router;
pub use search::{
    search, JobFilters, JobQuery, SearchParamError, SearchParams, SortOrder, WorkloadBucket,
};
pub use service::{
    ApplicationTally, ApplyOutcome, CompanyDashboard, MarketplaceError, MarketplaceOptions,
    MarketplaceService,
};
pub use session::{Account, AccountKind, ProfileUpdate, Registration, SessionError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
