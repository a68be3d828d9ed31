use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Applicant, ApplicationId, ApplicationStatus, JobId, StudentId};
use super::posting::JobPosting;
use super::search::SearchParams;
use super::service::{ApplyOutcome, MarketplaceError, MarketplaceService};
use super::session::{AccountKind, Registration, SessionError};
use super::storage::KeyValueStore;

type SharedService<S> = Arc<MarketplaceService<S>>;

/// Posting form plus the publishing company. Without `company`, the signed-in account is used.
#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(flatten)]
    pub posting: JobPosting,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub kind: AccountKind,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ApplicationStatus,
}

/// Router exposing the job catalogue, applications, the account session, and the company dashboard.
pub fn marketplace_router<S>(service: SharedService<S>) -> Router
where
    S: KeyValueStore + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/jobs", get(search_handler::<S>).post(post_job_handler::<S>))
        .route("/api/v1/jobs/:job_id", get(job_handler::<S>))
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(job_applications_handler::<S>).post(apply_handler::<S>),
        )
        .route("/api/v1/students/:student_id", get(student_handler::<S>))
        .route(
            "/api/v1/students/:student_id/applications",
            get(student_applications_handler::<S>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(status_handler::<S>),
        )
        .route(
            "/api/v1/applications/:application_id",
            delete(cancel_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route(
            "/api/v1/session",
            get(session_handler::<S>)
                .post(login_handler::<S>)
                .delete(logout_handler::<S>),
        )
        .route("/api/v1/session/register", post(register_handler::<S>))
        .with_state(service)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (status, Json(payload)).into_response()
}

fn not_found(entity: &str, id: &str) -> Response {
    error_body(StatusCode::NOT_FOUND, format!("{entity} '{id}' not found"))
}

fn failure(error: MarketplaceError) -> Response {
    match error {
        MarketplaceError::Posting(violation) => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, violation.to_string())
        }
        MarketplaceError::Query(error) => error_body(StatusCode::BAD_REQUEST, error.to_string()),
        MarketplaceError::Session(SessionError::NotAuthenticated) => {
            error_body(StatusCode::UNAUTHORIZED, "sign in to continue")
        }
        MarketplaceError::Session(error @ SessionError::KindMismatch { .. }) => {
            error_body(StatusCode::BAD_REQUEST, error.to_string())
        }
        other => {
            tracing::error!(error = %other, "marketplace request failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

pub(crate) async fn search_handler<S>(
    State(service): State<SharedService<S>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.search_with_params(params) {
        Ok(jobs) => {
            let payload = json!({
                "total": jobs.len(),
                "jobs": jobs,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn post_job_handler<S>(
    State(service): State<SharedService<S>>,
    Json(request): Json<PostJobRequest>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let company = match request.company.filter(|company| !company.trim().is_empty()) {
        Some(company) => company,
        None => match service.current_account() {
            Ok(Some(account)) => account.display_company().to_string(),
            Ok(None) => return failure(SessionError::NotAuthenticated.into()),
            Err(error) => return failure(error),
        },
    };

    match service.post_job(request.posting, &company) {
        Ok(published) => (StatusCode::CREATED, Json(published)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn job_handler<S>(
    State(service): State<SharedService<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.get_job_by_id(&JobId(job_id.clone())) {
        Ok(Some(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(None) => not_found("job", &job_id),
        Err(error) => failure(error),
    }
}

pub(crate) async fn job_applications_handler<S>(
    State(service): State<SharedService<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.get_applications_by_job(&JobId(job_id)) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn apply_handler<S>(
    State(service): State<SharedService<S>>,
    Path(job_id): Path<String>,
    Json(applicant): Json<Applicant>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.apply_to_job(&JobId(job_id), &applicant) {
        Ok(ApplyOutcome::Submitted(application)) => {
            (StatusCode::CREATED, Json(application)).into_response()
        }
        Ok(ApplyOutcome::AlreadyApplied) => error_body(
            StatusCode::CONFLICT,
            "student already applied to this job",
        ),
        Err(error) => failure(error),
    }
}

pub(crate) async fn student_handler<S>(
    State(service): State<SharedService<S>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.get_student_by_id(&StudentId(student_id.clone())) {
        Ok(Some(student)) => (StatusCode::OK, Json(student)).into_response(),
        Ok(None) => not_found("student", &student_id),
        Err(error) => failure(error),
    }
}

pub(crate) async fn student_applications_handler<S>(
    State(service): State<SharedService<S>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.student_applications(&StudentId(student_id)) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<SharedService<S>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.update_application_status(&ApplicationId(application_id.clone()), request.status) {
        Ok(Some(application)) => (StatusCode::OK, Json(application)).into_response(),
        Ok(None) => not_found("application", &application_id),
        Err(error) => failure(error),
    }
}

pub(crate) async fn cancel_handler<S>(
    State(service): State<SharedService<S>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.cancel_application(&ApplicationId(application_id.clone())) {
        Ok(Some(application)) => (StatusCode::OK, Json(application)).into_response(),
        Ok(None) => not_found("application", &application_id),
        Err(error) => failure(error),
    }
}

pub(crate) async fn dashboard_handler<S>(State(service): State<SharedService<S>>) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.company_dashboard() {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn session_handler<S>(State(service): State<SharedService<S>>) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.current_account() {
        Ok(Some(account)) => (StatusCode::OK, Json(account)).into_response(),
        Ok(None) => failure(SessionError::NotAuthenticated.into()),
        Err(error) => failure(error),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<SharedService<S>>,
    Json(registration): Json<Registration>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.register(registration) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn login_handler<S>(
    State(service): State<SharedService<S>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.login(&request.email, request.kind) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn logout_handler<S>(State(service): State<SharedService<S>>) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    match service.logout() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => failure(error),
    }
}
