use std::sync::{Arc, Barrier};
use std::thread;

use super::common::*;
use crate::marketplace::domain::{
    ApplicationId, ApplicationStatus, JobId, StudentId, StudentProfileUpdate, JUST_POSTED_LABEL,
};
use crate::marketplace::posting::PostingViolation;
use crate::marketplace::search::{JobQuery, SortOrder};
use crate::marketplace::session::{ProfileUpdate, Registration, StudentRegistration};
use crate::marketplace::storage::StoreError;
use crate::marketplace::{ApplyOutcome, MarketplaceError};

#[test]
fn applying_twice_keeps_a_single_application() {
    let service = empty_service();
    let job = JobId::from("1");
    let student = applicant("student9");

    let first = service
        .apply_to_job_on(&job, &student, today())
        .expect("first apply");
    let second = service
        .apply_to_job_on(&job, &student, today())
        .expect("second apply");

    assert!(first.is_submitted());
    assert_eq!(second, ApplyOutcome::AlreadyApplied);
    assert_eq!(service.get_applications_by_job(&job).expect("list").len(), 1);
}

#[test]
fn concurrent_applications_for_one_pair_store_a_single_record() {
    let service = Arc::new(empty_service());
    let job = JobId::from("2");

    for round in 0..200 {
        let student = applicant(&format!("racer{round}"));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                let job = job.clone();
                let student = student.clone();
                thread::spawn(move || {
                    barrier.wait();
                    service
                        .apply_to_job_on(&job, &student, today())
                        .expect("apply")
                })
            })
            .collect();

        let submitted = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread joins"))
            .filter(ApplyOutcome::is_submitted)
            .count();
        let stored = service
            .get_applications_by_student(&student.id)
            .expect("list")
            .len();

        assert_eq!(submitted, 1, "round {round}");
        assert_eq!(stored, 1, "round {round}");
    }
}

#[test]
fn new_applications_are_pending_and_dated() {
    let service = empty_service();
    let outcome = service
        .apply_to_job_on(&JobId::from("2"), &applicant("student9"), today())
        .expect("apply");

    let application = outcome.application().expect("submitted");
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.applied_date, "14/11/2025");
    assert_eq!(application.student_name, "Beatriz Lima");
    assert_eq!(application.university.as_deref(), Some("UFPE"));
}

#[test]
fn has_applied_tracks_submission_and_cancellation() {
    let service = empty_service();
    let job = JobId::from("3");
    let student = applicant("student9");

    assert!(!service.has_applied(&job, &student.id).expect("check"));

    let application = match service
        .apply_to_job_on(&job, &student, today())
        .expect("apply")
    {
        ApplyOutcome::Submitted(application) => application,
        other => panic!("expected submission, got {other:?}"),
    };
    assert!(service.has_applied(&job, &student.id).expect("check"));

    let before = service.get_applications_by_status(None).expect("list").len();
    let removed = service
        .cancel_application(&application.id)
        .expect("cancel")
        .expect("present");
    assert_eq!(removed.id, application.id);
    assert_eq!(
        service.get_applications_by_status(None).expect("list").len(),
        before - 1
    );
    assert!(!service.has_applied(&job, &student.id).expect("check"));
    assert!(service
        .cancel_application(&application.id)
        .expect("cancel")
        .is_none());
}

#[test]
fn status_updates_are_not_gated_on_current_state() {
    let (service, _) = seeded_service();
    let id = ApplicationId::from("app3");

    let rejected = service
        .reject_application(&id)
        .expect("update")
        .expect("present");
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    let reopened = service
        .update_application_status(&id, ApplicationStatus::Pending)
        .expect("update")
        .expect("present");
    assert_eq!(reopened.status, ApplicationStatus::Pending);

    let approved = service
        .approve_application(&id)
        .expect("update")
        .expect("present");
    assert_eq!(approved.status, ApplicationStatus::Approved);
}

#[test]
fn unknown_application_ids_are_reported_as_absent() {
    let (service, _) = seeded_service();
    let missing = ApplicationId::from("app404");

    assert!(service.approve_application(&missing).expect("update").is_none());
    assert!(service.cancel_application(&missing).expect("cancel").is_none());
    assert!(service.get_application(&missing).expect("get").is_none());
}

#[test]
fn dashboard_counts_applications_per_job_and_status() {
    let (service, _) = seeded_service();
    let dashboard = service.company_dashboard().expect("dashboard");

    assert_eq!(dashboard.active_jobs, 3);
    let counts: Vec<(String, usize)> = dashboard
        .jobs
        .iter()
        .map(|row| (row.job_id.0.clone(), row.applications))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("1".to_string(), 3),
            ("2".to_string(), 1),
            ("3".to_string(), 1)
        ]
    );
    assert_eq!(dashboard.applications.total, 5);
    assert_eq!(dashboard.applications.pending, 4);
    assert_eq!(dashboard.applications.approved, 1);
    assert_eq!(dashboard.applications.rejected, 0);
}

#[test]
fn applications_can_be_narrowed_by_status() {
    let (service, _) = seeded_service();

    let approved = service
        .get_applications_by_status(Some(ApplicationStatus::Approved))
        .expect("list");
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, ApplicationId::from("app3"));
    assert!(service
        .get_applications_by_status(Some(ApplicationStatus::Rejected))
        .expect("list")
        .is_empty());
}

#[test]
fn posted_jobs_lead_the_catalogue() {
    let (service, _) = seeded_service();

    let published = service.post_job(posting(), "Lab Inclusivo").expect("post");
    assert_eq!(published.job.flex_score, 100);
    assert_eq!(published.breakdown.raw_total, 110);
    assert_eq!(published.job.posted_date, JUST_POSTED_LABEL);
    assert_eq!(published.job.company, "Lab Inclusivo");

    let jobs = service.list_jobs().expect("list");
    assert_eq!(jobs.len(), 4);
    assert_eq!(jobs[0].id, published.job.id);
    assert_eq!(
        service
            .get_job_by_id(&published.job.id)
            .expect("lookup")
            .map(|job| job.title),
        Some("Estágio em UX Research".to_string())
    );

    let by_score = service
        .search_jobs(&JobQuery {
            sort: SortOrder::FlexScore,
            ..JobQuery::default()
        })
        .expect("search");
    assert_eq!(by_score[0].id, published.job.id);
}

#[test]
fn postings_without_documents_are_not_published() {
    let (service, _) = seeded_service();
    let mut form = posting();
    form.accessibility_documents.clear();

    match service.post_job(form, "Lab Inclusivo") {
        Err(MarketplaceError::Posting(PostingViolation::MissingAccessibilityDocuments)) => {}
        other => panic!("expected posting violation, got {other:?}"),
    }
    assert_eq!(service.list_jobs().expect("list").len(), 3);
}

#[test]
fn student_registration_and_edits_reach_the_directory() {
    let service = empty_service();
    let account = service
        .register(Registration::Student(StudentRegistration {
            name: "Rafael Souza".to_string(),
            email: "rafael@email.com".to_string(),
            university: Some("UFBA".to_string()),
            course: Some("Direito".to_string()),
            semester: Some("1º".to_string()),
            phone: None,
        }))
        .expect("register");

    let id = StudentId(account.id.clone());
    let student = service
        .get_student_by_id(&id)
        .expect("lookup")
        .expect("directory entry");
    assert_eq!(student.course.as_deref(), Some("Direito"));

    service
        .update_profile(ProfileUpdate::Student(StudentProfileUpdate {
            semester: Some("2º".to_string()),
            bio: Some("Interesse em direitos humanos".to_string()),
            ..StudentProfileUpdate::default()
        }))
        .expect("update");

    let student = service
        .get_student_by_id(&id)
        .expect("lookup")
        .expect("directory entry");
    assert_eq!(student.semester.as_deref(), Some("2º"));
    assert_eq!(student.bio.as_deref(), Some("Interesse em direitos humanos"));

    service.logout().expect("logout");
    assert!(service.current_account().expect("current").is_none());
}

#[test]
fn student_view_joins_postings_and_labels() {
    let (service, _) = seeded_service();
    let views = service
        .student_applications(&StudentId::from("student3"))
        .expect("views");

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].status_label, "Aprovado");
    assert_eq!(
        views[0].job.as_ref().map(|job| job.company.as_str()),
        Some("TechCorp Inovação")
    );

    service
        .apply_to_job_on(&JobId::from("gone"), &applicant("student3"), today())
        .expect("apply");
    let views = service
        .student_applications(&StudentId::from("student3"))
        .expect("views");
    assert_eq!(views.len(), 2);
    assert!(views[1].job.is_none());
    assert_eq!(views[1].status_label, "Em análise");
}

#[test]
fn storage_failures_propagate() {
    let service = read_only_service();

    match service.apply_to_job_on(&JobId::from("1"), &applicant("student9"), today()) {
        Err(MarketplaceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected storage failure, got {other:?}"),
    }
    assert!(!service
        .has_applied(&JobId::from("1"), &StudentId::from("student9"))
        .expect("check"));
}
