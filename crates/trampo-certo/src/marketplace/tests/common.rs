use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::marketplace::domain::Applicant;
use crate::marketplace::posting::{AccessibilityDocument, JobPosting};
use crate::marketplace::storage::{KeyValueStore, MemoryStore, StoreError};
use crate::marketplace::{marketplace_router, Modality, MarketplaceOptions, MarketplaceService};

pub(super) fn seeded_service() -> (MarketplaceService<MemoryStore>, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let service = MarketplaceService::open(storage.clone(), MarketplaceOptions::default())
        .expect("memory store opens");
    (service, storage)
}

pub(super) fn empty_service() -> MarketplaceService<MemoryStore> {
    MarketplaceService::open(
        Arc::new(MemoryStore::new()),
        MarketplaceOptions {
            seed_demo_data: false,
        },
    )
    .expect("memory store opens")
}

pub(super) fn seeded_router() -> Router {
    let (service, _) = seeded_service();
    marketplace_router(Arc::new(service))
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid date")
}

pub(super) fn applicant(id: &str) -> Applicant {
    Applicant {
        university: Some("UFPE".to_string()),
        course: Some("Design".to_string()),
        semester: Some("2º".to_string()),
        ..Applicant::new(id, "Beatriz Lima", "beatriz.lima@email.com")
    }
}

pub(super) fn posting() -> JobPosting {
    JobPosting {
        title: "Estágio em UX Research".to_string(),
        location: "Recife, PE".to_string(),
        modality: Modality::Remote,
        workload: "20h/semana".to_string(),
        salary: Some("R$ 1.300/mês".to_string()),
        description: "Entrevistas com usuários e testes de usabilidade.".to_string(),
        requirements: vec!["Cursando Design ou Psicologia".to_string()],
        benefits: vec!["Auxílio home office".to_string()],
        accessibility: vec!["Intérprete de Libras".to_string()],
        schedule: vec!["Horários flexíveis".to_string()],
        category: None,
        accessibility_documents: vec![AccessibilityDocument {
            name: "politica-acessibilidade.pdf".to_string(),
            size_bytes: 48_000,
        }],
    }
}

/// Storage that reads as empty and refuses every write.
pub(super) struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn load(&self, _namespace: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn save(&self, namespace: &str, _payload: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(format!("{namespace} is read-only")))
    }

    fn remove(&self, namespace: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(format!("{namespace} is read-only")))
    }
}

pub(super) fn read_only_service() -> MarketplaceService<ReadOnlyStore> {
    MarketplaceService::open(
        Arc::new(ReadOnlyStore),
        MarketplaceOptions {
            seed_demo_data: false,
        },
    )
    .expect("empty namespaces load without writing")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
