use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use trampo_certo::config::{StorageBackend, StorageConfig};
use trampo_certo::marketplace::{
    FileStore, KeyValueStore, MarketplaceOptions, MarketplaceService, MemoryStore, StoreError,
};
use tracing::info;

/// Marketplace over whichever storage backend the configuration selected.
pub(crate) type Marketplace = MarketplaceService<dyn KeyValueStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            let store = FileStore::open(&config.data_dir)?;
            info!(data_dir = %store.root().display(), "using file storage");
            Ok(Arc::new(store))
        }
    }
}

pub(crate) fn open_marketplace(config: &StorageConfig) -> Result<Marketplace, StoreError> {
    let storage = open_storage(config)?;
    MarketplaceService::open(
        storage,
        MarketplaceOptions {
            seed_demo_data: config.seed_demo_data,
        },
    )
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn memory_config(seed_demo_data: bool) -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./unused"),
            seed_demo_data,
        }
    }

    #[test]
    fn memory_backend_honours_seed_flag() {
        let seeded = open_marketplace(&memory_config(true)).expect("open");
        assert_eq!(seeded.list_jobs().expect("jobs").len(), 3);

        let empty = open_marketplace(&memory_config(false)).expect("open");
        assert!(empty.list_jobs().expect("jobs").is_empty());
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-11-14 "),
            Ok(NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid"))
        );
        assert!(parse_date("14/11/2025").is_err());
    }
}
