use loan_eligibility::config::StorageConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::workflows::loans::{
    ApplicationRecord, ApplicationStore, InMemoryApplicationStore, LoanApplication,
    PredictionResult, RecordStamper, SqliteApplicationStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected from configuration: SQLite when a database path is set.
#[derive(Debug)]
pub(crate) enum ConfiguredStore {
    Memory(InMemoryApplicationStore),
    Sqlite(SqliteApplicationStore),
}

impl ConfiguredStore {
    pub(crate) fn open(storage: &StorageConfig) -> Result<Self, AppError> {
        let stamper = RecordStamper::system(storage.loan_id_prefix.clone());
        match &storage.database_path {
            Some(path) => {
                let store = SqliteApplicationStore::open(path, stamper)?;
                info!(path = %path.display(), "using sqlite application store");
                Ok(Self::Sqlite(store))
            }
            None => {
                info!("using in-memory application store");
                Ok(Self::Memory(InMemoryApplicationStore::new(stamper)))
            }
        }
    }

    pub(crate) fn is_persistent(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }
}

impl ApplicationStore for ConfiguredStore {
    fn create(
        &self,
        application: &LoanApplication,
        prediction: &PredictionResult,
    ) -> Result<ApplicationRecord, StoreError> {
        match self {
            Self::Memory(store) => store.create(application, prediction),
            Self::Sqlite(store) => store.create(application, prediction),
        }
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, StoreError> {
        match self {
            Self::Memory(store) => store.list_recent(limit),
            Self::Sqlite(store) => store.list_recent(limit),
        }
    }
}
