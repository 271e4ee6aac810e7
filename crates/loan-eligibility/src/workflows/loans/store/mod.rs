mod memory;
mod sqlite;

pub use memory::InMemoryApplicationStore;
pub use sqlite::SqliteApplicationStore;

use super::domain::{ApplicationRecord, LoanApplication, PredictionResult};

/// Append/query boundary for scored applications.
///
/// `create` stamps the loan id and `created_at`; `list_recent` returns a snapshot ordered
/// newest first, with later insertions first among equal timestamps.
pub trait ApplicationStore: Send + Sync {
    fn create(
        &self,
        application: &LoanApplication,
        prediction: &PredictionResult,
    ) -> Result<ApplicationRecord, StoreError>;

    fn list_recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
