use std::sync::Mutex;

use super::{ApplicationStore, StoreError};
use crate::workflows::loans::domain::{
    ApplicationRecord, LoanApplication, PredictionResult, RecordId,
};
use crate::workflows::loans::identifiers::RecordStamper;

/// Process-local store; records vanish with the process.
#[derive(Debug)]
pub struct InMemoryApplicationStore {
    stamper: RecordStamper,
    records: Mutex<Vec<ApplicationRecord>>,
}

impl InMemoryApplicationStore {
    pub fn new(stamper: RecordStamper) -> Self {
        Self {
            stamper,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(records) => records.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn create(
        &self,
        application: &LoanApplication,
        prediction: &PredictionResult,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record mutex poisoned".to_string()))?;

        let (loan_id, created_at) = self.stamper.stamp();
        if records.iter().any(|record| record.loan_id == loan_id) {
            return Err(StoreError::Conflict);
        }

        let record = ApplicationRecord {
            id: RecordId(records.len() as i64 + 1),
            loan_id,
            application: application.clone(),
            prediction: *prediction,
            created_at,
        };
        records.push(record.clone());
        Ok(record)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record mutex poisoned".to_string()))?;

        // Reverse first so the stable sort leaves later insertions ahead on ties.
        let mut snapshot: Vec<ApplicationRecord> = records.iter().rev().cloned().collect();
        snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshot.truncate(limit);
        Ok(snapshot)
    }
}
