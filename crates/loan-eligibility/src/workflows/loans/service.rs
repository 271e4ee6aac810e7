use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::domain::{ApplicationRecord, LoanApplication, PredictionResult};
use super::scoring::{ScoreCard, ScoringEngine};
use super::store::{ApplicationStore, StoreError};

/// Largest history page served to callers, also the default page size.
pub const MAX_HISTORY_LIMIT: usize = 50;

/// Request envelope; `application` is optional so its absence can be reported as a
/// validation failure instead of a decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub application: Option<LoanApplication>,
}

/// Outcome of a scored and persisted application.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReceipt {
    pub record: ApplicationRecord,
    pub score_card: ScoreCard,
}

impl PredictionReceipt {
    pub fn prediction(&self) -> PredictionResult {
        self.record.prediction
    }
}

/// Service composing the scoring engine and the application store.
pub struct LoanPredictionService<S> {
    engine: Arc<ScoringEngine>,
    store: Arc<S>,
}

impl<S> LoanPredictionService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>, engine: ScoringEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
        }
    }

    /// Score without persisting.
    pub fn evaluate(&self, application: &LoanApplication) -> ScoreCard {
        self.engine.score(application)
    }

    /// Score an application and record it together with its decision.
    pub fn submit(
        &self,
        request: PredictionRequest,
    ) -> Result<PredictionReceipt, PredictionServiceError> {
        let application = request
            .application
            .ok_or(PredictionServiceError::MissingApplication)?;

        let score_card = self.engine.score(&application);
        let record = self
            .store
            .create(&application, &score_card.prediction)
            .map_err(|err| {
                error!(error = %err, "failed to record application");
                PredictionServiceError::Storage(err)
            })?;

        info!(
            record_id = record.id.0,
            loan_id = %record.loan_id,
            status = record.prediction.predicted_status.code(),
            confidence = record.prediction.prediction_confidence,
            total_score = score_card.total_score,
            "application recorded"
        );

        Ok(PredictionReceipt { record, score_card })
    }

    /// Most recent records first; `None` means the default page size and larger
    /// requests are capped at [`MAX_HISTORY_LIMIT`].
    pub fn history(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicationRecord>, PredictionServiceError> {
        let limit = limit
            .unwrap_or(MAX_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);
        let records = self.store.list_recent(limit)?;
        Ok(records)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error("Missing application data")]
    MissingApplication,
    #[error(transparent)]
    Storage(#[from] StoreError),
}
