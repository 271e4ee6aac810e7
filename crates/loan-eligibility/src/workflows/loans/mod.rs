//! Loan application intake: categorical encoding, rubric scoring, and the record store.
//!
//! Scoring is pure and deterministic. Every successful prediction is persisted exactly
//! once as an [`ApplicationRecord`]; records are never updated afterwards.

pub mod domain;
pub mod encoding;
pub mod export;
pub mod identifiers;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationRecord, LoanApplication, LoanId, PredictedStatus, PredictionResult, RecordId,
};
pub use encoding::{EncodedFeatures, Feature, FeatureEncoder, UNKNOWN_CODE};
pub use export::write_history_csv;
pub use identifiers::{
    Clock, FixedClock, LoanIdGenerator, RecordStamper, SequentialLoanIds, SystemClock,
    TimestampLoanIds,
};
pub use router::{cors_layer, loan_router, HistoryResponse, PredictionResponse};
pub use scoring::{
    LoanToIncome, ScoreCard, ScoreComponent, ScoreFactor, ScoringConfig, ScoringEngine,
};
pub use service::{
    LoanPredictionService, PredictionReceipt, PredictionRequest, PredictionServiceError,
    MAX_HISTORY_LIMIT,
};
pub use store::{ApplicationStore, InMemoryApplicationStore, SqliteApplicationStore, StoreError};
