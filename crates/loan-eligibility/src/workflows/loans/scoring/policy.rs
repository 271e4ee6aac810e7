use super::config::ScoringConfig;
use crate::workflows::loans::domain::{PredictedStatus, PredictionResult};

/// Converts a total score into the stored decision.
pub(crate) fn decide(total_score: i32, config: &ScoringConfig) -> PredictionResult {
    let predicted_status = if total_score >= config.approval_threshold {
        PredictedStatus::Approved
    } else {
        PredictedStatus::Rejected
    };

    PredictionResult {
        predicted_status,
        prediction_confidence: confidence(total_score, config),
    }
}

pub(crate) fn confidence(total_score: i32, config: &ScoringConfig) -> f64 {
    let percent = total_score
        .saturating_add(config.confidence_offset)
        .max(config.confidence_floor)
        .min(config.confidence_ceiling);
    f64::from(percent) / 100.0
}
