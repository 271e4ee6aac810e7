mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;
pub use rules::LoanToIncome;

use super::domain::{LoanApplication, PredictionResult};
use super::encoding::{EncodedFeatures, FeatureEncoder};
use serde::{Deserialize, Serialize};

/// Stateless evaluator that applies the rubric to an application.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    encoder: FeatureEncoder,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(encoder: FeatureEncoder, config: ScoringConfig) -> Self {
        Self { encoder, config }
    }

    pub fn standard() -> Self {
        Self::new(FeatureEncoder::standard(), ScoringConfig::standard())
    }

    pub fn predict(&self, application: &LoanApplication) -> PredictionResult {
        self.score(application).prediction
    }

    /// Full audit trail behind a prediction.
    pub fn score(&self, application: &LoanApplication) -> ScoreCard {
        let encoded = self.encoder.encode_application(application);
        let (components, total_score, loan_to_income) =
            rules::score_application(application, &encoded, &self.config);
        let prediction = policy::decide(total_score, &self.config);

        ScoreCard {
            encoded,
            components,
            total_score,
            loan_to_income,
            prediction,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rubric factors that can contribute points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    CreditHistory,
    MaritalStatus,
    Education,
    Gender,
    LoanToIncome,
    CombinedIncome,
    LoanTerm,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::CreditHistory => "credit history",
            ScoreFactor::MaritalStatus => "marital status",
            ScoreFactor::Education => "education",
            ScoreFactor::Gender => "gender",
            ScoreFactor::LoanToIncome => "loan to income",
            ScoreFactor::CombinedIncome => "combined income",
            ScoreFactor::LoanTerm => "loan term",
        }
    }
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i32,
    pub notes: String,
}

/// Scoring output: the decision plus every rule that fired on the way to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub encoded: EncodedFeatures,
    pub components: Vec<ScoreComponent>,
    pub total_score: i32,
    pub loan_to_income: LoanToIncome,
    pub prediction: PredictionResult,
}

impl ScoreCard {
    pub fn points_for(&self, factor: ScoreFactor) -> i32 {
        self.components
            .iter()
            .filter(|component| component.factor == factor)
            .map(|component| component.points)
            .sum()
    }
}
