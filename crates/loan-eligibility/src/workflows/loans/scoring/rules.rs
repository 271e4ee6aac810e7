use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};
use crate::workflows::loans::domain::LoanApplication;
use crate::workflows::loans::encoding::EncodedFeatures;

/// Loan amount (thousands) per thousand of combined income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoanToIncome {
    Ratio { value: f64 },
    /// Combined income is zero or negative, so no ratio exists.
    Undefined { loan_requested: bool },
}

impl LoanToIncome {
    pub fn assess(loan_amount: f64, total_income: f64) -> Self {
        if total_income > 0.0 {
            LoanToIncome::Ratio {
                value: loan_amount / (total_income / 1000.0),
            }
        } else {
            LoanToIncome::Undefined {
                loan_requested: loan_amount > 0.0,
            }
        }
    }
}

pub(crate) fn score_application(
    application: &LoanApplication,
    encoded: &EncodedFeatures,
    config: &ScoringConfig,
) -> (Vec<ScoreComponent>, i32, LoanToIncome) {
    let mut components = Vec::new();

    if application.credit_history == 1 {
        components.push(ScoreComponent {
            factor: ScoreFactor::CreditHistory,
            points: config.credit_history_points,
            notes: "credit history meets guidelines".to_string(),
        });
    }

    if encoded.married == 1 {
        components.push(ScoreComponent {
            factor: ScoreFactor::MaritalStatus,
            points: config.married_points,
            notes: "married applicant".to_string(),
        });
    }

    if encoded.education == 0 {
        components.push(ScoreComponent {
            factor: ScoreFactor::Education,
            points: config.graduate_points,
            notes: format!("education '{}' scored as graduate", application.education),
        });
    }

    if encoded.gender == 1 {
        components.push(ScoreComponent {
            factor: ScoreFactor::Gender,
            points: config.male_points,
            notes: "gender code 1".to_string(),
        });
    }

    let total_income = application.total_income();
    let loan_to_income = LoanToIncome::assess(application.loan_amount, total_income);
    if let Some(component) = ratio_component(loan_to_income, config) {
        components.push(component);
    }

    if total_income > config.income_threshold {
        components.push(ScoreComponent {
            factor: ScoreFactor::CombinedIncome,
            points: config.income_points,
            notes: format!(
                "combined income {total_income:.2} above {:.2}",
                config.income_threshold
            ),
        });
    }

    if application.loan_amount_term == config.preferred_term_months {
        components.push(ScoreComponent {
            factor: ScoreFactor::LoanTerm,
            points: config.preferred_term_points,
            notes: format!("{}-month term", config.preferred_term_months),
        });
    }

    let total_score = components.iter().map(|component| component.points).sum();
    (components, total_score, loan_to_income)
}

fn ratio_component(loan_to_income: LoanToIncome, config: &ScoringConfig) -> Option<ScoreComponent> {
    match loan_to_income {
        LoanToIncome::Ratio { value } if value < config.low_ratio_ceiling => Some(ScoreComponent {
            factor: ScoreFactor::LoanToIncome,
            points: config.low_ratio_points,
            notes: format!(
                "loan-to-income ratio {value:.2} below {:.2}",
                config.low_ratio_ceiling
            ),
        }),
        LoanToIncome::Ratio { value } if value < config.moderate_ratio_ceiling => {
            Some(ScoreComponent {
                factor: ScoreFactor::LoanToIncome,
                points: config.moderate_ratio_points,
                notes: format!(
                    "loan-to-income ratio {value:.2} below {:.2}",
                    config.moderate_ratio_ceiling
                ),
            })
        }
        LoanToIncome::Ratio { value } if value > config.high_ratio_floor => Some(ScoreComponent {
            factor: ScoreFactor::LoanToIncome,
            points: config.high_ratio_penalty,
            notes: format!(
                "loan-to-income ratio {value:.2} exceeds {:.2}",
                config.high_ratio_floor
            ),
        }),
        LoanToIncome::Ratio { .. } => None,
        LoanToIncome::Undefined {
            loan_requested: true,
        } => {
            warn!("loan requested without income; applying high ratio penalty");
            Some(ScoreComponent {
                factor: ScoreFactor::LoanToIncome,
                points: config.high_ratio_penalty,
                notes: "no combined income to support the requested amount".to_string(),
            })
        }
        LoanToIncome::Undefined {
            loan_requested: false,
        } => {
            warn!("application has neither income nor loan amount; ratio skipped");
            None
        }
    }
}
