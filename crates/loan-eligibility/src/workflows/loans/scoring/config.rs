use serde::{Deserialize, Serialize};

/// Point weights and thresholds of the eligibility rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub credit_history_points: i32,
    pub married_points: i32,
    pub graduate_points: i32,
    pub male_points: i32,
    /// Ratios strictly below this earn `low_ratio_points`.
    pub low_ratio_ceiling: f64,
    pub low_ratio_points: i32,
    /// Ratios strictly below this (and not below the low ceiling) earn `moderate_ratio_points`.
    pub moderate_ratio_ceiling: f64,
    pub moderate_ratio_points: i32,
    /// Ratios strictly above this cost `high_ratio_penalty`.
    pub high_ratio_floor: f64,
    pub high_ratio_penalty: i32,
    /// Combined income strictly above this earns `income_points`.
    pub income_threshold: f64,
    pub income_points: i32,
    pub preferred_term_months: u32,
    pub preferred_term_points: i32,
    pub approval_threshold: i32,
    pub confidence_offset: i32,
    pub confidence_floor: i32,
    pub confidence_ceiling: i32,
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self {
            credit_history_points: 40,
            married_points: 15,
            graduate_points: 10,
            male_points: 5,
            low_ratio_ceiling: 3.0,
            low_ratio_points: 20,
            moderate_ratio_ceiling: 5.0,
            moderate_ratio_points: 10,
            high_ratio_floor: 7.0,
            high_ratio_penalty: -10,
            income_threshold: 5000.0,
            income_points: 10,
            preferred_term_months: 360,
            preferred_term_points: 5,
            approval_threshold: 50,
            confidence_offset: 10,
            confidence_floor: 55,
            confidence_ceiling: 95,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}
