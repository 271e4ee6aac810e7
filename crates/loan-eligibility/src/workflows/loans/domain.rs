use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier; authoritative for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

/// Human-readable loan reference minted once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub String);

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applicant attributes exactly as submitted.
///
/// Categorical fields keep the caller's literal so unrecognized values are stored
/// verbatim; the encoder decides what they are worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub married: String,
    #[serde(default)]
    pub dependents: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub self_employed: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub applicant_income: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub coapplicant_income: f64,
    /// Requested principal in thousands.
    #[serde(deserialize_with = "deserialize_amount")]
    pub loan_amount: f64,
    /// Term in months.
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub loan_amount_term: u32,
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub credit_history: u8,
    #[serde(default)]
    pub property_area: String,
}

impl LoanApplication {
    pub fn total_income(&self) -> f64 {
        self.applicant_income + self.coapplicant_income
    }
}

/// Binary approval decision, serialized with the historical `Y`/`N` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictedStatus {
    #[serde(rename = "Y")]
    Approved,
    #[serde(rename = "N")]
    Rejected,
}

impl PredictedStatus {
    pub const fn code(self) -> &'static str {
        match self {
            PredictedStatus::Approved => "Y",
            PredictedStatus::Rejected => "N",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Y" => Some(PredictedStatus::Approved),
            "N" => Some(PredictedStatus::Rejected),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PredictedStatus::Approved => "approved",
            PredictedStatus::Rejected => "not approved",
        }
    }
}

/// Decision attached to a record; never recomputed once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_status: PredictedStatus,
    /// Fraction in `[0.55, 0.95]`.
    pub prediction_confidence: f64,
}

/// Persisted union of an application and its prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: RecordId,
    pub loan_id: LoanId,
    #[serde(flatten)]
    pub application: LoanApplication,
    #[serde(flatten)]
    pub prediction: PredictionResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericInput {
    Number(f64),
    Text(String),
}

fn parse_numeric_text(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|err| format!("'{raw}' is not a number ({err})"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}

pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumericInput::deserialize(deserializer)? {
        NumericInput::Number(value) => Ok(value),
        NumericInput::Text(raw) => parse_numeric_text(&raw).map_err(serde::de::Error::custom),
    }
}

/// Absent, `null`, and blank values count as zero.
pub(crate) fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumericInput>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumericInput::Number(value)) => Ok(value),
        Some(NumericInput::Text(raw)) if raw.trim().is_empty() => Ok(0.0),
        Some(NumericInput::Text(raw)) => {
            parse_numeric_text(&raw).map_err(serde::de::Error::custom)
        }
    }
}

pub(crate) fn deserialize_whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = deserialize_amount(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    T::try_from(value as u64)
        .map_err(|_| serde::de::Error::custom(format!("{value} is out of range")))
}
