use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::LoanApplication;

/// Categorical attributes with a fixed code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    PropertyArea,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Gender,
        Feature::Married,
        Feature::Dependents,
        Feature::Education,
        Feature::SelfEmployed,
        Feature::PropertyArea,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Feature::Gender => "gender",
            Feature::Married => "married",
            Feature::Dependents => "dependents",
            Feature::Education => "education",
            Feature::SelfEmployed => "self_employed",
            Feature::PropertyArea => "property_area",
        }
    }

    fn standard_table(self) -> &'static [(&'static str, i32)] {
        match self {
            Feature::Gender => &[("Male", 1), ("Female", 0)],
            Feature::Married => &[("Yes", 1), ("No", 0)],
            Feature::Dependents => &[("0", 0), ("1", 1), ("2", 2), ("3+", 3)],
            Feature::Education => &[("Graduate", 0), ("Not Graduate", 1)],
            Feature::SelfEmployed => &[("Yes", 1), ("No", 0)],
            Feature::PropertyArea => &[("Rural", 0), ("Semiurban", 1), ("Urban", 2)],
        }
    }
}

/// Code returned for any literal missing from a feature's table.
pub const UNKNOWN_CODE: i32 = 0;

/// Maps categorical literals to integer codes.
///
/// Lookups are exact and never fail: a literal outside the table (including the empty
/// string) encodes to [`UNKNOWN_CODE`], which is also the baseline code of every table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    tables: BTreeMap<Feature, BTreeMap<&'static str, i32>>,
}

impl FeatureEncoder {
    pub fn standard() -> Self {
        let tables = Feature::ALL
            .into_iter()
            .map(|feature| {
                let table = feature.standard_table().iter().copied().collect();
                (feature, table)
            })
            .collect();
        Self { tables }
    }

    pub fn encode(&self, value: &str, feature: Feature) -> i32 {
        match self.lookup(value, feature) {
            Some(code) => code,
            None => {
                debug!(feature = feature.name(), value, "unrecognized categorical value");
                UNKNOWN_CODE
            }
        }
    }

    /// Strict variant of [`FeatureEncoder::encode`] for callers that need to tell a
    /// recognized baseline literal apart from an unknown one.
    pub fn lookup(&self, value: &str, feature: Feature) -> Option<i32> {
        self.tables
            .get(&feature)
            .and_then(|table| table.get(value))
            .copied()
    }

    pub fn encode_application(&self, application: &LoanApplication) -> EncodedFeatures {
        EncodedFeatures {
            gender: self.encode(&application.gender, Feature::Gender),
            married: self.encode(&application.married, Feature::Married),
            dependents: self.encode(&application.dependents, Feature::Dependents),
            education: self.encode(&application.education, Feature::Education),
            self_employed: self.encode(&application.self_employed, Feature::SelfEmployed),
            property_area: self.encode(&application.property_area, Feature::PropertyArea),
        }
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Every categorical attribute of an application in encoded form.
///
/// Dependents, self-employment and property area are encoded for the audit trail even
/// though no scoring rule reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFeatures {
    pub gender: i32,
    pub married: i32,
    pub dependents: i32,
    pub education: i32,
    pub self_employed: i32,
    pub property_area: i32,
}
