//! Order features recorded per emergency visit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::extraction::{CONSULTATION_RULE, ExtractionRule, START_END_RULE};

/// Free-text order column of the visit log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Consultations,
    LabTests,
    Radiology,
    Pharmacy,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Consultations,
        Feature::LabTests,
        Feature::Radiology,
        Feature::Pharmacy,
    ];

    /// Column header used by the source workbook.
    pub fn default_column(self) -> &'static str {
        match self {
            Feature::Consultations => "CONSULTATIONS",
            Feature::LabTests => "LAB_TEST",
            Feature::Radiology => "RADIOLOGY",
            Feature::Pharmacy => "PHARMECY",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Consultations => "Consultations",
            Feature::LabTests => "Lab tests",
            Feature::Radiology => "Radiology",
            Feature::Pharmacy => "Pharmacy",
        }
    }

    /// Stable identifier used in file names and serialized output.
    pub fn slug(self) -> &'static str {
        match self {
            Feature::Consultations => "consultations",
            Feature::LabTests => "lab_tests",
            Feature::Radiology => "radiology",
            Feature::Pharmacy => "pharmacy",
        }
    }

    pub fn rule(self) -> ExtractionRule {
        match self {
            Feature::Consultations => CONSULTATION_RULE,
            Feature::LabTests | Feature::Radiology | Feature::Pharmacy => START_END_RULE,
        }
    }

    pub fn reply_threshold(self) -> usize {
        self.rule().reply_threshold
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Feature {
    type Err = ModelError;

    /// Accepts the slug, a kebab-case variant, or the default column header.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase().replace('-', "_");
        Feature::ALL
            .into_iter()
            .find(|feature| {
                key == feature.slug() || key.eq_ignore_ascii_case(feature.default_column())
            })
            .ok_or_else(|| ModelError::UnknownFeature(value.to_string()))
    }
}
