//! Configuration options for a visit-log analysis run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::feature::Feature;

/// Visit timestamp column of the source workbook.
pub const VISIT_DATE_COLUMN: &str = "VISIT_DATE";
/// Discharge timestamp column of the source workbook.
pub const DISCHARGE_DATE_COLUMN: &str = "DISCHARGE_DATE";

/// What to do with order timestamps that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Record an undefined duration and count it against the record.
    #[default]
    Coerce,
    /// Abort the run on the first unparseable timestamp.
    Strict,
    /// Coerce consultations, abort on the other features.
    Legacy,
}

impl DatePolicy {
    /// Returns true when unparseable timestamps of `feature` become undefined
    /// durations instead of errors.
    pub fn coerces(self, feature: Feature) -> bool {
        match self {
            DatePolicy::Coerce => true,
            DatePolicy::Strict => false,
            DatePolicy::Legacy => feature == Feature::Consultations,
        }
    }
}

/// Source column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub visit: String,
    pub discharge: String,
    /// Per-feature overrides; features not listed use their default header.
    #[serde(default)]
    pub features: BTreeMap<Feature, String>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            visit: VISIT_DATE_COLUMN.to_string(),
            discharge: DISCHARGE_DATE_COLUMN.to_string(),
            features: BTreeMap::new(),
        }
    }
}

impl ColumnNames {
    pub fn feature(&self, feature: Feature) -> &str {
        self.features
            .get(&feature)
            .map_or(feature.default_column(), String::as_str)
    }

    pub fn with_feature_column(mut self, feature: Feature, column: impl Into<String>) -> Self {
        self.features.insert(feature, column.into());
        self
    }

    /// Applies a `FEATURE=COLUMN` override, e.g. `pharmacy=PHARMACY`.
    pub fn apply_override(&mut self, assignment: &str) -> Result<()> {
        let (feature, column) = assignment
            .split_once('=')
            .ok_or_else(|| ModelError::InvalidColumnOverride(assignment.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(ModelError::InvalidColumnOverride(assignment.to_string()));
        }
        let feature: Feature = feature.parse()?;
        self.features.insert(feature, column.to_string());
        Ok(())
    }
}

/// Options controlling one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub columns: ColumnNames,
    /// Features to analyze, in output order.
    pub features: Vec<Feature>,
    pub date_policy: DatePolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            features: Feature::ALL.to_vec(),
            date_policy: DatePolicy::default(),
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Restricts the run to `features`; duplicates are dropped, order kept.
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        let mut selected = Vec::new();
        for feature in features {
            if !selected.contains(&feature) {
                selected.push(feature);
            }
        }
        self.features = selected;
        self
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }
}
