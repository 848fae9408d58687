use ed_model::{Feature, PooledKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("column '{column}' not found in visit log")]
    MissingColumn { column: String },
    #[error("cannot compute {what}: no records")]
    DivisionByZero { what: &'static str },
    #[error("unparseable timestamp '{text}' in {feature} record at row {row}")]
    TimestampParse {
        feature: Feature,
        row: usize,
        text: String,
    },
    #[error("expected a {expected:?} summary, got {found:?}")]
    SummaryMismatch {
        expected: PooledKind,
        found: PooledKind,
    },
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for AnalysisError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
