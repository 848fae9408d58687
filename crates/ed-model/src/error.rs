use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),
    #[error("invalid column override '{0}' (expected FEATURE=COLUMN)")]
    InvalidColumnOverride(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
