use thiserror::Error;

/// Errors raised while building reference data in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate code '{code}' in reference table")]
    DuplicateCode { code: String },
    #[error("invalid age bins: {message}")]
    InvalidBins { message: String },
    #[error("unknown stage '{name}'")]
    UnknownStage { name: String },
    #[error("unknown reference table '{name}'")]
    UnknownTable { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
