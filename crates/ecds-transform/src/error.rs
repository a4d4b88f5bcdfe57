use ecds_model::{ReferenceTable, StageId};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A raw column a stage reads is absent from the input frame.
    #[error("stage '{stage}' requires column '{column}', which is missing from the input")]
    MissingColumn { stage: StageId, column: String },

    #[error("stage '{stage}' requires reference table '{table}', which is not loaded")]
    MissingReference { stage: StageId, table: ReferenceTable },

    /// Two stages touch the same column, one of them as a writer.
    #[error("column '{column}' is written by '{first}' and also used by '{second}'")]
    ColumnConflict {
        column: String,
        first: StageId,
        second: StageId,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
