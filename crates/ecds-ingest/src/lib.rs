//! ECDS extract ingestion.

pub mod csv;
pub mod error;

pub use crate::csv::{read_extract, write_table};
pub use crate::error::{IngestError, Result};
