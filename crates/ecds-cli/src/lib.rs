//! Library components of the `ecds` command-line tool.

pub mod logging;
pub mod pipeline;
pub mod types;
