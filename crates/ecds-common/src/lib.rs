//! Shared utilities for ECDS crates.
//!
//! This crate provides common utilities used across the ECDS workspace,
//! including Polars value helpers.

pub mod polars;

pub use polars::{any_to_code, format_numeric, parse_f64};
