//! Core invoice types, diagnostics, configuration and decimal helpers.
//!
//! This module provides the candidate record shape produced by the upstream
//! generator and the structured failure payload handed back to it.

mod builder;
mod config;
mod error;
pub mod money;
mod types;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use money::{HIGH_VAT_RATE, LOW_VAT_RATE, MAX_AMOUNT, round2};
pub use types::*;
