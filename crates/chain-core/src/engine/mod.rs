//! # Engine Module
//!
//! Orchestration support shared by the high-level [`crate::workflows`].
//!
//! - **Configuration** ([`config`]) - Validated operation settings built through builders
//! - **Error Handling** ([`error`]) - The workflow error type, wrapping lower-level errors

pub mod config;
pub mod error;
