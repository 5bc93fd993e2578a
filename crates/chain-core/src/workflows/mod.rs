//! # Workflows Module
//!
//! High-level operations over a [`crate::core::models::system::System`].
//!
//! - **Extend Workflow** ([`extend`]) - Grows a strand from one of its ends with
//!   idealized helix (nucleic acids) or straight-line (peptide, generic)
//!   geometry, optionally building the paired complementary strand.

pub mod extend;
