//! # Core Module
//!
//! Stateless building blocks of the strand model.
//!
//! - **Molecular Representation** ([`models`]) - Frames, monomers, strands and the owning system
//! - **Geometry** ([`helix`]) - Closed-form helix and linear chain continuation
//! - **File I/O** ([`io`]) - Snapshot round trip, legacy simulation files and coordinate tables
//! - **Reporting** ([`notify`]) - Sink for non-fatal, user-facing conditions
//! - **Utilities** ([`utils`]) - Vector and rotation helpers

pub mod helix;
pub mod io;
pub mod models;
pub mod notify;
pub mod utils;
