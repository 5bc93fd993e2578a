//! # Polychain Core Library
//!
//! Strand topology and idealized helix geometry for building coarse-grained
//! polymer models (DNA, RNA, peptides and generic particle chains) that are
//! exported to simulation-ready files.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** The linked strand model (`System`, `Strand`,
//!   `Monomer`), oriented frames and their per-family derivations, the pure helix
//!   geometry engine, and the export writers.
//!
//! - **[`engine`]: Orchestration Support.** Configuration builders and the error
//!   type shared by the high-level operations.
//!
//! - **[`workflows`]: The Public API.** Complete operations such as extending a
//!   strand with an idealized double helix, including the paired complement.

pub mod core;
pub mod engine;
pub mod workflows;
