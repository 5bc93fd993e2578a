//! # Core Models Module
//!
//! Data structures describing polymer chains.
//!
//! ## Key Components
//!
//! - [`frame`] - Position plus the two stored orientation axes of a monomer
//! - [`monomer`] - One chain unit and the per-family backbone derivation
//! - [`strand`] - Strand kinds, the element factory and the traversal view
//! - [`coordinates`] - Flat coordinate tables used by peptide and generic chains
//! - [`system`] - Owner of every strand and monomer, and all topology mutation
//! - [`ids`] - Stable keys for monomers and strands
//!
//! ## Usage
//!
//! ```ignore
//! use polychain::core::models::{frame::OrientedFrame, strand::StrandKind, system::System};
//! use polychain::core::notify::Notifier;
//!
//! let mut system = System::new();
//! let strand = system.add_strand(StrandKind::dna(), None);
//! let seed = system.create_monomer(strand, 'A', OrientedFrame::default(), &Notifier::new());
//! system.set_from(strand, seed)?;
//! ```

pub mod coordinates;
pub mod frame;
pub mod ids;
pub mod monomer;
pub mod strand;
pub mod system;
