//! Closed-form construction of idealized chain geometry.
//!
//! [`engine::extend_helix`] continues a nucleic-acid double helix from a seed
//! frame using one of the [`params::HelixParams`] sets; [`linear::extend_linear`]
//! continues peptide and generic chains in a straight line. Both are pure
//! functions of their inputs.

pub mod engine;
pub mod linear;
pub mod params;
