//! Export and round-trip formats.
//!
//! - [`snapshot`] - Full TOML round trip of topology, sequence and frames
//! - [`oxdna`] - Legacy simulation topology and configuration writers
//! - [`coordinates`] - Per-monomer centre and backbone coordinates as CSV
//! - [`index`] - Export-id assignment shared by the writers
//! - [`traits`] - The [`traits::SystemWriter`] interface

pub mod coordinates;
pub mod index;
pub mod oxdna;
pub mod snapshot;
pub mod traits;
