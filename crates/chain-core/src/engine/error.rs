use thiserror::Error;

use super::config::ConfigError;
use crate::core::helix::engine::HelixError;
use crate::core::models::ids::StrandId;
use crate::core::models::strand::{StrandKind, TopologyError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Strand not found in system: {0:?}")]
    StrandNotFound(StrandId),

    #[error("Strand {0:?} has no monomers to extend from")]
    EmptyStrand(StrandId),

    #[error("Strand {0:?} is circular and has no free end")]
    CircularStrand(StrandId),

    #[error("Monomer '{symbol}' is not supported on a {family} strand")]
    UnsupportedMonomer { symbol: char, family: StrandKind },

    #[error("Topology update failed: {source}")]
    Topology {
        #[from]
        source: TopologyError,
    },

    #[error("Geometry construction failed: {source}")]
    Helix {
        #[from]
        source: HelixError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
