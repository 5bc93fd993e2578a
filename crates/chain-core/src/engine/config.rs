use crate::core::helix::linear::DEFAULT_LINEAR_SPACING;
use crate::core::helix::params::HelixParams;
use crate::core::models::strand::Direction;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendConfig {
    /// Symbols to add, in growth order.
    pub sequence: String,
    /// End to grow from; `None` grows along the strand's natural direction.
    pub direction: Option<Direction>,
    /// Also build the paired, antiparallel strand (nucleic acids only).
    pub complement: bool,
    /// Helix geometry override; `None` uses the built-in set of the strand family.
    pub helix: Option<HelixParams>,
    /// Bead spacing for peptide and generic chains.
    pub linear_spacing: f64,
}

#[derive(Default)]
pub struct ExtendConfigBuilder {
    sequence: Option<String>,
    direction: Option<Direction>,
    complement: Option<bool>,
    helix: Option<HelixParams>,
    linear_spacing: Option<f64>,
}

impl ExtendConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
    pub fn complement(mut self, complement: bool) -> Self {
        self.complement = Some(complement);
        self
    }
    pub fn helix(mut self, params: HelixParams) -> Self {
        self.helix = Some(params);
        self
    }
    pub fn linear_spacing(mut self, spacing: f64) -> Self {
        self.linear_spacing = Some(spacing);
        self
    }

    pub fn build(self) -> Result<ExtendConfig, ConfigError> {
        let sequence = self
            .sequence
            .ok_or(ConfigError::MissingParameter("sequence"))?;
        if let Some(c) = sequence.chars().find(|c| c.is_whitespace()) {
            return Err(ConfigError::InvalidParameter {
                name: "sequence",
                reason: format!("contains whitespace {c:?}"),
            });
        }

        let linear_spacing = self.linear_spacing.unwrap_or(DEFAULT_LINEAR_SPACING);
        if !linear_spacing.is_finite() || linear_spacing <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "linear_spacing",
                reason: format!("must be positive, got {linear_spacing}"),
            });
        }

        if let Some(params) = &self.helix {
            params
                .validate()
                .map_err(|e| ConfigError::InvalidParameter {
                    name: "helix",
                    reason: e.to_string(),
                })?;
        }

        Ok(ExtendConfig {
            sequence,
            direction: self.direction,
            complement: self.complement.unwrap_or(false),
            helix: self.helix,
            linear_spacing,
        })
    }
}
