use super::engine::HelixError;
use crate::core::models::monomer::MonomerFamily;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Local geometry of an idealized double helix, in simulation length units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HelixParams {
    /// Axial distance between consecutive base pairs.
    pub rise: f64,
    /// Rotation about the axis between consecutive base pairs.
    pub twist_degrees: f64,
    /// Tilt of the base-pair plane against the helix axis.
    pub inclination_degrees: f64,
    pub diameter: f64,
    /// Distance between the two backbone sites of a base pair.
    pub bp_backbone_distance: f64,
    /// Distance from a monomer centre back to its backbone site along `a1`.
    pub backbone_to_center: f64,
}

impl HelixParams {
    pub const B_DNA: HelixParams = HelixParams {
        rise: 0.3897628551303122,
        twist_degrees: 34.8,
        inclination_degrees: -2.0,
        diameter: 2.0,
        bp_backbone_distance: 1.8,
        backbone_to_center: 0.34,
    };

    pub const A_RNA: HelixParams = HelixParams {
        rise: 0.3287,
        twist_degrees: 32.73,
        inclination_degrees: 15.5,
        diameter: 2.35,
        bp_backbone_distance: 2.0,
        backbone_to_center: 0.4,
    };

    /// Built-in parameters for a nucleotide family.
    pub fn for_family(family: MonomerFamily) -> Option<HelixParams> {
        match family {
            MonomerFamily::Dna => Some(Self::B_DNA),
            MonomerFamily::Rna => Some(Self::A_RNA),
            MonomerFamily::AminoAcid | MonomerFamily::Generic => None,
        }
    }

    pub fn twist(&self) -> f64 {
        self.twist_degrees.to_radians()
    }

    pub fn inclination(&self) -> f64 {
        self.inclination_degrees.to_radians()
    }

    /// Projection of the base-pair backbone distance onto the base-pair plane.
    pub fn chord_length(&self) -> f64 {
        self.inclination().cos() * self.bp_backbone_distance
    }

    /// Distance from the helix axis to the midpoint of the base-pair chord.
    pub fn center_to_chord(&self) -> f64 {
        let radius = self.diameter / 2.0;
        let half_chord = self.chord_length() / 2.0;
        (radius * radius - half_chord * half_chord).sqrt()
    }

    pub fn validate(&self) -> Result<(), HelixError> {
        let finite = [
            self.rise,
            self.twist_degrees,
            self.inclination_degrees,
            self.diameter,
            self.bp_backbone_distance,
            self.backbone_to_center,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(HelixError::InvalidParams(
                "all parameters must be finite".to_string(),
            ));
        }
        if self.diameter <= 0.0 || self.bp_backbone_distance <= 0.0 {
            return Err(HelixError::InvalidParams(
                "diameter and backbone distance must be positive".to_string(),
            ));
        }
        if self.chord_length().abs() > self.diameter {
            return Err(HelixError::InvalidParams(format!(
                "chord {:.4} exceeds diameter {:.4}",
                self.chord_length(),
                self.diameter
            )));
        }
        Ok(())
    }
}

/// Named helix parameter sets, keyed by lowercase family name.
///
/// Always contains `dna` and `rna`; entries loaded from a file override them.
#[derive(Debug, Clone)]
pub struct HelixParamRegistry {
    registry: HashMap<String, HelixParams>,
}

impl Default for HelixParamRegistry {
    fn default() -> Self {
        let mut registry = HashMap::new();
        registry.insert("dna".to_string(), HelixParams::B_DNA);
        registry.insert("rna".to_string(), HelixParams::A_RNA);
        Self { registry }
    }
}

impl HelixParamRegistry {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let loaded: HashMap<String, HelixParams> =
            toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut registry = Self::default();
        for (name, params) in loaded {
            params.validate().map_err(|e| ParamLoadError::Invalid {
                path: path.to_string_lossy().to_string(),
                name: name.clone(),
                source: e,
            })?;
            registry.registry.insert(name.to_ascii_lowercase(), params);
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&HelixParams> {
        self.registry.get(&name.to_ascii_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid helix parameters '{name}' in '{path}': {source}")]
    Invalid {
        path: String,
        name: String,
        source: HelixError,
    },
}
