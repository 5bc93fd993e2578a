use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use nalgebra::{Point3, Vector3};
use polychain::core::helix::params::{HelixParamRegistry, HelixParams};
use polychain::core::models::frame::OrientedFrame;
use polychain::core::models::strand::{Direction, StrandKind};
use polychain::engine::config::{ExtendConfig, ExtendConfigBuilder};
use polychain::engine::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDesign {
    pub box_size: Option<f64>,
    pub helix_params: Option<PathBuf>,
    #[serde(default, rename = "strand")]
    pub strands: Vec<PartialStrand>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialStrand {
    pub family: Option<String>,
    pub sequence: Option<String>,
    pub label: Option<String>,
    pub complement: Option<bool>,
    pub direction: Option<PartialDirection>,
    /// Name of a helix parameter set, e.g. `rna` on a DNA strand.
    pub helix: Option<String>,
    pub linear_spacing: Option<f64>,
    pub seed: Option<PartialSeed>,
    pub translate: Option<[f64; 3]>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum PartialDirection {
    Toward3,
    Toward5,
}

impl From<PartialDirection> for Direction {
    fn from(value: PartialDirection) -> Self {
        match value {
            PartialDirection::Toward3 => Direction::Toward3,
            PartialDirection::Toward5 => Direction::Toward5,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct PartialSeed {
    pub position: Option<[f64; 3]>,
    pub a1: Option<[f64; 3]>,
    pub a3: Option<[f64; 3]>,
}

impl PartialSeed {
    fn to_frame(self) -> OrientedFrame {
        let default = OrientedFrame::default();
        OrientedFrame::new(
            self.position.map(Point3::from).unwrap_or(default.position),
            self.a1.map(Vector3::from).unwrap_or(default.a1),
            self.a3.map(Vector3::from).unwrap_or(default.a3),
        )
    }
}

/// One strand of a build, ready for the extend workflow.
#[derive(Debug, Clone)]
pub struct StrandPlan {
    pub kind: StrandKind,
    pub label: Option<String>,
    /// Symbol placed at the seed frame.
    pub first: char,
    pub seed: OrientedFrame,
    /// Remaining symbols, grown outward from the seed.
    pub extend: ExtendConfig,
    pub translate: Option<Vector3<f64>>,
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub strands: Vec<StrandPlan>,
    /// `None` sizes the box from the built coordinates.
    pub box_size: Option<f64>,
}

impl PartialDesign {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading design file from: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &BuildArgs) -> Result<BuildPlan> {
        let box_size = args.box_size.or(self.box_size);
        if let Some(size) = box_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(CliError::Argument(format!(
                    "box size must be positive, got {size}"
                )));
            }
        }

        let registry = match args.helix_params.as_ref().or(self.helix_params.as_ref()) {
            Some(path) => HelixParamRegistry::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?,
            None => HelixParamRegistry::default(),
        };

        if self.strands.is_empty() {
            return Err(CliError::Config(
                "design file must contain at least one [[strand]] table".to_string(),
            ));
        }

        let strands = self
            .strands
            .into_iter()
            .enumerate()
            .map(|(i, strand)| strand.into_plan(i, &registry, args.no_complement))
            .collect::<Result<Vec<_>>>()?;

        Ok(BuildPlan { strands, box_size })
    }
}

impl PartialStrand {
    fn into_plan(
        self,
        index: usize,
        registry: &HelixParamRegistry,
        no_complement: bool,
    ) -> Result<StrandPlan> {
        let family = self
            .family
            .ok_or_else(|| CliError::Config(format!("strand {index}: missing 'family'")))?;
        let kind: StrandKind = family.parse().map_err(|_| {
            CliError::Config(format!(
                "strand {index}: unknown family '{family}' (expected DNA, RNA, peptide or generic)"
            ))
        })?;

        let sequence = self
            .sequence
            .ok_or_else(|| CliError::Config(format!("strand {index}: missing 'sequence'")))?;
        let mut symbols = sequence.chars();
        let first = symbols
            .next()
            .ok_or_else(|| CliError::Config(format!("strand {index}: 'sequence' is empty")))?;

        let mut builder = ExtendConfigBuilder::new()
            .sequence(symbols.as_str())
            .complement(self.complement.unwrap_or(false) && !no_complement);
        if let Some(direction) = self.direction {
            builder = builder.direction(direction.into());
        }
        if let Some(spacing) = self.linear_spacing {
            builder = builder.linear_spacing(spacing);
        }
        if let Some(name) = &self.helix {
            builder = builder.helix(lookup_helix(registry, name, index)?);
        } else if let Some(params) = registry.get(&kind.to_string()) {
            builder = builder.helix(*params);
        }
        let extend = builder.build().map_err(EngineError::from)?;

        let seed = self.seed.unwrap_or_default().to_frame();
        if seed.is_degenerate() {
            return Err(CliError::Config(format!(
                "strand {index}: seed axes 'a1' and 'a3' must be non-zero and not parallel"
            )));
        }

        Ok(StrandPlan {
            kind,
            label: self.label,
            first,
            seed,
            extend,
            translate: self.translate.map(Vector3::from),
        })
    }
}

fn lookup_helix(registry: &HelixParamRegistry, name: &str, index: usize) -> Result<HelixParams> {
    registry.get(name).copied().ok_or_else(|| {
        let mut known: Vec<&str> = registry.names().collect();
        known.sort_unstable();
        CliError::Config(format!(
            "strand {index}: unknown helix parameter set '{name}' (known: {})",
            known.join(", ")
        ))
    })
}
