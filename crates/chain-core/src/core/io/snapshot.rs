use super::index::{ExportIndex, ExportOrder};
use crate::core::models::frame::OrientedFrame;
use crate::core::models::ids::ElementId;
use crate::core::models::strand::{StrandKind, TopologyError};
use crate::core::models::system::System;
use crate::core::notify::Notifier;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementRecord {
    pub id: usize,
    pub symbol: char,
    /// Family tag when it differs from the strand default, e.g. `RNA` on a DNA strand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Export id of the 3' neighbour, `-1` for none.
    pub n3: i64,
    /// Export id of the 5' neighbour, `-1` for none.
    pub n5: i64,
    pub position: [f64; 3],
    pub a1: [f64; 3],
    pub a3: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrandRecord {
    pub id: usize,
    /// Export ids of the monomers in natural order.
    pub monomers: Vec<usize>,
    pub end3: i64,
    pub end5: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub class: String,
    pub family: String,
}

/// Serializable view of a whole system, keyed by export ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default, rename = "strand")]
    pub strands: Vec<StrandRecord>,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementRecord>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Unknown strand family '{0}'")]
    UnknownFamily(String),
    #[error("Reference to unknown element id {0}")]
    UnknownElement(i64),
    #[error("Monomer '{symbol}' cannot be recreated on a {family} strand")]
    UnsupportedSymbol { symbol: char, family: StrandKind },
    #[error("Inconsistent links: {0}")]
    Inconsistent(String),
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
}

fn to_array(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn lookup<'a>(
    records: &HashMap<usize, &'a ElementRecord>,
    id: i64,
) -> Result<Option<&'a ElementRecord>, SnapshotError> {
    if id == -1 {
        return Ok(None);
    }
    usize::try_from(id)
        .ok()
        .and_then(|i| records.get(&i).copied())
        .map(Some)
        .ok_or(SnapshotError::UnknownElement(id))
}

impl Snapshot {
    pub fn from_system(system: &System) -> Self {
        let index = ExportIndex::new(system, ExportOrder::Natural);

        let elements = index
            .elements()
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let monomer = system.element(*id)?;
                let frame = system.frame(*id)?;
                let default_family = system.strand(monomer.strand())?.kind.monomer_family();
                Some(ElementRecord {
                    id: i,
                    symbol: monomer.symbol,
                    family: (monomer.family != default_family).then(|| monomer.family.to_string()),
                    n3: index.link_of(monomer.n3()),
                    n5: index.link_of(monomer.n5()),
                    position: to_array(&frame.position.coords),
                    a1: to_array(&frame.a1),
                    a3: to_array(&frame.a3),
                })
            })
            .collect();

        let strands = index
            .strands()
            .filter_map(|(i, id, members)| {
                let strand = system.strand(id)?;
                Some(StrandRecord {
                    id: i,
                    monomers: members.iter().filter_map(|e| index.index_of(*e)).collect(),
                    end3: index.link_of(strand.end3()),
                    end5: index.link_of(strand.end5()),
                    label: strand.label.clone(),
                    class: strand.kind.class_tag().to_string(),
                    family: strand.kind.to_string(),
                })
            })
            .collect();

        Self { strands, elements }
    }

    pub fn to_toml(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_toml()?).map_err(|e| SnapshotError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Rebuilds a system from the records.
    ///
    /// Monomers are recreated through the element factory of their strand, the
    /// recorded links are restored and every strand is re-seeded from its first
    /// monomer, so circularity is recovered from the links alone.
    pub fn into_system(&self) -> Result<System, SnapshotError> {
        let records: HashMap<usize, &ElementRecord> =
            self.elements.iter().map(|r| (r.id, r)).collect();
        let mut system = System::new();
        let mut created: HashMap<usize, ElementId> = HashMap::with_capacity(self.elements.len());
        let mut seeds = Vec::with_capacity(self.strands.len());
        let notifier = Notifier::new();

        for record in &self.strands {
            let kind: StrandKind = record
                .family
                .parse()
                .map_err(|_| SnapshotError::UnknownFamily(record.family.clone()))?;
            let strand = system.add_strand(kind, record.label.clone());
            for id in &record.monomers {
                let element = lookup(&records, *id as i64)?.ok_or(SnapshotError::UnknownElement(*id as i64))?;
                let frame = OrientedFrame::new(
                    Point3::from(element.position),
                    Vector3::from(element.a1),
                    Vector3::from(element.a3),
                );
                let new_id = match &element.family {
                    Some(tag) => {
                        system.create_monomer_typed(strand, tag, element.symbol, frame, &notifier)
                    }
                    None => system.create_monomer(strand, element.symbol, frame, &notifier),
                }
                .ok_or(SnapshotError::UnsupportedSymbol {
                        symbol: element.symbol,
                        family: kind,
                    })?;
                created.insert(element.id, new_id);
            }
            seeds.push((strand, record.monomers.first().and_then(|i| created.get(i)).copied()));
        }

        for element in &self.elements {
            let Some(next) = lookup(&records, element.n3)? else {
                continue;
            };
            if next.n5 != element.id as i64 {
                return Err(SnapshotError::Inconsistent(format!(
                    "element {} names {} as 3' neighbour, which points back to {}",
                    element.id, next.id, next.n5
                )));
            }
            let (Some(from), Some(to)) = (created.get(&element.id), created.get(&next.id)) else {
                return Err(SnapshotError::Inconsistent(format!(
                    "link {} -> {} leaves the listed strands",
                    element.id, next.id
                )));
            };
            system.link(*from, *to);
        }

        for (strand, seed) in seeds {
            if seed.is_some() {
                system.set_from(strand, seed)?;
            }
        }
        system.take_updates();
        Ok(system)
    }
}
