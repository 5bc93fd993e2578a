use super::index::{ExportIndex, ExportOrder, legacy_strand_ids};
use super::traits::SystemWriter;
use crate::core::models::system::System;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OxdnaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

/// Legacy topology file: `N_elements N_strands`, then `strand type n3 n5` per
/// monomer, with nucleic acids listed 3' to 5'.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxdnaTopology;

/// Legacy configuration file: `t`, `b` and `E` header lines, then
/// `position a1 a3 v L` per monomer in topology order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OxdnaConfiguration {
    pub time: u64,
    pub box_size: [f64; 3],
}

impl Default for OxdnaConfiguration {
    fn default() -> Self {
        Self {
            time: 0,
            box_size: [100.0; 3],
        }
    }
}

impl OxdnaConfiguration {
    pub fn cubic(box_size: f64) -> Self {
        Self {
            box_size: [box_size; 3],
            ..Self::default()
        }
    }
}

impl SystemWriter for OxdnaTopology {
    type Error = OxdnaError;

    fn write_to(&self, system: &System, writer: &mut impl Write) -> Result<(), Self::Error> {
        let index = ExportIndex::new(system, ExportOrder::Legacy);
        writeln!(writer, "{} {}", index.element_count(), index.strand_count())?;

        let kinds = index
            .strands()
            .map(|(_, id, _)| system.strand(id).map(|s| s.kind))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| OxdnaError::Inconsistency("exported strand vanished".to_string()))?;
        let strand_ids = legacy_strand_ids(kinds.into_iter());

        for ((_, _, members), strand_id) in index.strands().zip(strand_ids) {
            for id in members {
                let monomer = system.element(*id).ok_or_else(|| {
                    OxdnaError::Inconsistency(format!("exported element {id:?} vanished"))
                })?;
                writeln!(
                    writer,
                    "{} {} {} {}",
                    strand_id,
                    monomer.symbol,
                    index.link_of(monomer.n3()),
                    index.link_of(monomer.n5())
                )?;
            }
        }
        Ok(())
    }
}

impl SystemWriter for OxdnaConfiguration {
    type Error = OxdnaError;

    fn write_to(&self, system: &System, writer: &mut impl Write) -> Result<(), Self::Error> {
        let index = ExportIndex::new(system, ExportOrder::Legacy);
        let [bx, by, bz] = self.box_size;
        writeln!(writer, "t = {}", self.time)?;
        writeln!(writer, "b = {} {} {}", bx, by, bz)?;
        writeln!(writer, "E = 0 0 0")?;

        for id in index.elements() {
            let frame = system.frame(*id).ok_or_else(|| {
                OxdnaError::Inconsistency(format!("exported element {id:?} has no frame"))
            })?;
            let (p, a1, a3) = (frame.position, frame.a1, frame.a3);
            writeln!(
                writer,
                "{} {} {} {} {} {} {} {} {} 0 0 0 0 0 0",
                p.x, p.y, p.z, a1.x, a1.y, a1.z, a3.x, a3.y, a3.z
            )?;
        }
        Ok(())
    }
}
