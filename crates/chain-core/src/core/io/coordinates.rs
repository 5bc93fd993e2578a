use super::index::{ExportIndex, ExportOrder};
use super::traits::SystemWriter;
use crate::core::models::system::System;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinateCsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CoordinateRow {
    gid: usize,
    strand: usize,
    symbol: char,
    center_x: f64,
    center_y: f64,
    center_z: f64,
    backbone_x: f64,
    backbone_y: f64,
    backbone_z: f64,
}

/// Coordinate view as CSV: one row per monomer, strands in natural order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateCsv;

impl SystemWriter for CoordinateCsv {
    type Error = CoordinateCsvError;

    fn write_to(&self, system: &System, writer: &mut impl Write) -> Result<(), Self::Error> {
        let index = ExportIndex::new(system, ExportOrder::Natural);
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (strand, _, members) in index.strands() {
            for id in members {
                let (Some(monomer), Some((center, backbone))) =
                    (system.element(*id), system.coordinates(*id))
                else {
                    continue;
                };
                csv_writer.serialize(CoordinateRow {
                    gid: monomer.gid,
                    strand,
                    symbol: monomer.symbol,
                    center_x: center.x,
                    center_y: center.y,
                    center_z: center.z,
                    backbone_x: backbone.x,
                    backbone_y: backbone.y,
                    backbone_z: backbone.z,
                })?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}
