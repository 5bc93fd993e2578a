use nalgebra::{Point3, Vector3};
use std::ops::Range;

/// Flat coordinate tables for bead-like monomers (amino acids and generic
/// particles).
///
/// Each slot occupies three consecutive `f64` values in every table. Slots are
/// handed out sequentially and never reused, so the monomers of a strand built
/// in one go occupy a contiguous block that can be shifted with a single bulk
/// update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateTables {
    /// Centre-of-mass positions.
    cm_offsets: Vec<f64>,
    /// Backbone-site positions.
    bb_offsets: Vec<f64>,
    /// Nucleoside / side-chain site positions.
    ns_offsets: Vec<f64>,
    /// Backbone connector positions.
    bbcon_offsets: Vec<f64>,
}

fn push_point(table: &mut Vec<f64>, p: &Point3<f64>) {
    table.extend_from_slice(&[p.x, p.y, p.z]);
}

fn read_point(table: &[f64], slot: usize) -> Option<Point3<f64>> {
    let base = slot * 3;
    let xyz = table.get(base..base + 3)?;
    Some(Point3::new(xyz[0], xyz[1], xyz[2]))
}

fn shift(table: &mut [f64], range: Range<usize>, offset: &Vector3<f64>) {
    for xyz in table[range.start * 3..range.end * 3].chunks_exact_mut(3) {
        xyz[0] += offset.x;
        xyz[1] += offset.y;
        xyz[2] += offset.z;
    }
}

impl CoordinateTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.cm_offsets.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.cm_offsets.is_empty()
    }

    /// Appends a slot whose sites all start at `center`, except the backbone
    /// site which is given explicitly.
    pub(crate) fn allocate(&mut self, center: &Point3<f64>, backbone: &Point3<f64>) -> usize {
        let slot = self.len();
        push_point(&mut self.cm_offsets, center);
        push_point(&mut self.bb_offsets, backbone);
        push_point(&mut self.ns_offsets, center);
        push_point(&mut self.bbcon_offsets, backbone);
        slot
    }

    pub fn center(&self, slot: usize) -> Option<Point3<f64>> {
        read_point(&self.cm_offsets, slot)
    }

    pub fn backbone(&self, slot: usize) -> Option<Point3<f64>> {
        read_point(&self.bb_offsets, slot)
    }

    pub fn nucleoside(&self, slot: usize) -> Option<Point3<f64>> {
        read_point(&self.ns_offsets, slot)
    }

    pub fn backbone_connector(&self, slot: usize) -> Option<Point3<f64>> {
        read_point(&self.bbcon_offsets, slot)
    }

    pub fn cm_offsets(&self) -> &[f64] {
        &self.cm_offsets
    }

    pub fn bb_offsets(&self) -> &[f64] {
        &self.bb_offsets
    }

    pub fn ns_offsets(&self) -> &[f64] {
        &self.ns_offsets
    }

    pub fn bbcon_offsets(&self) -> &[f64] {
        &self.bbcon_offsets
    }

    /// Shifts every site of the slots in `range` by `offset` in one pass per table.
    ///
    /// Returns `false` without touching anything when the range exceeds the
    /// allocated slots.
    pub(crate) fn translate_block(&mut self, range: Range<usize>, offset: &Vector3<f64>) -> bool {
        if range.start > range.end || range.end > self.len() {
            return false;
        }
        shift(&mut self.cm_offsets, range.clone(), offset);
        shift(&mut self.bb_offsets, range.clone(), offset);
        shift(&mut self.ns_offsets, range.clone(), offset);
        shift(&mut self.bbcon_offsets, range, offset);
        true
    }

    pub(crate) fn translate_slot(&mut self, slot: usize, offset: &Vector3<f64>) -> bool {
        self.translate_block(slot..slot + 1, offset)
    }
}
