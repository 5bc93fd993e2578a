use crate::core::models::ids::{ElementId, StrandId};
use crate::core::models::strand::StrandKind;
use crate::core::models::system::System;
use std::collections::HashMap;
use std::ops::Range;

/// Element ordering used when assigning export ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOrder {
    /// Every strand in its natural order.
    Natural,
    /// Nucleic acids listed 3' to 5', as legacy simulation files expect;
    /// peptide and generic chains keep their natural order.
    Legacy,
}

/// Dense export ids for the strands and monomers of a system.
///
/// Export ids are assigned at export time and are unrelated to global ids.
/// Monomers that are not reachable from their strand's ends are not exported.
#[derive(Debug, Clone)]
pub struct ExportIndex {
    strands: Vec<(StrandId, Range<usize>)>,
    elements: Vec<ElementId>,
    element_index: HashMap<ElementId, usize>,
}

impl ExportIndex {
    pub fn new(system: &System, order: ExportOrder) -> Self {
        let mut strands = Vec::with_capacity(system.strand_count());
        let mut elements = Vec::with_capacity(system.element_count());

        for (id, _) in system.strands_iter() {
            let Some(view) = system.strand_view(id).filter(|v| !v.is_empty()) else {
                continue;
            };
            let reverse = order == ExportOrder::Legacy && !view.kind().inverts_traversal();
            let start = elements.len();
            elements.extend(view.walk(reverse).map(|(element, _)| element));
            strands.push((id, start..elements.len()));
        }

        let element_index = elements
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        Self {
            strands,
            elements,
            element_index,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn strand_count(&self) -> usize {
        self.strands.len()
    }

    /// Exported monomers in export-id order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Exported strands with the export-id range of their monomers.
    pub fn strands(&self) -> impl Iterator<Item = (usize, StrandId, &[ElementId])> {
        self.strands
            .iter()
            .enumerate()
            .map(|(i, (id, range))| (i, *id, &self.elements[range.clone()]))
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.element_index.get(&id).copied()
    }

    /// Export id of an optional neighbour, with `-1` for none.
    pub fn link_of(&self, id: Option<ElementId>) -> i64 {
        id.and_then(|e| self.index_of(e))
            .map_or(-1, |i| i as i64)
    }
}

/// Strand numbering of legacy simulation files: nucleic-acid strands count up
/// from 1, peptide and generic chains count down from -1.
pub(crate) fn legacy_strand_ids<'a>(
    kinds: impl Iterator<Item = StrandKind> + 'a,
) -> impl Iterator<Item = i64> + 'a {
    let mut nucleic = 0;
    let mut other = 0;
    kinds.map(move |kind| {
        if kind.inverts_traversal() {
            other -= 1;
            other
        } else {
            nucleic += 1;
            nucleic
        }
    })
}
