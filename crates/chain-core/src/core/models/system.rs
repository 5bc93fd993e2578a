use super::coordinates::CoordinateTables;
use super::frame::OrientedFrame;
use super::ids::{ElementId, StrandId};
use super::monomer::{Monomer, MonomerFamily, Placement};
use super::strand::{
    CoordinateStorage, Direction, Strand, StrandKind, StrandView, StrandWalk, TopologyError,
};
use crate::core::notify::Notifier;
use nalgebra::{Point3, Vector3};
use slotmap::SlotMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Kinds of change announced to downstream consumers after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Positions moved.
    InstanceOffset,
    /// Links, strands or monomers were added or removed.
    Topology,
}

/// Owner of every strand and monomer.
///
/// All topology mutation goes through `&mut System`, which gives each
/// operation exclusive access to the chain links, the global id registry and
/// the shared coordinate tables. Read access goes through [`StrandView`].
#[derive(Debug, Clone, Default)]
pub struct System {
    /// Primary storage for monomers.
    elements: SlotMap<ElementId, Monomer>,
    /// Primary storage for strands.
    strands: SlotMap<StrandId, Strand>,
    /// Lookup from global id to element.
    gid_map: HashMap<usize, ElementId>,
    /// Next global id to hand out; never decreases.
    next_gid: usize,
    /// Flat coordinate tables backing peptide and generic monomers.
    tables: CoordinateTables,
    /// Change kinds announced since the last [`System::take_updates`].
    pending_updates: Vec<ChangeKind>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: ElementId) -> Option<&Monomer> {
        self.elements.get(id)
    }

    pub fn elements_iter(&self) -> impl Iterator<Item = (ElementId, &Monomer)> {
        self.elements.iter()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn strand(&self, id: StrandId) -> Option<&Strand> {
        self.strands.get(id)
    }

    pub fn strands_iter(&self) -> impl Iterator<Item = (StrandId, &Strand)> {
        self.strands.iter()
    }

    pub fn strand_count(&self) -> usize {
        self.strands.len()
    }

    pub fn strand_view(&self, id: StrandId) -> Option<StrandView<'_>> {
        self.strands
            .get(id)
            .map(|strand| StrandView::new(id, strand, &self.elements))
    }

    pub fn set_label(&mut self, id: StrandId, label: Option<String>) -> Option<()> {
        self.strands.get_mut(id)?.label = label;
        Some(())
    }

    pub fn find_by_gid(&self, gid: usize) -> Option<ElementId> {
        self.gid_map.get(&gid).copied()
    }

    pub fn coordinate_tables(&self) -> &CoordinateTables {
        &self.tables
    }

    /// Current frame of a monomer, resolving table-backed positions.
    pub fn frame(&self, id: ElementId) -> Option<OrientedFrame> {
        let monomer = self.elements.get(id)?;
        let position = match monomer.placement {
            Placement::Inline(p) => p,
            Placement::Slot(slot) => self.tables.center(slot)?,
        };
        Some(OrientedFrame::new(position, monomer.a1, monomer.a3))
    }

    /// Coordinate view of a monomer: its centre and its backbone site.
    pub fn coordinates(&self, id: ElementId) -> Option<(Point3<f64>, Point3<f64>)> {
        let monomer = self.elements.get(id)?;
        match monomer.placement {
            Placement::Inline(_) => {
                let frame = self.frame(id)?;
                Some((frame.position, monomer.family.backbone_site(&frame)))
            }
            Placement::Slot(slot) => Some((self.tables.center(slot)?, self.tables.backbone(slot)?)),
        }
    }

    /// Creates a new, empty strand.
    pub fn add_strand(&mut self, kind: StrandKind, label: Option<String>) -> StrandId {
        let id = self.strands.insert(Strand::new(kind, label));
        self.call_updates(&[ChangeKind::Topology]);
        id
    }

    /// Creates an unlinked monomer owned by `strand`, using the strand's family.
    ///
    /// Returns `None` if the strand does not exist, or after one report through
    /// `notifier` when `symbol` is outside the family alphabet or `frame` is
    /// degenerate. The stored axes are rescaled to unit length. The new monomer
    /// becomes part of the chain once it is linked, e.g. through
    /// [`System::set_from`] or [`System::append`].
    pub fn create_monomer(
        &mut self,
        strand: StrandId,
        symbol: char,
        frame: OrientedFrame,
        notifier: &Notifier,
    ) -> Option<ElementId> {
        let kind = self.strands.get(strand)?.kind;
        let (family, symbol) = kind.resolve_monomer(symbol, notifier)?;
        self.insert_monomer(strand, kind, family, symbol, frame, notifier)
    }

    /// Like [`System::create_monomer`], with an explicit "DNA" / "RNA" family
    /// tag for nucleic-acid strands.
    pub fn create_monomer_typed(
        &mut self,
        strand: StrandId,
        family_tag: &str,
        symbol: char,
        frame: OrientedFrame,
        notifier: &Notifier,
    ) -> Option<ElementId> {
        let kind = self.strands.get(strand)?.kind;
        let (family, symbol) = kind.resolve_typed_monomer(family_tag, symbol, notifier)?;
        self.insert_monomer(strand, kind, family, symbol, frame, notifier)
    }

    fn insert_monomer(
        &mut self,
        strand: StrandId,
        kind: StrandKind,
        family: MonomerFamily,
        symbol: char,
        frame: OrientedFrame,
        notifier: &Notifier,
    ) -> Option<ElementId> {
        if frame.is_degenerate() {
            notifier.notify(&format!(
                "Cannot place a {} monomer '{}' on a frame without two independent axes.",
                family, symbol
            ));
            return None;
        }
        let frame = frame.normalized();
        let placement = match kind.coordinate_storage() {
            CoordinateStorage::PerElement => Placement::Inline(frame.position),
            CoordinateStorage::SharedTable => Placement::Slot(
                self.tables
                    .allocate(&frame.position, &family.backbone_site(&frame)),
            ),
        };
        let gid = self.next_gid;
        self.next_gid += 1;
        let id = self.elements.insert(Monomer::new(
            gid, family, symbol, strand, placement, frame.a1, frame.a3,
        ));
        self.gid_map.insert(gid, id);
        Some(id)
    }

    /// Makes `three_prime` the 3' neighbour of `five_prime`.
    pub(crate) fn link(&mut self, five_prime: ElementId, three_prime: ElementId) {
        if let Some(m) = self.elements.get_mut(five_prime) {
            m.n3 = Some(three_prime);
        }
        if let Some(m) = self.elements.get_mut(three_prime) {
            m.n5 = Some(five_prime);
        }
    }

    /// Seeds both ends of `strand` with `seed`, walks outwards to the true
    /// chain ends and claims every reachable monomer for the strand.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingSeed`] for `None`, and a not-found error
    /// for unknown ids. The strand is left untouched in every error case.
    pub fn set_from(
        &mut self,
        strand: StrandId,
        seed: Option<ElementId>,
    ) -> Result<(), TopologyError> {
        let seed = seed.ok_or(TopologyError::MissingSeed)?;
        if !self.elements.contains_key(seed) {
            return Err(TopologyError::ElementNotFound(seed));
        }
        let entry = self
            .strands
            .get_mut(strand)
            .ok_or(TopologyError::StrandNotFound(strand))?;
        entry.end3 = Some(seed);
        entry.end5 = Some(seed);

        self.update_ends(strand)?;
        self.claim_chain(strand);
        Ok(())
    }

    /// Advances the cached ends to the physical chain ends.
    ///
    /// `end3` moves along `n3` and `end5` along `n5` until the chain ends, the
    /// other cached end is reached, or the walk revisits its start. A revisit
    /// while advancing `end3` sets `end5` to the 3' neighbour of that node; a
    /// revisit while advancing `end5` sets `end3` to its 5' neighbour. These two
    /// rules alone decide whether the strand is circular.
    pub fn update_ends(&mut self, strand: StrandId) -> Result<(), TopologyError> {
        let entry = self
            .strands
            .get(strand)
            .ok_or(TopologyError::StrandNotFound(strand))?;
        let valid = |id: Option<ElementId>| id.filter(|e| self.elements.contains_key(*e));
        let (mut end3, mut end5) = match (valid(entry.end3), valid(entry.end5)) {
            (Some(e3), Some(e5)) => (e3, e5),
            (Some(e), None) | (None, Some(e)) => (e, e),
            (None, None) => {
                let entry = &mut self.strands[strand];
                entry.end3 = None;
                entry.end5 = None;
                return Ok(());
            }
        };
        let limit = self.elements.len();

        let start = end3;
        let mut steps = 0;
        while let Some(next) = self.elements.get(end3).and_then(|m| m.n3) {
            if next == end5 {
                break;
            }
            end3 = next;
            steps += 1;
            if end3 == start {
                end5 = self.elements.get(end3).and_then(|m| m.n3).unwrap_or(end3);
                break;
            }
            if steps > limit {
                break;
            }
        }

        let start = end5;
        let mut steps = 0;
        while let Some(prev) = self.elements.get(end5).and_then(|m| m.n5) {
            if prev == end3 {
                break;
            }
            end5 = prev;
            steps += 1;
            if end5 == start {
                end3 = self.elements.get(end5).and_then(|m| m.n5).unwrap_or(end5);
                break;
            }
            if steps > limit {
                break;
            }
        }

        let entry = &mut self.strands[strand];
        entry.end3 = Some(end3);
        entry.end5 = Some(end5);
        Ok(())
    }

    /// Points the back-reference of every monomer reachable from the strand's
    /// 5' end at the strand.
    fn claim_chain(&mut self, strand: StrandId) {
        let Some(start) = self.strands.get(strand).and_then(|s| s.end5) else {
            return;
        };
        let members: Vec<ElementId> = StrandWalk::new(&self.elements, Some(start), Direction::Toward3)
            .map(|(id, _)| id)
            .collect();
        for id in members {
            if let Some(m) = self.elements.get_mut(id) {
                m.strand = strand;
            }
        }
    }

    /// Creates a monomer and links it onto the 3' or 5' end of `strand`.
    ///
    /// An empty strand is seeded with the new monomer. Returns `Ok(None)` when
    /// the factory rejects `symbol` (already reported through `notifier`).
    ///
    /// # Errors
    ///
    /// Fails for an unknown strand, or when the requested end is already linked
    /// (circular strands have no free end).
    pub fn append(
        &mut self,
        strand: StrandId,
        direction: Direction,
        symbol: char,
        frame: OrientedFrame,
        notifier: &Notifier,
    ) -> Result<Option<ElementId>, TopologyError> {
        let entry = self
            .strands
            .get(strand)
            .ok_or(TopologyError::StrandNotFound(strand))?;
        let end = match direction {
            Direction::Toward3 => entry.end3,
            Direction::Toward5 => entry.end5,
        };
        if let Some(end) = end {
            self.ensure_free(end, direction)?;
        }

        let Some(id) = self.create_monomer(strand, symbol, frame, notifier) else {
            return Ok(None);
        };
        match end {
            None => self.set_from(strand, Some(id))?,
            Some(end) => {
                let entry = &mut self.strands[strand];
                match direction {
                    Direction::Toward3 => entry.end3 = Some(id),
                    Direction::Toward5 => entry.end5 = Some(id),
                }
                match direction {
                    Direction::Toward3 => self.link(end, id),
                    Direction::Toward5 => self.link(id, end),
                }
            }
        }
        self.call_updates(&[ChangeKind::Topology]);
        Ok(Some(id))
    }

    fn ensure_free(&self, id: ElementId, direction: Direction) -> Result<(), TopologyError> {
        let monomer = self
            .elements
            .get(id)
            .ok_or(TopologyError::ElementNotFound(id))?;
        let (neighbour, side) = match direction {
            Direction::Toward3 => (monomer.n3, "3'"),
            Direction::Toward5 => (monomer.n5, "5'"),
        };
        match neighbour {
            Some(_) => Err(TopologyError::AlreadyLinked { element: id, side }),
            None => Ok(()),
        }
    }

    /// Links a free 3' end to a free 5' end.
    ///
    /// Joining the two ends of one strand circularizes it. Joining two strands
    /// merges them into the strand owning `five_prime`; every monomer of the
    /// other strand is reassigned and the other strand is removed.
    pub fn ligate(
        &mut self,
        five_prime: ElementId,
        three_prime: ElementId,
    ) -> Result<(), TopologyError> {
        self.ensure_free(five_prime, Direction::Toward3)?;
        self.ensure_free(three_prime, Direction::Toward5)?;
        let left = self.elements[five_prime].strand;
        let right = self.elements[three_prime].strand;
        let left_kind = self
            .strands
            .get(left)
            .ok_or(TopologyError::StrandNotFound(left))?
            .kind;
        let right_kind = self
            .strands
            .get(right)
            .ok_or(TopologyError::StrandNotFound(right))?
            .kind;
        if left_kind != right_kind {
            return Err(TopologyError::KindMismatch {
                left: left_kind,
                right: right_kind,
            });
        }

        self.link(five_prime, three_prime);
        if left == right {
            self.update_ends(left)?;
        } else {
            self.set_from(left, Some(five_prime))?;
            self.strands.remove(right);
            debug!("Merged strand {:?} into {:?}.", right, left);
        }
        self.call_updates(&[ChangeKind::Topology]);
        Ok(())
    }

    /// Breaks the link between `element` and its 3' neighbour.
    ///
    /// A circular strand becomes linear and `Ok(None)` is returned. A linear
    /// strand is split; the part downstream of the nick moves to a new strand
    /// whose id is returned.
    pub fn nick(&mut self, element: ElementId) -> Result<Option<StrandId>, TopologyError> {
        let monomer = self
            .elements
            .get(element)
            .ok_or(TopologyError::ElementNotFound(element))?;
        let next = monomer.n3.ok_or(TopologyError::NotLinked(element))?;
        let strand = monomer.strand;
        let kind = self
            .strands
            .get(strand)
            .ok_or(TopologyError::StrandNotFound(strand))?
            .kind;
        let was_circular = self.strand_view(strand).is_some_and(|v| v.is_circular());

        self.elements[element].n3 = None;
        if let Some(m) = self.elements.get_mut(next) {
            m.n5 = None;
        }
        self.call_updates(&[ChangeKind::Topology]);

        if was_circular {
            let entry = &mut self.strands[strand];
            entry.end3 = Some(element);
            entry.end5 = Some(next);
            return Ok(None);
        }

        let split = self.strands.insert(Strand::new(kind, None));
        self.set_from(strand, Some(element))?;
        self.set_from(split, Some(next))?;
        Ok(Some(split))
    }

    /// Removes one monomer, healing the strand around it.
    ///
    /// Removing an interior monomer of a linear strand splits it; the 3' part
    /// moves to a new strand. Removing a monomer of a circular strand leaves it
    /// linear. The monomer's coordinate-table slot, if any, is not reused.
    pub fn remove_monomer(&mut self, id: ElementId) -> Option<Monomer> {
        let removed = self.elements.remove(id)?;
        self.gid_map.remove(&removed.gid);
        if let Some(n) = removed.n5.and_then(|n| self.elements.get_mut(n)) {
            n.n3 = None;
        }
        if let Some(n) = removed.n3.and_then(|n| self.elements.get_mut(n)) {
            n.n5 = None;
        }

        let strand = removed.strand;
        let Some(entry) = self.strands.get(strand) else {
            self.call_updates(&[ChangeKind::Topology]);
            return Some(removed);
        };
        let kind = entry.kind;
        let was_end = entry.end3 == Some(id) || entry.end5 == Some(id);
        match (removed.n5, removed.n3) {
            // A monomer that was never linked only matters if it seeded the strand.
            (None, None) => {
                if was_end {
                    let entry = &mut self.strands[strand];
                    entry.end3 = None;
                    entry.end5 = None;
                }
            }
            (Some(side), None) | (None, Some(side)) => self.reseed(strand, side),
            (Some(upstream), Some(downstream)) => {
                self.reseed(strand, upstream);
                let joined = StrandWalk::new(&self.elements, Some(upstream), Direction::Toward5)
                    .any(|(e, _)| e == downstream);
                if !joined {
                    let split = self.strands.insert(Strand::new(kind, None));
                    self.reseed(split, downstream);
                }
            }
        }
        self.call_updates(&[ChangeKind::Topology]);
        Some(removed)
    }

    fn reseed(&mut self, strand: StrandId, seed: ElementId) {
        if let Err(e) = self.set_from(strand, Some(seed)) {
            warn!("Could not re-seed strand {:?} from {:?}: {}", strand, seed, e);
        }
    }

    /// Removes a strand together with every monomer it owns.
    pub fn remove_strand(&mut self, id: StrandId) -> Option<Strand> {
        let strand = self.strands.remove(id)?;
        self.elements.retain(|_, m| m.strand != id);
        let elements = &self.elements;
        self.gid_map.retain(|_, e| elements.contains_key(*e));
        self.call_updates(&[ChangeKind::Topology]);
        Some(strand)
    }

    /// Rigidly shifts every monomer of `strand` by `offset`.
    ///
    /// Nucleic-acid monomers own their positions and are moved one by one.
    /// Peptide and generic monomers live in the shared coordinate tables and
    /// are moved with a single bulk update over their contiguous slot block;
    /// slots scattered by earlier merges fall back to per-slot updates.
    pub fn translate_strand(
        &mut self,
        strand: StrandId,
        offset: &Vector3<f64>,
    ) -> Result<(), TopologyError> {
        let view = self
            .strand_view(strand)
            .ok_or(TopologyError::StrandNotFound(strand))?;
        let storage = view.kind().coordinate_storage();
        let members = view.monomers();

        match storage {
            CoordinateStorage::PerElement => {
                for id in &members {
                    if let Some(m) = self.elements.get_mut(*id) {
                        if let Placement::Inline(p) = &mut m.placement {
                            *p += *offset;
                        }
                    }
                }
            }
            CoordinateStorage::SharedTable => {
                let mut slots: Vec<usize> = members
                    .iter()
                    .filter_map(|id| match self.elements.get(*id)?.placement {
                        Placement::Slot(slot) => Some(slot),
                        Placement::Inline(_) => None,
                    })
                    .collect();
                slots.sort_unstable();
                if let (Some(&first), Some(&last)) = (slots.first(), slots.last()) {
                    if last - first + 1 == slots.len() {
                        self.tables.translate_block(first..last + 1, offset);
                    } else {
                        for slot in slots {
                            self.tables.translate_slot(slot, offset);
                        }
                    }
                }
            }
        }

        self.call_updates(&[ChangeKind::InstanceOffset]);
        Ok(())
    }

    /// Announces that the given kinds of data changed.
    pub fn call_updates(&mut self, kinds: &[ChangeKind]) {
        for kind in kinds {
            if !self.pending_updates.contains(kind) {
                self.pending_updates.push(*kind);
            }
        }
        debug!("Pending updates: {:?}", self.pending_updates);
    }

    /// Drains the announced change kinds.
    pub fn take_updates(&mut self) -> Vec<ChangeKind> {
        std::mem::take(&mut self.pending_updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn frame_at(x: f64) -> OrientedFrame {
        OrientedFrame::new(Point3::new(x, 0.0, 0.0), Vector3::x(), Vector3::z())
    }

    fn build(system: &mut System, kind: StrandKind, sequence: &str) -> (StrandId, Vec<ElementId>) {
        let notifier = Notifier::new();
        let strand = system.add_strand(kind, None);
        let direction = kind.natural_direction();
        let ids = sequence
            .chars()
            .enumerate()
            .map(|(i, c)| {
                system
                    .append(strand, direction, c, frame_at(i as f64), &notifier)
                    .unwrap()
                    .unwrap()
            })
            .collect();
        (strand, ids)
    }

    fn build_cycle(system: &mut System, size: usize) -> (StrandId, Vec<ElementId>) {
        let notifier = Notifier::new();
        let strand = system.add_strand(StrandKind::dna(), None);
        let ids: Vec<ElementId> = (0..size)
            .map(|i| {
                system
                    .create_monomer(strand, "ACGT".chars().nth(i % 4).unwrap(), frame_at(i as f64), &notifier)
                    .unwrap()
            })
            .collect();
        for i in 0..size {
            system.link(ids[i], ids[(i + 1) % size]);
        }
        (strand, ids)
    }

    #[test]
    fn linear_strand_walks_between_its_ends_in_both_directions() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGTA");
        let view = system.strand_view(strand).unwrap();

        let forward: Vec<ElementId> = view.walk(false).map(|(id, _)| id).collect();
        let backward: Vec<ElementId> = view.walk(true).map(|(id, _)| id).collect();

        assert_eq!(forward, ids);
        assert_eq!(forward.first().copied(), view.end5());
        assert_eq!(forward.last().copied(), view.end3());
        assert_eq!(backward, ids.iter().rev().copied().collect::<Vec<_>>());
        assert_eq!(view.len(), 5);
        assert!(!view.is_circular());
        assert_eq!(view.sequence(), "ACGTA");
    }

    #[test]
    fn set_from_on_a_cycle_yields_circular_strand() {
        let mut system = System::new();
        let (strand, ids) = build_cycle(&mut system, 6);
        system.set_from(strand, Some(ids[2])).unwrap();
        let view = system.strand_view(strand).unwrap();

        assert!(view.is_circular());
        assert_eq!(view.len(), 6);
        assert_eq!(view.end5(), Some(ids[2]));
        assert_eq!(view.end3(), Some(ids[1]));
        assert_eq!(view.walk(true).count(), 6);
    }

    #[test]
    fn update_ends_revisit_rule_recovers_from_a_stale_end() {
        let mut system = System::new();
        let (strand, ids) = build_cycle(&mut system, 4);
        let stray = system
            .create_monomer(strand, 'A', frame_at(9.0), &Notifier::new())
            .unwrap();
        {
            let entry = &mut system.strands[strand];
            entry.end3 = Some(ids[0]);
            entry.end5 = Some(stray);
        }

        system.update_ends(strand).unwrap();
        let view = system.strand_view(strand).unwrap();

        assert_eq!(view.end3(), Some(ids[0]));
        assert_eq!(view.end5(), Some(ids[1]));
        assert!(view.is_circular());
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn set_from_without_seed_fails_and_leaves_strand_unchanged() {
        let mut system = System::new();
        let (strand, _) = build(&mut system, StrandKind::dna(), "ACG");
        let before = system.strand(strand).cloned();

        assert_eq!(system.set_from(strand, None), Err(TopologyError::MissingSeed));
        assert_eq!(system.strand(strand).cloned(), before);
    }

    #[test]
    fn set_from_seeded_in_the_middle_finds_true_ends() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGTT");
        system.set_from(strand, Some(ids[2])).unwrap();
        let view = system.strand_view(strand).unwrap();
        assert_eq!(view.end5(), Some(ids[0]));
        assert_eq!(view.end3(), Some(ids[4]));
    }

    #[test]
    fn search_finds_whole_sequence_match() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGT");
        let matches = system.strand_view(strand).unwrap().search("ACGT");
        assert_eq!(matches, vec![ids]);
    }

    #[test]
    fn search_reports_match_start_index() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "AACGTA");
        let matches = system.strand_view(strand).unwrap().search("CGT");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0], ids[2..5].to_vec());
    }

    #[test]
    fn search_resyncs_on_first_pattern_character() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "AACG");
        let matches = system.strand_view(strand).unwrap().search("acg");
        assert_eq!(matches, vec![ids[1..4].to_vec()]);
    }

    #[test]
    fn search_without_match_or_pattern_is_empty() {
        let mut system = System::new();
        let (strand, _) = build(&mut system, StrandKind::dna(), "AAAA");
        let view = system.strand_view(strand).unwrap();
        assert!(view.search("GC").is_empty());
        assert!(view.search("").is_empty());
        assert_eq!(view.search("AA").len(), 2);
    }

    #[test]
    fn peptide_natural_order_follows_inverted_links() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::Peptide, "MKV");
        let view = system.strand_view(strand).unwrap();

        assert_eq!(view.sequence(), "MKV");
        assert_eq!(view.monomers(), ids);
        assert_eq!(view.end3(), Some(ids[0]));
        assert_eq!(view.end5(), Some(ids[2]));
        assert_eq!(view.search("KV"), vec![ids[1..3].to_vec()]);
    }

    #[test]
    fn for_each_stops_on_condition() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGTACGT");
        let view = system.strand_view(strand).unwrap();
        let mut seen = Vec::new();
        view.for_each(false, |m, _| m.symbol == 'T', |id, _, _| seen.push(id));
        assert_eq!(seen, ids[..3].to_vec());
        assert_eq!(view.filter(false, |m| m.symbol == 'G'), vec![ids[2], ids[6]]);
        assert_eq!(view.map(true, |_, m| m.symbol).len(), 8);
    }

    #[test]
    fn substrand_wraps_on_circular_strands_only() {
        let mut system = System::new();
        let (linear, ids) = build(&mut system, StrandKind::dna(), "ACGTA");
        let view = system.strand_view(linear).unwrap();
        assert_eq!(view.substrand(ids[1], ids[3]), ids[1..4].to_vec());
        assert_eq!(view.substrand(ids[3], ids[1]), ids[3..].to_vec());

        let (circular, cycle) = build_cycle(&mut system, 5);
        system.set_from(circular, Some(cycle[0])).unwrap();
        let view = system.strand_view(circular).unwrap();
        assert_eq!(
            view.substrand(cycle[3], cycle[1]),
            vec![cycle[3], cycle[4], cycle[0], cycle[1]]
        );
    }

    #[test]
    fn unsupported_symbol_is_reported_once_and_strand_is_unchanged() {
        let mut system = System::new();
        let (strand, _) = build(&mut system, StrandKind::dna(), "ACG");
        let count_before = system.element_count();
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));

        let created = system.create_monomer(strand, 'U', frame_at(5.0), &notifier);
        let typed = system.create_monomer_typed(strand, "PNA", 'A', frame_at(5.0), &notifier);
        drop(notifier);

        assert!(created.is_none());
        assert!(typed.is_none());
        assert_eq!(reports.load(Ordering::SeqCst), 2);
        assert_eq!(system.element_count(), count_before);
        assert_eq!(system.strand_view(strand).unwrap().sequence(), "ACG");
    }

    #[test]
    fn append_rejected_symbol_returns_none() {
        let mut system = System::new();
        let (strand, _) = build(&mut system, StrandKind::rna(), "ACG");
        let result = system
            .append(strand, Direction::Toward3, 'T', frame_at(3.0), &Notifier::new())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(system.strand_view(strand).unwrap().sequence(), "ACG");
    }

    #[test]
    fn translate_round_trip_restores_inline_positions() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGT");
        let before: Vec<_> = ids.iter().map(|id| system.frame(*id).unwrap()).collect();
        let delta = Vector3::new(1.25, -3.5, 0.125);

        system.translate_strand(strand, &delta).unwrap();
        let moved = system.frame(ids[0]).unwrap();
        assert!((moved.position - (before[0].position + delta)).norm() < 1e-12);
        assert!(system.coordinate_tables().is_empty());

        system.translate_strand(strand, &-delta).unwrap();
        for (id, original) in ids.iter().zip(&before) {
            let frame = system.frame(*id).unwrap();
            assert!((frame.position - original.position).norm() < 1e-12);
        }
        assert_eq!(system.take_updates().last(), Some(&ChangeKind::InstanceOffset));
    }

    #[test]
    fn translate_round_trip_restores_table_positions() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::Peptide, "MKVL");
        let (other, other_ids) = build(&mut system, StrandKind::Generic, "XX");
        let untouched = system.coordinates(other_ids[0]).unwrap();
        let before: Vec<_> = ids.iter().map(|id| system.coordinates(*id).unwrap()).collect();
        let delta = Vector3::new(0.5, 0.5, -2.0);

        system.translate_strand(strand, &delta).unwrap();
        let (center, backbone) = system.coordinates(ids[2]).unwrap();
        assert!((center - (before[2].0 + delta)).norm() < 1e-12);
        assert!((backbone - (before[2].1 + delta)).norm() < 1e-12);
        assert_eq!(system.coordinates(other_ids[0]).unwrap(), untouched);

        system.translate_strand(strand, &-delta).unwrap();
        for (id, original) in ids.iter().zip(&before) {
            let (c, b) = system.coordinates(*id).unwrap();
            assert!((c - original.0).norm() < 1e-12);
            assert!((b - original.1).norm() < 1e-12);
        }
        assert!(system.strand(other).is_some());
    }

    #[test]
    fn translate_handles_scattered_slots() {
        let mut system = System::new();
        let (a, a_ids) = build(&mut system, StrandKind::Generic, "AB");
        let (_, spacer) = build(&mut system, StrandKind::Generic, "C");
        let (b, b_ids) = build(&mut system, StrandKind::Generic, "DE");
        // Natural order runs along n5, so the 5' end of `a` is its last element.
        system.ligate(b_ids[0], a_ids[1]).unwrap();
        assert_eq!(system.strand(a), None);
        let spacer_before = system.coordinates(spacer[0]).unwrap();

        system.translate_strand(b, &Vector3::new(0.0, 0.0, 1.0)).unwrap();

        assert_eq!(system.coordinates(spacer[0]).unwrap(), spacer_before);
        for id in a_ids.iter().chain(&b_ids) {
            assert_eq!(system.frame(*id).unwrap().position.z, 1.0);
        }
    }

    #[test]
    fn ligate_merges_strands_and_reassigns_every_monomer() {
        let mut system = System::new();
        let (left, left_ids) = build(&mut system, StrandKind::dna(), "AC");
        let (right, right_ids) = build(&mut system, StrandKind::dna(), "GT");

        system.ligate(left_ids[1], right_ids[0]).unwrap();

        assert!(system.strand(right).is_none());
        let view = system.strand_view(left).unwrap();
        assert_eq!(view.sequence(), "ACGT");
        for id in left_ids.iter().chain(&right_ids) {
            assert_eq!(system.element(*id).unwrap().strand(), left);
        }
    }

    #[test]
    fn ligate_rejects_mixed_kinds_and_linked_ends() {
        let mut system = System::new();
        let (_, dna) = build(&mut system, StrandKind::dna(), "AC");
        let (_, rna) = build(&mut system, StrandKind::rna(), "GU");
        assert!(matches!(
            system.ligate(dna[1], rna[0]),
            Err(TopologyError::KindMismatch { .. })
        ));
        assert!(matches!(
            system.ligate(dna[0], rna[0]),
            Err(TopologyError::AlreadyLinked { .. })
        ));
    }

    #[test]
    fn ligate_own_ends_circularizes_and_nick_linearizes() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGT");
        system.ligate(ids[3], ids[0]).unwrap();
        assert!(system.strand_view(strand).unwrap().is_circular());
        assert_eq!(system.strand_view(strand).unwrap().len(), 4);

        let split = system.nick(ids[1]).unwrap();
        assert!(split.is_none());
        let view = system.strand_view(strand).unwrap();
        assert!(!view.is_circular());
        assert_eq!(view.sequence(), "GTAC");
    }

    #[test]
    fn nick_splits_linear_strand() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGTA");
        let split = system.nick(ids[1]).unwrap().unwrap();

        assert_eq!(system.strand_view(strand).unwrap().sequence(), "AC");
        assert_eq!(system.strand_view(split).unwrap().sequence(), "GTA");
        assert_eq!(system.element(ids[4]).unwrap().strand(), split);
        assert_eq!(system.nick(ids[1]), Err(TopologyError::NotLinked(ids[1])));
    }

    #[test]
    fn remove_monomer_splits_or_heals_the_strand() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACGTA");
        let gid = system.element(ids[2]).unwrap().gid;

        let removed = system.remove_monomer(ids[2]).unwrap();
        assert_eq!(removed.symbol, 'G');
        assert_eq!(system.find_by_gid(gid), None);
        assert_eq!(system.strand_view(strand).unwrap().sequence(), "AC");
        let split = system.element(ids[3]).unwrap().strand();
        assert_ne!(split, strand);
        assert_eq!(system.strand_view(split).unwrap().sequence(), "TA");

        let (circular, cycle) = build_cycle(&mut system, 4);
        system.set_from(circular, Some(cycle[0])).unwrap();
        system.remove_monomer(cycle[1]);
        let view = system.strand_view(circular).unwrap();
        assert!(!view.is_circular());
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn remove_last_monomer_empties_strand() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "A");
        system.remove_monomer(ids[0]);
        let view = system.strand_view(strand).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn remove_strand_drops_its_monomers() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::dna(), "ACG");
        let (keep, _) = build(&mut system, StrandKind::dna(), "T");
        let gid = system.element(ids[0]).unwrap().gid;

        assert!(system.remove_strand(strand).is_some());
        assert_eq!(system.element_count(), 1);
        assert_eq!(system.find_by_gid(gid), None);
        assert!(system.strand(keep).is_some());
    }

    #[test]
    fn gids_are_unique_and_registered() {
        let mut system = System::new();
        let (_, ids) = build(&mut system, StrandKind::dna(), "ACGT");
        for id in &ids {
            let gid = system.element(*id).unwrap().gid;
            assert_eq!(system.find_by_gid(gid), Some(*id));
        }
        let gids: std::collections::HashSet<_> =
            ids.iter().map(|id| system.element(*id).unwrap().gid).collect();
        assert_eq!(gids.len(), 4);
    }

    #[test]
    fn typed_creation_and_relabelling() {
        let notifier = Notifier::new();
        let mut system = System::new();
        let strand = system.add_strand(StrandKind::rna(), None);

        let id = system.create_monomer_typed(strand, "RNA", 'u', OrientedFrame::default(), &notifier);
        assert_eq!(system.element(id.unwrap()).unwrap().symbol, 'U');
        assert!(
            system
                .create_monomer_typed(strand, "PNA", 'A', OrientedFrame::default(), &notifier)
                .is_none()
        );

        assert_eq!(system.set_label(strand, Some("guide".to_string())), Some(()));
        assert_eq!(system.strand(strand).unwrap().label.as_deref(), Some("guide"));
        system.remove_strand(strand);
        assert_eq!(system.set_label(strand, None), None);
    }

    #[test]
    fn removing_an_unlinked_monomer_keeps_the_chain() {
        let mut system = System::new();
        let (strand, _) = build(&mut system, StrandKind::dna(), "ACG");
        let stray = system
            .create_monomer(strand, 'T', frame_at(9.0), &Notifier::new())
            .unwrap();

        system.remove_monomer(stray).unwrap();

        let view = system.strand_view(strand).unwrap();
        assert_eq!(view.sequence(), "ACG");
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(system.element_count(), 3);
    }

    #[test]
    fn removing_the_only_monomer_empties_the_strand() {
        let mut system = System::new();
        let (strand, ids) = build(&mut system, StrandKind::rna(), "G");
        system.remove_monomer(ids[0]).unwrap();
        let view = system.strand_view(strand).unwrap();
        assert!(view.is_empty());
        assert_eq!((view.end3(), view.end5()), (None, None));
    }

    #[test]
    fn stored_axes_are_unit_length() {
        let notifier = Notifier::new();
        let mut system = System::new();
        let dna = system.add_strand(StrandKind::dna(), None);
        let peptide = system.add_strand(StrandKind::Peptide, None);
        let frame = OrientedFrame::new(Point3::origin(), Vector3::new(0.0, 3.0, 0.0), Vector3::new(0.0, 0.0, 2.0));

        for strand in [dna, peptide] {
            let id = system.create_monomer(strand, 'A', frame, &notifier).unwrap();
            let monomer = system.element(id).unwrap();
            assert!((monomer.a1().norm() - 1.0).abs() < 1e-12);
            assert!((monomer.a3().norm() - 1.0).abs() < 1e-12);
        }

        let id = system.create_monomer(dna, 'C', frame, &notifier).unwrap();
        let (center, backbone) = system.coordinates(id).unwrap();
        let expected = (0.34f64.powi(2) + 0.3408f64.powi(2)).sqrt();
        assert!(((backbone - center).norm() - expected).abs() < 1e-9);
    }

    #[test]
    fn degenerate_frames_are_reported_and_rejected() {
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));
        let mut system = System::new();
        let strand = system.add_strand(StrandKind::dna(), None);
        let flat = OrientedFrame::new(Point3::origin(), Vector3::z(), Vector3::z() * 2.0);

        assert_eq!(system.create_monomer(strand, 'A', flat, &notifier), None);
        assert_eq!(
            system.append(strand, Direction::Toward3, 'A', flat, &notifier),
            Ok(None)
        );
        drop(notifier);

        assert_eq!(reports.load(Ordering::SeqCst), 2);
        assert_eq!(system.element_count(), 0);
    }

    #[test]
    fn coordinates_expose_backbone_site_per_family() {
        let mut system = System::new();
        let (dna, dna_ids) = build(&mut system, StrandKind::dna(), "A");
        let (_, aa_ids) = build(&mut system, StrandKind::Peptide, "A");

        let (center, backbone) = system.coordinates(dna_ids[0]).unwrap();
        let frame = system.frame(dna_ids[0]).unwrap();
        assert_eq!(center, frame.position);
        assert_eq!(backbone, MonomerFamily::Dna.backbone_site(&frame));

        let (center, backbone) = system.coordinates(aa_ids[0]).unwrap();
        assert_eq!(center, backbone);
        assert!(matches!(
            system.element(aa_ids[0]).unwrap().placement(),
            Placement::Slot(0)
        ));
        assert!(system.strand(dna).is_some());
    }
}
