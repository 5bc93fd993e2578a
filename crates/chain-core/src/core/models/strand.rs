use super::ids::{ElementId, StrandId};
use super::monomer::{Monomer, MonomerFamily};
use crate::core::notify::Notifier;
use slotmap::SlotMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NucleicAcidType {
    Dna,
    Rna,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported nucleic acid type '{0}' (expected DNA or RNA)")]
pub struct ParseNucleicAcidTypeError(pub String);

impl FromStr for NucleicAcidType {
    type Err = ParseNucleicAcidTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dna" => Ok(NucleicAcidType::Dna),
            "rna" => Ok(NucleicAcidType::Rna),
            _ => Err(ParseNucleicAcidTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for NucleicAcidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NucleicAcidType::Dna => "DNA",
                NucleicAcidType::Rna => "RNA",
            }
        )
    }
}

impl From<NucleicAcidType> for MonomerFamily {
    fn from(na: NucleicAcidType) -> Self {
        match na {
            NucleicAcidType::Dna => MonomerFamily::Dna,
            NucleicAcidType::Rna => MonomerFamily::Rna,
        }
    }
}

/// Which neighbour link a walk or an extension follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow `n3` links.
    Toward3,
    /// Follow `n5` links.
    Toward5,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Toward3 => Direction::Toward5,
            Direction::Toward5 => Direction::Toward3,
        }
    }
}

/// How the positions of a strand's monomers are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateStorage {
    /// Each monomer owns its position.
    PerElement,
    /// Positions live in the system's flat coordinate tables.
    SharedTable,
}

/// Closed set of strand families.
///
/// The kind owns every family-specific decision: which monomers the factory
/// may create, which walking direction is natural, and where coordinates live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrandKind {
    NucleicAcid(NucleicAcidType),
    Peptide,
    Generic,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid strand kind string '{0}'")]
pub struct ParseStrandKindError(pub String);

impl FromStr for StrandKind {
    type Err = ParseStrandKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dna" => Ok(StrandKind::NucleicAcid(NucleicAcidType::Dna)),
            "rna" => Ok(StrandKind::NucleicAcid(NucleicAcidType::Rna)),
            "peptide" | "protein" => Ok(StrandKind::Peptide),
            "generic" => Ok(StrandKind::Generic),
            _ => Err(ParseStrandKindError(s.to_string())),
        }
    }
}

impl fmt::Display for StrandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandKind::NucleicAcid(na) => write!(f, "{}", na),
            StrandKind::Peptide => write!(f, "peptide"),
            StrandKind::Generic => write!(f, "generic"),
        }
    }
}

impl StrandKind {
    pub fn dna() -> Self {
        StrandKind::NucleicAcid(NucleicAcidType::Dna)
    }

    pub fn rna() -> Self {
        StrandKind::NucleicAcid(NucleicAcidType::Rna)
    }

    pub fn monomer_family(&self) -> MonomerFamily {
        match self {
            StrandKind::NucleicAcid(na) => (*na).into(),
            StrandKind::Peptide => MonomerFamily::AminoAcid,
            StrandKind::Generic => MonomerFamily::Generic,
        }
    }

    /// Class tag used by the serialization view.
    pub fn class_tag(&self) -> &'static str {
        match self {
            StrandKind::NucleicAcid(_) => "NucleicAcidStrand",
            StrandKind::Peptide => "Peptide",
            StrandKind::Generic => "Generic",
        }
    }

    /// Peptide and generic chains store the natural order along `n5` links,
    /// opposite to nucleic acids.
    pub fn inverts_traversal(&self) -> bool {
        !matches!(self, StrandKind::NucleicAcid(_))
    }

    /// Link direction that grows the strand at the end of its natural order.
    pub fn natural_direction(&self) -> Direction {
        if self.inverts_traversal() {
            Direction::Toward5
        } else {
            Direction::Toward3
        }
    }

    pub fn coordinate_storage(&self) -> CoordinateStorage {
        match self {
            StrandKind::NucleicAcid(_) => CoordinateStorage::PerElement,
            StrandKind::Peptide | StrandKind::Generic => CoordinateStorage::SharedTable,
        }
    }

    /// The element factory decision: family and canonical symbol for a new
    /// monomer on this strand, or `None` after one report when the symbol is
    /// outside the family alphabet.
    pub fn resolve_monomer(
        &self,
        symbol: char,
        notifier: &Notifier,
    ) -> Option<(MonomerFamily, char)> {
        let family = self.monomer_family();
        match family.canonical_symbol(symbol) {
            Some(canonical) => Some((family, canonical)),
            None => {
                notifier.notify(&format!(
                    "Cannot create a {} monomer of type '{}'.",
                    family, symbol
                ));
                None
            }
        }
    }

    /// Factory decision with an explicit nucleic-acid family tag ("DNA" or "RNA").
    ///
    /// Any other tag, or a non nucleic-acid strand, is reported once and
    /// yields `None`.
    pub fn resolve_typed_monomer(
        &self,
        family_tag: &str,
        symbol: char,
        notifier: &Notifier,
    ) -> Option<(MonomerFamily, char)> {
        if !matches!(self, StrandKind::NucleicAcid(_)) {
            notifier.notify(&format!(
                "A {} strand cannot hold {} monomers.",
                self, family_tag
            ));
            return None;
        }
        match family_tag.parse::<NucleicAcidType>() {
            Ok(na) => StrandKind::NucleicAcid(na).resolve_monomer(symbol, notifier),
            Err(e) => {
                notifier.notify(&e.to_string());
                None
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Cannot seed a strand without an element")]
    MissingSeed,
    #[error("Strand not found: {0:?}")]
    StrandNotFound(StrandId),
    #[error("Element not found: {0:?}")]
    ElementNotFound(ElementId),
    #[error("Element {element:?} already has a {side} neighbour")]
    AlreadyLinked {
        element: ElementId,
        side: &'static str,
    },
    #[error("Element {0:?} has no 3' neighbour to detach")]
    NotLinked(ElementId),
    #[error("Cannot join a {left} strand with a {right} strand")]
    KindMismatch { left: StrandKind, right: StrandKind },
}

/// An ordered, possibly circular chain of monomers.
///
/// The strand only caches its two ends; the chain itself is the `n3`/`n5`
/// links stored on the monomers. Circularity is never stored either: it is
/// read off the links (`end3.n3 == end5`).
#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    pub kind: StrandKind,
    pub label: Option<String>,
    pub(crate) end3: Option<ElementId>,
    pub(crate) end5: Option<ElementId>,
}

impl Strand {
    pub(crate) fn new(kind: StrandKind, label: Option<String>) -> Self {
        Self {
            kind,
            label,
            end3: None,
            end5: None,
        }
    }

    pub fn end3(&self) -> Option<ElementId> {
        self.end3
    }

    pub fn end5(&self) -> Option<ElementId> {
        self.end5
    }
}

/// Iterator over the monomers of a chain along one link direction.
///
/// Stops at a chain end, on returning to its start element, or after visiting
/// as many elements as exist, whichever comes first.
pub struct StrandWalk<'a> {
    elements: &'a SlotMap<ElementId, Monomer>,
    start: Option<ElementId>,
    next: Option<ElementId>,
    direction: Direction,
    remaining: usize,
}

impl<'a> StrandWalk<'a> {
    pub(crate) fn new(
        elements: &'a SlotMap<ElementId, Monomer>,
        start: Option<ElementId>,
        direction: Direction,
    ) -> Self {
        Self {
            elements,
            start,
            next: start,
            direction,
            remaining: elements.len(),
        }
    }
}

impl<'a> Iterator for StrandWalk<'a> {
    type Item = (ElementId, &'a Monomer);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        let monomer = self.elements.get(id)?;
        self.remaining -= 1;
        let following = match self.direction {
            Direction::Toward3 => monomer.n3,
            Direction::Toward5 => monomer.n5,
        };
        self.next = following.filter(|n| Some(*n) != self.start);
        Some((id, monomer))
    }
}

/// Read-only view of one strand together with the monomer storage it links into.
#[derive(Clone, Copy)]
pub struct StrandView<'a> {
    id: StrandId,
    strand: &'a Strand,
    elements: &'a SlotMap<ElementId, Monomer>,
}

impl<'a> StrandView<'a> {
    pub(crate) fn new(
        id: StrandId,
        strand: &'a Strand,
        elements: &'a SlotMap<ElementId, Monomer>,
    ) -> Self {
        Self {
            id,
            strand,
            elements,
        }
    }

    pub fn id(&self) -> StrandId {
        self.id
    }

    pub fn strand(&self) -> &'a Strand {
        self.strand
    }

    pub fn kind(&self) -> StrandKind {
        self.strand.kind
    }

    pub fn end3(&self) -> Option<ElementId> {
        self.strand.end3
    }

    pub fn end5(&self) -> Option<ElementId> {
        self.strand.end5
    }

    /// The single traversal primitive.
    ///
    /// `reverse == false` walks in the strand's natural order; the flag is
    /// applied before the family inversion, so for nucleic acids the natural
    /// walk runs `end5 → n3` and for peptide/generic chains `end3 → n5`.
    pub fn walk(&self, reverse: bool) -> StrandWalk<'a> {
        if reverse ^ self.strand.kind.inverts_traversal() {
            StrandWalk::new(self.elements, self.strand.end3, Direction::Toward5)
        } else {
            StrandWalk::new(self.elements, self.strand.end5, Direction::Toward3)
        }
    }

    /// Calls `f` for each monomer until `stop` returns `true` for one.
    pub fn for_each<S, F>(&self, reverse: bool, mut stop: S, mut f: F)
    where
        S: FnMut(&Monomer, usize) -> bool,
        F: FnMut(ElementId, &'a Monomer, usize),
    {
        for (i, (id, monomer)) in self.walk(reverse).enumerate() {
            if stop(monomer, i) {
                break;
            }
            f(id, monomer, i);
        }
    }

    pub fn map<T, F>(&self, reverse: bool, mut f: F) -> Vec<T>
    where
        F: FnMut(ElementId, &'a Monomer) -> T,
    {
        let mut out = Vec::new();
        self.for_each(reverse, |_, _| false, |id, m, _| out.push(f(id, m)));
        out
    }

    pub fn filter<P>(&self, reverse: bool, mut predicate: P) -> Vec<ElementId>
    where
        P: FnMut(&Monomer) -> bool,
    {
        let mut out = Vec::new();
        self.for_each(
            reverse,
            |_, _| false,
            |id, m, _| {
                if predicate(m) {
                    out.push(id);
                }
            },
        );
        out
    }

    /// `true` when the 3' end links back to the 5' end.
    pub fn is_circular(&self) -> bool {
        match (self.strand.end3, self.strand.end5) {
            (Some(end3), Some(end5)) => self
                .elements
                .get(end3)
                .is_some_and(|m| m.n3 == Some(end5)),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        let mut count = 0;
        self.for_each(false, |_, _| false, |_, _, _| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.strand.end5.is_none() && self.strand.end3.is_none()
    }

    /// Type symbols in natural order.
    pub fn sequence(&self) -> String {
        self.map(false, |_, m| m.symbol).into_iter().collect()
    }

    /// Element ids in natural order.
    pub fn monomers(&self) -> Vec<ElementId> {
        self.map(false, |id, _| id)
    }

    /// Inclusive run from `from` to `to` in natural order.
    ///
    /// On a circular strand the run wraps past the natural start once. Returns
    /// an empty list if `from` is not on the strand; if `to` is never reached
    /// the run extends to the last element.
    pub fn substrand(&self, from: ElementId, to: ElementId) -> Vec<ElementId> {
        let order = self.monomers();
        let Some(start) = order.iter().position(|id| *id == from) else {
            return Vec::new();
        };
        let limit = if self.is_circular() {
            order.len()
        } else {
            order.len() - start
        };

        let mut run = Vec::new();
        for id in order.iter().cycle().skip(start).take(limit) {
            run.push(*id);
            if *id == to {
                break;
            }
        }
        run
    }

    /// Finds every run of consecutive monomers whose symbols match `pattern`.
    ///
    /// Matching walks the natural order with a single-character resync: on a
    /// mismatch the partial match is dropped and the current monomer is
    /// re-tested against the first pattern character. Overlapping matches are
    /// not reported.
    pub fn search(&self, pattern: &str) -> Vec<Vec<ElementId>> {
        let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_uppercase()).collect();
        let mut matches = Vec::new();
        if pattern.is_empty() {
            return matches;
        }

        let mut current: Vec<ElementId> = Vec::with_capacity(pattern.len());
        self.for_each(
            false,
            |_, _| false,
            |id, monomer, _| {
                if monomer.symbol == pattern[current.len()] {
                    current.push(id);
                } else {
                    current.clear();
                    if monomer.symbol == pattern[0] {
                        current.push(id);
                    }
                }
                if current.len() == pattern.len() {
                    matches.push(std::mem::take(&mut current));
                }
            },
        );
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn nucleic_acid_type_parses_case_insensitively() {
        assert_eq!("DNA".parse::<NucleicAcidType>(), Ok(NucleicAcidType::Dna));
        assert_eq!(" rna ".parse::<NucleicAcidType>(), Ok(NucleicAcidType::Rna));
        assert!("XNA".parse::<NucleicAcidType>().is_err());
        assert_eq!(NucleicAcidType::Rna.to_string(), "RNA");
    }

    #[test]
    fn strand_kind_parses_and_displays() {
        assert_eq!("dna".parse::<StrandKind>(), Ok(StrandKind::dna()));
        assert_eq!("Protein".parse::<StrandKind>(), Ok(StrandKind::Peptide));
        assert_eq!("generic".parse::<StrandKind>(), Ok(StrandKind::Generic));
        assert!("lipid".parse::<StrandKind>().is_err());
        assert_eq!(StrandKind::rna().to_string(), "RNA");
        assert_eq!(StrandKind::Peptide.to_string(), "peptide");
    }

    #[test]
    fn strand_kind_capabilities_differ_per_family() {
        assert!(!StrandKind::dna().inverts_traversal());
        assert!(StrandKind::Peptide.inverts_traversal());
        assert!(StrandKind::Generic.inverts_traversal());
        assert_eq!(
            StrandKind::rna().coordinate_storage(),
            CoordinateStorage::PerElement
        );
        assert_eq!(
            StrandKind::Generic.coordinate_storage(),
            CoordinateStorage::SharedTable
        );
        assert_eq!(StrandKind::Peptide.monomer_family(), MonomerFamily::AminoAcid);
        assert_eq!(StrandKind::dna().class_tag(), "NucleicAcidStrand");
    }

    #[test]
    fn resolve_monomer_accepts_family_symbols_silently() {
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(
            StrandKind::rna().resolve_monomer('u', &notifier),
            Some((MonomerFamily::Rna, 'U'))
        );
        drop(notifier);
        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn resolve_monomer_reports_unsupported_symbol_once() {
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(StrandKind::dna().resolve_monomer('U', &notifier), None);
        drop(notifier);
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resolve_typed_monomer_reports_unsupported_family_tag_once() {
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(
            StrandKind::dna().resolve_typed_monomer("RNA", 'U', &notifier),
            Some((MonomerFamily::Rna, 'U'))
        );
        assert_eq!(
            StrandKind::dna().resolve_typed_monomer("XNA", 'A', &notifier),
            None
        );
        drop(notifier);
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resolve_typed_monomer_rejects_non_nucleic_strands() {
        let reports = AtomicUsize::new(0);
        let notifier = Notifier::with_callback(Box::new(|_: &str| {
            reports.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(
            StrandKind::Peptide.resolve_typed_monomer("DNA", 'A', &notifier),
            None
        );
        drop(notifier);
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn direction_reversed_swaps_links() {
        assert_eq!(Direction::Toward3.reversed(), Direction::Toward5);
        assert_eq!(Direction::Toward5.reversed(), Direction::Toward3);
    }
}
