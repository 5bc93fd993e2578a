use super::frame::OrientedFrame;
use super::ids::{ElementId, StrandId};
use nalgebra::{Point3, Vector3};
use phf::{Map, Set, phf_map, phf_set};
use std::fmt;

// Backbone-site offsets, in simulation length units, along the frame axes.
const DNA_BACKBONE_A1: f64 = -0.34;
const DNA_BACKBONE_A2: f64 = 0.3408;
const RNA_BACKBONE_A1: f64 = -0.4;
const RNA_BACKBONE_A3: f64 = 0.2;

static AMINO_ACID_CODES: Set<char> = phf_set! {
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
};

static DNA_COMPLEMENT: Map<char, char> = phf_map! {
    'A' => 'T', 'T' => 'A', 'C' => 'G', 'G' => 'C',
};

static RNA_COMPLEMENT: Map<char, char> = phf_map! {
    'A' => 'U', 'U' => 'A', 'C' => 'G', 'G' => 'C',
};

/// Chemical family of a monomer, which fixes its symbol alphabet and the
/// geometry of its backbone site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonomerFamily {
    Dna,
    Rna,
    AminoAcid,
    Generic,
}

impl fmt::Display for MonomerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MonomerFamily::Dna => "DNA",
                MonomerFamily::Rna => "RNA",
                MonomerFamily::AminoAcid => "amino acid",
                MonomerFamily::Generic => "generic",
            }
        )
    }
}

impl MonomerFamily {
    /// Canonical (uppercase) form of `symbol` if it belongs to this family's alphabet.
    pub fn canonical_symbol(&self, symbol: char) -> Option<char> {
        let upper = symbol.to_ascii_uppercase();
        let accepted = match self {
            MonomerFamily::Dna => matches!(upper, 'A' | 'C' | 'G' | 'T'),
            MonomerFamily::Rna => matches!(upper, 'A' | 'C' | 'G' | 'U'),
            MonomerFamily::AminoAcid => AMINO_ACID_CODES.contains(&upper),
            MonomerFamily::Generic => upper.is_ascii_alphanumeric(),
        };
        accepted.then_some(upper)
    }

    /// Watson-Crick partner of `symbol`; `None` for non-nucleotide families.
    pub fn complement(&self, symbol: char) -> Option<char> {
        let upper = symbol.to_ascii_uppercase();
        match self {
            MonomerFamily::Dna => DNA_COMPLEMENT.get(&upper).copied(),
            MonomerFamily::Rna => RNA_COMPLEMENT.get(&upper).copied(),
            MonomerFamily::AminoAcid | MonomerFamily::Generic => None,
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        matches!(self, MonomerFamily::Dna | MonomerFamily::Rna)
    }

    /// Backbone-site position derived from a frame.
    ///
    /// This is the secondary position of the coordinate view. Amino acids and
    /// generic particles are single beads, so their backbone site is the centre.
    pub fn backbone_site(&self, frame: &OrientedFrame) -> Point3<f64> {
        match self {
            MonomerFamily::Dna => {
                frame.position + frame.a1 * DNA_BACKBONE_A1 + frame.a2() * DNA_BACKBONE_A2
            }
            MonomerFamily::Rna => {
                frame.position + frame.a1 * RNA_BACKBONE_A1 + frame.a3 * RNA_BACKBONE_A3
            }
            MonomerFamily::AminoAcid | MonomerFamily::Generic => frame.position,
        }
    }

    /// Recovers `a3` from the centre, the backbone site and `a1`.
    ///
    /// Inverse of [`MonomerFamily::backbone_site`]; returns `None` for families
    /// whose backbone site carries no orientation information.
    pub fn a3_from_backbone(
        &self,
        position: &Point3<f64>,
        backbone: &Point3<f64>,
        a1: &Vector3<f64>,
    ) -> Option<Vector3<f64>> {
        let offset = backbone - position;
        match self {
            MonomerFamily::Dna => {
                let a2 = (offset - a1 * DNA_BACKBONE_A1).normalize();
                Some(a2.cross(a1).normalize())
            }
            MonomerFamily::Rna => Some((offset - a1 * RNA_BACKBONE_A1).normalize()),
            MonomerFamily::AminoAcid | MonomerFamily::Generic => None,
        }
    }
}

/// Where the centre of a monomer is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Position held by the monomer itself (nucleic acids).
    Inline(Point3<f64>),
    /// Stable slot index into the system's flat coordinate tables (peptide and generic chains).
    Slot(usize),
}

/// One chain unit: a nucleotide, an amino acid or a generic particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomer {
    /// Globally unique integer id.
    pub gid: usize,
    pub family: MonomerFamily,
    /// Uppercase type symbol from the family alphabet.
    pub symbol: char,
    pub(crate) strand: StrandId,
    pub(crate) n3: Option<ElementId>,
    pub(crate) n5: Option<ElementId>,
    pub(crate) placement: Placement,
    pub(crate) a1: Vector3<f64>,
    pub(crate) a3: Vector3<f64>,
}

impl Monomer {
    pub(crate) fn new(
        gid: usize,
        family: MonomerFamily,
        symbol: char,
        strand: StrandId,
        placement: Placement,
        a1: Vector3<f64>,
        a3: Vector3<f64>,
    ) -> Self {
        Self {
            gid,
            family,
            symbol,
            strand,
            n3: None,
            n5: None,
            placement,
            a1,
            a3,
        }
    }

    pub fn strand(&self) -> StrandId {
        self.strand
    }

    /// 3' neighbour.
    pub fn n3(&self) -> Option<ElementId> {
        self.n3
    }

    /// 5' neighbour.
    pub fn n5(&self) -> Option<ElementId> {
        self.n5
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn a1(&self) -> Vector3<f64> {
        self.a1
    }

    pub fn a3(&self) -> Vector3<f64> {
        self.a3
    }
}
