use crate::core::utils::geometry::LENGTH_EPSILON;
use nalgebra::{Point3, Vector3};

/// Spatial pose of a single monomer.
///
/// Only `a1` (backbone towards base, or the analogous local axis of a
/// non-nucleotide monomer) and `a3` (stacking / backbone tangent) are stored.
/// The third axis is always derived through [`OrientedFrame::a2`], so the triad
/// cannot drift out of orthogonality through independent mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedFrame {
    /// Centre of mass of the monomer.
    pub position: Point3<f64>,
    /// Unit axis pointing from the backbone towards the base.
    pub a1: Vector3<f64>,
    /// Unit stacking axis.
    pub a3: Vector3<f64>,
}

impl Default for OrientedFrame {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            a1: Vector3::x(),
            a3: Vector3::z(),
        }
    }
}

impl OrientedFrame {
    pub fn new(position: Point3<f64>, a1: Vector3<f64>, a3: Vector3<f64>) -> Self {
        Self { position, a1, a3 }
    }

    /// Derived third axis, `normalize(a1 × a3)`.
    pub fn a2(&self) -> Vector3<f64> {
        self.a1.cross(&self.a3).normalize()
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }

    /// Returns the frame with both stored axes rescaled to unit length.
    pub fn normalized(&self) -> Self {
        Self {
            position: self.position,
            a1: self.a1.normalize(),
            a3: self.a3.normalize(),
        }
    }

    /// `true` when either stored axis has (near) zero length or the two are
    /// (near) collinear, in which case no orthogonal triad can be derived.
    pub fn is_degenerate(&self) -> bool {
        let n1 = self.a1.norm();
        let n3 = self.a3.norm();
        if n1 < LENGTH_EPSILON || n3 < LENGTH_EPSILON {
            return true;
        }
        self.a1.cross(&self.a3).norm() / (n1 * n3) < LENGTH_EPSILON
    }

    /// Absolute cosine between `a1` and `a3`; zero for a perfectly orthogonal frame.
    pub fn orthogonality_error(&self) -> f64 {
        (self.a1.dot(&self.a3) / (self.a1.norm() * self.a3.norm())).abs()
    }
}
