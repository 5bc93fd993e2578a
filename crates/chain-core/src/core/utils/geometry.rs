use nalgebra::{Rotation3, Unit, Vector3};

/// Vectors shorter than this are treated as zero length.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Minimal rotation taking `from` onto `to`.
///
/// Unlike [`Rotation3::rotation_between`], antiparallel inputs resolve to a half
/// turn about an arbitrary axis perpendicular to `from` instead of `None`.
/// Returns `None` only when either input has zero length.
pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    if from.norm() < LENGTH_EPSILON || to.norm() < LENGTH_EPSILON {
        return None;
    }
    Rotation3::rotation_between(from, to).or_else(|| {
        let axis = Unit::new_normalize(any_perpendicular(from));
        Some(Rotation3::from_axis_angle(&axis, std::f64::consts::PI))
    })
}

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_radians: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_radians)
}

/// Component of `v` lying in the plane whose normal is `normal`.
pub fn project_on_plane(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    let n = normal.normalize();
    v - n * v.dot(&n)
}

/// Angle from `a` to `b` about `axis`, in radians, measured after both are
/// projected onto the plane perpendicular to `axis`. Positive for a
/// right-handed turn.
pub fn signed_angle_about_axis(a: &Vector3<f64>, b: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let n = axis.normalize();
    let pa = project_on_plane(a, &n);
    let pb = project_on_plane(b, &n);
    let sin = pa.cross(&pb).dot(&n);
    let cos = pa.dot(&pb);
    sin.atan2(cos)
}

pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&helper).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn rotation_to_align_maps_source_onto_target() {
        let from = Vector3::new(1.0, 2.0, 3.0);
        let to = Vector3::new(-2.0, 0.5, 1.0);
        let rot = rotation_to_align(&from, &to).unwrap();
        let mapped = (rot * from).normalize();
        assert!((mapped - to.normalize()).norm() < TOLERANCE);
    }

    #[test]
    fn rotation_to_align_handles_antiparallel_vectors() {
        let from = Vector3::z();
        let to = -Vector3::z();
        let rot = rotation_to_align(&from, &to).unwrap();
        assert!((rot * from - to).norm() < TOLERANCE);
    }

    #[test]
    fn rotation_to_align_rejects_zero_vectors() {
        assert!(rotation_to_align(&Vector3::zeros(), &Vector3::x()).is_none());
        assert!(rotation_to_align(&Vector3::x(), &Vector3::zeros()).is_none());
    }

    #[test]
    fn rotation_from_axis_angle_turns_x_into_y_about_z() {
        let rot = rotation_from_axis_angle(&Vector3::z(), FRAC_PI_2);
        assert!((rot * Vector3::x() - Vector3::y()).norm() < TOLERANCE);
    }

    #[test]
    fn project_on_plane_removes_normal_component() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let projected = project_on_plane(&v, &Vector3::new(0.0, 0.0, 5.0));
        assert!((projected - Vector3::new(1.0, 2.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn signed_angle_about_axis_reports_handedness() {
        let a = Vector3::x();
        let b = Vector3::y();
        assert!((signed_angle_about_axis(&a, &b, &Vector3::z()) - FRAC_PI_2).abs() < TOLERANCE);
        assert!((signed_angle_about_axis(&b, &a, &Vector3::z()) + FRAC_PI_2).abs() < TOLERANCE);
        assert!((signed_angle_about_axis(&a, &-a, &Vector3::z()).abs() - PI).abs() < TOLERANCE);
    }

    #[test]
    fn any_perpendicular_is_unit_and_orthogonal() {
        for v in [Vector3::x(), Vector3::y(), Vector3::new(0.3, -0.2, 0.9)] {
            let p = any_perpendicular(&v);
            assert!((p.norm() - 1.0).abs() < TOLERANCE);
            assert!(p.dot(&v).abs() < TOLERANCE);
        }
    }
}
