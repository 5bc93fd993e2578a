use super::params::HelixParams;
use crate::core::models::frame::OrientedFrame;
use crate::core::models::strand::Direction;
use crate::core::utils::geometry::{rotation_from_axis_angle, rotation_to_align};
use nalgebra::{Point3, Unit, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HelixError {
    #[error("Cannot derive a helix from a degenerate frame (zero-length or collinear axes)")]
    DegenerateFrame,
    #[error("Invalid helix parameters: {0}")]
    InvalidParams(String),
}

/// Helix axis implied by a seed frame: `a3` tilted towards `a1` by the
/// inclination, about `a2`.
///
/// Frames produced by [`extend_helix`] imply the same axis again, so an
/// extension can be continued from its own end.
pub fn helix_axis(
    frame: &OrientedFrame,
    params: &HelixParams,
) -> Result<Unit<Vector3<f64>>, HelixError> {
    if frame.is_degenerate() {
        return Err(HelixError::DegenerateFrame);
    }
    let frame = frame.normalized();
    let tilt = rotation_from_axis_angle(&frame.a2(), -params.inclination());
    Ok(Unit::new_normalize(tilt * frame.a3))
}

/// Continues an idealized double helix from `frame` by `count` monomers.
///
/// Residue `k` (1-based, negated for [`Direction::Toward5`]) is the base-pair
/// template screwed by `k·twist` about and `k·rise` along the helix axis. The
/// result holds the `count` primary frames in growth order; when `complement`
/// is set they are followed by the `count` paired frames in reverse, so the
/// partner of primary `i` sits at index `2·count - 1 - i`.
///
/// The chord geometry works on helix anchors, `position - backbone_to_center·a1`.
/// The backbone site of the coordinate view adds a fixed per-family offset in
/// the monomer frame on top of that anchor (see
/// [`MonomerFamily::backbone_site`](crate::core::models::monomer::MonomerFamily::backbone_site)),
/// so exported sites trace the same screw as the anchors but are not pinned to
/// the chord itself.
///
/// The template is turned about the axis by the *unsigned* angle between its
/// chord and the seed's `a1`, so seeds mirrored about the chord yield the same
/// first step.
///
/// # Errors
///
/// [`HelixError::DegenerateFrame`] for a frame without a usable triad and
/// [`HelixError::InvalidParams`] for geometrically impossible parameters.
pub fn extend_helix(
    frame: &OrientedFrame,
    params: &HelixParams,
    count: usize,
    direction: Direction,
    complement: bool,
) -> Result<Vec<OrientedFrame>, HelixError> {
    params.validate()?;
    let axis = helix_axis(frame, params)?.into_inner();
    if count == 0 {
        return Ok(Vec::new());
    }
    let a1 = frame.a1.normalize();

    // Base-pair template with the helix axis along +z.
    let chord = params.chord_length();
    let half_rise = params.bp_backbone_distance / 2.0 * params.inclination().sin();
    let offset = params.center_to_chord();
    let r1 = Vector3::new(offset, -chord / 2.0, -half_rise);
    let r2 = Vector3::new(offset, chord / 2.0, half_rise);

    let onto_axis = rotation_to_align(&Vector3::z(), &axis).ok_or(HelixError::DegenerateFrame)?;
    let (r1, r2) = (onto_axis * r1, onto_axis * r2);
    let spin = rotation_from_axis_angle(&axis, (r2 - r1).angle(&a1));
    let (r1, r2) = (spin * r1, spin * r2);
    let chord_dir = (r2 - r1).normalize();

    let backbone: Point3<f64> = frame.position - a1 * params.backbone_to_center;
    let center = backbone - r1;
    let sign = match direction {
        Direction::Toward3 => 1.0,
        Direction::Toward5 => -1.0,
    };

    let mut primary = Vec::with_capacity(if complement { count * 2 } else { count });
    let mut paired = Vec::with_capacity(if complement { count } else { 0 });
    for step in 1..=count {
        let k = step as f64 * sign;
        let screw = rotation_from_axis_angle(&axis, k * params.twist());
        let shift = axis * (k * params.rise);
        let base = screw * chord_dir;
        let stack = (axis - base * base.dot(&axis)).normalize();

        primary.push(OrientedFrame::new(
            center + screw * r1 + shift + base * params.backbone_to_center,
            base,
            stack,
        ));
        if complement {
            paired.push(OrientedFrame::new(
                center + screw * r2 + shift - base * params.backbone_to_center,
                -base,
                -stack,
            ));
        }
    }
    primary.extend(paired.into_iter().rev());
    Ok(primary)
}
