use super::engine::HelixError;
use crate::core::models::frame::OrientedFrame;

/// Bead spacing for peptide chains: a 3.8 Å Cα–Cα distance in simulation
/// length units (8.518 Å).
pub const DEFAULT_LINEAR_SPACING: f64 = 0.4461;

/// Continues a straight chain from `frame` along its `a3` axis.
///
/// `forward` grows along `+a3`, otherwise along `-a3`. Every new frame keeps the
/// seed's (normalized) orientation.
pub fn extend_linear(
    frame: &OrientedFrame,
    count: usize,
    forward: bool,
    spacing: f64,
) -> Result<Vec<OrientedFrame>, HelixError> {
    if frame.is_degenerate() {
        return Err(HelixError::DegenerateFrame);
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(HelixError::InvalidParams(format!(
            "linear spacing must be positive, got {spacing}"
        )));
    }
    let unit = frame.normalized();
    let step = if forward { spacing } else { -spacing };
    Ok((1..=count)
        .map(|k| unit.translated(&(unit.a3 * (step * k as f64))))
        .collect())
}
