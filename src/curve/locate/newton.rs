//! Newton's method for projecting a point onto the curve.
//!
//! The squared distance `|p - B(s)|²` is minimized by a Gauss-Newton step in the parameter,
//!
//! `s' = s + (p - B(s)) · B'(s) / (B'(s) · B'(s))`.
//!
//! The step neglects the second derivative, which vanishes as `B(s)` approaches a point on the curve.

use crate::{
    curve::{basis::evaluate, hodograph::evaluate_hodograph, locate::LocateError},
    types::{MatD, VecD},
};

/// Performs a single Newton step from `s` towards the parameter of `point`.
///
/// # Panics
/// If the point and the curve differ in dimension.
pub fn newton_refine(nodes: &MatD, point: &VecD, s: f64) -> Result<f64, LocateError> {
    assert_eq!(
        point.len(),
        nodes.nrows(),
        "The point has dimension {} but the curve has dimension {}.",
        point.len(),
        nodes.nrows()
    );

    let derivative = evaluate_hodograph(s, nodes);
    let denominator = derivative.norm_squared();
    if denominator == 0.0 {
        return Err(LocateError::ZeroDerivative { s });
    }

    let pt_delta = point - evaluate(nodes, s);
    Ok(s + pt_delta.dot(&derivative) / denominator)
}
