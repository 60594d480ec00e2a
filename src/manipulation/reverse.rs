//! Reverses the curve parametrization.
//!
//! The reversed curve `C(s) = B(1 - s)` traces the same points in the opposite direction.
//! Its nodes are the original nodes in reverse order.

use crate::curve::Curve;

pub fn reverse(curve: &mut Curve) -> &mut Curve {
    curve.nodes.reverse();
    curve
}

pub fn reversed(curve: &Curve) -> Curve {
    let mut clone = curve.clone();
    clone.reverse();
    clone
}
