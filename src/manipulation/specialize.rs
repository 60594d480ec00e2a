//! Reparameterizes a curve onto an arbitrary interval `[start, end]`.
//!
//! The `k`-th node of the specialized curve of degree `n` is the blossom
//! `B(start, ..., start, end, ..., end)` with `n - k` arguments `start` and `k` arguments `end`.
//! Blossoms are evaluated by De Casteljau rounds. As the blossom is symmetric, the rounds for `start`
//! are always applied before those for `end`, so that all nodes share the partial results.
//!
//! Neither `start < end` nor `[start, end] ⊆ [0, 1]` is required:
//! `start > end` reverses the direction and parameters outside of `[0, 1]` extrapolate the curve.

use crate::{curve::basis::de_casteljau_round, types::MatD};

/// The nodes of a specialized curve together with the interval they cover on the original curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    pub nodes: MatD,
    pub true_start: f64,
    pub true_end: f64,
}

/// Specializes a curve of any degree.
pub fn specialize_curve_generic(nodes: &MatD, start: f64, end: f64) -> MatD {
    let (dim, num_nodes) = nodes.shape();

    // `partial[j]` holds the partially evaluated blossom with `j` arguments `end`.
    let mut partial = vec![nodes.clone()];
    for level in 1..num_nodes {
        let mut next = Vec::with_capacity(level + 1);
        next.push(de_casteljau_round(&partial[0], 1.0 - start, start));
        next.extend(partial.iter().map(|p| de_casteljau_round(p, 1.0 - end, end)));
        partial = next;
    }

    let mut new_nodes = MatD::zeros(dim, num_nodes);
    for (k, blossom) in partial.iter().enumerate() {
        new_nodes.column_mut(k).copy_from(&blossom.column(0));
    }
    new_nodes
}

/// Specializes a line.
///
/// # Panics
/// If the curve does not have exactly two nodes.
pub fn specialize_curve_linear(nodes: &MatD, start: f64, end: f64) -> MatD {
    assert_eq!(nodes.ncols(), 2, "A line has two nodes. Found: {}.", nodes.ncols());

    let mut new_nodes = MatD::zeros(nodes.nrows(), 2);
    new_nodes.column_mut(0).copy_from(&((1.0 - start) * nodes.column(0) + start * nodes.column(1)));
    new_nodes.column_mut(1).copy_from(&((1.0 - end) * nodes.column(0) + end * nodes.column(1)));
    new_nodes
}

/// Specializes a quadratic curve in closed form.
///
/// The arithmetic is the one of [`specialize_curve_generic`] unrolled for three nodes,
/// so both produce the same nodes.
///
/// # Panics
/// If the curve does not have exactly three nodes.
pub fn specialize_curve_quadratic(nodes: &MatD, start: f64, end: f64) -> MatD {
    assert_eq!(nodes.ncols(), 3, "A quadratic curve has three nodes. Found: {}.", nodes.ncols());

    let minus_start = 1.0 - start;
    let minus_end = 1.0 - end;

    let start_left = minus_start * nodes.column(0) + start * nodes.column(1);
    let start_right = minus_start * nodes.column(1) + start * nodes.column(2);
    let end_left = minus_end * nodes.column(0) + end * nodes.column(1);
    let end_right = minus_end * nodes.column(1) + end * nodes.column(2);

    let mut new_nodes = MatD::zeros(nodes.nrows(), 3);
    new_nodes.column_mut(0).copy_from(&(minus_start * &start_left + start * &start_right));
    new_nodes.column_mut(1).copy_from(&(minus_end * &start_left + end * &start_right));
    new_nodes.column_mut(2).copy_from(&(minus_end * &end_left + end * &end_right));
    new_nodes
}

/// Specializes a curve that itself covers `[curve_start, curve_end]` of some original curve.
///
/// Iterative algorithms narrowing down a parameter interval call this repeatedly.
/// `true_start` and `true_end` locate the specialized curve on the original one.
pub fn specialize_curve(nodes: &MatD, start: f64, end: f64, curve_start: f64, curve_end: f64) -> Specialization {
    let new_nodes = match nodes.ncols() {
        2 => specialize_curve_linear(nodes, start, end),
        3 => specialize_curve_quadratic(nodes, start, end),
        _ => specialize_curve_generic(nodes, start, end),
    };

    let interval_delta = curve_end - curve_start;
    Specialization {
        nodes: new_nodes,
        true_start: curve_start + start * interval_delta,
        true_end: curve_start + end * interval_delta,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dmatrix;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{curve::basis::evaluate, manipulation::subdivide::subdivide_nodes};

    #[fixture]
    fn quintic() -> MatD {
        dmatrix![
            0.0, 1.0, 3.0,-1.0, 2.5, 4.0;
            0.0, 2.0,-1.0, 3.0, 0.5, 1.0;
        ]
    }

    #[fixture]
    fn arch() -> MatD {
        dmatrix![
            0., 1., 2.;
            0., 2., 0.;
        ]
    }

    #[rstest]
    fn identity(quintic: MatD) {
        assert_relative_eq!(specialize_curve_generic(&quintic, 0.0, 1.0), quintic, epsilon = 1e-15);
    }

    #[rstest]
    fn reversal(quintic: MatD) {
        let mut expected = quintic.clone();
        crate::curve::nodes::reverse(&mut expected);
        assert_relative_eq!(specialize_curve_generic(&quintic, 1.0, 0.0), expected, epsilon = 1e-15);
    }

    #[rstest]
    fn halves_match_subdivision(quintic: MatD) {
        let (left, right) = subdivide_nodes(&quintic);
        assert_relative_eq!(specialize_curve_generic(&quintic, 0.0, 0.5), left, epsilon = 1e-14);
        assert_relative_eq!(specialize_curve_generic(&quintic, 0.5, 1.0), right, epsilon = 1e-14);
    }

    #[rstest]
    fn reproduces_curve(
        quintic: MatD,
        #[values((0.25, 0.75), (0.8, 0.1), (-0.5, 1.5))] interval: (f64, f64),
        #[values(0.0, 0.3, 1.0)] t: f64,
    ) {
        let (start, end) = interval;
        let specialized = specialize_curve_generic(&quintic, start, end);
        assert_relative_eq!(
            evaluate(&specialized, t),
            evaluate(&quintic, start + t * (end - start)),
            epsilon = 1e-10
        );
    }

    #[rstest]
    fn round_trip(quintic: MatD) {
        let half = specialize_curve_generic(&quintic, 0.0, 0.5);
        let full = specialize_curve_generic(&half, 0.0, 2.0);
        assert_relative_eq!(full, quintic, epsilon = 1e-11);
    }

    #[rstest]
    fn quadratic_equals_generic(
        arch: MatD,
        #[values(0.0, 0.25, -1.0, 0.9)] start: f64,
        #[values(1.0, 0.5, 3.0, 0.1)] end: f64,
    ) {
        assert_relative_eq!(
            specialize_curve_quadratic(&arch, start, end),
            specialize_curve_generic(&arch, start, end),
            epsilon = 1e-15
        );
    }

    #[rstest]
    fn linear_equals_generic(#[values(0.0, 0.25, -1.0)] start: f64, #[values(1.0, 0.5, 3.0)] end: f64) {
        let line = dmatrix![
            1., 4.;
            2., 0.;
            0., 1.;
        ];
        assert_relative_eq!(
            specialize_curve_linear(&line, start, end),
            specialize_curve_generic(&line, start, end),
            epsilon = 1e-15
        );
    }

    #[rstest]
    fn quadratic_example(arch: MatD) {
        assert_eq!(
            specialize_curve_quadratic(&arch, 0.25, 0.75),
            dmatrix![
                0.5 , 1.  , 1.5 ;
                0.75, 1.25, 0.75;
            ]
        );
    }

    #[test]
    fn constant() {
        let point = dmatrix![3.; -1.];
        assert_eq!(specialize_curve_generic(&point, 0.2, 0.4), point);
    }

    #[test]
    #[should_panic]
    fn quadratic_rejects_cubic() {
        specialize_curve_quadratic(&dmatrix![0., 1., 2., 3.;], 0.0, 1.0);
    }

    #[rstest]
    fn tracks_interval(quintic: MatD) {
        let first = specialize_curve(&quintic, 0.25, 0.75, 0.0, 1.0);
        assert_eq!((first.true_start, first.true_end), (0.25, 0.75));

        let second = specialize_curve(&first.nodes, 0.5, 1.0, first.true_start, first.true_end);
        assert_eq!((second.true_start, second.true_end), (0.5, 0.75));
        assert_relative_eq!(second.nodes, specialize_curve_generic(&quintic, 0.5, 0.75), epsilon = 1e-13);
    }

    #[rstest]
    fn dispatches_by_degree(arch: MatD) {
        let specialization = specialize_curve(&arch, 0.1, 0.6, 0.0, 1.0);
        assert_eq!(specialization.nodes, specialize_curve_quadratic(&arch, 0.1, 0.6));
    }
}
