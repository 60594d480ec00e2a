//! Splits a curve into two curves of the same degree.
//!
//! The De Casteljau triangle at the parameter `s` is built round by round. The first node of every
//! round forms the left curve, covering `[0, s]`, and the last node of every round forms the right
//! curve, covering `[s, 1]`. Both halves are reparameterized onto `[0, 1]`.

use crate::types::MatD;

/// Splits the curve at its parametric midpoint `s = 1/2`.
pub fn subdivide_nodes(nodes: &MatD) -> (MatD, MatD) {
    subdivide_nodes_at(nodes, 0.5)
}

/// Splits the curve at the parameter `s`.
///
/// `s` may lie outside `[0, 1]`, in which case one of the two curves extends the original one.
pub fn subdivide_nodes_at(nodes: &MatD, s: f64) -> (MatD, MatD) {
    let (dim, num_nodes) = nodes.shape();
    let n = num_nodes - 1;

    let mut left_nodes = MatD::zeros(dim, num_nodes);
    let mut right_nodes = MatD::zeros(dim, num_nodes);
    let mut workspace = nodes.clone();

    left_nodes.column_mut(0).copy_from(&workspace.column(0));
    right_nodes.column_mut(n).copy_from(&workspace.column(n));

    let (lambda1, lambda2) = (1.0 - s, s);
    for level in 1..=n {
        // Blend in place; column `i` only reads column `i + 1`, which is overwritten later.
        for i in 0..=n - level {
            for r in 0..dim {
                workspace[(r, i)] = lambda1 * workspace[(r, i)] + lambda2 * workspace[(r, i + 1)];
            }
        }
        left_nodes.column_mut(level).copy_from(&workspace.column(0));
        right_nodes.column_mut(n - level).copy_from(&workspace.column(n - level));
    }

    (left_nodes, right_nodes)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dmatrix;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::curve::basis::evaluate;

    #[fixture]
    fn cubic() -> MatD {
        dmatrix![
            0.0, 1.0, 3.0, 4.0;
            0.0, 2.5,-1.0, 1.0;
            1.0, 0.0, 2.0, 0.5;
        ]
    }

    #[test]
    fn quadratic() {
        let nodes = dmatrix![
            0., 1., 2.;
            0., 2., 0.;
        ];
        let (left, right) = subdivide_nodes(&nodes);
        assert_eq!(
            left,
            dmatrix![
                0., 0.5, 1.;
                0., 1. , 1.;
            ]
        );
        assert_eq!(
            right,
            dmatrix![
                1., 1.5, 2.;
                1., 1. , 0.;
            ]
        );
    }

    #[test]
    fn line() {
        let (left, right) = subdivide_nodes(&dmatrix![-1., 3.;]);
        assert_eq!(left, dmatrix![-1., 1.;]);
        assert_eq!(right, dmatrix![1., 3.;]);
    }

    #[test]
    fn constant() {
        let point = dmatrix![2.; 7.];
        let (left, right) = subdivide_nodes(&point);
        assert_eq!(left, point);
        assert_eq!(right, point);
    }

    #[rstest]
    fn halves_meet_at_midpoint(cubic: MatD) {
        let (left, right) = subdivide_nodes(&cubic);
        let midpoint = evaluate(&cubic, 0.5);

        assert_eq!(left.column(0), cubic.column(0));
        assert_eq!(right.column(3), cubic.column(3));
        assert_eq!(left.column(3), right.column(0));
        assert_relative_eq!(evaluate(&left, 1.0), midpoint, epsilon = 1e-14);
        assert_relative_eq!(evaluate(&right, 0.0), midpoint, epsilon = 1e-14);
    }

    #[rstest]
    fn halves_reproduce_curve(cubic: MatD, #[values(0.0, 0.2, 0.5, 0.9, 1.0)] t: f64) {
        let (left, right) = subdivide_nodes(&cubic);
        assert_relative_eq!(evaluate(&left, t), evaluate(&cubic, 0.5 * t), epsilon = 1e-13);
        assert_relative_eq!(evaluate(&right, t), evaluate(&cubic, 0.5 + 0.5 * t), epsilon = 1e-13);
    }

    #[rstest]
    fn arbitrary_split(cubic: MatD, #[values(0.1, 0.7, 1.5, -0.25)] s: f64) {
        let (left, right) = subdivide_nodes_at(&cubic, s);
        assert_relative_eq!(left.column(3).clone_owned(), evaluate(&cubic, s), epsilon = 1e-12);
        assert_relative_eq!(evaluate(&left, 0.5), evaluate(&cubic, 0.5 * s), epsilon = 1e-12);
        assert_relative_eq!(evaluate(&right, 0.5), evaluate(&cubic, s + 0.5 * (1.0 - s)), epsilon = 1e-12);
    }
}
