//! Evaluates Bézier curves in the Bernstein basis.
//!
//! A curve of degree `n` with the nodes `P₀, ..., Pₙ` is evaluated in barycentric coordinates
//!
//! `B(λ₁, λ₂) = Σₖ C(n, k) λ₁ⁿ⁻ᵏ λ₂ᵏ Pₖ` with `λ₁ + λ₂ = 1`,
//!
//! which corresponds to the parameter `s = λ₂`.
//! The sum is accumulated Horner-style in `λ₁`. Near `s = 1`, forming `1 - s` inside the
//! recurrence would lose digits, so the caller provides `λ₁` directly.
//!
//! Every output column only depends on the nodes and its own parameter pair,
//! so a batch can be split up arbitrarily between threads.

use crate::types::{MatD, VecD};

/// Evaluates the curve for every barycentric pair `(lambda1[j], lambda2[j])`.
///
/// Returns a `dimension × lambda1.len()` matrix with one point per column.
///
/// # Panics
/// If `lambda1` and `lambda2` differ in length or the curve has no nodes.
pub fn evaluate_curve_barycentric(nodes: &MatD, lambda1: &[f64], lambda2: &[f64]) -> MatD {
    assert_eq!(
        lambda1.len(),
        lambda2.len(),
        "Found {} first but {} second barycentric coordinates.",
        lambda1.len(),
        lambda2.len()
    );
    assert!(nodes.ncols() > 0, "A curve must have at least one node.");

    let dim = nodes.nrows();
    let degree = nodes.ncols() - 1;
    let mut evaluated = MatD::zeros(dim, lambda1.len());

    if degree == 0 {
        for mut col in evaluated.column_iter_mut() {
            col.copy_from(&nodes.column(0));
        }
        return evaluated;
    }

    for (mut col, (&l1, &l2)) in evaluated.column_iter_mut().zip(lambda1.iter().zip(lambda2)) {
        col.copy_from(&nodes.column(0));
        col *= l1;

        let mut lambda2_pow = 1.0;
        let mut binom_val = 1.0;
        for k in 1..degree {
            lambda2_pow *= l2;
            binom_val = binom_val * (degree - k + 1) as f64 / k as f64;
            for r in 0..dim {
                col[r] = (col[r] + binom_val * lambda2_pow * nodes[(r, k)]) * l1;
            }
        }

        for r in 0..dim {
            col[r] += lambda2_pow * l2 * nodes[(r, degree)];
        }
    }

    evaluated
}

/// Evaluates the curve at every parameter in `s_vals` via `λ₁ = 1 - s`, `λ₂ = s`.
pub fn evaluate_multi(nodes: &MatD, s_vals: &[f64]) -> MatD {
    let lambda1: Vec<f64> = s_vals.iter().map(|s| 1.0 - s).collect();
    evaluate_curve_barycentric(nodes, &lambda1, s_vals)
}

/// Evaluates the curve at a single parameter `s`.
pub fn evaluate(nodes: &MatD, s: f64) -> VecD {
    evaluate_multi(nodes, &[s]).column(0).clone_owned()
}

/// Performs a single De Casteljau round, blending each pair of adjacent nodes as
/// `λ₁ Pᵢ + λ₂ Pᵢ₊₁`. The result has one node less than `nodes`.
pub(crate) fn de_casteljau_round(nodes: &MatD, lambda1: f64, lambda2: f64) -> MatD {
    MatD::from_fn(nodes.nrows(), nodes.ncols() - 1, |r, i| lambda1 * nodes[(r, i)] + lambda2 * nodes[(r, i + 1)])
}
