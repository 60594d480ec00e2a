//! Tangents and curvature.
//!
//! The derivative of a Bézier curve `B` of degree `n` is the hodograph, a Bézier curve of degree `n - 1`
//! with the nodes `n (Pᵢ₊₁ - Pᵢ)`.
//! Curvature combines the first derivative `T` and the second derivative `C`:
//!
//! - in 2D the signed curvature `κ = (T × C) / |T|³`, positive for counter-clockwise turning,
//! - in any other dimension the unsigned curvature `κ = √(|T|²|C|² - (T·C)²) / |T|³`.

use thiserror::Error;

use crate::{
    curve::basis::evaluate,
    types::{MatD, VecD},
};

#[derive(Error, Debug, PartialEq)]
pub enum CurvatureError {
    #[error("The tangent vector vanishes at `s = {s}`, so the curvature is undefined.")]
    DegenerateTangent { s: f64 },
}

/// Returns the nodes of the derivative curve.
///
/// A constant curve has the single zero node as derivative.
pub fn derivative_nodes(nodes: &MatD) -> MatD {
    let degree = nodes.ncols() - 1;
    if degree == 0 {
        return MatD::zeros(nodes.nrows(), 1);
    }

    let mut first_deriv = MatD::zeros(nodes.nrows(), degree);
    for (i, mut col) in first_deriv.column_iter_mut().enumerate() {
        col.copy_from(&(degree as f64 * (nodes.column(i + 1) - nodes.column(i))));
    }
    first_deriv
}

/// Evaluates the tangent vector `B'(s)`.
pub fn evaluate_hodograph(s: f64, nodes: &MatD) -> VecD {
    evaluate(&derivative_nodes(nodes), s)
}

/// Computes the curvature at `s` from a precomputed tangent vector `tangent_vec = B'(s)`.
///
/// Curves of degree one or lower have zero curvature wherever the tangent does not vanish.
pub fn get_curvature(nodes: &MatD, tangent_vec: &VecD, s: f64) -> Result<f64, CurvatureError> {
    assert_eq!(
        tangent_vec.len(),
        nodes.nrows(),
        "The tangent has dimension {} but the curve has dimension {}.",
        tangent_vec.len(),
        nodes.nrows()
    );

    let denominator = tangent_vec.norm().powi(3);
    if denominator == 0.0 {
        return Err(CurvatureError::DegenerateTangent { s });
    }

    if nodes.ncols() <= 2 {
        return Ok(0.0);
    }

    let concavity = evaluate(&derivative_nodes(&derivative_nodes(nodes)), s);

    let numerator = if tangent_vec.len() == 2 {
        tangent_vec[0] * concavity[1] - tangent_vec[1] * concavity[0]
    } else {
        let dot = tangent_vec.dot(&concavity);
        (tangent_vec.norm_squared() * concavity.norm_squared() - dot * dot).max(0.0).sqrt()
    };

    Ok(numerator / denominator)
}
