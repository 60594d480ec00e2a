//! Flat buffer interface for callers that hold curves as plain `f64` arrays.
//!
//! Every buffer holding nodes or points stores them one after another, i.e. the coordinates of node 0,
//! then those of node 1, and so on. This is the column-major storage of the `dimension × count`
//! matrices used throughout the crate, so buffers are copied without reordering.
//!
//! Output buffers are sized by the caller and never resized. All lengths are validated before any
//! computation, so nothing is written when an error is returned.

use thiserror::Error;

use crate::{
    curve::{
        basis,
        hodograph::{self, CurvatureError},
        locate::{self, newton, LocateError},
        Curve, CurveError,
    },
    manipulation::{elevate, reduce, specialize, subdivide},
    types::{MatD, VecD},
};

#[derive(Error, Debug, PartialEq)]
pub enum FlatError {
    /// An output or auxiliary buffer has the wrong length.
    #[error("Buffer `{name}` holds {actual} values, but {expected} are required.")]
    Layout { name: &'static str, expected: usize, actual: usize },

    /// The node buffer does not describe a valid curve.
    #[error("invalid curve: {0}")]
    Curve(#[from] CurveError),

    #[error("curvature failed: {0}")]
    Curvature(#[from] CurvatureError),

    #[error("point location failed: {0}")]
    Locate(#[from] LocateError),
}

fn check_len(name: &'static str, buffer: &[f64], expected: usize) -> Result<(), FlatError> {
    match buffer.len() {
        actual if actual == expected => Ok(()),
        actual => Err(FlatError::Layout { name, expected, actual }),
    }
}

/// Returns the number of nodes of a curve of `degree`. Saturates, so that the node buffer check fails.
fn node_count(degree: usize) -> usize {
    degree.saturating_add(1)
}

/// Returns the length of a buffer holding `count` points. Saturates to a length no slice can have.
fn buffer_len(dimension: usize, count: usize) -> usize {
    dimension.saturating_mul(count)
}

fn write(matrix: &MatD, out: &mut [f64]) {
    out.copy_from_slice(matrix.as_slice());
}

/// Evaluates the curve at the barycentric pairs `(lambda1[j], lambda2[j])` into `evaluated`,
/// a `dimension × lambda1.len()` buffer.
pub fn evaluate_curve_barycentric(
    degree: usize,
    dimension: usize,
    nodes: &[f64],
    lambda1: &[f64],
    lambda2: &[f64],
    evaluated: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, node_count(degree), nodes)?;
    if lambda1.len() != lambda2.len() {
        return Err(CurveError::BatchMismatch { lambda1: lambda1.len(), lambda2: lambda2.len() }.into());
    }
    check_len("evaluated", evaluated, buffer_len(dimension, lambda1.len()))?;

    write(&basis::evaluate_curve_barycentric(curve.nodes(), lambda1, lambda2), evaluated);
    Ok(())
}

/// Evaluates the curve at every parameter in `s_vals` into `evaluated`, a `dimension × s_vals.len()` buffer.
pub fn evaluate_multi(
    degree: usize,
    dimension: usize,
    nodes: &[f64],
    s_vals: &[f64],
    evaluated: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, node_count(degree), nodes)?;
    check_len("evaluated", evaluated, buffer_len(dimension, s_vals.len()))?;

    write(&basis::evaluate_multi(curve.nodes(), s_vals), evaluated);
    Ok(())
}

pub fn specialize_curve_generic(
    degree: usize,
    dimension: usize,
    nodes: &[f64],
    start: f64,
    end: f64,
    new_nodes: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, node_count(degree), nodes)?;
    check_len("new_nodes", new_nodes, nodes.len())?;

    write(&specialize::specialize_curve_generic(curve.nodes(), start, end), new_nodes);
    Ok(())
}

/// Specializes a curve with exactly three nodes.
pub fn specialize_curve_quadratic(
    dimension: usize,
    nodes: &[f64],
    start: f64,
    end: f64,
    new_nodes: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, 3, nodes)?;
    check_len("new_nodes", new_nodes, nodes.len())?;

    write(&specialize::specialize_curve_quadratic(curve.nodes(), start, end), new_nodes);
    Ok(())
}

/// Specializes a curve covering `[curve_start, curve_end]` of some original curve.
///
/// Returns `(true_start, true_end)`, the interval covered by `new_nodes` on the original curve.
#[allow(clippy::too_many_arguments)]
pub fn specialize_curve(
    degree: usize,
    dimension: usize,
    nodes: &[f64],
    start: f64,
    end: f64,
    curve_start: f64,
    curve_end: f64,
    new_nodes: &mut [f64],
) -> Result<(f64, f64), FlatError> {
    let curve = Curve::from_flat(dimension, node_count(degree), nodes)?;
    check_len("new_nodes", new_nodes, nodes.len())?;

    let specialization = specialize::specialize_curve(curve.nodes(), start, end, curve_start, curve_end);
    write(&specialization.nodes, new_nodes);
    Ok((specialization.true_start, specialization.true_end))
}

/// Evaluates the tangent vector at `s` into `hodograph`, a buffer of length `dimension`.
pub fn evaluate_hodograph(
    s: f64,
    degree: usize,
    dimension: usize,
    nodes: &[f64],
    hodograph: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, node_count(degree), nodes)?;
    check_len("hodograph", hodograph, dimension)?;

    hodograph.copy_from_slice(hodograph::evaluate_hodograph(s, curve.nodes()).as_slice());
    Ok(())
}

/// Splits the curve at `s = 1/2` into two buffers of the size of `nodes`.
pub fn subdivide_nodes(
    num_nodes: usize,
    dimension: usize,
    nodes: &[f64],
    left_nodes: &mut [f64],
    right_nodes: &mut [f64],
) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("left_nodes", left_nodes, nodes.len())?;
    check_len("right_nodes", right_nodes, nodes.len())?;

    let (left, right) = subdivide::subdivide_nodes(curve.nodes());
    write(&left, left_nodes);
    write(&right, right_nodes);
    Ok(())
}

/// Returns the parameter after one Newton step from `s` towards `point`.
pub fn newton_refine(
    num_nodes: usize,
    dimension: usize,
    nodes: &[f64],
    point: &[f64],
    s: f64,
) -> Result<f64, FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("point", point, dimension)?;

    Ok(newton::newton_refine(curve.nodes(), &VecD::from_column_slice(point), s)?)
}

/// Returns the parameter of `point` on the curve.
pub fn locate_point(num_nodes: usize, dimension: usize, nodes: &[f64], point: &[f64]) -> Result<f64, FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("point", point, dimension)?;

    Ok(locate::locate_point(curve.nodes(), &VecD::from_column_slice(point))?)
}

/// Elevates the curve into `elevated`, a buffer holding `num_nodes + 1` nodes.
pub fn elevate_nodes(num_nodes: usize, dimension: usize, nodes: &[f64], elevated: &mut [f64]) -> Result<(), FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("elevated", elevated, buffer_len(dimension, node_count(num_nodes)))?;

    write(&elevate::elevate_nodes(curve.nodes()), elevated);
    Ok(())
}

/// Returns the curvature at `s` given the tangent vector at `s`.
pub fn get_curvature(
    num_nodes: usize,
    dimension: usize,
    nodes: &[f64],
    tangent_vec: &[f64],
    s: f64,
) -> Result<f64, FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("tangent_vec", tangent_vec, dimension)?;

    Ok(hodograph::get_curvature(curve.nodes(), &VecD::from_column_slice(tangent_vec), s)?)
}

/// Reduces the curve into `reduced`, a buffer holding `num_nodes - 1` nodes.
///
/// Returns `true` if the curve cannot be reduced, in which case `reduced` is left untouched.
pub fn reduce_pseudo_inverse(
    num_nodes: usize,
    dimension: usize,
    nodes: &[f64],
    reduced: &mut [f64],
) -> Result<bool, FlatError> {
    let curve = Curve::from_flat(dimension, num_nodes, nodes)?;
    check_len("reduced", reduced, buffer_len(dimension, num_nodes - 1))?;

    match reduce::reduce_pseudo_inverse(curve.nodes()) {
        Ok(matrix) => {
            write(&matrix, reduced);
            Ok(false)
        }
        Err(_) => Ok(true),
    }
}
