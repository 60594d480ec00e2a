//! Finds the parameter `s` of a point lying on the curve.
//!
//! The search runs in two phases:
//!
//! 1. The curve is subdivided breadth-first. Pieces whose bounding box does not contain the point are
//!    discarded, as a Bézier curve lies within the convex hull of its nodes. After
//!    [`max_subdivisions`][LocateParams::max_subdivisions] levels, the surviving pieces are grouped
//!    into clusters of touching parameter intervals.
//! 2. The midpoint of each cluster is polished with [Newton steps][newton::newton_refine], in order of
//!    increasing parameter. The first result that reproduces the point within the box padding is returned.
//!
//! The box padding scales with the largest node coordinate, as rounding does. A point covered more than
//! once, e.g. at a self-intersection, yields the lowest parameter.

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    curve::basis::evaluate,
    manipulation::subdivide::subdivide_nodes,
    types::{MatD, NodeHelpers, VecD},
};

pub mod newton;

#[derive(Error, Debug, PartialEq)]
pub enum LocateError {
    /// No piece of the subdivided curve comes close to the point.
    #[error("The point does not lie on the curve.")]
    NotOnCurve,

    /// The candidates could not be narrowed down to a single parameter.
    #[error("The point could not be narrowed down further than the parameter interval `[{start}, {end}]`.")]
    Unresolved { start: f64, end: f64 },

    /// The point is on the curve but Newton's method did not settle.
    #[error("Newton's method did not converge within {iterations} iterations, the last step was `{step}`.")]
    NotConverged { iterations: usize, step: f64 },

    #[error("The curve derivative vanishes at `s = {s}`.")]
    ZeroDerivative { s: f64 },

    #[error("The point has dimension {actual} but the curve has dimension {expected}.")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Tolerances and limits of the point search.
#[derive(Debug, Clone, PartialEq)]
pub struct LocateParams {
    /// Number of subdivision levels.
    pub max_subdivisions: usize,

    /// Maximum number of pieces kept per level.
    pub max_candidates: usize,

    /// Maximum parameter width of the cluster handed to Newton's method.
    pub max_cluster_width: f64,

    /// Bounding box padding relative to the largest absolute node coordinate, absorbing rounding in the
    /// subdivision. Polished parameters are accepted if they reproduce the point within this padding.
    pub box_padding: f64,

    /// Maximum number of Newton steps.
    pub max_newton_iterations: usize,

    /// Newton's method stops once a step is not larger than this.
    pub newton_tolerance: f64,
}

impl Default for LocateParams {
    fn default() -> Self {
        Self {
            max_subdivisions: 20,
            max_candidates: 4096,
            max_cluster_width: 1.0 / 65_536.0,      // 2⁻¹⁶
            box_padding: 1.0 / 1_099_511_627_776.0, // 2⁻⁴⁰
            max_newton_iterations: 16,
            newton_tolerance: 1e-10,
        }
    }
}

impl LocateParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_max_subdivisions(mut self, max_subdivisions: usize) -> Self {
        self.max_subdivisions = max_subdivisions;
        self
    }

    #[must_use]
    pub const fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    #[must_use]
    pub const fn with_max_cluster_width(mut self, max_cluster_width: f64) -> Self {
        self.max_cluster_width = max_cluster_width;
        self
    }

    #[must_use]
    pub const fn with_box_padding(mut self, box_padding: f64) -> Self {
        self.box_padding = box_padding;
        self
    }

    #[must_use]
    pub const fn with_max_newton_iterations(mut self, max_newton_iterations: usize) -> Self {
        self.max_newton_iterations = max_newton_iterations;
        self
    }

    #[must_use]
    pub const fn with_newton_tolerance(mut self, newton_tolerance: f64) -> Self {
        self.newton_tolerance = newton_tolerance;
        self
    }
}

/// A piece of the curve covering `[start, end]` of the original parameter domain.
#[derive(Debug, Clone)]
struct Candidate {
    start: f64,
    end: f64,
    nodes: MatD,
}

impl Candidate {
    fn split(self) -> [Candidate; 2] {
        let (left, right) = subdivide_nodes(&self.nodes);
        let mid = 0.5 * (self.start + self.end);
        [
            Candidate { start: self.start, end: mid, nodes: left },
            Candidate { start: mid, end: self.end, nodes: right },
        ]
    }
}

/// Locates `point` on the curve using the default [`LocateParams`].
pub fn locate_point(nodes: &MatD, point: &VecD) -> Result<f64, LocateError> {
    locate_point_with(nodes, point, &LocateParams::default())
}

/// Locates `point` on the curve.
///
/// Returns the parameter `s ∈ [0, 1]` with `B(s) = point`.
///
/// # Panics
/// If the point and the curve differ in dimension.
pub fn locate_point_with(nodes: &MatD, point: &VecD, params: &LocateParams) -> Result<f64, LocateError> {
    assert_eq!(
        point.len(),
        nodes.nrows(),
        "The point has dimension {} but the curve has dimension {}.",
        point.len(),
        nodes.nrows()
    );

    let padding = params.box_padding * nodes.amax().max(f64::MIN_POSITIVE);

    if nodes.ncols() == 1 {
        return if nodes.box_contains(point, padding) { Ok(0.0) } else { Err(LocateError::NotOnCurve) };
    }

    // The first failure is reported if no cluster holds the point.
    let mut failure = None;

    for (start, end) in search(nodes, point, padding, params)? {
        if end - start > params.max_cluster_width {
            debug!("Point is spread over the parameter interval [{}, {}]", start, end);
            failure.get_or_insert(LocateError::Unresolved { start, end });
            continue;
        }
        debug!("Subdivision narrowed the point down to [{}, {}]", start, end);

        let s = match polish(nodes, point, 0.5 * (start + end), params) {
            Ok(s) => s.clamp(0.0, 1.0),
            Err(err) => {
                failure.get_or_insert(err);
                continue;
            }
        };

        let residual = (evaluate(nodes, s) - point).amax();
        if residual <= padding {
            return Ok(s);
        }
        debug!("Discarding s = {} with residual {:e} > {:e}", s, residual, padding);
    }

    Err(failure.unwrap_or(LocateError::NotOnCurve))
}

/// Runs the subdivision phase and returns the parameter intervals of all clusters in increasing order.
fn search(nodes: &MatD, point: &VecD, padding: f64, params: &LocateParams) -> Result<Vec<(f64, f64)>, LocateError> {
    let mut candidates = vec![Candidate { start: 0.0, end: 1.0, nodes: nodes.clone() }];
    candidates.retain(|candidate| candidate.nodes.box_contains(point, padding));

    for level in 1..=params.max_subdivisions {
        if candidates.is_empty() {
            break;
        }

        candidates = candidates
            .into_iter()
            .flat_map(Candidate::split)
            .filter(|candidate| candidate.nodes.box_contains(point, padding))
            .collect();
        trace!("Level {}: {} candidates", level, candidates.len());

        if candidates.len() > params.max_candidates {
            let start = candidates.first().map_or(0.0, |c| c.start);
            let end = candidates.last().map_or(1.0, |c| c.end);
            debug!("{} candidates exceed the limit of {}", candidates.len(), params.max_candidates);
            return Err(LocateError::Unresolved { start, end });
        }
    }

    // Candidates are ordered by parameter, so clusters end at the gaps.
    let mut clusters: Vec<(f64, f64)> = Vec::new();
    for candidate in &candidates {
        match clusters.last_mut() {
            Some((_, end)) if candidate.start <= *end => *end = candidate.end,
            _ => clusters.push((candidate.start, candidate.end)),
        }
    }
    Ok(clusters)
}

/// Runs Newton's method from the subdivision estimate until the steps fall below the tolerance
/// or stop shrinking.
fn polish(nodes: &MatD, point: &VecD, estimate: f64, params: &LocateParams) -> Result<f64, LocateError> {
    let mut s = estimate;
    let mut step = f64::INFINITY;

    for iteration in 1..=params.max_newton_iterations {
        let updated = match newton::newton_refine(nodes, point, s) {
            Ok(updated) => updated,
            Err(LocateError::ZeroDerivative { .. }) => {
                debug!("Derivative vanishes at s = {}, keeping the estimate", s);
                return Ok(s);
            }
            Err(err) => return Err(err),
        };

        let previous = step;
        step = (updated - s).abs();

        // Steps that stop shrinking are rounding noise.
        if step >= previous {
            debug!("Newton stalled at s = {} with step {:e}", s, step);
            return Ok(s);
        }
        s = updated;
        trace!("Newton iteration {}: s = {}, step = {:e}", iteration, s, step);

        if step <= params.newton_tolerance {
            return Ok(s);
        }
    }

    Err(LocateError::NotConverged { iterations: params.max_newton_iterations, step })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{dmatrix, dvector};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn cubic() -> MatD {
        dmatrix![
            0.0, 1.0, 3.0, 4.0;
            0.0, 2.5,-1.0, 1.0;
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
    fn recovers_parameter(cubic: MatD, #[values(0.0, 0.1, 0.37, 0.5, 0.8, 0.999, 1.0)] s: f64) {
        let point = evaluate(&cubic, s);
        assert_relative_eq!(locate_point(&cubic, &point).unwrap(), s, epsilon = 1e-9);
    }

    #[rstest]
    fn recovers_parameter_3d(#[values(0.05, 0.5, 0.9)] s: f64) {
        let nodes = dmatrix![
            0.0, 1.0, 2.0, 3.0, 4.0;
            0.0, 2.0,-1.0, 1.5, 0.0;
            1.0, 0.0, 0.5,-1.0, 2.0;
        ];
        let point = evaluate(&nodes, s);
        assert_relative_eq!(locate_point(&nodes, &point).unwrap(), s, epsilon = 1e-9);
    }

    #[rstest]
    fn endpoints(arch: MatD) {
        assert_relative_eq!(locate_point(&arch, &dvector![0., 0.]).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(locate_point(&arch, &dvector![2., 0.]).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[rstest]
    fn off_curve(arch: MatD) {
        assert_eq!(locate_point(&arch, &dvector![1., 1.5]), Err(LocateError::NotOnCurve));
        assert_eq!(locate_point(&arch, &dvector![5., 5.]), Err(LocateError::NotOnCurve));
    }

    #[test]
    fn self_intersection_yields_lowest_parameter() {
        // The loop crosses itself at `(10/3, 2/3)` for `s = 1/3` and `s = 2/3`.
        let nodes = dmatrix![
            0., 7., 0., 6.;
            0., 1., 1., 0.;
        ];
        let crossing = evaluate(&nodes, 1.0 / 3.0);
        assert_relative_eq!(crossing, evaluate(&nodes, 2.0 / 3.0), epsilon = 1e-14);
        assert_relative_eq!(locate_point(&nodes, &crossing).unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn point_next_to_self_intersection() {
        // `B(2/3 + 1e-7)` passes close to the branch through `s = 1/3` without lying on it.
        let nodes = dmatrix![
            0., 7., 0., 6.;
            0., 1., 1., 0.;
        ];
        let s = 2.0 / 3.0 + 1e-7;
        assert_relative_eq!(locate_point(&nodes, &evaluate(&nodes, s)).unwrap(), s, epsilon = 1e-9);
    }

    #[test]
    fn recovers_parameter_far_from_origin() {
        let line = dmatrix![
            0.0, 1.0;
            1e6 + 0.1, 1e6 + 0.1;
        ];
        for i in 1..100 {
            let s = f64::from(i) / 100.0;
            assert_relative_eq!(locate_point(&line, &evaluate(&line, s)).unwrap(), s, epsilon = 1e-9);
        }
    }

    #[rstest]
    fn recovers_parameter_of_shifted_curve(cubic: MatD, #[values(0.1, 0.37, 0.5, 0.8)] s: f64) {
        let shifted = cubic.add_scalar(1e6);
        let point = evaluate(&shifted, s);
        assert_relative_eq!(locate_point(&shifted, &point).unwrap(), s, epsilon = 1e-8);
    }

    #[rstest]
    fn recovers_parameter_at_any_scale(arch: MatD, #[values(1e-8, 1.0, 1e8)] scale: f64, #[values(0.3, 0.75)] s: f64) {
        let scaled = arch * scale;
        let point = evaluate(&scaled, s);
        assert_relative_eq!(locate_point(&scaled, &point).unwrap(), s, epsilon = 1e-9);
    }

    #[test]
    fn constant() {
        let point = dmatrix![1.; 2.];
        assert_eq!(locate_point(&point, &dvector![1., 2.]), Ok(0.0));
        assert_eq!(locate_point(&point, &dvector![1., 2.5]), Err(LocateError::NotOnCurve));
    }

    #[test]
    fn degenerate_curve_is_unresolved() {
        let nodes = dmatrix![
            1., 1., 1.;
            2., 2., 2.;
        ];
        assert!(matches!(
            locate_point(&nodes, &dvector![1., 2.]),
            Err(LocateError::Unresolved { start, end }) if start == 0.0 && end == 1.0
        ));
    }

    #[rstest]
    fn wide_cluster_is_unresolved(cubic: MatD) {
        let params = LocateParams::new().with_max_subdivisions(2);
        let point = evaluate(&cubic, 0.3);
        assert!(matches!(locate_point_with(&cubic, &point, &params), Err(LocateError::Unresolved { .. })));
    }

    #[rstest]
    fn not_converged(cubic: MatD) {
        let params = LocateParams::new().with_max_newton_iterations(1).with_newton_tolerance(0.0);
        let point = evaluate(&cubic, 0.3);
        assert!(matches!(
            locate_point_with(&cubic, &point, &params),
            Err(LocateError::NotConverged { iterations: 1, .. })
        ));
    }

    #[test]
    fn params_builders() {
        let params = LocateParams::new()
            .with_max_subdivisions(8)
            .with_max_candidates(16)
            .with_max_cluster_width(0.5)
            .with_box_padding(0.0)
            .with_max_newton_iterations(3)
            .with_newton_tolerance(1e-6);
        assert_eq!(
            params,
            LocateParams {
                max_subdivisions: 8,
                max_candidates: 16,
                max_cluster_width: 0.5,
                box_padding: 0.0,
                max_newton_iterations: 3,
                newton_tolerance: 1e-6,
            }
        );
        assert_eq!(LocateParams::new(), LocateParams::default());
    }
}
