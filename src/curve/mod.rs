//! Implements the Bézier curve.
//!
//! A Bézier curve of degree `n` is defined by
//!
//! `B(s) = Σₖ C(n, k) (1 - s)ⁿ⁻ᵏ sᵏ Pₖ`, `k = 0, ..., n`
//!
//! with the
//! - parameter `s ∈ [0,1]` defining a point on the curve,
//! - `n+1`, `N`-dimensional [control nodes][nodes] `P`, and
//! - [Bernstein basis polynomials][basis] `C(n, k) (1 - s)ⁿ⁻ᵏ sᵏ`.
//!
//! The curve starts in `P₀` and ends in `Pₙ`. It lies in the convex hull of its nodes.

use thiserror::Error;

use crate::{
    curve::{
        hodograph::{get_curvature, CurvatureError},
        locate::{locate_point_with, newton::newton_refine, LocateError, LocateParams},
        nodes::Nodes,
    },
    manipulation::{
        elevate::elevate_nodes,
        reduce::{full_reduce, reduce_pseudo_inverse, ReduceError},
        reverse::{reverse, reversed},
        specialize::specialize_curve,
        subdivide::subdivide_nodes_at,
    },
    types::{MatD, VecD},
};

pub mod basis;
pub mod hodograph;
pub mod locate;
pub mod nodes;

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub(crate) nodes: Nodes,
}

#[derive(Error, Debug, PartialEq)]
pub enum CurveError {
    #[error("A curve must have at least one node.")]
    EmptyNodes,

    #[error("The nodes must have at least one coordinate.")]
    ZeroDimension,

    #[error("Node {index} has a coordinate that is not finite.")]
    NonFiniteNode { index: usize },

    #[error(
        "{num_nodes} nodes of dimension {dimension} require {expected} values, \
        but the buffer holds {actual}."
    )]
    LayoutMismatch { dimension: usize, num_nodes: usize, expected: usize, actual: usize },

    #[error("Found {lambda1} first but {lambda2} second barycentric coordinates.")]
    BatchMismatch { lambda1: usize, lambda2: usize },
}

impl Curve {
    /// Returns a Bézier curve with the nodes given as the columns of `matrix`.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{dmatrix, dvector};
    /// use bezier_kernel::curve::Curve;
    ///
    /// // A quadratic curve with three 2D nodes.
    /// let curve = Curve::new(dmatrix![
    /// // 1   2   3
    ///   0., 1., 2.; // x
    ///   0., 2., 0.; // y
    /// ]).unwrap();
    ///
    /// assert_eq!(curve.degree(), 2);
    /// assert_eq!(curve.evaluate(0.5), dvector![1., 1.]);
    /// ```
    pub fn new(matrix: MatD) -> Result<Self, CurveError> {
        if matrix.ncols() == 0 {
            return Err(CurveError::EmptyNodes);
        }
        if matrix.nrows() == 0 {
            return Err(CurveError::ZeroDimension);
        }
        if let Some(index) = matrix.column_iter().position(|node| node.iter().any(|x| !x.is_finite())) {
            return Err(CurveError::NonFiniteNode { index });
        }

        Ok(Self::from_valid(matrix))
    }

    /// Returns a Bézier curve from a flat buffer holding the coordinates node after node.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::dmatrix;
    /// use bezier_kernel::curve::Curve;
    ///
    /// let curve = Curve::from_flat(2, 3, &[0., 0., 1., 2., 2., 0.]).unwrap();
    /// assert_eq!(curve.nodes(), &dmatrix![0., 1., 2.; 0., 2., 0.]);
    /// ```
    pub fn from_flat(dimension: usize, num_nodes: usize, data: &[f64]) -> Result<Self, CurveError> {
        if num_nodes == 0 {
            return Err(CurveError::EmptyNodes);
        }
        if dimension == 0 {
            return Err(CurveError::ZeroDimension);
        }
        // Saturates to a length no slice can have.
        let expected = dimension.saturating_mul(num_nodes);
        if data.len() != expected {
            return Err(CurveError::LayoutMismatch { dimension, num_nodes, expected, actual: data.len() });
        }

        Self::new(MatD::from_column_slice(dimension, num_nodes, data))
    }

    pub(crate) fn from_valid(matrix: MatD) -> Self {
        Self { nodes: Nodes::new(matrix) }
    }

    pub fn degree(&self) -> usize {
        self.nodes.degree()
    }

    /// Returns the dimension of the curve.
    pub fn dimension(&self) -> usize {
        self.nodes.dimension()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.count()
    }

    /// Returns the `dimension × num_nodes` node matrix.
    pub fn nodes(&self) -> &MatD {
        self.nodes.matrix()
    }

    pub fn evaluate(&self, s: f64) -> VecD {
        self.evaluate_derivative(s, 0)
    }

    /// Evaluates the curve at every parameter, returning one point per column.
    pub fn evaluate_multi(&self, s_vals: &[f64]) -> MatD {
        basis::evaluate_multi(self.nodes(), s_vals)
    }

    /// Evaluates the curve at the barycentric pairs `(lambda1[j], lambda2[j])`.
    pub fn evaluate_barycentric(&self, lambda1: &[f64], lambda2: &[f64]) -> Result<MatD, CurveError> {
        if lambda1.len() != lambda2.len() {
            return Err(CurveError::BatchMismatch { lambda1: lambda1.len(), lambda2: lambda2.len() });
        }
        Ok(basis::evaluate_curve_barycentric(self.nodes(), lambda1, lambda2))
    }

    /// Evaluates the `k`-th derivative. Derivatives beyond the degree vanish.
    pub fn evaluate_derivative(&self, s: f64, k: usize) -> VecD {
        if k > self.nodes.max_derivative() {
            return VecD::zeros(self.dimension());
        }
        basis::evaluate(self.nodes.matrix_derivative(k), s)
    }

    /// Returns the tangent vector at `s`.
    pub fn hodograph(&self, s: f64) -> VecD {
        self.evaluate_derivative(s, 1)
    }

    /// Returns the curvature at `s`, signed for planar curves.
    pub fn curvature(&self, s: f64) -> Result<f64, CurvatureError> {
        get_curvature(self.nodes(), &self.hodograph(s), s)
    }

    /// Splits the curve at `s = 1/2`.
    pub fn subdivide(&self) -> Result<(Self, Self), CurveError> {
        self.subdivide_at(0.5)
    }

    /// Splits the curve at `s` into the curves covering `[0, s]` and `[s, 1]`.
    ///
    /// Fails with [`CurveError::NonFiniteNode`] if extrapolating to `s` overflows.
    pub fn subdivide_at(&self, s: f64) -> Result<(Self, Self), CurveError> {
        let (left, right) = subdivide_nodes_at(self.nodes(), s);
        Ok((Self::new(left)?, Self::new(right)?))
    }

    /// Returns the curve covering `[start, end]` of this one, reparameterized onto `[0, 1]`.
    ///
    /// Fails with [`CurveError::NonFiniteNode`] if extrapolating to the interval overflows.
    pub fn specialize(&self, start: f64, end: f64) -> Result<Self, CurveError> {
        Self::new(specialize_curve(self.nodes(), start, end, 0.0, 1.0).nodes)
    }

    /// Returns the same curve with one more node.
    pub fn elevate(&self) -> Self {
        Self::from_valid(elevate_nodes(self.nodes()))
    }

    /// Returns the least squares approximation with one node less.
    pub fn reduce(&self) -> Result<Self, ReduceError> {
        reduce_pseudo_inverse(self.nodes()).map(Self::from_valid)
    }

    /// Returns the same curve with the lowest degree that represents it exactly.
    pub fn full_reduce(&self) -> Result<Self, ReduceError> {
        full_reduce(self.nodes()).map(Self::from_valid)
    }

    /// Finds the parameter of a point on the curve.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{dmatrix, dvector};
    /// use bezier_kernel::curve::Curve;
    ///
    /// let curve = Curve::new(dmatrix![0., 1., 2.; 0., 2., 0.]).unwrap();
    /// let s = curve.locate(&dvector![1.5, 0.75]).unwrap();
    /// assert!((s - 0.75).abs() < 1e-12);
    /// ```
    pub fn locate(&self, point: &VecD) -> Result<f64, LocateError> {
        self.locate_with(point, &LocateParams::default())
    }

    pub fn locate_with(&self, point: &VecD, params: &LocateParams) -> Result<f64, LocateError> {
        self.check_point(point)?;
        locate_point_with(self.nodes(), point, params)
    }

    /// Performs one Newton step from `s` towards the parameter of `point`.
    pub fn newton_refine(&self, point: &VecD, s: f64) -> Result<f64, LocateError> {
        self.check_point(point)?;
        newton_refine(self.nodes(), point, s)
    }

    fn check_point(&self, point: &VecD) -> Result<(), LocateError> {
        match point.len() {
            actual if actual == self.dimension() => Ok(()),
            actual => Err(LocateError::DimensionMismatch { expected: self.dimension(), actual }),
        }
    }

    /// Reverses the curve.
    pub fn reverse(&mut self) -> &mut Self {
        reverse(self)
    }

    pub fn reversed(&self) -> Self {
        reversed(self)
    }
}
