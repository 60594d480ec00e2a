//! **bezier-kernel** is a library of numerical kernels for N-dimensional Bézier curves based on [nalgebra].
//!
//! ## Features
//! - Curves of arbitrary degree `n` in any dimension `N = 1, 2, 3,...`, stored as contiguous
//!   `N × (n + 1)` [node matrices][curve::nodes].
//! - Batched [evaluation][curve::basis] in barycentric coordinates, avoiding cancellation near `s = 1`.
//! - [Tangents and curvature][curve::hodograph] as well as all derivatives `k = 0, 1,... , n`.
//! - [Point location][curve::locate] by subdivision and Newton's method.
//! - [Curve manipulation][manipulation]
//!   - [subdivision][manipulation::subdivide]
//!   - [specialization][manipulation::specialize] onto arbitrary parameter intervals
//!   - [degree elevation][manipulation::elevate]
//!   - [degree reduction][manipulation::reduce]
//!   - [reversing][manipulation::reverse]
//! - A [flat buffer interface][flat] for callers holding curves as plain `f64` arrays.
//!
//! ## What are Bézier curves?
//!
//! A Bézier curve of degree `n` is a polynomial curve defined by `n + 1` control nodes. It starts in the first
//! node, ends in the last one and lies within the convex hull of all nodes. Every piece of a Bézier curve is
//! again a Bézier curve of the same degree, which makes subdivision the central tool for searching on curves.
//! Its derivative, the hodograph, is a Bézier curve of degree `n - 1`.
//!
//! [`curve::Curve`] validates the nodes once and offers all operations as methods. The functions in the
//! modules work directly on node matrices.
//!
//! ## Literature:
//! |            |                                                                                                                       |
//! |-----------:|:----------------------------------------------------------------------------------------------------------------------|
//! | Farin2002  | Farin, G. Curves and Surfaces for CAGD: A Practical Guide. Morgan Kaufmann, San Francisco, 5th ed., 2002.             |
//! | Piegl1997  | Piegl, L., Tiller, W. The NURBS Book. Monographs in Visual Communication. Springer, Berlin, Heidelberg, 2nd ed., 1997. |

pub mod curve;
pub mod flat;
pub mod manipulation;
pub mod types;
