//! Operations that derive new node sets from existing curves.
//!
//! All functions operate on node matrices so that they can be chained without validation overhead.
//! [`Curve`][crate::curve::Curve] exposes them as methods.

pub mod elevate;
pub mod reduce;
pub mod reverse;
pub mod specialize;
pub mod subdivide;
