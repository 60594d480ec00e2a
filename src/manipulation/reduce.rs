//! Lowers the degree of a curve by one.
//!
//! Elevation is linear, `Q = P E` with the [elevation matrix][elevation_matrix] `E`.
//! Reduction inverts it in the least squares sense, `P = Q E⁺`, where `E⁺` is the Moore-Penrose
//! pseudo-inverse. The system `Eᵀ Pᵀ = Qᵀ` is solved through the singular value decomposition of `Eᵀ`.
//!
//! Only curves that are elevated versions of a lower degree curve are reproduced exactly.
//! For all other curves, the reduced curve is the best approximation in the node space.

use nalgebra::SVD;
use thiserror::Error;
use tracing::debug;

use crate::{
    manipulation::elevate::{elevate_nodes, elevation_matrix},
    types::{MatD, NodeHelpers},
};

/// Nodes of a reduced and re-elevated curve must agree with the original ones up to this tolerance,
/// relative to the curve extent, for a reduction to count as exact. It equals `√ε = 2⁻²⁶`.
pub const REDUCE_TOLERANCE: f64 = 1.0 / 67_108_864.0;

#[derive(Error, Debug, PartialEq)]
pub enum ReduceError {
    #[error("A curve of degree `{degree}` cannot be reduced.")]
    NotImplemented { degree: usize },

    #[error("The least squares solve failed: {reason}")]
    SolveFailed { reason: &'static str },
}

/// Outcome of [`maybe_reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    Reduced(MatD),
    Irreducible,
}

/// Returns the least squares reduction with one node less.
pub fn reduce_pseudo_inverse(nodes: &MatD) -> Result<MatD, ReduceError> {
    let num_nodes = nodes.ncols();
    if num_nodes < 2 {
        return Err(ReduceError::NotImplemented { degree: 0 });
    }

    let Et = elevation_matrix(num_nodes - 1).transpose();
    let svd = SVD::new(Et, true, true);
    let Pt = svd
        .solve(&nodes.transpose(), f64::EPSILON.sqrt())
        .map_err(|reason| ReduceError::SolveFailed { reason })?;

    if Pt.iter().any(|x| !x.is_finite()) {
        return Err(ReduceError::SolveFailed { reason: "The reduced nodes are not finite." });
    }
    Ok(Pt.transpose())
}

/// Reduces the curve only if the reduction is exact, i.e. if elevating the reduced curve
/// reproduces the nodes within [`REDUCE_TOLERANCE`].
pub fn maybe_reduce(nodes: &MatD) -> Result<Reduction, ReduceError> {
    if nodes.ncols() < 2 {
        return Ok(Reduction::Irreducible);
    }

    let reduced = reduce_pseudo_inverse(nodes)?;
    let deviation = (elevate_nodes(&reduced) - nodes).amax();
    let tolerance = REDUCE_TOLERANCE * nodes.extent().max(1.0);

    if deviation <= tolerance {
        debug!("Reduced curve from degree {} to {} (deviation {:e})", nodes.ncols() - 1, reduced.ncols() - 1, deviation);
        Ok(Reduction::Reduced(reduced))
    } else {
        debug!(
            "Curve of degree {} is irreducible (deviation {:e} > tolerance {:e})",
            nodes.ncols() - 1,
            deviation,
            tolerance
        );
        Ok(Reduction::Irreducible)
    }
}

/// Reduces the curve as long as the reductions are exact.
pub fn full_reduce(nodes: &MatD) -> Result<MatD, ReduceError> {
    let mut current = nodes.clone();
    while let Reduction::Reduced(reduced) = maybe_reduce(&current)? {
        current = reduced;
    }
    Ok(current)
}
