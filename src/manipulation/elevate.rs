//! Raises the degree of a curve by one without changing its shape.
//!
//! A curve of degree `n` with the nodes `P₀, ..., Pₙ` is also a curve of degree `n + 1` with the nodes
//!
//! `Qᵢ = i/(n+1) Pᵢ₋₁ + (1 - i/(n+1)) Pᵢ`, `i = 0, ..., n + 1`,
//!
//! where the terms with the out of range nodes `P₋₁` and `Pₙ₊₁` vanish.

use crate::types::MatD;

/// Returns the `n + 2` nodes of the elevated curve.
pub fn elevate_nodes(nodes: &MatD) -> MatD {
    let (dim, num_nodes) = nodes.shape();
    let denominator = num_nodes as f64;

    let mut elevated = MatD::zeros(dim, num_nodes + 1);
    elevated.column_mut(0).copy_from(&nodes.column(0));
    elevated.column_mut(num_nodes).copy_from(&nodes.column(num_nodes - 1));

    for i in 1..num_nodes {
        let alpha = i as f64 / denominator;
        elevated
            .column_mut(i)
            .copy_from(&(alpha * nodes.column(i - 1) + (1.0 - alpha) * nodes.column(i)));
    }
    elevated
}

/// Returns the `num_nodes × (num_nodes + 1)` matrix `E` that elevates the node matrix `P` by `P E`.
pub fn elevation_matrix(num_nodes: usize) -> MatD {
    let denominator = num_nodes as f64;

    let mut E = MatD::zeros(num_nodes, num_nodes + 1);
    for i in 0..num_nodes {
        E[(i, i)] = (num_nodes - i) as f64 / denominator;
        E[(i, i + 1)] = (i + 1) as f64 / denominator;
    }
    E
}
