//! Implements the control nodes spanning the control polygon of the curve.
//!
//! The nodes are stored as a `dimension × (n + 1)` matrix with one node per column,
//! `n` being the curve degree.
//! The nodes of the `k`-th derivative curve (the `k`-th hodograph) follow from the zeroth order
//! nodes by repeated forward differencing
//!
//! `P⁽ᵏ⁾ᵢ = (n - k + 1) (P⁽ᵏ⁻¹⁾ᵢ₊₁ - P⁽ᵏ⁻¹⁾ᵢ)`
//!
//! so that the `k`-th derivative is again a Bézier curve of degree `n - k`.
//! All derivative node matrices up to `k = n` are computed once on construction.

use std::ops::MulAssign;

use crate::{
    curve::hodograph::derivative_nodes,
    types::{MatD, NodeDerivatives, VecDView},
};

#[derive(PartialEq, Debug, Clone)]
pub struct Nodes {
    pub(crate) Pk: NodeDerivatives,
    k_max: usize,
}

impl Nodes {
    pub fn new(matrix: MatD) -> Self {
        let mut nodes = Nodes { Pk: vec![matrix], k_max: 0 };
        nodes.derive();
        nodes
    }

    pub fn matrix(&self) -> &MatD {
        &self.Pk[0]
    }

    pub fn get(&self, i: usize) -> VecDView {
        self.matrix().column(i)
    }

    pub fn dimension(&self) -> usize {
        self.matrix().nrows()
    }

    pub fn count(&self) -> usize {
        self.matrix().ncols()
    }

    pub fn degree(&self) -> usize {
        self.count() - 1
    }

    pub fn matrix_derivative(&self, derivative: usize) -> &MatD {
        assert!(derivative <= self.k_max, "Derivative {} is not calculated", derivative);
        &self.Pk[derivative]
    }

    pub fn max_derivative(&self) -> usize {
        self.k_max
    }

    pub fn derive(&mut self) {
        let p = self.degree();

        self.Pk.truncate(1);
        for k in 1..=p {
            let Pnew = derivative_nodes(&self.Pk[k - 1]);
            self.Pk.push(Pnew);
        }
        self.k_max = p;
    }

    pub fn reverse(&mut self) -> &mut Self {
        for (k, Pk) in self.Pk.iter_mut().enumerate() {
            reverse(Pk);

            // Odd derivatives change their sign upon reversal
            if k % 2 == 1 {
                Pk.mul_assign(-1.0);
            }
        }
        self
    }
}

pub(crate) fn reverse(points: &mut MatD) {
    let ncols = points.ncols();
    let half_ncols = points.ncols() / 2;

    for i in 0..half_ncols {
        points.swap_columns(i, ncols - 1 - i);
    }
}

pub(crate) fn reversed(points: &MatD) -> MatD {
    let mut copy = points.clone();
    reverse(&mut copy);
    copy
}
