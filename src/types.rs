use nalgebra::{Dyn, MatrixView, OMatrix, OVector, U1};

pub type VecD = OVector<f64, Dyn>;
pub type VecDView<'a> = MatrixView<'a, f64, Dyn, U1, U1, Dyn>;

/// A `dimension × count` matrix holding one node (or point) per column.
pub type MatD = OMatrix<f64, Dyn, Dyn>;

pub type NodeDerivatives = Vec<MatD>;

pub trait NodeHelpers {
    fn node(&self, i: usize) -> VecDView;

    fn first_node(&self) -> VecDView {
        self.node(0)
    }

    fn last_node(&self) -> VecDView;

    /// Returns the per-coordinate minimum and maximum over all nodes.
    fn bounding_box(&self) -> (VecD, VecD);

    /// Returns the largest side length of the bounding box.
    fn extent(&self) -> f64 {
        let (min, max) = self.bounding_box();
        (max - min).max()
    }

    /// Returns `true` if `point` lies inside the bounding box grown by `padding` on every side.
    fn box_contains(&self, point: &VecD, padding: f64) -> bool {
        let (min, max) = self.bounding_box();
        point.iter().zip(min.iter().zip(max.iter())).all(|(&x, (&lo, &hi))| lo - padding <= x && x <= hi + padding)
    }
}

impl NodeHelpers for MatD {
    fn node(&self, i: usize) -> VecDView {
        self.column(i)
    }

    fn last_node(&self) -> VecDView {
        self.column(self.ncols() - 1)
    }

    fn bounding_box(&self) -> (VecD, VecD) {
        let min = VecD::from_iterator(self.nrows(), self.row_iter().map(|row| row.min()));
        let max = VecD::from_iterator(self.nrows(), self.row_iter().map(|row| row.max()));
        (min, max)
    }
}
