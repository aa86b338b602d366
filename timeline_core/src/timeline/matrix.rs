//! Square interaction matrix.

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Serialize, Serializer};

/// A square matrix of interaction weights.
///
/// Construction only ever produces `dim x dim` arrays and every reshaping
/// operation selects the same indices on both axes, so the matrix cannot
/// become non-square.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionMatrix {
    cells: Array2<f64>,
}

impl InteractionMatrix {
    /// A `dim x dim` matrix of zeros.
    pub fn zeros(dim: usize) -> Self {
        Self {
            cells: Array2::zeros((dim, dim)),
        }
    }

    /// Build from nested rows. Returns `None` unless the rows form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let dim = rows.len();
        if rows.iter().any(|row| row.len() != dim) {
            return None;
        }
        let cells = Array2::from_shape_vec((dim, dim), rows.into_iter().flatten().collect()).ok()?;
        Some(Self { cells })
    }

    pub fn dim(&self) -> usize {
        self.cells.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.dim() == 0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[[row, col]]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[[row, col]] = value;
    }

    pub fn add(&mut self, row: usize, col: usize, weight: f64) {
        self.cells[[row, col]] += weight;
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.cells.row(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.cells.rows().into_iter()
    }

    /// Nested-array form used by the output artifact.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    pub fn row_total(&self, row: usize) -> f64 {
        self.cells.row(row).sum()
    }

    /// Per-row sums, in row order.
    pub fn row_totals(&self) -> Vec<f64> {
        self.cells.sum_axis(Axis(1)).to_vec()
    }

    /// Total weight received by each character (column sums).
    pub fn column_totals(&self) -> Vec<f64> {
        self.cells.sum_axis(Axis(0)).to_vec()
    }

    /// Rescale every row to a probability distribution. All-zero rows stay
    /// zero. Returns the row totals from before the rescale.
    pub fn normalize_rows(&mut self) -> Vec<f64> {
        let totals = self.row_totals();
        for (mut row, &total) in self.cells.rows_mut().into_iter().zip(&totals) {
            if total != 0.0 {
                row /= total;
            }
        }
        totals
    }

    /// Multiply row `i` by `weights[i]`; undoes [`normalize_rows`](Self::normalize_rows)
    /// given the totals it returned.
    pub fn scale_rows(&mut self, weights: &[f64]) {
        for (mut row, &weight) in self.cells.rows_mut().into_iter().zip(weights) {
            row *= weight;
        }
    }

    /// Matrix restricted to the indices where `keep` is true.
    pub fn retain(&self, keep: &[bool]) -> Self {
        let kept: Vec<usize> = (0..self.dim()).filter(|&i| keep[i]).collect();
        self.permute(&kept)
    }

    /// Matrix whose entry `(i, j)` is this matrix's `(order[i], order[j])`.
    ///
    /// Rows and columns are always reordered together.
    pub fn permute(&self, order: &[usize]) -> Self {
        Self {
            cells: self.cells.select(Axis(0), order).select(Axis(1), order),
        }
    }

    /// Fold indices together: row/column `i` is added into `target[i]` of a
    /// `dim x dim` result.
    ///
    /// Weight between two indices folded into the same target is dropped;
    /// a character does not interact with itself.
    pub fn collapse(&self, target: &[usize], dim: usize) -> Self {
        let mut result = Self::zeros(dim);
        for ((r, c), &value) in self.cells.indexed_iter() {
            let (to_row, to_col) = (target[r], target[c]);
            if to_row == to_col && r != c {
                continue;
            }
            result.add(to_row, to_col, value);
        }
        result
    }
}

impl Serialize for InteractionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}
