//! Prominence sort.

use super::{SectionFrame, Timeline};
use crate::error::Result;

/// Indices ordered by descending total. Equal totals keep their original
/// relative order.
pub fn prominence_order(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
    order
}

impl SectionFrame {
    fn sort_by_prominence(&mut self) {
        let order = prominence_order(&self.matrix.column_totals());
        self.matrix = self.matrix.permute(&order);
        if let Some(weights) = &mut self.row_weights {
            *weights = order.iter().map(|&i| weights[i]).collect();
        }
        self.characters = order.iter().map(|&i| self.characters[i].clone()).collect();
    }
}

impl Timeline {
    /// Reorder every section so the most prominent character comes first.
    ///
    /// The same permutation is applied to rows, columns and the character list.
    pub fn sort_by_prominence(&mut self) -> Result<()> {
        for section in &mut self.sections {
            section.sort_by_prominence();
        }
        self.check_consistency()
    }
}
