//! Importance threshold from the final section's interaction totals.

use std::collections::BTreeSet;

use book_model::{CanonicalNameMap, ConfigError};

use super::Timeline;
use crate::error::{Result, TimelineError};

/// Percentile `p` (0-100) of `values`, interpolating linearly between the
/// two closest ranks. Returns `None` for an empty slice.
pub fn percentile(values: &[f64], p: u8) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = f64::from(p) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

impl Timeline {
    /// Each final-section character with its total interaction weight.
    ///
    /// Aliases of one character are summed under its canonical name.
    pub fn final_totals(&self, names: &CanonicalNameMap) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        let Some(section) = self.final_section() else {
            return totals;
        };
        for (raw, total) in section.totals() {
            let canonical = names.canonical(raw);
            match totals.iter().position(|(name, _)| name == canonical) {
                Some(i) => totals[i].1 += total,
                None => totals.push((canonical.to_string(), total)),
            }
        }
        totals
    }

    /// The `p`-th percentile of the positive final-section totals.
    ///
    /// Characters with a zero total are left out of the population.
    pub fn importance_threshold(&self, p: u8, names: &CanonicalNameMap) -> Result<f64> {
        if p > 100 {
            return Err(ConfigError::InvalidPercentile(p).into());
        }
        let positive: Vec<f64> = self
            .final_totals(names)
            .into_iter()
            .map(|(_, total)| total)
            .filter(|total| *total > 0.0)
            .collect();

        percentile(&positive, p).ok_or(TimelineError::InsufficientData)
    }

    /// Final-section characters whose total falls strictly below `threshold`,
    /// by canonical name.
    ///
    /// Zero-total characters count as below any positive threshold.
    /// Characters absent from the final section are never included.
    pub fn unimportant_characters(&self, threshold: f64, names: &CanonicalNameMap) -> BTreeSet<String> {
        self.final_totals(names)
            .into_iter()
            .filter(|(_, total)| *total < threshold)
            .map(|(name, _)| name)
            .collect()
    }
}
