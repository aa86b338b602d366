//! Identity reconciliation - raw aliases become canonical names across
//! sections and metadata.

use std::collections::HashMap;

use book_model::CanonicalNameMap;
use tracing::debug;

use super::{SectionFrame, Timeline};
use crate::error::Result;

impl SectionFrame {
    /// Rename characters and merge aliases that resolve to the same name.
    ///
    /// A merged character takes the position of its first alias; its row and
    /// column are the sums of the aliases' rows and columns. A normalized
    /// section is merged on its raw weights and normalized again, so each
    /// alias contributes in proportion to its interactions.
    fn canonicalize(&mut self, names: &CanonicalNameMap) -> usize {
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut merged_names: Vec<String> = Vec::new();
        let mut target = Vec::with_capacity(self.characters.len());

        for raw in &self.characters {
            let canonical = names.canonical(raw);
            let slot = *slots.entry(canonical.to_string()).or_insert_with(|| {
                merged_names.push(canonical.to_string());
                merged_names.len() - 1
            });
            target.push(slot);
        }

        let merges = self.characters.len() - merged_names.len();
        if merges > 0 {
            match self.row_weights.take() {
                Some(weights) => {
                    let mut raw = self.matrix.clone();
                    raw.scale_rows(&weights);
                    let mut merged = raw.collapse(&target, merged_names.len());
                    self.row_weights = Some(merged.normalize_rows());
                    self.matrix = merged;
                }
                None => self.matrix = self.matrix.collapse(&target, merged_names.len()),
            }
        }
        self.characters = merged_names;
        merges
    }
}

impl Timeline {
    /// Rewrite every section list and both metadata maps to canonical names.
    ///
    /// Colliding metadata records are merged (counts summed, earliest
    /// location kept), never overwritten.
    pub fn reconcile(&mut self, names: &CanonicalNameMap) -> Result<()> {
        for section in &mut self.sections {
            let merges = section.canonicalize(names);
            if merges > 0 {
                debug!(section = section.index, merges, "merged aliases in section");
            }
        }
        self.metadata.rename(names);
        self.check_consistency()
    }
}
