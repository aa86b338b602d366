//! Pruning engine - removes unimportant characters from every section and
//! from the metadata in one pass.

use std::collections::BTreeSet;

use book_model::CanonicalNameMap;
use tracing::{debug, info};

use super::{SectionFrame, Timeline};
use crate::error::Result;

/// Outcome of a percentile prune.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneReport {
    pub threshold: f64,
    /// Canonical names of the removed characters.
    pub removed: BTreeSet<String>,
}

impl SectionFrame {
    /// Rebuild this section without `names`. Returns how many were removed.
    fn remove_characters(&mut self, names: &BTreeSet<String>) -> usize {
        let keep: Vec<bool> = self
            .characters
            .iter()
            .map(|name| !names.contains(name))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return 0;
        }

        self.matrix = self.matrix.retain(&keep);
        if let Some(weights) = &mut self.row_weights {
            let mut kept = keep.iter();
            weights.retain(|_| kept.next().copied().unwrap_or(false));
        }
        let mut keep = keep.into_iter();
        self.characters.retain(|_| keep.next().unwrap_or(false));
        removed
    }
}

impl Timeline {
    /// Remove the characters in `characters` (canonical names) from every
    /// section and from both metadata maps, under any of their aliases.
    ///
    /// Names not present anywhere are ignored.
    pub fn prune(&mut self, characters: &BTreeSet<String>, names: &CanonicalNameMap) -> Result<()> {
        let doomed = |raw: &str| characters.contains(names.canonical(raw));

        let mut spellings: BTreeSet<String> = characters.clone();
        for section in &self.sections {
            spellings.extend(section.characters.iter().filter(|c| doomed(c.as_str())).cloned());
        }
        spellings.extend(
            self.metadata
                .characters()
                .into_iter()
                .filter(|c| doomed(*c))
                .map(str::to_string),
        );

        for section in &mut self.sections {
            let removed = section.remove_characters(&spellings);
            if removed > 0 {
                debug!(section = section.index, removed, "pruned section");
            }
        }
        self.metadata.remove_characters(&spellings);
        self.check_consistency()
    }

    /// Compute the percentile threshold from the final section and prune
    /// every character that falls below it.
    pub fn prune_below_percentile(&mut self, p: u8, names: &CanonicalNameMap) -> Result<PruneReport> {
        let threshold = self.importance_threshold(p, names)?;
        let removed = self.unimportant_characters(threshold, names);
        info!(threshold, pruned = removed.len(), "pruning timeline");

        self.prune(&removed, names)?;
        Ok(PruneReport { threshold, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::tests::frame;
    use book_model::InteractionMetadata;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn identity() -> CanonicalNameMap {
        CanonicalNameMap::new()
    }

    fn sample() -> Timeline {
        let mut metadata = InteractionMetadata::new();
        metadata.record_interaction("A", "B", 0, 0);
        metadata.record_interaction("B", "C", 0, 1);
        metadata.record_interaction("A", "C", 1, 0);
        metadata.record_interaction("A", "B", 1, 2);

        Timeline::from_parts(
            vec![
                frame(0, &["B", "C", "A"], vec![
                    vec![0.0, 4.0, 1.0],
                    vec![4.0, 0.0, 0.0],
                    vec![1.0, 0.0, 0.0],
                ]),
                frame(1, &["A", "B", "C"], vec![
                    vec![0.0, 10.0, 3.0],
                    vec![1.0, 0.0, 0.0],
                    vec![9.0, 0.0, 0.0],
                ]),
            ],
            metadata,
        )
        .unwrap()
    }

    #[test]
    fn test_prune_removes_rows_and_columns() {
        let mut timeline = sample();
        timeline.prune(&names(&["C"]), &identity()).unwrap();

        let first = timeline.section(0).unwrap();
        assert_eq!(first.characters(), &["B".to_string(), "A".to_string()]);
        assert_eq!(first.matrix().to_rows(), vec![vec![0.0, 1.0], vec![1.0, 0.0]]);

        let last = timeline.section(1).unwrap();
        assert_eq!(last.matrix().to_rows(), vec![vec![0.0, 10.0], vec![1.0, 0.0]]);

        assert!(!timeline.contains_character("C"));
        assert!(!timeline.metadata().mentions("C"));
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut once = sample();
        once.prune(&names(&["C", "Nobody"]), &identity()).unwrap();

        let mut twice = once.clone();
        twice.prune(&names(&["C", "Nobody"]), &identity()).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_prune_below_percentile() {
        // final totals: A = 10, B = 10, C = 3 -> p50 of [3, 10, 10] is 10
        let mut timeline = sample();
        let report = timeline.prune_below_percentile(50, &identity()).unwrap();

        assert_eq!(report.threshold, 10.0);
        assert_eq!(report.removed, names(&["C"]));
        assert!(timeline.contains_character("A"));
        assert!(timeline.contains_character("B"));
        assert!(!timeline.contains_character("C"));
    }

    #[test]
    fn test_pruning_completeness_and_soundness() {
        for p in [0, 10, 25, 50, 75, 90, 100] {
            let mut timeline = sample();
            let totals = timeline.final_totals(&identity());
            let report = timeline.prune_below_percentile(p, &identity()).unwrap();

            for (name, total) in totals {
                if total < report.threshold {
                    assert!(!timeline.contains_character(&name), "p={} kept {}", p, name);
                    assert!(!timeline.metadata().mentions(&name));
                } else {
                    assert!(timeline.contains_character(&name), "p={} removed {}", p, name);
                }
            }
            assert!(timeline.check_consistency().is_ok());
        }
    }

    #[test]
    fn test_prune_keeps_characters_outside_final_section() {
        let mut timeline = Timeline::from_parts(
            vec![
                frame(0, &["D", "A"], vec![vec![0.0, 2.0], vec![2.0, 0.0]]),
                frame(1, &["A", "B"], vec![vec![0.0, 1.0], vec![8.0, 0.0]]),
            ],
            InteractionMetadata::new(),
        )
        .unwrap();

        let report = timeline.prune_below_percentile(100, &identity()).unwrap();
        assert_eq!(report.removed, names(&["B"]));
        assert!(timeline.contains_character("D"));
    }

    #[test]
    fn test_prune_removes_every_alias() {
        let mut metadata = InteractionMetadata::new();
        metadata.record_interaction("Lizzy", "Darcy", 0, 0);
        metadata.record_interaction("Jane", "Darcy", 1, 0);

        let mut timeline = Timeline::from_parts(
            vec![
                frame(0, &["Lizzy", "Darcy"], vec![vec![0.0, 1.0], vec![1.0, 0.0]]),
                frame(1, &["Elizabeth", "Jane", "Darcy"], vec![
                    vec![0.0, 0.0, 0.0],
                    vec![0.0, 0.0, 5.0],
                    vec![0.0, 5.0, 0.0],
                ]),
            ],
            metadata,
        )
        .unwrap();
        let canonical = CanonicalNameMap::new()
            .with_alias("Lizzy", "Elizabeth Bennet")
            .with_alias("Elizabeth", "Elizabeth Bennet");

        let report = timeline.prune_below_percentile(50, &canonical).unwrap();

        assert_eq!(report.removed, names(&["Elizabeth Bennet"]));
        assert!(!timeline.contains_character("Lizzy"));
        assert!(!timeline.contains_character("Elizabeth"));
        assert!(!timeline.metadata().mentions("Lizzy"));
        assert_eq!(timeline.section(0).unwrap().characters(), &["Darcy".to_string()]);
    }
}
