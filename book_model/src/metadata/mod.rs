//! First-interaction metadata.
//!
//! Two views of the same interaction history, both keyed by character name:
//! - **overall**: for each character, who it interacted with first and where
//! - **per pair**: for each ordered pair, where the pair first interacted
//!
//! Both use ordered maps so serialized output is reproducible.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::characters::CanonicalNameMap;

/// Position of an interaction in the book: section, then sentence within it.
pub type Location = (usize, usize);

/// A character's first interaction with anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstInteraction {
    /// The other character.
    pub with: String,
    pub section: usize,
    pub sentence: usize,
    /// Total interactions with characters still in the metadata; always the
    /// sum of the character's pair counts.
    pub count: u32,
}

impl FirstInteraction {
    pub fn new(with: impl Into<String>, section: usize, sentence: usize) -> Self {
        Self {
            with: with.into(),
            section,
            sentence,
            count: 0,
        }
    }

    pub fn location(&self) -> Location {
        (self.section, self.sentence)
    }

    /// Combine two records of the same character: the earlier one wins, counts add up.
    pub fn merge(&mut self, other: FirstInteraction) {
        if other.location() < self.location() {
            self.with = other.with;
            self.section = other.section;
            self.sentence = other.sentence;
        }
        self.count += other.count;
    }
}

/// First interaction between two specific characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairInteraction {
    pub section: usize,
    pub sentence: usize,
    /// Number of interactions recorded for the pair.
    pub count: u32,
}

impl PairInteraction {
    pub fn new(section: usize, sentence: usize) -> Self {
        Self {
            section,
            sentence,
            count: 0,
        }
    }

    pub fn location(&self) -> Location {
        (self.section, self.sentence)
    }

    /// Combine two records of the same pair: the earlier location wins, counts add up.
    pub fn merge(&mut self, other: PairInteraction) {
        if other.location() < self.location() {
            self.section = other.section;
            self.sentence = other.sentence;
        }
        self.count += other.count;
    }
}

/// Interaction history of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMetadata {
    #[serde(rename = "first_interactions_overall")]
    pub overall: BTreeMap<String, FirstInteraction>,

    #[serde(rename = "first_interactions_between_characters")]
    pub per_pair: BTreeMap<String, BTreeMap<String, PairInteraction>>,
}

impl InteractionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one interaction between `a` and `b` in both directions.
    ///
    /// Interactions must be recorded in reading order; the first call for a
    /// character or pair fixes its location.
    pub fn record_interaction(&mut self, a: &str, b: &str, section: usize, sentence: usize) {
        for (from, to) in [(a, b), (b, a)] {
            self.per_pair
                .entry(from.to_string())
                .or_default()
                .entry(to.to_string())
                .or_insert_with(|| PairInteraction::new(section, sentence))
                .count += 1;

            self.overall
                .entry(from.to_string())
                .or_insert_with(|| FirstInteraction::new(to, section, sentence))
                .count += 1;
        }
    }

    /// Remove every trace of `names`.
    ///
    /// Top-level entries go, nested pair entries go, and per-character maps
    /// left empty go. An overall record pointing at a removed character is
    /// re-derived from the earliest remaining pair record, or dropped. Every
    /// remaining overall count is recomputed from the pairs left behind.
    pub fn remove_characters(&mut self, names: &BTreeSet<String>) {
        for name in names {
            self.overall.remove(name);
            self.per_pair.remove(name);
        }

        self.per_pair.retain(|_, others| {
            others.retain(|other, _| !names.contains(other));
            !others.is_empty()
        });

        let stale: Vec<String> = self
            .overall
            .iter()
            .filter(|(_, record)| names.contains(&record.with))
            .map(|(name, _)| name.clone())
            .collect();
        self.rederive_overall(stale);
        self.recount_overall();
    }

    /// Rewrite every name through `names`, merging records that collide.
    ///
    /// Pairs that collapse onto a single character are dropped.
    pub fn rename(&mut self, names: &CanonicalNameMap) {
        let mut per_pair: BTreeMap<String, BTreeMap<String, PairInteraction>> = BTreeMap::new();
        for (name, others) in std::mem::take(&mut self.per_pair) {
            let canonical = names.canonical(&name).to_string();
            for (other, record) in others {
                let other = names.canonical(&other);
                if other == canonical {
                    continue;
                }
                let row = per_pair.entry(canonical.clone()).or_default();
                merge_entry(row, other.to_string(), record, PairInteraction::merge);
            }
        }
        self.per_pair = per_pair;

        let mut overall = BTreeMap::new();
        for (name, mut record) in std::mem::take(&mut self.overall) {
            record.with = names.canonical(&record.with).to_string();
            let canonical = names.canonical(&name).to_string();
            merge_entry(&mut overall, canonical, record, FirstInteraction::merge);
        }
        self.overall = overall;

        let collapsed: Vec<String> = self
            .overall
            .iter()
            .filter(|(name, record)| **name == record.with)
            .map(|(name, _)| name.clone())
            .collect();
        self.rederive_overall(collapsed);
        self.recount_overall();
    }

    /// Every name mentioned anywhere in the metadata.
    pub fn characters(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for (name, record) in &self.overall {
            names.insert(name.as_str());
            names.insert(record.with.as_str());
        }
        for (name, others) in &self.per_pair {
            names.insert(name.as_str());
            names.extend(others.keys().map(String::as_str));
        }
        names
    }

    /// Check whether a name is referenced anywhere.
    pub fn mentions(&self, name: &str) -> bool {
        self.characters().contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty() && self.per_pair.is_empty()
    }

    fn rederive_overall(&mut self, names: Vec<String>) {
        for name in names {
            match self.earliest_pair(&name) {
                Some(record) => {
                    self.overall.insert(name, record);
                }
                None => {
                    self.overall.remove(&name);
                }
            }
        }
    }

    /// Set every overall count to the sum of the character's pair counts,
    /// dropping records with no pairs left.
    fn recount_overall(&mut self) {
        let per_pair = &self.per_pair;
        self.overall.retain(|name, record| match per_pair.get(name) {
            Some(others) => {
                record.count = others.values().map(|pair| pair.count).sum();
                true
            }
            None => false,
        });
    }

    /// Earliest remaining pair record of a character, with its counts summed.
    fn earliest_pair(&self, name: &str) -> Option<FirstInteraction> {
        let others = self.per_pair.get(name)?;
        let (with, first) = others.iter().min_by_key(|(_, record)| record.location())?;
        Some(FirstInteraction {
            with: with.clone(),
            section: first.section,
            sentence: first.sentence,
            count: others.values().map(|record| record.count).sum(),
        })
    }
}

fn merge_entry<R>(map: &mut BTreeMap<String, R>, key: String, record: R, merge: fn(&mut R, R)) {
    match map.entry(key) {
        Entry::Occupied(mut existing) => merge(existing.get_mut(), record),
        Entry::Vacant(slot) => {
            slot.insert(record);
        }
    }
}
