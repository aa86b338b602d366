//! Roster analyzer - finds known characters by name and counts sentence
//! co-occurrences.
//!
//! Two characters interact once for every sentence that mentions both.

use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use book_model::{CanonicalNameMap, ConfigError, InteractionMetadata, Roster};

use super::{AnalyzerOutput, SectionAnalysis, SectionAnalyzer};
use crate::error::Result;
use crate::partition::Section;
use crate::timeline::InteractionMatrix;

const SENTENCE_END: &str = r"[.!?]+(?:\s|$)";

/// Co-occurrence analyzer driven by a fixed cast list.
#[derive(Debug, Clone)]
pub struct RosterAnalyzer {
    /// Matches any alias; `None` when nobody is left to look for.
    mentions: Option<Regex>,
    sentence_end: Regex,
    canonical_names: CanonicalNameMap,
    metadata: InteractionMetadata,
}

impl RosterAnalyzer {
    /// Build an analyzer for `roster`, ignoring every spelling of `narrator`.
    pub fn new(roster: &Roster, narrator: Option<&str>) -> std::result::Result<Self, ConfigError> {
        roster.validate()?;

        let is_narrator = |spelling: &str| {
            narrator.is_some_and(|n| n.eq_ignore_ascii_case(spelling))
        };
        let mut spellings: Vec<&str> = roster
            .characters
            .iter()
            .filter(|entry| !entry.spellings().any(is_narrator))
            .flat_map(|entry| entry.spellings())
            .filter(|s| !s.trim().is_empty())
            .collect();
        // longest first so "Elizabeth Bennet" wins over "Elizabeth"
        spellings.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        spellings.dedup();

        let mentions = if spellings.is_empty() {
            None
        } else {
            let alternation = spellings
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"\b(?:{})\b", alternation))?)
        };

        Ok(Self {
            mentions,
            sentence_end: compile(SENTENCE_END)?,
            canonical_names: roster.canonical_names(),
            metadata: InteractionMetadata::new(),
        })
    }

    /// Raw mentions in reading order, each tagged with its sentence number.
    fn find_mentions<'t>(&self, text: &'t str) -> Vec<(usize, &'t str)> {
        let Some(mentions) = &self.mentions else {
            return Vec::new();
        };
        let spans: Vec<(usize, usize, &str)> = mentions
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        // a terminator inside a name ("Mr. Darcy") does not end the sentence
        let breaks: Vec<usize> = self
            .sentence_end
            .find_iter(text)
            .map(|m| m.start())
            .filter(|pos| !spans.iter().any(|(start, end, _)| start <= pos && pos < end))
            .collect();

        spans
            .into_iter()
            .map(|(start, _, alias)| (breaks.partition_point(|b| *b < start), alias))
            .collect()
    }
}

impl SectionAnalyzer for RosterAnalyzer {
    fn analyze(&mut self, section: &Section) -> Result<SectionAnalysis> {
        let mentions = self.find_mentions(&section.text);

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut characters: Vec<String> = Vec::new();
        for (_, alias) in &mentions {
            index.entry(*alias).or_insert_with(|| {
                characters.push(alias.to_string());
                characters.len() - 1
            });
        }

        let mut matrix = InteractionMatrix::zeros(characters.len());
        let mut sentences: Vec<(usize, Vec<&str>)> = Vec::new();
        for (sentence, alias) in mentions {
            if !matches!(sentences.last(), Some((current, _)) if *current == sentence) {
                sentences.push((sentence, Vec::new()));
            }
            if let Some((_, present)) = sentences.last_mut() {
                if !present.contains(&alias) {
                    present.push(alias);
                }
            }
        }

        for (sentence, present) in &sentences {
            for (i, a) in present.iter().enumerate() {
                for b in &present[i + 1..] {
                    if self.canonical_names.canonical(a) == self.canonical_names.canonical(b) {
                        continue;
                    }
                    let (ia, ib) = (index[a], index[b]);
                    matrix.add(ia, ib, 1.0);
                    matrix.add(ib, ia, 1.0);
                    self.metadata
                        .record_interaction(a, b, section.index, *sentence);
                }
            }
        }

        debug!(
            section = section.index,
            characters = characters.len(),
            sentences = sentences.len(),
            "analyzed section"
        );
        Ok(SectionAnalysis { characters, matrix })
    }

    fn finish(&mut self) -> AnalyzerOutput {
        AnalyzerOutput {
            canonical_names: self.canonical_names.clone(),
            metadata: std::mem::take(&mut self.metadata),
        }
    }
}

fn compile(pattern: &str) -> std::result::Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
