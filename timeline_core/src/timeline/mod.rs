//! Timeline aggregate - every section's matrix and character list plus the
//! run's interaction metadata, mutated only as a whole.
//!
//! The transforms run in this order during a run:
//! 1. **Threshold**: percentile of final-section interaction totals
//! 2. **Prune**: drop characters below the threshold everywhere
//! 3. **Normalize**: make every row a probability distribution
//! 4. **Reconcile**: rewrite raw aliases to canonical names
//! 5. **Sort**: order each section by descending prominence

mod matrix;
mod ordering;
mod pruning;
mod reconcile;
mod threshold;

pub use matrix::*;
pub use ordering::*;
pub use pruning::*;
pub use threshold::*;

use book_model::InteractionMetadata;
use tracing::debug;

use crate::error::{Result, TimelineError};

/// One section's characters and their interaction matrix, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFrame {
    index: usize,
    characters: Vec<String>,
    matrix: InteractionMatrix,
    /// Row totals the matrix was divided by; `None` while it holds raw weights.
    row_weights: Option<Vec<f64>>,
}

impl SectionFrame {
    /// Pair a character list with its matrix. Fails if their sizes differ.
    pub fn new(index: usize, characters: Vec<String>, matrix: InteractionMatrix) -> Result<Self> {
        let frame = Self {
            index,
            characters,
            matrix,
            row_weights: None,
        };
        frame.check()?;
        Ok(frame)
    }

    /// An empty section (nobody mentioned).
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            characters: Vec::new(),
            matrix: InteractionMatrix::zeros(0),
            row_weights: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|c| c == name)
    }

    /// Each character paired with its total received weight (column sum).
    pub fn totals(&self) -> Vec<(&str, f64)> {
        self.characters
            .iter()
            .map(String::as_str)
            .zip(self.matrix.column_totals())
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.matrix.dim() != self.characters.len() {
            return Err(TimelineError::ConsistencyViolation {
                section: self.index,
                dimension: self.matrix.dim(),
                characters: self.characters.len(),
            });
        }
        Ok(())
    }
}

/// The whole run: sections in narrative order plus interaction metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    sections: Vec<SectionFrame>,
    metadata: InteractionMetadata,
    normalized: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a timeline from analyzed sections and the analyzer's metadata.
    pub fn from_parts(sections: Vec<SectionFrame>, metadata: InteractionMetadata) -> Result<Self> {
        let timeline = Self {
            sections,
            metadata,
            normalized: false,
        };
        timeline.check_consistency()?;
        Ok(timeline)
    }

    pub fn push_section(&mut self, frame: SectionFrame) -> Result<()> {
        frame.check()?;
        self.sections.push(frame);
        Ok(())
    }

    pub fn set_metadata(&mut self, metadata: InteractionMetadata) {
        self.metadata = metadata;
    }

    pub fn sections(&self) -> &[SectionFrame] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionFrame> {
        self.sections.get(index)
    }

    pub fn final_section(&self) -> Option<&SectionFrame> {
        self.sections.last()
    }

    pub fn metadata(&self) -> &InteractionMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether [`normalize`](Self::normalize) has run.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Check whether `name` appears in any section.
    pub fn contains_character(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.position(name).is_some())
    }

    /// Verify that every matrix matches its character list.
    pub fn check_consistency(&self) -> Result<()> {
        self.sections.iter().try_for_each(SectionFrame::check)
    }

    /// Rescale every row of every matrix to sum to 1 (zero rows stay zero).
    pub fn normalize(&mut self) {
        for section in self.sections.iter_mut().filter(|s| s.row_weights.is_none()) {
            section.row_weights = Some(section.matrix.normalize_rows());
            debug!(section = section.index, "normalized section matrix");
        }
        self.normalized = true;
    }

    pub fn into_parts(self) -> (Vec<SectionFrame>, InteractionMetadata) {
        (self.sections, self.metadata)
    }
}
