//! Section analysis - the seam between raw text and the timeline.
//!
//! An analyzer sees each section once, in order, and reports who is
//! mentioned and how often they interact. After the last section it hands
//! over the alias lookup and the interaction history it accumulated.

mod roster;

pub use roster::*;

use book_model::{CanonicalNameMap, InteractionMetadata};

use crate::error::Result;
use crate::partition::Section;
use crate::timeline::{InteractionMatrix, SectionFrame};

/// Raw result of analyzing one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionAnalysis {
    /// Raw mentions in matrix-index order.
    pub characters: Vec<String>,
    pub matrix: InteractionMatrix,
}

impl SectionAnalysis {
    /// Attach the analysis to its place in the timeline.
    pub fn into_frame(self, index: usize) -> Result<SectionFrame> {
        SectionFrame::new(index, self.characters, self.matrix)
    }
}

/// What an analyzer reports once every section has been seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerOutput {
    pub canonical_names: CanonicalNameMap,
    pub metadata: InteractionMetadata,
}

/// Extracts characters and their interactions from section text.
pub trait SectionAnalyzer {
    /// Analyze one section. Called once per section, in timeline order.
    fn analyze(&mut self, section: &Section) -> Result<SectionAnalysis>;

    /// Hand over the alias lookup and metadata gathered so far.
    fn finish(&mut self) -> AnalyzerOutput;
}
