//! Timeline processor - runs every stage for one book.
//!
//! Partition -> analyze each section -> [prune] -> normalize -> reconcile
//! names -> sort -> report. Any error aborts the run before anything is
//! written.

use std::path::PathBuf;

use tracing::{debug, info, info_span};

use book_model::{PipelineConfig, RunId};

use crate::analysis::SectionAnalyzer;
use crate::error::Result;
use crate::export::TimelineReport;
use crate::partition::{compile_boundary, partition, Section};
use crate::timeline::Timeline;

/// Drives one analyzer through the whole pipeline.
pub struct TimelineProcessor<A> {
    config: PipelineConfig,
    analyzer: A,
}

impl<A: SectionAnalyzer> TimelineProcessor<A> {
    /// Create a processor. The configuration is validated up front.
    pub fn new(config: PipelineConfig, analyzer: A) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, analyzer })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Split `text` into sections according to the configuration.
    pub fn sections(&self, text: &str) -> Result<Vec<Section>> {
        let boundary = self
            .config
            .chapter_pattern
            .as_deref()
            .map(compile_boundary)
            .transpose()?;
        Ok(partition(text, boundary.as_ref(), self.config.nb_sections)?)
    }

    /// Analyze every section and assemble the raw timeline.
    pub fn analyze(&mut self, sections: &[Section]) -> Result<Timeline> {
        let mut timeline = Timeline::new();
        for section in sections {
            debug!(
                section = section.index + 1,
                total = sections.len(),
                "analyzing section"
            );
            let analysis = self.analyzer.analyze(section)?;
            timeline.push_section(analysis.into_frame(section.index)?)?;
        }
        Ok(timeline)
    }

    /// Run the full pipeline and return the finished report.
    pub fn process(&mut self, title: &str, text: &str) -> Result<TimelineReport> {
        let run_id = RunId::new();
        let span = info_span!("timeline_run", %run_id, title);
        let _guard = span.enter();

        let sections = self.sections(text)?;
        info!(sections = sections.len(), "split book into sections");

        let mut timeline = self.analyze(&sections)?;
        let output = self.analyzer.finish();
        timeline.set_metadata(output.metadata);
        timeline.check_consistency()?;

        if self.config.pruned {
            let report = timeline
                .prune_below_percentile(self.config.percentile, &output.canonical_names)?;
            info!(
                threshold = report.threshold,
                removed = report.removed.len(),
                "pruned unimportant characters"
            );
        }

        timeline.normalize();
        timeline.check_consistency()?;
        timeline.reconcile(&output.canonical_names)?;
        timeline.sort_by_prominence()?;
        info!("timeline complete");

        Ok(TimelineReport::new(title, timeline))
    }

    /// Run the full pipeline and write the report under the configured
    /// output directory.
    pub fn process_to_file(&mut self, title: &str, text: &str) -> Result<PathBuf> {
        let report = self.process(title, text)?;
        let path = report.write_to(&self.config.output_dir, title)?;
        info!(path = %path.display(), "saved timeline");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerOutput, RosterAnalyzer, SectionAnalysis};
    use crate::error::TimelineError;
    use crate::timeline::InteractionMatrix;
    use book_model::{ConfigError, Roster, RosterEntry};

    const BOOK: &str = "\
Front matter.
CHAPTER 1
Lizzy met Jane. Jane and Bingley danced. Mr. Darcy watched Bingley.
CHAPTER 2
Elizabeth argued with Mr. Darcy. Jane wrote to Lizzy. Collins bowed.
CHAPTER 3
Darcy and Elizabeth walked. Jane and Bingley married. Darcy spoke to Bingley. Elizabeth laughed with Jane. Collins bowed to Jane.
";

    fn roster() -> Roster {
        Roster::new()
            .with_character(
                RosterEntry::new("Elizabeth Bennet")
                    .with_alias("Elizabeth")
                    .with_alias("Lizzy"),
            )
            .with_character(RosterEntry::new("Darcy").with_alias("Mr. Darcy"))
            .with_character(RosterEntry::new("Jane"))
            .with_character(RosterEntry::new("Bingley"))
            .with_character(RosterEntry::new("Collins"))
    }

    fn processor(config: PipelineConfig) -> TimelineProcessor<RosterAnalyzer> {
        let analyzer = RosterAnalyzer::new(&roster(), config.narrator.as_deref()).unwrap();
        TimelineProcessor::new(config, analyzer).unwrap()
    }

    fn chapters() -> PipelineConfig {
        PipelineConfig::new().with_chapter_pattern(r"CHAPTER \d+")
    }

    /// Analyzer replaying canned sections.
    struct Scripted {
        sections: Vec<SectionAnalysis>,
    }

    impl SectionAnalyzer for Scripted {
        fn analyze(&mut self, section: &Section) -> Result<SectionAnalysis> {
            self.sections
                .get(section.index)
                .cloned()
                .ok_or_else(|| TimelineError::Analysis(format!("no script for {}", section.index)))
        }

        fn finish(&mut self) -> AnalyzerOutput {
            AnalyzerOutput::default()
        }
    }

    #[test]
    fn test_unpruned_run_keeps_everyone() {
        let report = processor(chapters().with_pruning(false))
            .process("pride_and_prejudice", BOOK)
            .unwrap();

        assert_eq!(report.book, "Pride And Prejudice");
        assert_eq!(report.num_sections, 3);
        assert!(report.sections[1].names.contains(&"Collins".to_string()));

        // aliases are merged into canonical names
        for section in &report.sections {
            assert!(!section.names.iter().any(|n| n == "Lizzy" || n == "Mr. Darcy"));
            assert_eq!(section.matrix.dim(), section.names.len());
            for row in section.matrix.rows() {
                let sum: f64 = row.iter().sum();
                assert!(sum.abs() < 1e-9 || (sum - 1.0).abs() < 1e-9);
            }
        }
        assert!(report
            .first_interactions_overall
            .contains_key("Elizabeth Bennet"));
    }

    #[test]
    fn test_pruned_run_removes_minor_characters_everywhere() {
        // final totals: Jane 3, Darcy 2, Elizabeth 2, Bingley 2, Collins 1 -> p50 is 2
        let report = processor(chapters()).process("book", BOOK).unwrap();

        for section in &report.sections {
            assert!(!section.names.contains(&"Collins".to_string()));
        }
        assert!(!report.first_interactions_overall.contains_key("Collins"));
        assert!(report
            .first_interactions_overall
            .values()
            .all(|record| record.with != "Collins"));
        assert!(report
            .first_interactions_between_characters
            .values()
            .all(|others| !others.contains_key("Collins")));
        assert_eq!(report.sections[2].names.len(), 4);
    }

    #[test]
    fn test_low_percentile_prunes_nobody() {
        let report = processor(chapters().with_percentile(0))
            .process("book", BOOK)
            .unwrap();
        assert_eq!(report.sections[2].names.len(), 5);
        assert!(report.sections[1].names.contains(&"Collins".to_string()));
    }

    #[test]
    fn test_narrator_excluded() {
        let report = processor(chapters().with_narrator("Jane").with_pruning(false))
            .process("book", BOOK)
            .unwrap();
        for section in &report.sections {
            assert!(!section.names.contains(&"Jane".to_string()));
        }
    }

    #[test]
    fn test_sections_are_sorted_by_prominence() {
        let report = processor(chapters().with_pruning(false))
            .process("book", BOOK)
            .unwrap();

        for section in &report.sections {
            let totals = section.matrix.column_totals();
            assert!(totals.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_paragraph_mode() {
        let text = "Jane met Bingley.\nBingley met Darcy.\nDarcy met Jane.\nJane met Darcy.";
        let report = processor(PipelineConfig::new().with_sections(2).with_pruning(false))
            .process("book", text)
            .unwrap();
        assert_eq!(report.num_sections, 2);
    }

    #[test]
    fn test_pruning_without_final_interactions_fails() {
        let text = "Jane met Bingley.\nNobody here.";
        let err = processor(PipelineConfig::new().with_sections(2))
            .process("book", text)
            .unwrap_err();
        assert!(matches!(err, TimelineError::InsufficientData));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let analyzer = RosterAnalyzer::new(&roster(), None).unwrap();
        let err = TimelineProcessor::new(PipelineConfig::new().with_percentile(101), analyzer)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            TimelineError::Configuration(ConfigError::InvalidPercentile(101))
        ));
    }

    #[test]
    fn test_inconsistent_analysis_is_a_violation() {
        let analyzer = Scripted {
            sections: vec![SectionAnalysis {
                characters: vec!["A".to_string()],
                matrix: InteractionMatrix::zeros(3),
            }],
        };
        let mut processor =
            TimelineProcessor::new(PipelineConfig::new().with_sections(1), analyzer).unwrap();

        let err = processor.process("book", "text").unwrap_err();
        assert!(matches!(err, TimelineError::ConsistencyViolation { section: 0, .. }));
    }

    #[test]
    fn test_process_to_file_writes_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("timelines");
        let config = PipelineConfig::new().with_sections(2).with_output_dir(&out);

        let result = processor(config).process_to_file("book", "Jane met Bingley.\nNobody.");
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_process_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = chapters().with_output_dir(dir.path());

        let path = processor(config).process_to_file("Pride and Prejudice", BOOK).unwrap();

        assert_eq!(path, dir.path().join("Pride_and_Prejudice_analysis.json"));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["num_sections"], 3);
    }
}
