//! Output contract - the JSON timeline artifact.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use book_model::{FirstInteraction, PairInteraction};

use crate::error::Result;
use crate::timeline::{InteractionMatrix, Timeline};

/// One section of the artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRecord {
    pub names: Vec<String>,
    pub matrix: InteractionMatrix,
}

/// The complete artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineReport {
    pub book: String,
    pub num_sections: usize,
    pub sections: Vec<SectionRecord>,
    pub first_interactions_between_characters: BTreeMap<String, BTreeMap<String, PairInteraction>>,
    pub first_interactions_overall: BTreeMap<String, FirstInteraction>,
}

impl TimelineReport {
    /// Consume a finished timeline.
    pub fn new(title: &str, timeline: Timeline) -> Self {
        let (sections, metadata) = timeline.into_parts();
        Self {
            book: display_title(title),
            num_sections: sections.len(),
            sections: sections
                .into_iter()
                .map(|section| SectionRecord {
                    names: section.characters().to_vec(),
                    matrix: section.matrix().clone(),
                })
                .collect(),
            first_interactions_between_characters: metadata.per_pair,
            first_interactions_overall: metadata.overall,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `dir/<file name for title>` and return the path.
    ///
    /// The report goes to a temporary file first and is renamed into place,
    /// so a failure never leaves a partial artifact behind.
    pub fn write_to(&self, dir: &Path, title: &str) -> Result<PathBuf> {
        let json = self.to_json()?;
        fs::create_dir_all(dir)?;

        let path = dir.join(output_file_name(title));
        let staging = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(path)
    }
}

/// "pride_and_prejudice" -> "Pride And Prejudice".
pub fn display_title(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut word_start = true;
    for ch in title.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            result.push(ch);
            word_start = true;
        }
    }
    result
}

/// "Pride and Prejudice" -> "Pride_and_Prejudice_analysis.json".
pub fn output_file_name(title: &str) -> String {
    format!("{}_analysis.json", title.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::tests::frame;
    use book_model::InteractionMetadata;

    fn report() -> TimelineReport {
        let mut metadata = InteractionMetadata::new();
        metadata.record_interaction("A", "B", 0, 0);
        let timeline = Timeline::from_parts(
            vec![frame(0, &["A", "B"], vec![vec![0.0, 1.0], vec![1.0, 0.0]])],
            metadata,
        )
        .unwrap();
        TimelineReport::new("the_great gatsby", timeline)
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("pride_and_prejudice"), "Pride And Prejudice");
        assert_eq!(display_title("THE GREAT gatsby"), "The Great Gatsby");
        assert_eq!(display_title("o'brien"), "O'Brien");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Great Expectations"), "Great_Expectations_analysis.json");
    }

    #[test]
    fn test_report_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();

        assert_eq!(json["book"], "The Great Gatsby");
        assert_eq!(json["num_sections"], 1);
        assert_eq!(json["sections"][0]["names"][1], "B");
        assert_eq!(json["sections"][0]["matrix"][0][1], 1.0);
        assert_eq!(json["first_interactions_between_characters"]["A"]["B"]["count"], 1);
        assert_eq!(json["first_interactions_overall"]["B"]["with"], "A");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("timelines");

        let path = report().write_to(&out, "the great gatsby").unwrap();

        assert_eq!(path, out.join("the_great_gatsby_analysis.json"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"book\": \"The Great Gatsby\""));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }
}
