//! Partitioner - splits a book into the ordered sections of a timeline.
//!
//! Two strategies:
//! 1. **Boundary pattern**: split at every match (e.g. chapter headings),
//!    dropping the front matter before the first match
//! 2. **Balanced paragraphs**: group paragraphs into `n` contiguous sections
//!    whose sizes differ by at most one paragraph

use regex::Regex;
use serde::{Deserialize, Serialize};

use book_model::ConfigError;

/// One time step of the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    /// Cleaned, single-line text.
    pub text: String,
}

/// Compile a boundary pattern, reporting failures as configuration errors.
pub fn compile_boundary(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Split `text` into cleaned sections.
///
/// With a boundary pattern `nb_sections` is ignored and the section count is
/// whatever the pattern yields.
pub fn partition(
    text: &str,
    boundary: Option<&Regex>,
    nb_sections: usize,
) -> Result<Vec<Section>, ConfigError> {
    let segments: Vec<String> = match boundary {
        Some(pattern) => {
            let chapters = split_chapters(text, pattern);
            if chapters.is_empty() {
                return Err(ConfigError::NoSections(pattern.as_str().to_string()));
            }
            chapters.into_iter().map(str::to_string).collect()
        }
        None => paragraph_groups(text, nb_sections)?
            .into_iter()
            .map(|group| group.join("\n"))
            .collect(),
    };

    Ok(segments
        .iter()
        .enumerate()
        .map(|(index, segment)| Section {
            index,
            text: clean_segment(segment),
        })
        .collect())
}

/// Pieces of `text` between boundary matches, front matter excluded.
pub fn split_chapters<'a>(text: &'a str, boundary: &Regex) -> Vec<&'a str> {
    boundary.split(text).skip(1).collect()
}

/// Group the paragraphs of `text` into `min(nb_sections, paragraphs)`
/// contiguous groups. With `p = q * n + r` paragraphs the first `r` groups
/// hold `q + 1` paragraphs and the rest hold `q`.
pub fn paragraph_groups(text: &str, nb_sections: usize) -> Result<Vec<Vec<&str>>, ConfigError> {
    if nb_sections == 0 {
        return Err(ConfigError::InvalidSectionCount(nb_sections));
    }

    let paragraphs: Vec<&str> = text.split('\n').collect();
    let groups = nb_sections.min(paragraphs.len());
    let (q, r) = (paragraphs.len() / groups, paragraphs.len() % groups);

    let mut start = 0;
    Ok((0..groups)
        .map(|i| {
            let size = if i < r { q + 1 } else { q };
            let group = paragraphs[start..start + size].to_vec();
            start += size;
            group
        })
        .collect())
}

/// Trim trailing whitespace and turn every line break into a single space.
pub fn clean_segment(segment: &str) -> String {
    segment
        .trim_end()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
