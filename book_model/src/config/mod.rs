//! Run configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default directory the timeline artifact is written to.
pub const DEFAULT_OUTPUT_DIR: &str = "timelines";

/// Configuration for one timeline run.
///
/// Loadable from TOML; every field has a default so a partial file works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Regex marking section boundaries (e.g. chapter headings). When set,
    /// the text before the first match is discarded and `nb_sections` is
    /// ignored.
    pub chapter_pattern: Option<String>,

    /// Number of sections to split the text into when no pattern is given.
    pub nb_sections: usize,

    /// Percentile (0-100) of final-section interaction totals below which
    /// characters are pruned.
    pub percentile: u8,

    /// Character whose mentions are ignored, typically the first-person narrator.
    pub narrator: Option<String>,

    /// Whether to prune unimportant characters.
    pub pruned: bool,

    /// Suppress progress reporting.
    pub quiet: bool,

    /// Directory the timeline artifact is written to.
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chapter_pattern: None,
            nb_sections: 20,
            percentile: 50,
            narrator: None,
            pruned: true,
            quiet: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check ranges and required values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chapter_pattern.is_none() && self.nb_sections == 0 {
            return Err(ConfigError::InvalidSectionCount(self.nb_sections));
        }
        if self.percentile > 100 {
            return Err(ConfigError::InvalidPercentile(self.percentile));
        }
        if matches!(&self.chapter_pattern, Some(p) if p.is_empty()) {
            return Err(ConfigError::Missing("chapter_pattern must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("output_dir"));
        }
        Ok(())
    }

    pub fn with_chapter_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.chapter_pattern = Some(pattern.into());
        self
    }

    pub fn with_sections(mut self, nb_sections: usize) -> Self {
        self.nb_sections = nb_sections;
        self
    }

    pub fn with_percentile(mut self, percentile: u8) -> Self {
        self.percentile = percentile;
        self
    }

    pub fn with_narrator(mut self, narrator: impl Into<String>) -> Self {
        self.narrator = Some(narrator.into());
        self
    }

    pub fn with_pruning(mut self, pruned: bool) -> Self {
        self.pruned = pruned;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
