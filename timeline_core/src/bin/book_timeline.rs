use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use book_model::{PipelineConfig, Roster};
use timeline_core::{RosterAnalyzer, TimelineProcessor};

/// Build a character interaction timeline for one book.
#[derive(Debug, Parser)]
#[command(name = "book-timeline", version)]
struct Args {
    /// Book title, used for the report header and the output file name.
    #[arg(long)]
    title: String,

    /// Plain-text book file.
    #[arg(long)]
    text: PathBuf,

    /// TOML roster with one [[character]] table per character.
    #[arg(long)]
    roster: PathBuf,

    /// TOML pipeline configuration. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regex marking chapter boundaries.
    #[arg(long)]
    chapter_pattern: Option<String>,

    /// Number of sections when no chapter pattern is given.
    #[arg(long)]
    sections: Option<usize>,

    /// Importance percentile used for pruning (0-100).
    #[arg(long)]
    percentile: Option<u8>,

    /// Character telling the story; never counted.
    #[arg(long)]
    narrator: Option<String>,

    /// Keep every character.
    #[arg(long)]
    no_prune: bool,

    /// Only log warnings and errors.
    #[arg(long)]
    quiet: bool,

    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::new(),
        };

        if let Some(pattern) = &self.chapter_pattern {
            config = config.with_chapter_pattern(pattern.clone());
        }
        if let Some(sections) = self.sections {
            config = config.with_sections(sections);
        }
        if let Some(percentile) = self.percentile {
            config = config.with_percentile(percentile);
        }
        if let Some(narrator) = &self.narrator {
            config = config.with_narrator(narrator.clone());
        }
        if self.no_prune {
            config = config.with_pruning(false);
        }
        if self.quiet {
            config = config.with_quiet(true);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        Ok(config)
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.pipeline_config()?;
    init_logging(config.quiet);

    let roster = Roster::load(&args.roster)
        .with_context(|| format!("loading roster {}", args.roster.display()))?;
    let text = fs::read_to_string(&args.text)
        .with_context(|| format!("reading {}", args.text.display()))?;

    let analyzer = RosterAnalyzer::new(&roster, config.narrator.as_deref())?;
    let mut processor = TimelineProcessor::new(config, analyzer)?;
    let path = processor
        .process_to_file(&args.title, &text)
        .with_context(|| format!("building timeline for {}", args.title))?;

    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "book-timeline",
        "--title",
        "Emma",
        "--text",
        "emma.txt",
        "--roster",
        "roster.toml",
    ];

    fn parse(extra: &[&str]) -> Args {
        Args::try_parse_from(REQUIRED.iter().chain(extra).copied()).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = parse(&[]).pipeline_config().unwrap();
        assert_eq!(config, PipelineConfig::new());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--no-prune",
            "--percentile",
            "30",
            "--chapter-pattern",
            r"CHAPTER \d+",
            "--narrator",
            "Emma",
            "--output-dir",
            "out",
        ])
        .pipeline_config()
        .unwrap();

        assert!(!config.pruned);
        assert_eq!(config.percentile, 30);
        assert_eq!(config.chapter_pattern.as_deref(), Some(r"CHAPTER \d+"));
        assert_eq!(config.narrator.as_deref(), Some("Emma"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.toml");
        fs::write(&path, "percentile = 70\nnb_sections = 5\nquiet = true\n").unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--percentile", "30"])
            .pipeline_config()
            .unwrap();

        assert_eq!(config.percentile, 30);
        assert_eq!(config.nb_sections, 5);
        assert!(config.quiet);
        assert!(config.pruned);
    }

    #[test]
    fn test_missing_required_flag() {
        assert!(Args::try_parse_from(["book-timeline", "--title", "Emma"]).is_err());
    }
}
