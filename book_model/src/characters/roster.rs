//! Character roster - the known cast of a book and the aliases each goes by.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::CanonicalNameMap;
use crate::error::ConfigError;

/// One character of the cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Canonical display name.
    pub name: String,

    /// Other spellings found in the text. The canonical name always matches too.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Every spelling of this character, canonical name first.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// The full cast, as loaded from a roster file:
///
/// ```toml
/// [[character]]
/// name = "Elizabeth Bennet"
/// aliases = ["Elizabeth", "Lizzy"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default, rename = "character")]
    pub characters: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, entry: RosterEntry) -> Self {
        self.characters.push(entry);
        self
    }

    /// Parse and validate a roster from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let roster: Roster = toml::from_str(source)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Read, parse and validate a roster file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject aliases claimed by two different characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for entry in &self.characters {
            for spelling in entry.spellings() {
                match owners.get(spelling) {
                    Some(owner) if *owner != entry.name => {
                        return Err(ConfigError::DuplicateAlias {
                            alias: spelling.to_string(),
                            first: owner.to_string(),
                            second: entry.name.clone(),
                        });
                    }
                    _ => {
                        owners.insert(spelling, &entry.name);
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the alias -> canonical lookup for this roster.
    pub fn canonical_names(&self) -> CanonicalNameMap {
        self.characters
            .iter()
            .flat_map(|entry| {
                entry
                    .spellings()
                    .map(move |s| (s.to_string(), entry.name.clone()))
            })
            .collect()
    }

    /// Find the entry a spelling belongs to.
    pub fn find(&self, spelling: &str) -> Option<&RosterEntry> {
        self.characters
            .iter()
            .find(|entry| entry.spellings().any(|s| s == spelling))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
