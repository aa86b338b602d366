//! Character identity: the roster of known characters and the lookup that
//! resolves raw mentions to canonical names.

mod roster;

pub use roster::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps raw aliases (as they appear in the text) to canonical character names.
///
/// A raw name missing from the map is treated as already canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNameMap {
    aliases: HashMap<String, String>,
}

impl CanonicalNameMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as a spelling of `canonical`.
    pub fn insert(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(alias.into(), canonical.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.insert(alias, canonical);
        self
    }

    /// Resolve a raw name.
    pub fn canonical<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Check whether `raw` has an explicit entry.
    pub fn contains(&self, raw: &str) -> bool {
        self.aliases.contains_key(raw)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<(String, String)> for CanonicalNameMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            aliases: iter.into_iter().collect(),
        }
    }
}
