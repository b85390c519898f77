//! Acronym reference table.
//!
//! Maps acronym tokens to their accepted expansions. A built-in table is
//! embedded in the crate; a process-wide instance is available through
//! [`global`] and can be replaced wholesale with [`install`]. Readers keep
//! the snapshot they obtained even if the table is replaced afterwards.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const BUILTIN_DATA: &str = include_str!("data/acronyms.json");

static GLOBAL: Lazy<RwLock<Arc<AcronymTable>>> =
    Lazy::new(|| RwLock::new(Arc::new(AcronymTable::builtin())));

/// Current process-wide acronym table.
pub fn global() -> Arc<AcronymTable> {
    GLOBAL.read().clone()
}

/// Replace the process-wide acronym table.
pub fn install(table: AcronymTable) {
    let table = Arc::new(table);
    log::info!("installing acronym table with {} entries", table.len());
    *GLOBAL.write() = table;
}

/// Metadata of a known acronym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymEntry {
    /// Primary expansion
    pub full_name: String,
    /// Grouping (Technology, Medical, ...)
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the acronym is common enough to need no definition
    #[serde(default)]
    pub is_common: bool,
    /// Additional accepted expansions
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub expansions: BTreeSet<String>,
}

impl AcronymEntry {
    /// Create an entry with a single expansion.
    pub fn new(full_name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            category: category.into(),
            description: None,
            is_common: true,
            expansions: BTreeSet::new(),
        }
    }
}

/// Serialized form of the table.
#[derive(Debug, Serialize, Deserialize)]
struct AcronymData {
    acronyms: BTreeMap<String, AcronymEntry>,
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
}

/// Read-only mapping from acronym token to accepted expansions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcronymTable {
    entries: BTreeMap<String, AcronymEntry>,
}

impl AcronymTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table embedded in the crate.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_DATA).expect("embedded acronym data is valid")
    }

    /// Load a table from its JSON form.
    ///
    /// Keys must be 2-10 ASCII alphanumeric characters.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: AcronymData = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (token, entry) in data.acronyms {
            table.insert(token, entry)?;
        }
        Ok(table)
    }

    /// Serialize the table, including a category index.
    pub fn to_json(&self) -> Result<String> {
        let data = AcronymData {
            acronyms: self.entries.clone(),
            categories: self.categories(),
        };
        serde_json::to_string_pretty(&data).map_err(|e| Error::Render(e.to_string()))
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, token: impl Into<String>, entry: AcronymEntry) -> Result<()> {
        let token = token.into();
        if !is_valid_key(&token) {
            return Err(Error::Config(format!("invalid acronym token '{}'", token)));
        }
        self.entries.insert(token, entry);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, token: impl Into<String>, entry: AcronymEntry) -> Result<Self> {
        self.insert(token, entry)?;
        Ok(self)
    }

    /// Whether the token has a known definition (case-sensitive).
    pub fn has_definition(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Look up an entry.
    pub fn get(&self, token: &str) -> Option<&AcronymEntry> {
        self.entries.get(token)
    }

    /// Accepted expansions of a token, empty if unknown.
    pub fn expansions_for(&self, token: &str) -> BTreeSet<String> {
        match self.entries.get(token) {
            Some(entry) => {
                let mut all = entry.expansions.clone();
                all.insert(entry.full_name.clone());
                all
            }
            None => BTreeSet::new(),
        }
    }

    /// Category name to sorted tokens.
    pub fn categories(&self) -> BTreeMap<String, Vec<String>> {
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (token, entry) in &self.entries {
            categories
                .entry(entry.category.clone())
                .or_default()
                .push(token.clone());
        }
        categories
    }

    /// Iterate over `(token, entry)` pairs sorted by token.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AcronymEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_valid_key(token: &str) -> bool {
    (2..=10).contains(&token.len()) && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Whether a word looks like an acronym: 2-10 characters of uppercase
/// letters and digits, starting with a letter, with at least two letters.
pub fn is_acronym_token(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (2..=10).contains(&token.len())
        && first.is_ascii_uppercase()
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && token.chars().filter(|c| c.is_ascii_uppercase()).count() >= 2
}
