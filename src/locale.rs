//! Display strings per language

use crate::error::{Error, Result};
use crate::layout::group_thousands;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Language used when a requested code is unknown
pub const DEFAULT_LANGUAGE: &str = "en";

const COUNT_PLACEHOLDER: &str = "{{count}}";

const BUILTIN_STRINGS: &str = include_str!("../locales/strings.json");

/// Strings for one language
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocaleStrings {
    pub button: String,
    pub header: String,
    /// Template containing `{{count}}`
    pub online: String,
    /// Template containing `{{count}}`
    pub members: String,
}

impl LocaleStrings {
    pub fn online_text(&self, count: u64) -> String {
        fill_count(&self.online, count)
    }

    pub fn members_text(&self, count: u64) -> String {
        fill_count(&self.members, count)
    }
}

fn fill_count(template: &str, count: u64) -> String {
    template.replacen(COUNT_PLACEHOLDER, &group_thousands(count), 1)
}

/// Read-only table of all known languages
#[derive(Debug, Clone)]
pub struct LocaleTable {
    languages: HashMap<String, LocaleStrings>,
}

impl LocaleTable {
    /// Table compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_STRINGS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let languages: HashMap<String, LocaleStrings> = serde_json::from_str(json)
            .map_err(|e| Error::InitializationError(format!("Invalid locale table: {}", e)))?;
        Self::from_map(languages)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::InitializationError(format!(
                "Failed to read locale table {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    pub fn from_map(languages: HashMap<String, LocaleStrings>) -> Result<Self> {
        if !languages.contains_key(DEFAULT_LANGUAGE) {
            return Err(Error::InitializationError(format!(
                "Locale table has no '{}' entry",
                DEFAULT_LANGUAGE
            )));
        }
        Ok(Self { languages })
    }

    /// Strings for `code`, or the default language when `code` is unknown.
    pub fn resolve(&self, code: &str) -> &LocaleStrings {
        match self.languages.get(code) {
            Some(strings) => strings,
            None => {
                log::debug!("Unknown language {:?}, using {}", code, DEFAULT_LANGUAGE);
                &self.languages[DEFAULT_LANGUAGE]
            }
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }
}
