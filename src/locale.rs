use std::collections::BTreeMap;

use crate::error::{DotmapError, DotmapResult};

/// Immutable translation lookup: language tag -> key -> string, with a fixed
/// fallback language for unknown tags and missing keys.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LocaleTable {
    fallback: String,
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl LocaleTable {
    pub fn new(
        fallback: impl Into<String>,
        tables: BTreeMap<String, BTreeMap<String, String>>,
    ) -> DotmapResult<Self> {
        let fallback = fallback.into();
        if !tables.contains_key(&fallback) {
            return Err(DotmapError::locale(format!(
                "fallback language '{fallback}' has no table"
            )));
        }
        Ok(Self { fallback, tables })
    }

    /// Parse the `{"fr": {"key": "text", ...}, "en": {...}}` dictionary shape.
    pub fn from_json_str(fallback: impl Into<String>, json: &str) -> DotmapResult<Self> {
        let tables: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_str(json).map_err(|e| DotmapError::serde(e.to_string()))?;
        Self::new(fallback, tables)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Collapse a requested tag to one that has a table. Unknown system
    /// languages land on the fallback.
    pub fn resolve<'a>(&'a self, tag: &'a str) -> &'a str {
        if self.tables.contains_key(tag) {
            tag
        } else {
            &self.fallback
        }
    }

    /// Look up `key` in `tag`'s table, falling back to the fallback language;
    /// `None` only when the key is absent from both.
    pub fn get(&self, tag: &str, key: &str) -> Option<&str> {
        let primary = self
            .tables
            .get(tag)
            .and_then(|table| table.get(key))
            .map(String::as_str);
        primary.or_else(|| {
            self.tables
                .get(&self.fallback)
                .and_then(|table| table.get(key))
                .map(String::as_str)
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
