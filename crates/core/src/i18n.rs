//! Translation lookup for user-facing messages.
//!
//! Every message in the wizard is addressed by a translation key and carries
//! a hardcoded English fallback, so a missing entry never surfaces a raw key
//! to the user.

use std::collections::HashMap;

use crate::error::CoreError;

/// Locales rendered right-to-left.
const RTL_LOCALES: &[&str] = &["ar", "fa", "he", "ur"];

/// Source of localized strings.
pub trait Translator: Send + Sync {
    /// Look up `key`, returning `None` when the table has no entry.
    fn translate(&self, key: &str) -> Option<String>;

    /// Whether the active locale is written right-to-left.
    fn is_rtl(&self) -> bool {
        false
    }
}

/// Translate `key`, falling back to `fallback` when the translator has no entry.
pub fn tr(translator: &dyn Translator, key: &str, fallback: &str) -> String {
    translator
        .translate(key)
        .unwrap_or_else(|| fallback.to_string())
}

/// A translation key paired with its English default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub key: &'static str,
    pub fallback: &'static str,
}

impl Message {
    pub const fn new(key: &'static str, fallback: &'static str) -> Self {
        Self { key, fallback }
    }

    /// Resolve the message through `translator`.
    pub fn resolve(&self, translator: &dyn Translator) -> String {
        tr(translator, self.key, self.fallback)
    }
}

/// Translator with no entries; every lookup uses the English fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishOnly;

impl Translator for EnglishOnly {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Flat key -> string table for one locale.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    locale: String,
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Add or replace a single entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Parse a flat JSON object (`{"key": "text", ...}`) into a table.
    ///
    /// Non-string values are rejected so a malformed bundle fails loudly at
    /// load time rather than rendering `null` in the UI.
    pub fn from_json(locale: impl Into<String>, json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid string table: {e}")))?;
        let obj = value
            .as_object()
            .ok_or_else(|| CoreError::Validation("String table must be a JSON object".into()))?;

        let mut entries = HashMap::with_capacity(obj.len());
        for (key, value) in obj {
            let text = value.as_str().ok_or_else(|| {
                CoreError::Validation(format!("String table entry '{key}' is not a string"))
            })?;
            entries.insert(key.clone(), text.to_string());
        }

        Ok(Self {
            locale: locale.into(),
            entries,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Translator for StringTable {
    fn translate(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn is_rtl(&self) -> bool {
        let language = self.locale.split(['-', '_']).next().unwrap_or_default();
        RTL_LOCALES.contains(&language)
    }
}
