/*
 * labels.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Label and description lookup tables built from translation entries.
//!
//! Translation ids are dotted paths. The prefix says what the entry
//! describes, the remainder is the setting or category key:
//!
//! | id                               | table          | key       |
//! |----------------------------------|----------------|-----------|
//! | `settings.description.page.size` | `descriptions` | page.size |
//! | `settings.page.size`             | `settings`     | page.size |
//! | `categories.page`                | `categories`   | page      |

use std::collections::HashMap;

const SETTING_DESCRIPTION_PREFIX: &str = "settings.description.";
const SETTING_LABEL_PREFIX: &str = "settings.";
const CATEGORY_LABEL_PREFIX: &str = "categories.";

/// A single `(id, value)` pair from a translation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub id: String,
    pub value: String,
}

impl TranslationEntry {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Labels and descriptions keyed by setting or category id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    /// Setting labels.
    pub settings: HashMap<String, String>,
    /// Setting descriptions.
    pub descriptions: HashMap<String, String>,
    /// Category labels.
    pub categories: HashMap<String, String>,
}

impl Labels {
    /// Empty tables, used when no translation source is available.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.descriptions.is_empty() && self.categories.is_empty()
    }
}

/// Sort translation entries into label and description tables.
///
/// Entries with an empty value are skipped. When an id repeats, the last
/// entry wins.
pub fn resolve_labels(entries: &[TranslationEntry]) -> Labels {
    let mut labels = Labels::new();
    for entry in entries {
        if entry.value.is_empty() {
            continue;
        }
        let value = entry.value.clone();
        if let Some(key) = entry.id.strip_prefix(SETTING_DESCRIPTION_PREFIX) {
            labels.descriptions.insert(key.to_string(), value);
        } else if let Some(key) = entry.id.strip_prefix(SETTING_LABEL_PREFIX) {
            labels.settings.insert(key.to_string(), value);
        } else if let Some(key) = entry.id.strip_prefix(CATEGORY_LABEL_PREFIX) {
            labels.categories.insert(key.to_string(), value);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_prefix_wins_over_label_prefix() {
        let labels = resolve_labels(&[TranslationEntry::new(
            "settings.description.page.size",
            "Number of items per page",
        )]);
        assert_eq!(
            labels.descriptions.get("page.size").map(String::as_str),
            Some("Number of items per page")
        );
        assert!(labels.settings.is_empty());
        assert!(labels.categories.is_empty());
    }

    #[test]
    fn test_setting_and_category_labels() {
        let labels = resolve_labels(&[
            TranslationEntry::new("settings.foo", "Foo Label"),
            TranslationEntry::new("categories.perf", "Performance"),
        ]);
        assert_eq!(labels.settings.get("foo").map(String::as_str), Some("Foo Label"));
        assert_eq!(
            labels.categories.get("perf").map(String::as_str),
            Some("Performance")
        );
    }

    #[test]
    fn test_unknown_prefixes_and_empty_values_are_ignored() {
        let labels = resolve_labels(&[
            TranslationEntry::new("other.foo", "Ignored"),
            TranslationEntry::new("settings", "No dot"),
            TranslationEntry::new("settings.bar", ""),
        ]);
        assert!(labels.is_empty());
    }

    #[test]
    fn test_empty_value_does_not_clear_earlier_value() {
        let labels = resolve_labels(&[
            TranslationEntry::new("settings.foo", "First"),
            TranslationEntry::new("settings.foo", ""),
        ]);
        assert_eq!(labels.settings.get("foo").map(String::as_str), Some("First"));
    }

    #[test]
    fn test_last_writer_wins() {
        let labels = resolve_labels(&[
            TranslationEntry::new("categories.a", "First"),
            TranslationEntry::new("categories.a", "Second"),
        ]);
        assert_eq!(labels.categories.get("a").map(String::as_str), Some("Second"));
    }
}
