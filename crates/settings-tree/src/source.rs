/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reading the settings definition file and its optional companions.
//!
//! A settings set lives in one directory:
//!
//! ```text
//! Configuration/Sets/Blog/
//!   settings.definitions.yaml   settings and categories (required)
//!   config.yaml                 may name the labels file under `labels`
//!   labels.xlf                  default translation file
//! ```
//!
//! Only the definitions file is required. Any problem with `config.yaml` or
//! the translation file is logged and treated as if the file were absent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::category::CategoryDefinition;
use crate::error::{Result, SettingsError};
use crate::labels::TranslationEntry;
use crate::loader::{TextLoader, logical_dirname, logical_join};
use crate::setting::SettingDefinition;
use crate::value::scalar_to_string;
use crate::xliff::parse_xliff;

/// Name of the per-set configuration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Translation file used when `config.yaml` names none.
pub const DEFAULT_LABELS_FILE_NAME: &str = "labels.xlf";

static EXTENSION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^EXT:[^/]*/").expect("extension path pattern is valid"));

/// Parsed contents of a settings definition file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    /// Settings in declaration order.
    pub settings: Vec<SettingDefinition>,
    /// Categories in declaration order.
    pub categories: Vec<CategoryDefinition>,
}

/// Everything read from disk for one settings menu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSources {
    pub document: SettingsDocument,
    /// Empty when there is no usable translation file.
    pub translations: Vec<TranslationEntry>,
}

/// Parse a settings definition file.
///
/// Entries under `settings` or `categories` that are not mappings are
/// skipped. A `categories` value that is not a mapping counts as no
/// categories.
///
/// # Errors
///
/// Returns [`SettingsError::SourceMalformed`] if the content is not YAML or
/// has no `settings` mapping.
pub fn parse_settings_document(content: &str, path: &str) -> Result<SettingsDocument> {
    let malformed = |message: String| SettingsError::SourceMalformed {
        path: path.to_string(),
        message,
    };

    let root: YamlValue =
        serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;
    let settings = root
        .get("settings")
        .and_then(YamlValue::as_mapping)
        .ok_or_else(|| malformed("missing `settings` mapping".to_string()))?;

    let settings = mapping_entries(settings, "setting")
        .map(|(id, mapping)| SettingDefinition::from_mapping(id, mapping))
        .collect();

    let categories = match root.get("categories").and_then(YamlValue::as_mapping) {
        Some(categories) => mapping_entries(categories, "category")
            .map(|(id, mapping)| CategoryDefinition {
                label: string_field(mapping, "label"),
                parent: string_field(mapping, "parent"),
                ..CategoryDefinition::new(id)
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(SettingsDocument {
        settings,
        categories,
    })
}

/// Iterate over the entries of `mapping` whose values are mappings, with
/// their keys rendered as text.
fn mapping_entries<'a>(
    mapping: &'a Mapping,
    kind: &'static str,
) -> impl Iterator<Item = (String, &'a Mapping)> + 'a {
    mapping.iter().filter_map(move |(key, value)| {
        let Some(id) = scalar_to_string(key) else {
            tracing::debug!(kind, "Skipping entry with a non-scalar key");
            return None;
        };
        match value.as_mapping() {
            Some(entry) => Some((id, entry)),
            None => {
                tracing::debug!(kind, id = %id, "Skipping entry that is not a mapping");
                None
            }
        }
    })
}

fn string_field(mapping: &Mapping, key: &str) -> Option<String> {
    mapping.get(key).and_then(YamlValue::as_str).map(String::from)
}

/// Load the settings definition file and its optional translation file.
///
/// # Errors
///
/// Fails with [`SettingsError::SourceMissing`] if the definitions file cannot
/// be read and [`SettingsError::SourceMalformed`] if it has no settings.
pub fn load_sources(loader: &dyn TextLoader, settings_path: &str) -> Result<LoadedSources> {
    let content =
        loader
            .load_text(settings_path)
            .map_err(|source| SettingsError::SourceMissing {
                path: settings_path.to_string(),
                source,
            })?;
    let document = parse_settings_document(&content, settings_path)?;

    let labels_path = labels_path(loader, settings_path);
    let translations = match loader.load_text(&labels_path) {
        Ok(content) => parse_xliff(&content).unwrap_or_else(|err| {
            tracing::debug!(path = %labels_path, "Ignoring unreadable labels file: {}", err);
            Vec::new()
        }),
        Err(err) => {
            tracing::debug!(path = %labels_path, "No labels file: {}", err);
            Vec::new()
        }
    };

    Ok(LoadedSources {
        document,
        translations,
    })
}

/// The logical path of the translation file for a settings file.
///
/// Uses the `labels` entry of the sibling `config.yaml` if there is one,
/// otherwise `labels.xlf` next to the settings file.
pub fn labels_path(loader: &dyn TextLoader, settings_path: &str) -> String {
    let dir = logical_dirname(settings_path);
    let config_path = logical_join(dir, CONFIG_FILE_NAME);

    let configured = match loader.load_text(&config_path) {
        Ok(content) => labels_from_config(&content),
        Err(err) => {
            tracing::debug!(path = %config_path, "No set configuration: {}", err);
            None
        }
    };

    match configured {
        Some(labels) => rewrite_extension_path(&labels),
        None => logical_join(dir, DEFAULT_LABELS_FILE_NAME),
    }
}

fn labels_from_config(content: &str) -> Option<String> {
    let config: YamlValue = match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!("Ignoring unreadable set configuration: {}", err);
            return None;
        }
    };
    config
        .get("labels")
        .and_then(YamlValue::as_str)
        .filter(|labels| !labels.is_empty())
        .map(String::from)
}

/// Map an `EXT:<extension>/` path onto the project root.
///
/// Extension paths are assumed to belong to the project being documented.
pub fn rewrite_extension_path(path: &str) -> String {
    EXTENSION_PATH.replace(path, "PROJECT:/").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    const SET: &str = "PROJECT:/Configuration/Sets/Blog/settings.definitions.yaml";

    #[test]
    fn test_parse_keeps_declaration_order() {
        let doc = parse_settings_document(
            "settings:\n  zeta: {type: int}\n  alpha: {type: string}\n  42: {type: bool}\ncategories:\n  b: {label: B, parent: a}\n  a: {label: A}\n",
            "s.yaml",
        )
        .unwrap();
        let ids: Vec<&str> = doc.settings.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["zeta", "alpha", "42"]);
        assert_eq!(
            doc.categories,
            vec![
                CategoryDefinition::new("b").with_label("B").with_parent("a"),
                CategoryDefinition::new("a").with_label("A"),
            ]
        );
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let doc = parse_settings_document(
            "settings:\n  ok: {type: int}\n  broken: just-a-string\n  also: [1, 2]\ncategories: nope\n",
            "s.yaml",
        )
        .unwrap();
        assert_eq!(doc.settings.len(), 1);
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn test_parse_skips_category_entries_that_are_not_mappings() {
        let doc = parse_settings_document(
            "settings:\n  foo: {type: int, category: ok}\ncategories:\n  ok: {label: A}\n  bad: scalar\n  list: [1]\n  after: {parent: ok}\n",
            "s.yaml",
        )
        .unwrap();
        assert_eq!(
            doc.categories,
            vec![
                CategoryDefinition::new("ok").with_label("A"),
                CategoryDefinition::new("after").with_parent("ok"),
            ]
        );
        assert_eq!(doc.settings.len(), 1);
    }

    #[test]
    fn test_parse_requires_settings_mapping() {
        for content in ["", "other: 1", "settings: [a, b]", "- a", "settings: {"] {
            let result = parse_settings_document(content, "s.yaml");
            assert!(
                matches!(result, Err(SettingsError::SourceMalformed { .. })),
                "expected malformed for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_rewrite_extension_path() {
        assert_eq!(
            rewrite_extension_path("EXT:blog/Resources/Private/Language/locallang.xlf"),
            "PROJECT:/Resources/Private/Language/locallang.xlf"
        );
        assert_eq!(rewrite_extension_path("labels.xlf"), "labels.xlf");
    }

    #[test]
    fn test_labels_path_defaults_next_to_settings() {
        let loader = MemoryLoader::new();
        assert_eq!(
            labels_path(&loader, SET),
            "PROJECT:/Configuration/Sets/Blog/labels.xlf"
        );
    }

    #[test]
    fn test_labels_path_from_config() {
        let loader = MemoryLoader::with_files([(
            "PROJECT:/Configuration/Sets/Blog/config.yaml",
            "name: vendor/blog\nlabels: 'EXT:blog/Resources/Private/Language/Sets/Blog.xlf'\n",
        )]);
        assert_eq!(
            labels_path(&loader, SET),
            "PROJECT:/Resources/Private/Language/Sets/Blog.xlf"
        );
    }

    #[test]
    fn test_labels_path_ignores_broken_config() {
        for config in ["labels: ''", "labels: [a]", "{{{", "- x"] {
            let loader =
                MemoryLoader::with_files([("PROJECT:/Configuration/Sets/Blog/config.yaml", config)]);
            assert_eq!(
                labels_path(&loader, SET),
                "PROJECT:/Configuration/Sets/Blog/labels.xlf"
            );
        }
    }

    #[test]
    fn test_load_sources_tolerates_broken_translations() {
        let loader = MemoryLoader::with_files([
            (SET, "settings:\n  foo: {type: string}\n"),
            ("PROJECT:/Configuration/Sets/Blog/labels.xlf", "<xliff><unclosed>"),
        ]);
        let sources = load_sources(&loader, SET).unwrap();
        assert_eq!(sources.document.settings.len(), 1);
        assert!(sources.translations.is_empty());
    }

    #[test]
    fn test_load_sources_missing_settings_is_fatal() {
        let loader = MemoryLoader::new();
        assert!(matches!(
            load_sources(&loader, SET),
            Err(SettingsError::SourceMissing { .. })
        ));
    }
}
