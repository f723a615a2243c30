/*
 * setting.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Setting definitions and the entries built from them.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::category::CategoryTable;
use crate::context::BuildContext;
use crate::error::Result;
use crate::labels::Labels;
use crate::value::{DefaultValue, scalar_to_string, to_pretty_json};

/// Facet value that marks an entry as a setting for search and filtering.
pub const SETTING_FACET: &str = "Site Setting";

/// Field name carrying the facet of an entry.
pub const FACET_FIELD: &str = "searchFacet";

/// Field name carrying the resolved label of a setting or category.
pub const LABEL_FIELD: &str = "Label";
pub const ENUM_FIELD: &str = "Enum";
pub const CATEGORY_FIELD: &str = "Category";

const KNOWN_KEYS: &[&str] = &["type", "default", "enum", "label", "description", "category"];

/// A setting as declared in the settings source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingDefinition {
    pub id: String,
    /// Declared type, empty if missing.
    pub type_label: String,
    /// `None` when the `default` key is missing.
    pub default: Option<DefaultValue>,
    /// The `enum` list, if it is a list.
    pub enum_values: Option<Vec<YamlValue>>,
    pub label: Option<String>,
    pub description: Option<String>,
    /// Empty for uncategorized settings.
    pub category: String,
    /// Other scalar fields, rendered as text, in source order.
    pub extra: Vec<(String, String)>,
}

impl SettingDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Read a definition from its YAML mapping.
    ///
    /// Fields of the wrong kind are treated as missing.
    pub fn from_mapping(id: impl Into<String>, mapping: &Mapping) -> Self {
        let get = |key: &str| mapping.get(key);

        let type_label = get("type").and_then(scalar_to_string).unwrap_or_default();
        let default = get("default").map(DefaultValue::from_yaml);
        let enum_values = match get("enum") {
            Some(YamlValue::Sequence(values)) => Some(values.clone()),
            _ => None,
        };
        let string_field = |key: &str| get(key).and_then(YamlValue::as_str).map(String::from);

        let extra = mapping
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                if KNOWN_KEYS.contains(&key) {
                    return None;
                }
                let value = match value {
                    YamlValue::Null => return None,
                    other => scalar_to_string(other)?,
                };
                Some((key.to_string(), value))
            })
            .collect();

        Self {
            id: id.into(),
            type_label,
            default,
            enum_values,
            label: string_field("label"),
            description: string_field("description"),
            category: string_field("category").unwrap_or_default(),
            extra,
        }
    }
}

/// A setting ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingEntry {
    /// Anchor id.
    pub id: String,
    /// The setting key as written in the source.
    pub key: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category_rootline: String,
    pub fields: IndexMap<String, String>,
    pub noindex: bool,
}

/// Resolve labels, format the default and compute the category rootline for
/// one setting.
///
/// Explicit labels and descriptions win over translations when non-empty.
/// The category rootline is computed against `categories` as it is now, so
/// callers that add orphan categories between entries change what later
/// entries see.
///
/// # Errors
///
/// Fails if the setting's category is part of a parent cycle.
pub fn build_entry(
    definition: &SettingDefinition,
    labels: &Labels,
    categories: &CategoryTable,
    ctx: &BuildContext<'_>,
) -> Result<SettingEntry> {
    let key = definition.id.as_str();

    let label = resolve_text(definition.label.as_deref(), labels.settings.get(key));
    let description = resolve_text(
        definition.description.as_deref(),
        labels.descriptions.get(key),
    );

    let default = definition
        .default
        .as_ref()
        .filter(|value| !value.is_empty_string())
        .map(DefaultValue::format);

    let category_rootline = categories.rootline(&definition.category)?;

    let mut fields = IndexMap::new();
    if let Some(label) = &label {
        fields.insert(LABEL_FIELD.to_string(), label.clone());
    }
    if let Some(values) = &definition.enum_values {
        fields.insert(
            ENUM_FIELD.to_string(),
            to_pretty_json(&YamlValue::Sequence(values.clone())),
        );
    }
    if !category_rootline.is_empty() {
        fields.insert(CATEGORY_FIELD.to_string(), category_rootline.clone());
    }
    for (name, value) in &definition.extra {
        fields.entry(name.clone()).or_insert_with(|| value.clone());
    }
    fields.insert(FACET_FIELD.to_string(), SETTING_FACET.to_string());

    Ok(SettingEntry {
        id: ctx.setting_anchor(key),
        key: key.to_string(),
        type_label: definition.type_label.clone(),
        label,
        description,
        default,
        category_rootline,
        fields,
        noindex: ctx.noindex,
    })
}

fn resolve_text(explicit: Option<&str>, translated: Option<&String>) -> Option<String> {
    explicit
        .filter(|text| !text.is_empty())
        .map(String::from)
        .or_else(|| translated.cloned())
}
