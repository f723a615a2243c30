/*
 * menu.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The settings menu: the category forest plus the options of the directive
//! that asked for it.

use indexmap::IndexMap;
use serde::Serialize;

use crate::anchor::AnchorNormalizer;
use crate::context::BuildContext;
use crate::error::Result;
use crate::labels::resolve_labels;
use crate::loader::TextLoader;
use crate::source::load_sources;
use crate::tree::{CategoryOutput, build_tree};

/// Options that configure the menu itself rather than add a field.
const RESERVED_OPTIONS: &[&str] = &["name", "class", "caption", "display", "noindex"];

const DEFAULT_DISPLAY: &str = "table";

/// Directive options, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuOptions {
    options: IndexMap<String, String>,
}

impl MenuOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option. Flags such as `noindex` take an empty value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Menu name; also the anchor prefix of every entry.
    pub fn name(&self) -> &str {
        self.get("name").unwrap_or("")
    }

    pub fn caption(&self) -> &str {
        self.get("caption").unwrap_or("")
    }

    pub fn display(&self) -> &str {
        self.get("display")
            .filter(|display| !display.is_empty())
            .unwrap_or(DEFAULT_DISPLAY)
    }

    /// True when `noindex` is present and not explicitly `false`.
    pub fn noindex(&self) -> bool {
        self.get("noindex")
            .is_some_and(|value| !matches!(value, "false" | "0" | "no"))
    }

    /// Non-reserved options as menu fields.
    ///
    /// A value of the form `max=N` limits the field to `N`.
    pub fn fields(&self) -> IndexMap<String, MenuField> {
        self.options
            .iter()
            .filter(|(name, _)| !RESERVED_OPTIONS.contains(&name.as_str()))
            .map(|(name, value)| {
                let max = value.strip_prefix("max=").map(leading_int);
                (name.clone(), MenuField { max })
            })
            .collect()
    }
}

/// Parse the leading integer of `text`, or 0 if it does not start with one.
fn leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// A field column requested by the directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// The result of one settings directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsMenu {
    /// Anchor id of the menu, from its name.
    pub anchor: String,
    /// The settings path given to the directive.
    pub source: String,
    pub caption: String,
    pub display: String,
    pub noindex: bool,
    pub fields: IndexMap<String, MenuField>,
    /// Root categories.
    pub items: Vec<CategoryOutput>,
}

impl SettingsMenu {
    /// All settings in the menu, depth first.
    pub fn setting_count(&self) -> usize {
        fn count(category: &CategoryOutput) -> usize {
            category.settings().count() + category.categories().map(count).sum::<usize>()
        }
        self.items.iter().map(count).sum()
    }
}

/// Load the settings at `source` and build the menu.
///
/// # Errors
///
/// Fails if the settings definition file is missing or has no settings. The
/// error is also logged as a warning; callers should show
/// [`SettingsError::placeholder`](crate::SettingsError::placeholder) instead
/// of the menu.
pub fn build_settings_menu(
    loader: &dyn TextLoader,
    normalizer: &dyn AnchorNormalizer,
    source: &str,
    options: &MenuOptions,
) -> Result<SettingsMenu> {
    let sources = load_sources(loader, source).inspect_err(|err| {
        tracing::warn!(source, "{}", err);
    })?;

    let labels = resolve_labels(&sources.translations);
    let ctx = BuildContext::new(options.name(), options.noindex(), normalizer);
    let items = build_tree(&sources.document, &labels, &ctx);

    tracing::debug!(
        source,
        categories = items.len(),
        settings = sources.document.settings.len(),
        "Built settings menu"
    );

    Ok(SettingsMenu {
        anchor: ctx.reduce_anchor(options.name()),
        source: source.to_string(),
        caption: options.caption().to_string(),
        display: options.display().to_string(),
        noindex: options.noindex(),
        fields: options.fields(),
        items,
    })
}
