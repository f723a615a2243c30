/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Assembly of setting entries into the final category forest.

use indexmap::IndexMap;
use serde::Serialize;

use crate::category::CategoryTable;
use crate::context::{BuildContext, GLOBAL_CATEGORY_KEY};
use crate::labels::Labels;
use crate::setting::{FACET_FIELD, LABEL_FIELD, SettingEntry, build_entry};
use crate::source::SettingsDocument;

/// Facet value that marks a node as a settings category.
pub const CATEGORY_FACET: &str = "Site Setting Category";

/// A rendered category with its subcategories and settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutput {
    /// Anchor id.
    pub id: String,
    /// Category key; `_global` for uncategorized settings.
    pub key: String,
    pub label: String,
    pub fields: IndexMap<String, String>,
    /// Subcategories first, then the settings of this category.
    pub items: Vec<MenuItem>,
}

/// One entry in a category's item list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuItem {
    Category(CategoryOutput),
    Setting(SettingEntry),
}

impl MenuItem {
    pub fn as_category(&self) -> Option<&CategoryOutput> {
        match self {
            MenuItem::Category(category) => Some(category),
            MenuItem::Setting(_) => None,
        }
    }

    pub fn as_setting(&self) -> Option<&SettingEntry> {
        match self {
            MenuItem::Setting(setting) => Some(setting),
            MenuItem::Category(_) => None,
        }
    }
}

impl CategoryOutput {
    /// Direct subcategories, in order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryOutput> {
        self.items.iter().filter_map(MenuItem::as_category)
    }

    /// Settings attached directly to this category, in order.
    pub fn settings(&self) -> impl Iterator<Item = &SettingEntry> {
        self.items.iter().filter_map(MenuItem::as_setting)
    }
}

/// Build the category forest for a parsed settings document.
///
/// Settings are built and attached one at a time, so the rootline of each
/// setting sees the undeclared categories created by the settings before it.
/// Only the first setting that names an undeclared category gets a
/// `Category` field; later ones see the unlabeled node created for it.
///
/// Settings whose category is part of a parent cycle are skipped with a
/// warning.
pub fn build_tree(
    document: &SettingsDocument,
    labels: &Labels,
    ctx: &BuildContext<'_>,
) -> Vec<CategoryOutput> {
    let mut table = CategoryTable::build(&document.categories, &labels.categories);

    for definition in &document.settings {
        match build_entry(definition, labels, &table, ctx) {
            Ok(entry) => table.ensure(&definition.category).settings.push(entry),
            Err(err) => {
                tracing::warn!(setting = %definition.id, "Skipping setting: {}", err);
            }
        }
    }

    render_forest(table, ctx)
}

/// Attach entries to their categories and render the forest.
///
/// Each entry goes to the category named next to it. Categories that were
/// never declared are created on first reference and appended to the roots;
/// an empty category id is the implicit uncategorized root.
pub fn assemble(
    entries: Vec<(SettingEntry, String)>,
    mut table: CategoryTable,
    ctx: &BuildContext<'_>,
) -> Vec<CategoryOutput> {
    for (entry, category) in entries {
        table.ensure(&category).settings.push(entry);
    }
    render_forest(table, ctx)
}

fn render_forest(mut table: CategoryTable, ctx: &BuildContext<'_>) -> Vec<CategoryOutput> {
    let roots = table.roots().to_vec();
    let mut rendered = 0usize;
    let forest: Vec<CategoryOutput> = roots
        .iter()
        .map(|id| render_category(&mut table, id, ctx, &mut rendered))
        .collect();

    if rendered < table.len() {
        tracing::warn!(
            unreachable = table.len() - rendered,
            "Some categories are not reachable from any root category"
        );
        // Rendering takes the settings of every reachable node.
        for node in table.nodes() {
            for setting in &node.settings {
                tracing::warn!(
                    setting = %setting.key,
                    category = %node.id,
                    "Dropping setting in an unreachable category"
                );
            }
        }
    }

    forest
}

fn render_category(
    table: &mut CategoryTable,
    id: &str,
    ctx: &BuildContext<'_>,
    rendered: &mut usize,
) -> CategoryOutput {
    *rendered += 1;
    let (label, children) = match table.get(id) {
        Some(node) => (node.label.clone(), node.children.clone()),
        None => (String::new(), Vec::new()),
    };

    let mut items: Vec<MenuItem> = children
        .iter()
        .map(|child| MenuItem::Category(render_category(table, child, ctx, rendered)))
        .collect();
    items.extend(table.take_settings(id).into_iter().map(MenuItem::Setting));

    let key = if id.is_empty() {
        GLOBAL_CATEGORY_KEY.to_string()
    } else {
        id.to_string()
    };

    let mut fields = IndexMap::new();
    fields.insert(FACET_FIELD.to_string(), CATEGORY_FACET.to_string());
    if !label.is_empty() {
        fields.insert(LABEL_FIELD.to_string(), label.clone());
    }

    CategoryOutput {
        id: ctx.category_anchor(&key),
        key,
        label,
        fields,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::SlugAnchorNormalizer;
    use crate::category::CategoryDefinition;
    use crate::setting::SettingDefinition;
    use std::collections::HashMap;

    fn entry(key: &str) -> SettingEntry {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        build_entry(
            &SettingDefinition::new(key),
            &Labels::new(),
            &CategoryTable::default(),
            &ctx,
        )
        .unwrap()
    }

    fn keys(category: &CategoryOutput) -> Vec<&str> {
        category.settings().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_undeclared_category_is_created_once() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let table = CategoryTable::build(
            &[CategoryDefinition::new("a").with_label("A")],
            &HashMap::new(),
        );
        let forest = assemble(
            vec![
                (entry("one"), "orphan".to_string()),
                (entry("two"), "a".to_string()),
                (entry("three"), "orphan".to_string()),
            ],
            table,
            &ctx,
        );

        let roots: Vec<&str> = forest.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(roots, ["a", "orphan"]);
        assert_eq!(keys(&forest[1]), ["one", "three"]);
        assert_eq!(forest[1].label, "");
        assert!(!forest[1].fields.contains_key("Label"));
    }

    #[test]
    fn test_children_come_before_settings() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let table = CategoryTable::build(
            &[
                CategoryDefinition::new("parent").with_label("Parent"),
                CategoryDefinition::new("child").with_label("Child").with_parent("parent"),
            ],
            &HashMap::new(),
        );
        let forest = assemble(
            vec![
                (entry("p1"), "parent".to_string()),
                (entry("c1"), "child".to_string()),
            ],
            table,
            &ctx,
        );

        assert_eq!(forest.len(), 1);
        let parent = &forest[0];
        assert!(matches!(parent.items[0], MenuItem::Category(ref c) if c.key == "child"));
        assert!(matches!(parent.items[1], MenuItem::Setting(ref s) if s.key == "p1"));
        assert_eq!(parent.fields["Label"], "Parent");
        assert_eq!(parent.fields["searchFacet"], "Site Setting Category");
    }

    #[test]
    fn test_uncategorized_settings_use_global_key() {
        let ctx = BuildContext::new("site", false, &SlugAnchorNormalizer);
        let forest = assemble(
            vec![(entry("foo"), String::new())],
            CategoryTable::default(),
            &ctx,
        );
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].key, "_global");
        assert_eq!(forest[0].id, "site-category-global");
        assert_eq!(keys(&forest[0]), ["foo"]);
    }

    #[test]
    fn test_declared_categories_without_settings_are_kept() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let table = CategoryTable::build(
            &[CategoryDefinition::new("empty").with_label("Empty")],
            &HashMap::new(),
        );
        let forest = assemble(Vec::new(), table, &ctx);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].items.is_empty());
    }

    #[test]
    fn test_cyclic_categories_are_left_out() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let document = SettingsDocument {
            settings: vec![
                SettingDefinition {
                    category: "a".to_string(),
                    ..SettingDefinition::new("looped")
                },
                SettingDefinition::new("plain"),
            ],
            categories: vec![
                CategoryDefinition::new("a").with_label("A").with_parent("b"),
                CategoryDefinition::new("b").with_label("B").with_parent("a"),
            ],
        };
        let forest = build_tree(&document, &Labels::new(), &ctx);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].key, "_global");
        assert_eq!(keys(&forest[0]), ["plain"]);
    }

    fn in_category(key: &str, category: &str) -> SettingDefinition {
        SettingDefinition {
            category: category.to_string(),
            ..SettingDefinition::new(key)
        }
    }

    #[test]
    fn test_rootline_sees_categories_created_by_earlier_settings() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let document = SettingsDocument {
            settings: vec![
                in_category("a", "legacy"),
                in_category("b", "legacy"),
                in_category("c", "child"),
            ],
            categories: vec![CategoryDefinition::new("child")
                .with_label("Child")
                .with_parent("legacy")],
        };
        let forest = build_tree(&document, &Labels::new(), &ctx);

        let roots: Vec<&str> = forest.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(roots, ["child", "legacy"]);
        let legacy = &forest[1];
        let a = legacy.settings().find(|s| s.key == "a").unwrap();
        let b = legacy.settings().find(|s| s.key == "b").unwrap();
        assert_eq!(a.fields.get("Category").map(String::as_str), Some("legacy"));
        assert_eq!(b.fields.get("Category"), None);
        let c = forest[0].settings().next().unwrap();
        assert_eq!(c.fields["Category"], " > Child");
    }

    #[test]
    fn test_cycle_through_unlabeled_category_is_skipped() {
        let ctx = BuildContext::new("", false, &SlugAnchorNormalizer);
        let document = SettingsDocument {
            settings: vec![in_category("looped", "b"), SettingDefinition::new("plain")],
            categories: vec![
                CategoryDefinition::new("a").with_label("A").with_parent("b"),
                CategoryDefinition::new("b").with_parent("a"),
            ],
        };
        let forest = build_tree(&document, &Labels::new(), &ctx);
        assert_eq!(forest.len(), 1);
        assert_eq!(keys(&forest[0]), ["plain"]);
    }
}
