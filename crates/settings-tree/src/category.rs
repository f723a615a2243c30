/*
 * category.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Category declarations and the node table that links them into a forest.
//!
//! Categories may name a parent that is declared later or not at all, so the
//! table is built in two passes: every declaration becomes a node first, then
//! each node is attached to its parent if the parent exists, or becomes a root
//! otherwise. Nodes refer to their children by id; owned output nodes are only
//! built when the tree is assembled.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{Result, SettingsError};
use crate::setting::SettingEntry;

/// Separator between labels in a category rootline.
pub const ROOTLINE_SEPARATOR: &str = " > ";

/// A category as declared in the settings source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub id: String,
    pub label: Option<String>,
    pub parent: Option<String>,
}

impl CategoryDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A category in the node table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: String,
    pub label: String,
    /// Empty for root categories.
    pub parent: String,
    /// Ids of child categories, in declaration order.
    pub children: Vec<String>,
    /// Settings attached directly to this category, in declaration order.
    pub settings: Vec<SettingEntry>,
}

impl CategoryNode {
    fn new(id: &str, label: &str, parent: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            parent: parent.to_string(),
            children: Vec::new(),
            settings: Vec::new(),
        }
    }
}

/// All known categories, indexed by id, plus the ordered list of roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    nodes: IndexMap<String, CategoryNode>,
    roots: Vec<String>,
}

impl CategoryTable {
    /// Index the declared categories and link them to their parents.
    ///
    /// A category's label is its declared label if non-empty, otherwise its
    /// translated label, otherwise empty.
    pub fn build(
        declarations: &[CategoryDefinition],
        category_labels: &HashMap<String, String>,
    ) -> Self {
        let mut nodes = IndexMap::with_capacity(declarations.len());
        for declaration in declarations {
            let label = declaration
                .label
                .as_deref()
                .filter(|label| !label.is_empty())
                .or_else(|| category_labels.get(&declaration.id).map(String::as_str))
                .unwrap_or("");
            let parent = declaration.parent.as_deref().unwrap_or("");
            nodes.insert(
                declaration.id.clone(),
                CategoryNode::new(&declaration.id, label, parent),
            );
        }

        let mut table = Self {
            nodes,
            roots: Vec::new(),
        };
        table.link();
        table
    }

    fn link(&mut self) {
        let links: Vec<(String, String)> = self
            .nodes
            .values()
            .map(|node| (node.id.clone(), node.parent.clone()))
            .collect();

        for (id, parent) in links {
            match self.nodes.get_mut(&parent) {
                Some(parent_node) if !parent.is_empty() => parent_node.children.push(id),
                _ => self.roots.push(id),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root category ids in output order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in the order they were added.
    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Return the node for `id`, creating an unlabeled root category if it
    /// was never declared.
    pub fn ensure(&mut self, id: &str) -> &mut CategoryNode {
        if !self.nodes.contains_key(id) {
            tracing::debug!(category = id, "Creating undeclared category");
            self.roots.push(id.to_string());
        }
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| CategoryNode::new(id, "", ""))
    }

    /// Remove and return the settings attached to `id`.
    pub(crate) fn take_settings(&mut self, id: &str) -> Vec<SettingEntry> {
        self.nodes
            .get_mut(id)
            .map(|node| std::mem::take(&mut node.settings))
            .unwrap_or_default()
    }

    /// The chain of labels from the root-most ancestor down to `id`.
    ///
    /// An id that is not in the table stands for itself: its label is the id
    /// and it has no parent. The walk stops at a category without a parent or
    /// with an empty label, so a chain can start with an empty segment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::CategoryCycle`] if the parent chain of `id`
    /// loops, whatever the labels along it.
    pub fn rootline(&self, id: &str) -> Result<String> {
        self.check_ancestry(id)?;

        let mut segments: Vec<&str> = Vec::new();
        let mut current = id;
        loop {
            let (label, parent) = match self.nodes.get(current) {
                Some(node) => (node.label.as_str(), node.parent.as_str()),
                None => (current, ""),
            };
            segments.push(label);
            if parent.is_empty() || label.is_empty() {
                break;
            }
            current = parent;
        }
        segments.reverse();
        Ok(segments.join(ROOTLINE_SEPARATOR))
    }

    /// Follow the parents of `id` and fail if they loop.
    fn check_ancestry(&self, id: &str) -> Result<()> {
        let mut current = id;
        let mut steps = 0usize;
        while let Some(node) = self.nodes.get(current) {
            if node.parent.is_empty() {
                return Ok(());
            }
            // An acyclic chain takes at most one step per node.
            steps += 1;
            if steps > self.nodes.len() {
                return Err(SettingsError::CategoryCycle {
                    category: id.to_string(),
                });
            }
            current = node.parent.as_str();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(declarations: &[CategoryDefinition]) -> CategoryTable {
        CategoryTable::build(declarations, &HashMap::new())
    }

    #[test]
    fn test_children_declared_before_parents_are_linked() {
        let table = table(&[
            CategoryDefinition::new("child").with_label("Child").with_parent("root"),
            CategoryDefinition::new("root").with_label("Root"),
        ]);
        assert_eq!(table.roots(), ["root".to_string()]);
        assert_eq!(table.get("root").unwrap().children, vec!["child".to_string()]);
    }

    #[test]
    fn test_missing_parent_makes_root() {
        let table = table(&[CategoryDefinition::new("child")
            .with_label("Child")
            .with_parent("missing")]);
        assert_eq!(table.roots(), ["child".to_string()]);
        assert!(!table.contains("missing"));
    }

    #[test]
    fn test_label_falls_back_to_translation() {
        let mut labels = HashMap::new();
        labels.insert("perf".to_string(), "Performance".to_string());
        labels.insert("io".to_string(), "Translated".to_string());
        labels.insert("blank".to_string(), "Blank".to_string());
        let table = CategoryTable::build(
            &[
                CategoryDefinition::new("perf"),
                CategoryDefinition::new("io").with_label("Input/Output"),
                CategoryDefinition::new("misc"),
                CategoryDefinition::new("blank").with_label(""),
            ],
            &labels,
        );
        assert_eq!(table.get("perf").unwrap().label, "Performance");
        assert_eq!(table.get("io").unwrap().label, "Input/Output");
        assert_eq!(table.get("misc").unwrap().label, "");
        assert_eq!(table.get("blank").unwrap().label, "Blank");
    }

    #[test]
    fn test_ensure_creates_one_root_per_id() {
        let mut table = table(&[CategoryDefinition::new("a").with_label("A")]);
        table.ensure("orphan");
        table.ensure("orphan");
        table.ensure("a");
        assert_eq!(table.roots(), ["a".to_string(), "orphan".to_string()]);
        assert_eq!(table.get("orphan").unwrap().label, "");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rootline_has_one_segment_per_level() {
        let table = table(&[
            CategoryDefinition::new("a").with_label("A"),
            CategoryDefinition::new("b").with_label("B").with_parent("a"),
            CategoryDefinition::new("c").with_label("C").with_parent("b"),
        ]);
        assert_eq!(table.rootline("a").unwrap(), "A");
        assert_eq!(table.rootline("b").unwrap(), "A > B");
        assert_eq!(table.rootline("c").unwrap(), "A > B > C");
    }

    #[test]
    fn test_rootline_of_unlabeled_category_is_empty() {
        let table = table(&[
            CategoryDefinition::new("a").with_label("A"),
            CategoryDefinition::new("b").with_parent("a"),
        ]);
        assert_eq!(table.rootline("b").unwrap(), "");
    }

    #[test]
    fn test_rootline_stops_at_unlabeled_ancestor() {
        let table = table(&[
            CategoryDefinition::new("a"),
            CategoryDefinition::new("b").with_label("B").with_parent("a"),
        ]);
        assert_eq!(table.rootline("b").unwrap(), " > B");
    }

    #[test]
    fn test_rootline_of_undeclared_ids_uses_the_id() {
        let table = table(&[CategoryDefinition::new("child")
            .with_label("Child")
            .with_parent("missing")]);
        assert_eq!(table.rootline("child").unwrap(), "missing > Child");
        assert_eq!(table.rootline("elsewhere").unwrap(), "elsewhere");
        assert_eq!(table.rootline("").unwrap(), "");
    }

    #[test]
    fn test_rootline_detects_cycles() {
        let table = table(&[
            CategoryDefinition::new("a").with_label("A").with_parent("b"),
            CategoryDefinition::new("b").with_label("B").with_parent("a"),
        ]);
        assert!(table.roots().is_empty());
        assert!(matches!(
            table.rootline("a"),
            Err(SettingsError::CategoryCycle { category }) if category == "a"
        ));
    }

    #[test]
    fn test_cycle_through_unlabeled_category_is_detected() {
        let table = table(&[
            CategoryDefinition::new("a").with_label("A").with_parent("b"),
            CategoryDefinition::new("b").with_parent("a"),
        ]);
        assert!(matches!(
            table.rootline("b"),
            Err(SettingsError::CategoryCycle { category }) if category == "b"
        ));
        assert!(table.rootline("a").is_err());
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let table = table(&[CategoryDefinition::new("a").with_label("A").with_parent("a")]);
        assert!(table.rootline("a").is_err());
    }
}
