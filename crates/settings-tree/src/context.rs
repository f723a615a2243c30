/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-invocation settings shared by the entry builder and the assembler.

use crate::anchor::AnchorNormalizer;

/// Key used for the implicit category of uncategorized settings.
pub const GLOBAL_CATEGORY_KEY: &str = "_global";

/// Anchor prefix and indexing flags for one menu.
pub struct BuildContext<'a> {
    /// Prepended to every anchor; `"<name>-"` when the menu is named.
    pub id_prefix: String,
    pub noindex: bool,
    normalizer: &'a dyn AnchorNormalizer,
}

impl<'a> BuildContext<'a> {
    pub fn new(name: &str, noindex: bool, normalizer: &'a dyn AnchorNormalizer) -> Self {
        let id_prefix = if name.is_empty() {
            String::new()
        } else {
            format!("{}-", name)
        };
        Self {
            id_prefix,
            noindex,
            normalizer,
        }
    }

    pub fn setting_anchor(&self, key: &str) -> String {
        self.normalizer
            .reduce_anchor(&format!("{}{}", self.id_prefix, key))
    }

    pub fn category_anchor(&self, key: &str) -> String {
        self.normalizer
            .reduce_anchor(&format!("{}category-{}", self.id_prefix, key))
    }

    pub fn reduce_anchor(&self, raw: &str) -> String {
        self.normalizer.reduce_anchor(raw)
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("id_prefix", &self.id_prefix)
            .field("noindex", &self.noindex)
            .finish_non_exhaustive()
    }
}
