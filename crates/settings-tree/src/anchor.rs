/*
 * anchor.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Anchor ids for settings and categories.

/// Turns a raw id into a slug usable as a link target.
pub trait AnchorNormalizer {
    fn reduce_anchor(&self, raw: &str) -> String;
}

/// Lowercases the id and replaces every run of characters that are not
/// letters or digits with a single `-`.
///
/// `Page.Size_Limit` becomes `page-size-limit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugAnchorNormalizer;

impl AnchorNormalizer for SlugAnchorNormalizer {
    fn reduce_anchor(&self, raw: &str) -> String {
        let mut slug = String::with_capacity(raw.len());
        let mut pending_dash = false;
        for c in raw.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }
}
