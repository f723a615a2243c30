/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Categorized reference documentation for site set settings.
//!
//! A site set declares its settings in `settings.definitions.yaml`, optionally
//! groups them into nested categories, and may ship an XLIFF file with
//! human-readable labels and descriptions. This crate merges those sources
//! into one tree of categories and settings, ready to be rendered.
//!
//! # Pipeline
//!
//! 1. [`load_sources`] reads the definitions file (required) and the
//!    translation file (optional, located through `config.yaml`).
//! 2. [`resolve_labels`] sorts translation entries into setting labels,
//!    setting descriptions and category labels.
//! 3. [`CategoryTable::build`] indexes the declared categories and links them
//!    to their parents.
//! 4. [`build_entry`] resolves each setting's label and description, formats
//!    its default and computes its category rootline.
//! 5. [`assemble`] attaches the entries to their categories, creating
//!    undeclared categories on first use, and renders the forest.
//!
//! [`build_settings_menu`] runs all of the above for one directive.
//!
//! # Example
//!
//! ```rust
//! use settings_tree::{MemoryLoader, MenuOptions, SlugAnchorNormalizer, build_settings_menu};
//!
//! let loader = MemoryLoader::with_files([(
//!     "Sets/Blog/settings.definitions.yaml",
//!     "settings:\n  blog.pageSize:\n    type: int\n    default: 10\n    category: blog\n\
//!      categories:\n  blog:\n    label: Blog\n",
//! )]);
//!
//! let menu = build_settings_menu(
//!     &loader,
//!     &SlugAnchorNormalizer,
//!     "Sets/Blog/settings.definitions.yaml",
//!     &MenuOptions::new(),
//! )
//! .unwrap();
//!
//! let blog = &menu.items[0];
//! assert_eq!(blog.label, "Blog");
//! let setting = blog.settings().next().unwrap();
//! assert_eq!(setting.default.as_deref(), Some("10"));
//! assert_eq!(setting.fields["Category"], "Blog");
//! ```

pub mod anchor;
pub mod category;
pub mod context;
pub mod error;
pub mod labels;
pub mod loader;
pub mod menu;
pub mod setting;
pub mod source;
pub mod tree;
pub mod value;
pub mod xliff;

// Re-export main types
pub use anchor::{AnchorNormalizer, SlugAnchorNormalizer};
pub use category::{CategoryDefinition, CategoryNode, CategoryTable};
pub use context::BuildContext;
pub use error::{LoadError, PLACEHOLDER_TEXT, Result, SettingsError, XliffError};
pub use labels::{Labels, TranslationEntry, resolve_labels};
pub use loader::{FileSystemLoader, MemoryLoader, TextLoader};
pub use menu::{MenuField, MenuOptions, SettingsMenu, build_settings_menu};
pub use setting::{SettingDefinition, SettingEntry, build_entry};
pub use source::{LoadedSources, SettingsDocument, load_sources, parse_settings_document};
pub use tree::{CategoryOutput, MenuItem, assemble, build_tree};
pub use value::DefaultValue;
pub use xliff::parse_xliff;
