/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for loading settings sources and building the tree.

use thiserror::Error;

/// Text shown in place of the settings menu when the build fails.
pub const PLACEHOLDER_TEXT: &str = "The site set settings cannot be displayed.";

/// Errors returned by a [`TextLoader`](crate::TextLoader).
#[derive(Debug, Error)]
pub enum LoadError {
    /// No file exists at the resolved path.
    #[error("cannot find the source at {path}")]
    NotFound { path: String },

    /// The file exists but could not be read.
    #[error("cannot load file from path {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from reading an XLIFF translation file.
#[derive(Debug, Error)]
pub enum XliffError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
}

/// Errors that stop a settings menu from being built.
///
/// Only the primary settings source can fail a build. Problems with the
/// optional sources (config.yaml, translations) are logged and replaced with
/// empty data instead.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings definition file could not be located or read.
    #[error("the settings source {path} could not be loaded: {source}")]
    SourceMissing {
        path: String,
        #[source]
        source: LoadError,
    },

    /// The settings definition file has no usable `settings` mapping.
    #[error("the settings source at path {path} did not contain any settings: {message}")]
    SourceMalformed { path: String, message: String },

    /// A category's parent chain loops back on itself.
    #[error("category {category} is part of a parent cycle")]
    CategoryCycle { category: String },
}

impl SettingsError {
    /// The user-visible text to render instead of the menu.
    pub fn placeholder(&self) -> &'static str {
        PLACEHOLDER_TEXT
    }
}

/// Result type for settings tree operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
