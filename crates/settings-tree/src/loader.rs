/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading source files by logical path.
//!
//! Logical paths are `/`-separated. Relative paths resolve against the
//! directory of the document being rendered, absolute paths against the
//! documentation root. A path starting with `PROJECT:` resolves against the
//! project root instead, so a directive in `Documentation/` can read
//! `PROJECT:/Configuration/Sets/Blog/settings.definitions.yaml`.
//!
//! Resolution is purely lexical and clamps `..` at the root, so no logical
//! path can reach outside the root it resolves against.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::LoadError;

/// Prefix that makes a logical path resolve against the project root.
pub const PROJECT_PREFIX: &str = "PROJECT:";

/// Source of text files addressed by logical path.
pub trait TextLoader {
    /// Load the full contents of the file at `logical_path`.
    fn load_text(&self, logical_path: &str) -> Result<String, LoadError>;
}

/// Loader that reads from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    documentation_root: PathBuf,
    /// Defaults to the current working directory.
    project_root: Option<PathBuf>,
    /// Directory of the current document, relative to the documentation root.
    document_dir: String,
}

impl FileSystemLoader {
    pub fn new(documentation_root: impl Into<PathBuf>) -> Self {
        Self {
            documentation_root: documentation_root.into(),
            project_root: None,
            document_dir: String::new(),
        }
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(project_root.into());
        self
    }

    pub fn with_document_dir(mut self, document_dir: impl Into<String>) -> Self {
        self.document_dir = document_dir.into();
        self
    }

    fn resolve(&self, logical_path: &str) -> Result<PathBuf, LoadError> {
        match logical_path.strip_prefix(PROJECT_PREFIX) {
            Some(rest) => {
                let root = match &self.project_root {
                    Some(root) => root.clone(),
                    None => std::env::current_dir().map_err(|source| LoadError::Io {
                        path: logical_path.to_string(),
                        source,
                    })?,
                };
                Ok(root.join(absolute_relative_path(&self.document_dir, rest)))
            }
            None => Ok(self
                .documentation_root
                .join(absolute_relative_path(&self.document_dir, logical_path))),
        }
    }
}

impl TextLoader for FileSystemLoader {
    fn load_text(&self, logical_path: &str) -> Result<String, LoadError> {
        let path = self.resolve(logical_path)?;
        if !path.is_file() {
            return Err(LoadError::NotFound {
                path: path.display().to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Loader backed by an in-memory map of logical paths to contents.
///
/// Paths are matched exactly, with no normalization.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn with_files(
        files: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut loader = Self::new();
        for (path, content) in files {
            loader.add(path, content);
        }
        loader
    }
}

impl TextLoader for MemoryLoader {
    fn load_text(&self, logical_path: &str) -> Result<String, LoadError> {
        self.files
            .get(logical_path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: logical_path.to_string(),
            })
    }
}

/// Resolve `path` against `base_dir` into a root-relative path.
///
/// Absolute paths ignore `base_dir`. `.` and empty segments are dropped and
/// `..` removes the previous segment, never going above the root.
pub fn absolute_relative_path(base_dir: &str, path: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    let start = if path.starts_with('/') {
        ""
    } else {
        base_dir
    };
    for segment in start.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.iter().collect::<PathBuf>()
}

/// Parent directory of a logical path.
///
/// `PROJECT:/Configuration/Sets/Blog/settings.definitions.yaml` gives
/// `PROJECT:/Configuration/Sets/Blog`; a bare file name gives `.`.
pub fn logical_dirname(logical_path: &str) -> &str {
    match logical_path.rfind('/') {
        Some(0) => "/",
        Some(index) if logical_path[..index].ends_with(':') => &logical_path[..=index],
        Some(index) => &logical_path[..index],
        None => ".",
    }
}

/// Join a file name onto a logical directory.
pub fn logical_join(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}
