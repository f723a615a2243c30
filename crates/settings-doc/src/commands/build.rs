/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! Loads a settings definition file, builds the settings menu and prints it
//! as JSON. When the settings cannot be loaded the placeholder text is printed
//! instead and the command fails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use settings_tree::{FileSystemLoader, MenuOptions, SlugAnchorNormalizer, build_settings_menu};

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    pub settings: String,
    pub doc_root: PathBuf,
    pub project_root: Option<PathBuf>,
    pub document_dir: String,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub display: Option<String>,
    pub noindex: bool,
    /// Raw `NAME[=VALUE]` options
    pub options: Vec<String>,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let mut loader = FileSystemLoader::new(&args.doc_root).with_document_dir(&args.document_dir);
    if let Some(project_root) = &args.project_root {
        loader = loader.with_project_root(project_root);
    }

    let options = menu_options(&args);
    let menu = match build_settings_menu(&loader, &SlugAnchorNormalizer, &args.settings, &options)
    {
        Ok(menu) => menu,
        Err(err) => {
            println!("{}", err.placeholder());
            return Err(err).with_context(|| format!("Failed to build {}", args.settings));
        }
    };

    info!(
        categories = menu.items.len(),
        settings = menu.setting_count(),
        "Built settings menu"
    );

    let json = serde_json::to_string_pretty(&menu).context("Failed to serialize menu")?;
    println!("{}", json);
    Ok(())
}

fn menu_options(args: &BuildArgs) -> MenuOptions {
    let mut options = MenuOptions::new();
    if let Some(name) = &args.name {
        options = options.with("name", name);
    }
    if let Some(caption) = &args.caption {
        options = options.with("caption", caption);
    }
    if let Some(display) = &args.display {
        options = options.with("display", display);
    }
    if args.noindex {
        options = options.with("noindex", "");
    }
    for raw in &args.options {
        let (name, value) = split_option(raw);
        options = options.with(name, value);
    }
    options
}

/// Split `NAME=VALUE` at the first `=`; a bare `NAME` has an empty value.
fn split_option(raw: &str) -> (&str, &str) {
    raw.split_once('=').unwrap_or((raw, ""))
}
