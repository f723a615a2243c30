/*
 * labels.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Labels command implementation
 */

//! Labels command implementation.
//!
//! Prints the setting labels, setting descriptions and category labels found
//! in an XLIFF file, sorted by key.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};

use settings_tree::{Labels, parse_xliff, resolve_labels};

/// Execute the labels command
pub fn execute(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let entries =
        parse_xliff(&content).with_context(|| format!("Failed to parse {}", file.display()))?;
    let labels = resolve_labels(&entries);

    println!("{}", serde_json::to_string_pretty(&labels_json(&labels))?);
    Ok(())
}

fn labels_json(labels: &Labels) -> serde_json::Value {
    fn sorted(map: &HashMap<String, String>) -> BTreeMap<&str, &str> {
        map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
    serde_json::json!({
        "settings": sorted(&labels.settings),
        "descriptions": sorted(&labels.descriptions),
        "categories": sorted(&labels.categories),
    })
}
