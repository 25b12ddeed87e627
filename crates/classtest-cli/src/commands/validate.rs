//! The `classtest validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use classtest_core::catalog::{load_catalog, validate_catalog};
use classtest_core::config::load_config_from;

pub fn execute(config_path: Option<&Path>, catalog_path: Option<PathBuf>) -> Result<()> {
    let catalog_path = match catalog_path {
        Some(path) => path,
        None => load_config_from(config_path)?.catalog_path,
    };
    let catalog = load_catalog(&catalog_path)?;

    println!(
        "Catalog: {} ({} variants)",
        catalog_path.display(),
        catalog.len()
    );

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .variant_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
