//! Validate a catalog file.

use std::path::PathBuf;

use carelab_catalog::catalog::Catalog;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating catalog at: {}", path.display());

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse catalog: {e}"))?;

    println!("  Brand: {}", catalog.brand);
    println!("  Packages: {}", catalog.len());
    println!("  Contact year: {}", catalog.contact.year);

    let issues = catalog.issues();
    if issues.is_empty() {
        println!("\nCatalog is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} issue(s) found", issues.len())
}
