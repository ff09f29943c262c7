pub mod carousel;
pub mod check;
pub mod export;
pub mod info;
pub mod validate;

use std::path::PathBuf;

use carelab_catalog::catalog::Catalog;
use carelab_common::config::AppConfig;

/// Catalog from `--catalog`, then the configured path, then the built-in one.
pub fn load_catalog(explicit: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<Catalog> {
    let path = explicit.or_else(|| config.catalog_path.clone());
    Catalog::load_or_builtin(path.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {e}"))
}
