//! Pricing configuration loading
//!
//! Rates come from an optional JSON file; an explicit `--config` path that
//! cannot be read is an error, while a missing default file silently falls
//! back to the built-in rates.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use kubespend_core::PricingConfig;

/// Load the pricing config from an explicit path, or from the default
/// location when present.
pub fn load_pricing(path: Option<&Path>) -> Result<PricingConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(PricingConfig::default()),
        },
    };

    debug!(path = %path.display(), "Loading pricing config");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pricing config {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pricing config {}", path.display()))
}

fn default_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("kubespend").join("config.json"))
}
