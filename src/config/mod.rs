// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a probe definition from a file (YAML or JSON).
///
/// The result is not validated yet: command line flags are usually merged
/// on top of it first.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<ProbeConfig> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read probe file {}", path.display()))?;

    let config: ProbeConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML probe file")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON probe file")?,
    };

    Ok(config)
}
