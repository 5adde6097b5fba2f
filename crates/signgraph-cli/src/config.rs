//! Optional `signgraph.json` in the data directory.
//!
//! ```json
//! { "import": { "chunk_size": 200, "default_language": "egy" } }
//! ```
//!
//! Command-line flags win over anything set here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use signgraph_ingest::ImportConfig;

pub(crate) const CONFIG_FILE: &str = "signgraph.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub import: ImportConfig,
}

impl CliConfig {
    pub(crate) fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
