/// Build and render configuration.
///
/// Threaded explicitly through scanner, builder and renderer so that two
/// concurrent builds with different settings never touch shared state.
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Reserved umbrella-root name for whole-universe renders. Module names come
/// from directory names, so a triple-underscore token cannot collide.
pub const DEFAULT_SENTINEL: &str = "___root___";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Source tree to scan. Every first-level directory is one module.
    pub scan_root: PathBuf,
    /// Import path prefix that marks a dependency as internal, e.g.
    /// "cam/back/". The path segment right after it is the referenced
    /// module name.
    pub import_prefix: String,
    /// Module names treated as leaves: linked into the graph but never
    /// expanded further.
    pub terminal_nodes: Vec<String>,
    /// Synthetic root attached when the universe has several true roots.
    pub sentinel_root: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            scan_root: PathBuf::from("."),
            import_prefix: String::new(),
            terminal_nodes: vec!["startup".to_string()],
            sentinel_root: DEFAULT_SENTINEL.to_string(),
        }
    }
}

impl GraphConfig {
    /// Load configuration from a TOML file. Missing keys fall back to the
    /// defaults above.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: GraphConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sentinel_root.is_empty() {
            bail!("sentinel_root must not be empty");
        }
        if self.terminal_nodes.iter().any(|t| t == &self.sentinel_root) {
            bail!("sentinel_root {:?} must not appear in terminal_nodes", self.sentinel_root);
        }
        Ok(())
    }

    /// Whether expansion stops at this module name.
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminal_nodes.iter().any(|t| t == name)
    }

    /// Display name for the scanned universe: the scan root's directory
    /// name.
    pub fn root_label(&self) -> String {
        self.scan_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    }
}
