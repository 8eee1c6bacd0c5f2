// Filesystem import scanner.
//
// Every first-level directory under the scan root is one module. Files
// below it are matched line-by-line against the configured internal import
// prefix; the path segment right after the prefix is the referenced module.
// Modules are scanned in parallel, fanning out with rayon into a DashMap
// that is drained into an ordered map at the end.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dashmap::DashMap;
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::GraphConfig;
use crate::domain::depmap::DependencyMap;
use crate::ports::DependencySource;

pub struct ImportScanner {
    root: PathBuf,
    import_re: Regex,
}

impl ImportScanner {
    pub fn new(config: &GraphConfig) -> Result<Self> {
        if config.import_prefix.is_empty() {
            bail!("import_prefix must not be empty");
        }
        // "cam/back/orders/client" captures "orders": the character class
        // stops at the next path separator.
        let pattern = format!("{}([A-Za-z0-9_.-]+)", regex::escape(&config.import_prefix));
        let import_re =
            Regex::new(&pattern).context("Failed to compile import prefix pattern")?;
        Ok(Self {
            root: config.scan_root.clone(),
            import_re,
        })
    }

    /// Scan the whole tree. Dependency lists come back deduplicated and
    /// sorted lexicographically. Self-references are kept as-is; the graph
    /// layer rejects them as cycles.
    pub fn scan(&self) -> Result<DependencyMap> {
        let mut modules = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read scan root {}", self.root.display()))?
        {
            let entry = entry?;
            if entry.path().is_dir() {
                modules.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
        }

        let collected: DashMap<String, Vec<String>> = DashMap::new();
        modules.par_iter().for_each(|(name, path)| {
            let mut deps = BTreeSet::new();
            if let Err(e) = self.collect_imports(path, &mut deps) {
                warn!(module = name.as_str(), "Failed to scan module: {:#}", e);
            }
            collected.insert(name.clone(), deps.into_iter().collect());
        });

        let mut map = DependencyMap::new();
        for (name, deps) in collected {
            map.insert(name, deps);
        }
        debug!(modules = map.len(), "scanned dependency universe");
        Ok(map)
    }

    fn collect_imports(&self, dir: &Path, deps: &mut BTreeSet<String>) -> Result<()> {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                self.collect_imports(&path, deps)?;
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                continue; // not text, not an import source
            };
            for line in content.lines() {
                if let Some(caps) = self.import_re.captures(line) {
                    deps.insert(caps[1].to_string());
                }
            }
        }
        Ok(())
    }
}

impl DependencySource for ImportScanner {
    fn dependency_map(&self) -> Result<DependencyMap> {
        self.scan()
    }
}
