// Boundary traits and exporters for depviz.

use anyhow::Result;

use crate::domain::depmap::DependencyMap;

pub mod dot;

/// Source of the raw dependency universe. The filesystem import scanner is
/// the production implementation; tests substitute in-memory maps.
pub trait DependencySource {
    fn dependency_map(&self) -> Result<DependencyMap>;
}
