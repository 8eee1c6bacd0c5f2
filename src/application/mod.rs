// Render pipeline: the use-cases that wire builder, reducer and renderer
// over one immutable dependency-map snapshot. Every call allocates a fresh
// arena, so concurrent requests never share node state.

use crate::config::GraphConfig;
use crate::domain::depmap::{self, DependencyMap};
use crate::domain::{graph, reduce};
use crate::ports::dot;

pub struct RenderPipeline<'a> {
    config: &'a GraphConfig,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// DOT graph of one module's dependency subtree.
    ///
    /// A target absent from the map renders an empty graph body instead of
    /// failing; `simplify = false` keeps the raw accepted edges without
    /// transitive reduction.
    pub fn subtree_dot(&self, map: &DependencyMap, target: &str, simplify: bool) -> String {
        if !map.contains_key(target) {
            return dot::empty_digraph();
        }
        let (mut arena, root, _stats) = graph::build(target, map, self.config);
        if simplify {
            reduce::reduce(&mut arena, root);
        }
        dot::render(&arena, root, &self.config.sentinel_root)
    }

    /// DOT graph of the whole dependency universe, gathered under the
    /// sentinel umbrella root. The sentinel itself never reaches the output.
    pub fn universe_dot(&self, map: &DependencyMap, simplify: bool) -> String {
        let resolved = depmap::resolve_roots(map.clone(), &self.config.sentinel_root);
        if !resolved.contains_key(&self.config.sentinel_root) {
            return dot::empty_digraph();
        }
        let (mut arena, root, _stats) =
            graph::build(&self.config.sentinel_root, &resolved, self.config);
        if simplify {
            reduce::reduce(&mut arena, root);
        }
        dot::render(&arena, root, &self.config.sentinel_root)
    }
}
