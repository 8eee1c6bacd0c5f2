// Node arena and graph construction.
//
// The graph is rebuilt from scratch for every render request. Nodes live in
// arena slots addressed by stable integer ids, so identity sharing is an
// integer comparison and parent back-references carry no lifetime.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::GraphConfig;
use crate::domain::depmap::DependencyMap;
use crate::domain::reach;

/// Stable index of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// One module in the dependency universe.
#[derive(Debug)]
pub struct GraphNode {
    pub name: String,
    /// Forward edges in first-insertion order, no duplicates.
    pub children: Vec<NodeId>,
    /// Back-references, kept for traversal bookkeeping only.
    pub parents: Vec<NodeId>,
}

/// Arena of graph nodes with name interning. Every reference to a module
/// name resolves to the same slot, scoped to one build.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<GraphNode>,
    index: HashMap<String, NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a name to its node, creating the node on first sight.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            name: name.to_string(),
            children: Vec::new(),
            parents: Vec::new(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Insert the edge father -> child. Returns false when it already
    /// existed. Callers run the cycle check first; the arena itself only
    /// guards against duplicates.
    pub fn link(&mut self, father: NodeId, child: NodeId) -> bool {
        if self.nodes[father.0].children.contains(&child) {
            return false;
        }
        self.nodes[father.0].children.push(child);
        self.nodes[child.0].parents.push(father);
        true
    }

    /// Remove the edge father -> child, if present. The child node stays in
    /// the arena.
    pub fn unlink(&mut self, father: NodeId, child: NodeId) {
        self.nodes[father.0].children.retain(|&c| c != child);
        self.nodes[child.0].parents.retain(|&p| p != father);
    }
}

/// Edge-level diagnostics from one build.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildStats {
    /// Cycle-forming edges that were silently dropped.
    pub dropped_edges: usize,
}

/// Breadth-first graph construction from the raw dependency map.
///
/// Cycle policy: the first discovered path wins. A later edge whose child
/// already reaches the father (self-dependencies included) is dropped
/// without error and only counted in the stats.
///
/// A child is queued for the next frontier only when its edge was newly
/// inserted and its name is not on the configured terminal list; a child
/// seen from several fathers in one frontier is queued once. Work is
/// bounded by nodes + edges, not by paths.
pub fn build(
    root: &str,
    map: &DependencyMap,
    config: &GraphConfig,
) -> (NodeArena, NodeId, BuildStats) {
    let mut arena = NodeArena::new();
    let root_id = arena.intern(root);
    let mut stats = BuildStats::default();

    let mut frontier = vec![root_id];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        let mut queued: HashSet<NodeId> = HashSet::new();
        for father in frontier {
            let deps = match map.get(arena.name(father)) {
                Some(deps) => deps,
                None => continue,
            };
            for dep in deps {
                let child = arena.intern(dep);
                // Would father -> child close a path child -> .. -> father?
                if reach::reaches(&arena, child, father) {
                    stats.dropped_edges += 1;
                    continue;
                }
                let inserted = arena.link(father, child);
                if inserted && !config.is_terminal(dep) && queued.insert(child) {
                    next.push(child);
                }
            }
        }
        frontier = next;
    }

    if stats.dropped_edges > 0 {
        debug!(dropped = stats.dropped_edges, "dropped cycle-forming edges");
    }
    (arena, root_id, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::depmap::DependencyMap;

    fn map_of(entries: &[(&str, &[&str])]) -> DependencyMap {
        entries
            .iter()
            .map(|(k, deps)| (k.to_string(), deps.iter().map(|d| d.to_string()).collect()))
            .collect()
    }

    fn names(arena: &NodeArena, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| arena.name(id).to_string()).collect()
    }

    #[test]
    fn test_identity_sharing() {
        let mut arena = NodeArena::new();
        let a = arena.intern("orders");
        let b = arena.intern("orders");
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_build_diamond() {
        let map = map_of(&[("x", &["y", "z"]), ("y", &["w"]), ("z", &["w"]), ("w", &[])]);
        let (arena, root, stats) = build("x", &map, &GraphConfig::default());
        assert_eq!(arena.len(), 4);
        assert_eq!(stats.dropped_edges, 0);
        assert_eq!(names(&arena, &arena.node(root).children), vec!["y", "z"]);
        // w is shared, not duplicated.
        let w = arena.lookup("w").unwrap();
        assert_eq!(arena.node(w).parents.len(), 2);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let map = map_of(&[("a", &["a"])]);
        let (arena, root, stats) = build("a", &map, &GraphConfig::default());
        assert!(arena.node(root).children.is_empty());
        assert_eq!(stats.dropped_edges, 1);
    }

    #[test]
    fn test_cycle_edge_dropped() {
        // a -> b accepted first, so b -> a must be dropped.
        let map = map_of(&[("a", &["b"]), ("b", &["a"])]);
        let (arena, root, stats) = build("a", &map, &GraphConfig::default());
        let b = arena.lookup("b").unwrap();
        assert_eq!(names(&arena, &arena.node(root).children), vec!["b"]);
        assert!(arena.node(b).children.is_empty());
        assert_eq!(stats.dropped_edges, 1);
    }

    #[test]
    fn test_acyclicity_invariant() {
        // Tangle of cycles; whatever survives must be acyclic.
        let map = map_of(&[
            ("a", &["b", "c"]),
            ("b", &["c", "a"]),
            ("c", &["a", "b"]),
        ]);
        let (arena, _root, _stats) = build("a", &map, &GraphConfig::default());
        for idx in 0..arena.len() {
            let id = NodeId(idx);
            for &child in &arena.node(id).children {
                assert!(
                    !reach::reaches(&arena, child, id),
                    "edge {} -> {} closes a cycle",
                    arena.name(id),
                    arena.name(child)
                );
            }
        }
    }

    #[test]
    fn test_terminal_node_not_expanded() {
        let map = map_of(&[("x", &["startup"]), ("startup", &["y"]), ("y", &[])]);
        let (arena, root, _stats) = build("x", &map, &GraphConfig::default());
        // startup is linked but its own dependencies are never pulled in.
        assert_eq!(names(&arena, &arena.node(root).children), vec!["startup"]);
        assert!(arena.lookup("y").is_none());
    }

    #[test]
    fn test_duplicate_raw_dependencies_collapse() {
        let map = map_of(&[("x", &["y", "y", "y"]), ("y", &[])]);
        let (arena, root, _stats) = build("x", &map, &GraphConfig::default());
        assert_eq!(arena.node(root).children.len(), 1);
        let y = arena.lookup("y").unwrap();
        assert_eq!(arena.node(y).parents.len(), 1);
    }

    #[test]
    fn test_unlink_removes_both_directions() {
        let mut arena = NodeArena::new();
        let a = arena.intern("a");
        let b = arena.intern("b");
        assert!(arena.link(a, b));
        arena.unlink(a, b);
        assert!(arena.node(a).children.is_empty());
        assert!(arena.node(b).parents.is_empty());
    }
}
