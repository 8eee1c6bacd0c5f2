// Transitive reduction of a built graph.
//
// Removes a direct edge A -> B whenever B is already reachable through a
// sibling subtree of A. What survives is the minimal edge set with the same
// transitive closure, which is what keeps diamond and fan-out dependency
// shapes legible in the rendered diagram.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::graph::{NodeArena, NodeId};
use crate::domain::reach;

/// Reduce the graph in place, frontier order from `root`. Returns the
/// number of removed edges.
///
/// Only the redundant edge is removed, never the node: the child stays
/// reachable via the longer path, and gets scheduled from whichever parent
/// keeps it. Nodes with zero or one children pass through untouched.
pub fn reduce(arena: &mut NodeArena, root: NodeId) -> usize {
    let mut removed = 0;
    let mut frontier = vec![root];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        let mut queued: HashSet<NodeId> = HashSet::new();
        for id in frontier {
            // Snapshot: edges out of `id` are unlinked as we go.
            let children = arena.node(id).children.clone();
            for child in children {
                // Sibling set from the current children, not the snapshot:
                // an edge already removed must not vouch for another one.
                let siblings: Vec<NodeId> = arena
                    .node(id)
                    .children
                    .iter()
                    .copied()
                    .filter(|&sibling| sibling != child)
                    .collect();
                let redundant = siblings
                    .iter()
                    .any(|&sibling| reach::reaches(arena, sibling, child));
                if redundant {
                    arena.unlink(id, child);
                    removed += 1;
                    continue;
                }
                if queued.insert(child) {
                    next.push(child);
                }
            }
        }
        frontier = next;
    }
    if removed > 0 {
        debug!(removed, "removed transitively redundant edges");
    }
    removed
}
