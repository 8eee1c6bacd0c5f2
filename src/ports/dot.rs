// DOT rendering of a built (and usually reduced) graph.

use std::collections::HashSet;

use crate::domain::graph::{NodeArena, NodeId};

/// Replace characters DOT cannot carry in a bare identifier. When this
/// changes the name, a label declaration maps the safe id back to the
/// original display name.
pub fn sanitize_id(name: &str) -> String {
    name.replace(['/', '-'], "_")
}

/// The render of an unknown target or an empty universe: open marker,
/// nothing, close marker.
pub fn empty_digraph() -> String {
    String::from("digraph G {\n}")
}

/// Render the graph reachable from `root` as `digraph G { .. }` text.
///
/// Layer-by-layer traversal with a global visited set; label lines precede
/// edge lines; edge strings are deduplicated in emission order. Lines whose
/// source or target is the sentinel are suppressed, so the umbrella root
/// never leaks into output even though traversal passes through it.
pub fn render(arena: &NodeArena, root: NodeId, sentinel: &str) -> String {
    let mut labels: Vec<String> = Vec::new();
    let mut labeled: HashSet<String> = HashSet::new();
    let mut edges: Vec<String> = Vec::new();
    let mut relation: HashSet<String> = HashSet::new();

    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(root);
    let mut frontier = vec![root];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for id in frontier {
            let node = arena.node(id);
            declare_label(&node.name, sentinel, &mut labels, &mut labeled);
            for &child_id in &node.children {
                let child = arena.name(child_id);
                if node.name != sentinel && child != sentinel {
                    let line =
                        format!("{} -> {}", sanitize_id(&node.name), sanitize_id(child));
                    if relation.insert(line.clone()) {
                        edges.push(line);
                    }
                }
                if visited.insert(child_id) {
                    next.push(child_id);
                }
            }
        }
        frontier = next;
    }

    let mut out = String::from("digraph G {\n");
    for label in &labels {
        out.push_str(label);
        out.push('\n');
    }
    for edge in &edges {
        out.push_str(edge);
        out.push('\n');
    }
    out.push('}');
    out
}

/// One label declaration per unique sanitized identifier, first-seen order.
fn declare_label(
    name: &str,
    sentinel: &str,
    labels: &mut Vec<String>,
    labeled: &mut HashSet<String>,
) {
    if name == sentinel {
        return;
    }
    let id = sanitize_id(name);
    if id != name && labeled.insert(id.clone()) {
        labels.push(format!("{}[label=\"{}\"]", id, name));
    }
}
