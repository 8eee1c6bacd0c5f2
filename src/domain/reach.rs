// Reachability queries over a live arena.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::domain::graph::{NodeArena, NodeId};

/// True when `goal` is reachable from `from` by following child edges; a
/// node always reaches itself.
///
/// The query is posed during incremental construction, so it walks live
/// arena state. Iterative wavefront with an explicit visited bitset: deep
/// dependency chains cannot overflow the stack, and diamond shapes are
/// visited once instead of once per path.
pub fn reaches(arena: &NodeArena, from: NodeId, goal: NodeId) -> bool {
    if from == goal {
        return true;
    }
    let mut visited = FixedBitSet::with_capacity(arena.len());
    visited.insert(from.0);
    let mut frontier = VecDeque::from([from]);
    while let Some(id) = frontier.pop_front() {
        for &child in &arena.node(id).children {
            if child == goal {
                return true;
            }
            if !visited.put(child.0) {
                frontier.push_back(child);
            }
        }
    }
    false
}
