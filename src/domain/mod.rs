// Domain layer: dependency universe, node arena, reachability, reduction.

pub mod depmap;
pub mod graph;
pub mod reach;
pub mod reduce;
