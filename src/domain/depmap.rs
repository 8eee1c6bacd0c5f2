// Dependency universe as handed over by the import scanner.

use std::collections::BTreeMap;
use std::collections::HashSet;

/// Module name -> ordered dependency names.
///
/// `BTreeMap` keeps every whole-universe iteration lexicographic, so two
/// renders of the same universe are byte-identical. Dependency lists arrive
/// deduplicated and sorted from the scanner, but nothing downstream assumes
/// more than "stable for a given input": raw lists with duplicates are
/// tolerated by the graph builder.
pub type DependencyMap = BTreeMap<String, Vec<String>>;

/// Module names no other module depends on, in lexicographic order.
pub fn true_roots(map: &DependencyMap) -> Vec<String> {
    let referenced: HashSet<&str> = map.values().flatten().map(String::as_str).collect();
    map.keys()
        .filter(|name| !referenced.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Attach the sentinel umbrella root whose dependency list is exactly the
/// true-root set, so a whole-universe build has a single entry point.
///
/// With no true roots (every module referenced somewhere, which means the
/// raw universe was fully cyclic) the map is returned unchanged and the
/// whole-universe render stays empty.
pub fn resolve_roots(mut map: DependencyMap, sentinel: &str) -> DependencyMap {
    let roots = true_roots(&map);
    if !roots.is_empty() {
        map.insert(sentinel.to_string(), roots);
    }
    map
}
