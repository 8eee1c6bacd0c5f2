use serde::Serialize;

use crate::domain::depmap::DependencyMap;

/// JSON dependency tree served next to the DOT renders: one umbrella node,
/// one child per module, one leaf per direct dependency.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn from_map(map: &DependencyMap, root_label: &str) -> Self {
        let children = map
            .iter()
            .map(|(name, deps)| TreeNode {
                name: name.clone(),
                children: deps.iter().map(|d| TreeNode::leaf(d)).collect(),
            })
            .collect();
        TreeNode {
            name: root_label.to_string(),
            children,
        }
    }
}
