//! Read-only traversal helpers over assembled forests.

use crate::model::navigation::{NavigationItem, NavigationItemId, NavigationNode};

/// Flattens a forest in pre-order (parent before children, siblings in order).
pub fn flatten_preorder(forest: &[NavigationNode]) -> Vec<&NavigationItem> {
    let mut out = Vec::new();
    let mut stack: Vec<&NavigationNode> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(&node.item);
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Finds the node with `id` anywhere in the forest.
pub fn find_node(forest: &[NavigationNode], id: NavigationItemId) -> Option<&NavigationNode> {
    forest.iter().find_map(|node| {
        if node.item.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

/// Returns the ids from the root down to the parent of `id`.
///
/// An empty vector means `id` is a root; `None` means it is not in the forest.
pub fn ancestor_ids(forest: &[NavigationNode], id: NavigationItemId) -> Option<Vec<NavigationItemId>> {
    for node in forest {
        if node.item.id == id {
            return Some(Vec::new());
        }
        if let Some(mut path) = ancestor_ids(&node.children, id) {
            path.insert(0, node.item.id);
            return Some(path);
        }
    }
    None
}

/// Returns the zero-based depth of `id` (roots are depth 0).
pub fn depth_of(forest: &[NavigationNode], id: NavigationItemId) -> Option<usize> {
    ancestor_ids(forest, id).map(|path| path.len())
}
