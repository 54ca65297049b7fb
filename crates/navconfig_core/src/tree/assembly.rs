//! Flat-to-tree assembly for navigation items.
//!
//! # Responsibility
//! - Convert a flat, parent-referencing record set into ordered forests.
//! - Keep lookup structures transient: one arena per call, no back-pointers.
//!
//! # Invariants
//! - Siblings and roots are ordered by `display_order ASC, id ASC`.
//! - An item whose parent is absent from the input becomes a root.
//! - Every input item appears exactly once in `assemble_forest` output, even
//!   when stored parent chains loop.

use crate::model::navigation::{NavigationItem, NavigationItemId, NavigationNode};
use log::warn;
use std::collections::HashMap;

/// Assembles `items` into a forest of root nodes with nested children.
///
/// Input order does not matter. Items whose `parent_id` is missing or does not
/// resolve inside `items` are roots; this is what keeps role-filtered children
/// visible when their parent belongs to another role.
///
/// Items caught in a parent loop are unreachable from any root. The first of
/// them in sibling order is promoted to root and the loop is cut there.
pub fn assemble_forest(items: Vec<NavigationItem>) -> Vec<NavigationNode> {
    let mut arena = Arena::new(items);
    let roots = std::mem::take(&mut arena.roots);

    let mut forest: Vec<NavigationNode> = roots
        .into_iter()
        .filter_map(|slot| arena.take_node(slot))
        .collect();

    let stranded = arena.remaining_slots();
    if !stranded.is_empty() {
        warn!(
            "event=tree_assemble module=tree status=cycle_broken stranded_count={}",
            stranded.len()
        );
        for slot in stranded {
            if let Some(node) = arena.take_node(slot) {
                forest.push(node);
            }
        }
        forest.sort_by_key(|node| node.item.sort_key());
    }

    forest
}

/// Assembles the subtree anchored at `root_id`.
///
/// `items` is expected to hold the anchor and its descendants; anything not
/// reachable from the anchor is ignored. The anchor's own `parent_id` is not
/// consulted. Returns `None` when `root_id` is not in `items`.
pub fn assemble_subtree(
    items: Vec<NavigationItem>,
    root_id: NavigationItemId,
) -> Option<NavigationNode> {
    let mut arena = Arena::new(items);
    let slot = arena.slot_of(root_id)?;
    arena.take_node(slot)
}

struct Arena {
    slots: Vec<Option<NavigationItem>>,
    index: HashMap<NavigationItemId, usize>,
    children: HashMap<NavigationItemId, Vec<usize>>,
    roots: Vec<usize>,
}

impl Arena {
    fn new(items: Vec<NavigationItem>) -> Self {
        let index: HashMap<NavigationItemId, usize> = items
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.id, slot))
            .collect();

        let mut children: HashMap<NavigationItemId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (slot, item) in items.iter().enumerate() {
            match item.parent_id.filter(|parent_id| index.contains_key(parent_id)) {
                Some(parent_id) => children.entry(parent_id).or_default().push(slot),
                None => roots.push(slot),
            }
        }

        let slots: Vec<Option<NavigationItem>> = items.into_iter().map(Some).collect();
        let key = |slot: &usize| slots[*slot].as_ref().map(NavigationItem::sort_key);
        for siblings in children.values_mut() {
            siblings.sort_by_key(key);
        }
        roots.sort_by_key(key);

        Self {
            slots,
            index,
            children,
            roots,
        }
    }

    fn slot_of(&self, id: NavigationItemId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Moves the item out of its slot and builds its subtree.
    ///
    /// Already-taken slots yield `None`, which is what terminates loops.
    fn take_node(&mut self, slot: usize) -> Option<NavigationNode> {
        let item = self.slots.get_mut(slot)?.take()?;
        let child_slots = self.children.remove(&item.id).unwrap_or_default();
        let children = child_slots
            .into_iter()
            .filter_map(|child| self.take_node(child))
            .collect();
        Some(NavigationNode { item, children })
    }

    fn remaining_slots(&self) -> Vec<usize> {
        let mut remaining: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.as_ref().map(|_| slot))
            .collect();
        remaining.sort_by_key(|slot| self.slots[*slot].as_ref().map(NavigationItem::sort_key));
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::{assemble_forest, assemble_subtree};
    use crate::model::navigation::{NavigationItem, NavigationItemId, NavigationNode};

    fn item(
        id: NavigationItemId,
        parent_id: Option<NavigationItemId>,
        display_order: i64,
    ) -> NavigationItem {
        NavigationItem {
            id,
            name: format!("item-{id}"),
            path: format!("/item-{id}"),
            microfrontend_url: None,
            parent_id,
            display_order,
            role: "admin".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ids(nodes: &[NavigationNode]) -> Vec<NavigationItemId> {
        nodes.iter().map(|node| node.item.id).collect()
    }

    #[test]
    fn nests_children_and_orders_roots_by_display_order() {
        let forest = assemble_forest(vec![
            item(1, None, 2),
            item(2, None, 1),
            item(3, Some(2), 0),
        ]);

        assert_eq!(ids(&forest), vec![2, 1]);
        assert_eq!(ids(&forest[0].children), vec![3]);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn orders_siblings_regardless_of_input_order() {
        let forest = assemble_forest(vec![
            item(10, Some(1), 5),
            item(11, Some(1), -1),
            item(1, None, 0),
            item(12, Some(1), 3),
        ]);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![11, 12, 10]);
    }

    #[test]
    fn breaks_display_order_ties_by_id() {
        let forest = assemble_forest(vec![
            item(9, None, 0),
            item(4, None, 0),
            item(7, None, 0),
        ]);

        assert_eq!(ids(&forest), vec![4, 7, 9]);
    }

    #[test]
    fn unresolved_parent_becomes_root() {
        let forest = assemble_forest(vec![item(5, Some(99), 1), item(6, None, 0)]);

        assert_eq!(ids(&forest), vec![6, 5]);
        assert_eq!(forest[1].item.parent_id, Some(99));
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(assemble_forest(Vec::new()).is_empty());
    }

    #[test]
    fn parent_loop_is_cut_and_every_item_kept() {
        let forest = assemble_forest(vec![
            item(1, Some(2), 1),
            item(2, Some(1), 0),
            item(3, None, 5),
            item(4, Some(4), 2),
        ]);

        assert_eq!(ids(&forest), vec![2, 4, 3]);
        assert_eq!(ids(&forest[0].children), vec![1]);
        assert!(forest[0].children[0].children.is_empty());
        let total: usize = forest.iter().map(NavigationNode::subtree_len).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn deep_chain_is_nested_in_order() {
        let forest = assemble_forest(vec![
            item(3, Some(2), 0),
            item(2, Some(1), 0),
            item(1, None, 0),
        ]);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![3]);
    }

    #[test]
    fn subtree_is_anchored_at_requested_item() {
        let node = assemble_subtree(
            vec![item(2, Some(1), 0), item(4, Some(2), 1), item(3, Some(2), 0)],
            2,
        )
        .expect("anchor should be present");

        assert_eq!(node.item.id, 2);
        assert_eq!(ids(&node.children), vec![3, 4]);
        assert!(assemble_subtree(vec![item(1, None, 0)], 8).is_none());
    }
}
