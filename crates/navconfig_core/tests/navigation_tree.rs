use navconfig_core::db::open_db_in_memory;
use navconfig_core::tree::walk::{ancestor_ids, depth_of, flatten_preorder};
use navconfig_core::{
    NavigationError, NavigationItem, NavigationItemId, NavigationNode, NavigationService,
    NewNavigationItem,
};

fn ids(forest: &[NavigationNode]) -> Vec<NavigationItemId> {
    forest.iter().map(|node| node.item.id).collect()
}

fn create(
    service: &NavigationService<navconfig_core::SqliteNavigationStore<'_>>,
    name: &str,
    role: &str,
    parent_id: Option<NavigationItemId>,
    display_order: i64,
) -> NavigationItem {
    let mut input = NewNavigationItem::new(name, format!("/{}", name.to_lowercase()), role)
        .with_display_order(display_order);
    if let Some(parent_id) = parent_id {
        input = input.with_parent(parent_id);
    }
    service.create(input).unwrap()
}

#[test]
fn get_tree_nests_children_and_orders_roots() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let item1 = create(&service, "One", "admin", None, 2);
    let item2 = create(&service, "Two", "admin", None, 1);
    let item3 = create(&service, "Three", "admin", Some(item2.id), 1);

    let tree = service.get_tree().unwrap();
    assert_eq!(ids(&tree), vec![item2.id, item1.id]);
    assert_eq!(ids(&tree[0].children), vec![item3.id]);
    assert!(tree[0].children[0].children.is_empty());
    assert!(tree[1].children.is_empty());
}

#[test]
fn get_tree_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    assert!(service.get_tree().unwrap().is_empty());
    assert!(service.get_tree_by_role("admin").unwrap().is_empty());
}

#[test]
fn every_item_appears_exactly_once_in_preorder() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let root_a = create(&service, "RootA", "admin", None, 0);
    let root_b = create(&service, "RootB", "user", None, 1);
    let a1 = create(&service, "A1", "admin", Some(root_a.id), 2);
    let a2 = create(&service, "A2", "admin", Some(root_a.id), 1);
    let a2x = create(&service, "A2x", "user", Some(a2.id), 0);
    let b1 = create(&service, "B1", "user", Some(root_b.id), 0);

    let tree = service.get_tree().unwrap();
    let order: Vec<NavigationItemId> = flatten_preorder(&tree).iter().map(|item| item.id).collect();
    assert_eq!(
        order,
        vec![root_a.id, a2.id, a2x.id, a1.id, root_b.id, b1.id]
    );

    for node in flatten_preorder(&tree) {
        match node.parent_id {
            Some(parent) => {
                assert_eq!(
                    ancestor_ids(&tree, node.id).and_then(|path| path.last().copied()),
                    Some(parent)
                );
            }
            None => assert_eq!(depth_of(&tree, node.id), Some(0)),
        }
    }
}

#[test]
fn role_filter_promotes_items_with_foreign_parent_to_roots() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let admin_root = create(&service, "Admin", "admin", None, 0);
    let user_root = create(&service, "Home", "user", None, 0);
    let user_under_admin = create(&service, "Profile", "user", Some(admin_root.id), 5);
    let user_child = create(&service, "Orders", "user", Some(user_root.id), 0);

    let user_tree = service.get_tree_by_role("user").unwrap();
    assert_eq!(ids(&user_tree), vec![user_root.id, user_under_admin.id]);
    assert_eq!(ids(&user_tree[0].children), vec![user_child.id]);
    assert!(flatten_preorder(&user_tree)
        .iter()
        .all(|item| item.role == "user"));

    let admin_tree = service.get_tree_by_role("admin").unwrap();
    assert_eq!(ids(&admin_tree), vec![admin_root.id]);
    assert!(admin_tree[0].children.is_empty());

    assert!(service.get_tree_by_role("guest").unwrap().is_empty());
}

#[test]
fn assembling_twice_without_writes_is_identical() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let root = create(&service, "Root", "admin", None, 0);
    create(&service, "Child", "admin", Some(root.id), 0);
    create(&service, "Sibling", "admin", None, 0);

    assert_eq!(service.get_tree().unwrap(), service.get_tree().unwrap());
}

#[test]
fn tree_reflects_update_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let first = create(&service, "First", "admin", None, 0);
    let second = create(&service, "Second", "admin", None, 1);
    let nested = create(&service, "Nested", "admin", Some(second.id), 0);

    service
        .update(
            second.id,
            navconfig_core::NavigationItemPatch {
                parent_id: Some(Some(first.id)),
                ..Default::default()
            },
        )
        .unwrap();
    let tree = service.get_tree().unwrap();
    assert_eq!(ids(&tree), vec![first.id]);
    assert_eq!(ancestor_ids(&tree, nested.id), Some(vec![first.id, second.id]));

    service.delete(second.id).unwrap();
    let tree = service.get_tree().unwrap();
    assert_eq!(ids(&tree), vec![first.id]);
    assert!(tree[0].children.is_empty());
}

#[test]
fn get_subtree_returns_item_with_descendants_only() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let root = create(&service, "Root", "admin", None, 0);
    let branch = create(&service, "Branch", "admin", Some(root.id), 0);
    let leaf_b = create(&service, "LeafB", "admin", Some(branch.id), 2);
    let leaf_a = create(&service, "LeafA", "admin", Some(branch.id), 1);
    create(&service, "Other", "admin", Some(root.id), 1);

    let subtree = service.get_subtree(branch.id).unwrap();
    assert_eq!(subtree.item, branch);
    assert_eq!(ids(&subtree.children), vec![leaf_a.id, leaf_b.id]);
    assert_eq!(subtree.subtree_len(), 3);

    assert!(matches!(
        service.get_subtree(999),
        Err(NavigationError::NotFound(999))
    ));
}

#[test]
fn tree_serializes_with_flattened_fields_and_children() {
    let conn = open_db_in_memory().unwrap();
    let service = NavigationService::open(&conn).unwrap();

    let root = create(&service, "Root", "admin", None, 0);
    create(&service, "Child", "admin", Some(root.id), 0);

    let json = serde_json::to_value(service.get_tree().unwrap()).unwrap();
    let root_json = &json[0];
    assert_eq!(root_json["id"], root.id);
    assert_eq!(root_json["name"], "Root");
    assert!(root_json["parent_id"].is_null());
    assert_eq!(root_json["children"][0]["name"], "Child");
    assert_eq!(root_json["children"][0]["parent_id"], root.id);
    assert_eq!(root_json["children"][0]["children"], serde_json::json!([]));
}
