//! Integration tests: pointer drags through the builder.

use nav_core::*;
use nav_editor::*;
use pretty_assertions::assert_eq;

fn id(s: &str) -> MenuId {
    MenuId::intern(s)
}

fn labels(nodes: &[MenuNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

/// Header holding just Home and Products.
fn two_item_builder() -> (MenuBuilder<MemoryStore, ManualClock>, MemoryStore) {
    let _ = env_logger::builder().is_test(true).try_init();
    let header = r#"[
        {"id": "1", "label": "Home", "kind": "system", "url": "/", "order": 0},
        {"id": "2", "label": "Products", "kind": "page-reference", "url": "/products", "sourceRef": "page-products", "order": 1}
    ]"#;
    let store = MemoryStore::new().with_entry("site-builder:menu:header", header);
    let builder = MenuBuilder::load(store.clone(), ManualClock::new(0), BuilderConfig::default());
    (builder, store)
}

#[test]
fn drag_right_nests_then_left_unnests() {
    let (mut builder, _) = two_item_builder();

    assert!(builder.drag_start(MenuLocation::Header, id("2"), 20.0));
    let intent = builder.drag_move(60.0, DragOver::Node(id("1"))).unwrap();
    assert_eq!(intent.kind, DropKind::Nest);
    assert!(builder.drag_end());
    let tree = builder.tree(MenuLocation::Header);
    assert_eq!(labels(tree), vec!["Home"]);
    assert_eq!(tree[0].children[0].depth, 1);
    assert!(tree[0].is_expanded);
    assert!(builder.is_dirty());

    assert!(builder.drag_start(MenuLocation::Header, id("2"), 60.0));
    let intent = builder.drag_move(20.0, DragOver::Node(id("1"))).unwrap();
    assert_eq!(intent.kind, DropKind::Unnest);
    assert!(builder.drag_end());
    assert_eq!(labels(builder.tree(MenuLocation::Header)), vec!["Home", "Products"]);
}

#[test]
fn cancel_applies_nothing() {
    let (mut builder, _) = two_item_builder();
    let before = builder.tree(MenuLocation::Header).to_vec();
    builder.drag_start(MenuLocation::Header, id("2"), 0.0);
    builder.drag_move(80.0, DragOver::Node(id("1")));
    assert!(builder.drag_preview().is_some());
    assert!(builder.drag_cancel());
    assert!(builder.drag_preview().is_none());
    assert!(!builder.drag_end());
    assert_eq!(builder.tree(MenuLocation::Header), before.as_slice());
    assert!(!builder.is_dirty());
}

#[test]
fn second_start_does_not_replace_the_drag() {
    let (mut builder, _) = two_item_builder();
    assert!(builder.drag_start(MenuLocation::Header, id("2"), 0.0));
    assert!(!builder.drag_start(MenuLocation::Header, id("1"), 0.0));
    assert_eq!(builder.drag_preview().unwrap().active, id("2"));
}

#[test]
fn release_outside_the_list_is_a_no_op() {
    let (mut builder, _) = two_item_builder();
    builder.drag_start(MenuLocation::Header, id("1"), 0.0);
    builder.drag_move(0.0, DragOver::Node(id("2")));
    assert!(builder.drag_move(0.0, DragOver::Outside).is_none());
    assert!(!builder.drag_end());
    assert!(!builder.is_dirty());
}

#[test]
fn release_over_empty_space_follows_policy() {
    let (mut builder, _) = two_item_builder();
    builder.drag_start(MenuLocation::Header, id("1"), 0.0);
    builder.drag_pointer(0.0, 500.0);
    assert_eq!(builder.drag_preview().unwrap().over, DragOver::EmptySpace);
    assert!(builder.drag_end());
    assert_eq!(labels(builder.tree(MenuLocation::Header)), vec!["Products", "Home"]);

    let store = MemoryStore::new();
    let config = BuilderConfig {
        empty_drop: EmptyDropPolicy::Ignore,
        ..BuilderConfig::default()
    };
    let mut ignoring = MenuBuilder::load(store, ManualClock::new(0), config);
    ignoring.drag_start(MenuLocation::Footer, id("footer-shipping"), 0.0);
    assert!(ignoring.drag_pointer(0.0, 500.0).is_none());
    assert!(!ignoring.drag_end());
}

#[test]
fn event_stream_matches_direct_calls() {
    let (mut builder, _) = two_item_builder();
    let events = [
        DragEvent::Start {
            location: MenuLocation::Header,
            id: id("2"),
            x: 0.0,
        },
        DragEvent::Move {
            x: 10.0,
            over: DragOver::Outside,
        },
        DragEvent::Move {
            x: 40.0,
            over: DragOver::Node(id("1")),
        },
    ];
    for event in &events {
        assert!(!builder.handle_drag(event));
    }
    assert!(builder.handle_drag(&DragEvent::End));
    let home = tree::find_by_id(builder.tree(MenuLocation::Header), id("1")).unwrap();
    assert_eq!(labels(&home.children), vec!["Products"]);
}

#[test]
fn drop_over_own_descendant_changes_nothing() {
    let (mut builder, _) = two_item_builder();
    builder.drag_start(MenuLocation::Header, id("2"), 0.0);
    builder.drag_move(40.0, DragOver::Node(id("1")));
    builder.drag_end();
    builder.save_now().unwrap();

    // Home dragged onto its own child.
    builder.drag_start(MenuLocation::Header, id("1"), 0.0);
    builder.drag_move(40.0, DragOver::Node(id("2")));
    assert!(!builder.drag_end());
    assert!(!builder.is_dirty());
}
