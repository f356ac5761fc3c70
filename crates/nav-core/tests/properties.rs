//! Property tests: tree invariants hold for arbitrary stored menus and
//! arbitrary sequences of drops, removals and toggles.

use nav_core::tree::{collect_ids, count_nodes, find_by_id, get_visible_subset};
use nav_core::*;
use proptest::prelude::*;
use std::collections::HashSet;

/// Raw material for one flat record: parent pick, order, visibility.
type RawRecord = (Option<usize>, usize, bool);

fn record(i: usize, parent: Option<usize>, order: usize, visible: bool) -> MenuItemFlat {
    MenuItemFlat {
        id: MenuId::intern(&format!("n{i}")),
        label: format!("Item {i}"),
        kind: MenuItemKind::CustomLink,
        url: format!("/item/{i}"),
        target: LinkTarget::SameTab,
        source_ref: None,
        parent_id: parent.map(|p| MenuId::intern(&format!("n{p}"))),
        order,
        visible,
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Any parent links at all: dangling, cyclic, too deep.
fn arbitrary_flat(raw: &[RawRecord]) -> Vec<MenuItemFlat> {
    init_logs();
    raw.iter()
        .enumerate()
        .map(|(i, &(parent, order, visible))| record(i, parent, order, visible))
        .collect()
}

/// Parents only among earlier records that still have room below them.
fn valid_flat(raw: &[RawRecord]) -> Vec<MenuItemFlat> {
    init_logs();
    let mut depth = Vec::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for (i, &(parent, order, visible)) in raw.iter().enumerate() {
        let parent = parent
            .filter(|_| i > 0)
            .map(|p| p % i)
            .filter(|&p| depth[p] < MAX_DEPTH);
        depth.push(parent.map_or(0, |p| depth[p] + 1));
        out.push(record(i, parent, order, visible));
    }
    out
}

fn raw_records() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec((prop::option::of(0usize..16), 0usize..6, any::<bool>()), 0..16)
}

#[derive(Debug, Clone)]
enum Op {
    Drag { active: usize, hover: Option<usize>, offset: f32 },
    Remove(usize),
    ToggleVisible(usize),
    ToggleExpand(usize),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0usize..16, prop::option::of(0usize..16), -100.0f32..100.0)
            .prop_map(|(active, hover, offset)| Op::Drag { active, hover, offset }),
        1 => (0usize..16).prop_map(Op::Remove),
        1 => (0usize..16).prop_map(Op::ToggleVisible),
        1 => (0usize..16).prop_map(Op::ToggleExpand),
    ];
    prop::collection::vec(op, 0..24)
}

fn nid(i: usize) -> MenuId {
    MenuId::intern(&format!("n{i}"))
}

fn assert_invariants(tree: &[MenuNode]) {
    assert!(is_well_formed(tree), "{:?}", lint_tree(tree));
    let ids = collect_ids(tree);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate ids");
    tree::walk(tree, &mut |node| {
        assert!(node.depth <= MAX_DEPTH);
        // Acyclic: a node never appears inside its own subtree.
        assert!(find_by_id(&node.children, node.id).is_none());
    });
}

/// Siblings grouped per parent, in order.
fn sibling_groups(flat: &[MenuItemFlat]) -> Vec<(Option<MenuId>, Vec<MenuId>)> {
    let mut groups: Vec<(Option<MenuId>, Vec<(usize, usize, MenuId)>)> = Vec::new();
    for (i, r) in flat.iter().enumerate() {
        match groups.iter_mut().find(|(p, _)| *p == r.parent_id) {
            Some((_, members)) => members.push((r.order, i, r.id)),
            None => groups.push((r.parent_id, vec![(r.order, i, r.id)])),
        }
    }
    let mut out: Vec<_> = groups
        .into_iter()
        .map(|(parent, mut members)| {
            members.sort_by_key(|&(order, index, _)| (order, index));
            (parent, members.into_iter().map(|(_, _, id)| id).collect())
        })
        .collect();
    out.sort_by(|a, b| a.0.map(|p| p.to_string()).cmp(&b.0.map(|p| p.to_string())));
    out
}

proptest! {
    #[test]
    fn loading_anything_yields_a_well_formed_tree(raw in raw_records()) {
        let flat = arbitrary_flat(&raw);
        let tree = flat_to_tree(&flat);
        assert_invariants(&tree);
        // Nothing is lost: ids are unique in the generated input.
        prop_assert_eq!(count_nodes(&tree), flat.len());
    }

    #[test]
    fn valid_flat_lists_roundtrip(raw in raw_records()) {
        let flat = valid_flat(&raw);
        let out = tree_to_flat(&flat_to_tree(&flat));
        prop_assert_eq!(out.len(), flat.len());
        for original in &flat {
            let copy = out.iter().find(|r| r.id == original.id).expect("record lost");
            prop_assert_eq!(copy.parent_id, original.parent_id);
            prop_assert_eq!(&copy.label, &original.label);
            prop_assert_eq!(&copy.url, &original.url);
            prop_assert_eq!(copy.kind, original.kind);
            prop_assert_eq!(copy.visible, original.visible);
        }
        prop_assert_eq!(sibling_groups(&out), sibling_groups(&flat));
    }

    #[test]
    fn tree_roundtrip_is_identity(raw in raw_records()) {
        let tree = flat_to_tree(&arbitrary_flat(&raw));
        prop_assert_eq!(flat_to_tree(&tree_to_flat(&tree)), tree);
    }

    #[test]
    fn mutations_preserve_invariants(raw in raw_records(), steps in ops()) {
        let mut tree = flat_to_tree(&arbitrary_flat(&raw));
        let settings = DropSettings::default();
        for op in steps {
            let before = count_nodes(&tree);
            match op {
                Op::Drag { active, hover, offset } => {
                    let hover = hover.map(nid);
                    if let Some(intent) = classify_drop(&tree, nid(active), hover, offset, &settings) {
                        tree = apply_drop_intent(&tree, nid(active), hover, &intent);
                    }
                    prop_assert_eq!(count_nodes(&tree), before);
                }
                Op::Remove(i) => {
                    let removed = find_by_id(&tree, nid(i)).map_or(0, |n| 1 + count_nodes(&n.children));
                    tree = tree::remove_by_id(&tree, nid(i));
                    prop_assert_eq!(count_nodes(&tree), before - removed);
                    prop_assert!(tree_to_flat(&tree).iter().all(|r| r.parent_id != Some(nid(i))));
                }
                Op::ToggleVisible(i) => tree = tree::toggle_visibility(&tree, nid(i)),
                Op::ToggleExpand(i) => tree = tree::toggle_expand(&tree, nid(i)),
            }
            assert_invariants(&tree);
        }
    }

    #[test]
    fn visible_subset_never_contains_hidden_ancestry(raw in raw_records()) {
        let tree = flat_to_tree(&arbitrary_flat(&raw));
        let visible = get_visible_subset(&tree);
        for id in collect_ids(&visible) {
            prop_assert!(tree::is_effectively_visible(&tree, id));
        }
        for id in collect_ids(&tree) {
            let shown = find_by_id(&visible, id).is_some();
            prop_assert_eq!(shown, tree::is_effectively_visible(&tree, id));
        }
    }

    #[test]
    fn self_drop_is_identity(raw in raw_records(), pick in 0usize..16, offset in -100.0f32..100.0) {
        let tree = flat_to_tree(&arbitrary_flat(&raw));
        let settings = DropSettings::default();
        if let Some(intent) = classify_drop(&tree, nid(pick), Some(nid(pick)), offset, &settings) {
            prop_assert_eq!(apply_drop_intent(&tree, nid(pick), Some(nid(pick)), &intent), tree);
        }
    }
}
