//! Pure operations over a menu forest.
//!
//! Every function borrows its input and returns a fresh tree; nothing here
//! mutates a tree it was handed. Menus hold tens of nodes, so full rebuilds
//! with linear walks are cheap enough and keep ownership simple.
//!
//! The normalization passes (`renumber`, `clamp_depth`) take the tree by
//! value since they are always the last step of a rebuild.

use crate::id::MenuId;
use crate::model::{MAX_DEPTH, MenuNode, MenuNodePatch};
use smallvec::SmallVec;

/// Index path from the root list down to a node: `[2, 0]` is the first child
/// of the third root. Bounded by `MAX_DEPTH + 1` in a clamped tree.
pub type NodePath = SmallVec<[usize; 4]>;

// ─── Lookup ──────────────────────────────────────────────────────────────

/// Depth-first search for `id`.
pub fn find_by_id(nodes: &[MenuNode], id: MenuId) -> Option<&MenuNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// The node whose children contain `id`. `None` for roots and unknown ids.
pub fn find_parent(nodes: &[MenuNode], id: MenuId) -> Option<&MenuNode> {
    for node in nodes {
        if node.children.iter().any(|c| c.id == id) {
            return Some(node);
        }
        if let Some(parent) = find_parent(&node.children, id) {
            return Some(parent);
        }
    }
    None
}

/// Index path to `id`, if present.
pub fn find_path(nodes: &[MenuNode], id: MenuId) -> Option<NodePath> {
    let mut path = NodePath::new();
    find_path_into(nodes, id, &mut path).then_some(path)
}

fn find_path_into(nodes: &[MenuNode], id: MenuId, path: &mut NodePath) -> bool {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        if node.id == id || find_path_into(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Resolve an index path back to a node.
pub fn node_at_path<'a>(nodes: &'a [MenuNode], path: &[usize]) -> Option<&'a MenuNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = nodes.get(first)?;
    for &i in rest {
        node = node.children.get(i)?;
    }
    Some(node)
}

/// The sibling list containing `id` and its index within it.
pub fn sibling_position(nodes: &[MenuNode], id: MenuId) -> Option<(&[MenuNode], usize)> {
    let path = find_path(nodes, id)?;
    let (&index, parent_path) = path.split_last()?;
    let siblings = if parent_path.is_empty() {
        nodes
    } else {
        &node_at_path(nodes, parent_path)?.children[..]
    };
    Some((siblings, index))
}

/// True if `id` sits somewhere inside `ancestor`'s subtree (not `ancestor` itself).
pub fn is_descendant_of(nodes: &[MenuNode], ancestor: MenuId, id: MenuId) -> bool {
    find_by_id(nodes, ancestor).is_some_and(|a| find_by_id(&a.children, id).is_some())
}

/// Own flag AND every ancestor's flag. Unknown ids are not visible.
pub fn is_effectively_visible(nodes: &[MenuNode], id: MenuId) -> bool {
    let Some(path) = find_path(nodes, id) else {
        return false;
    };
    let mut level = nodes;
    for &i in &path {
        let node = &level[i];
        if !node.visible {
            return false;
        }
        level = &node.children;
    }
    true
}

/// All ids in pre-order.
pub fn collect_ids(nodes: &[MenuNode]) -> Vec<MenuId> {
    let mut ids = Vec::new();
    walk(nodes, &mut |n| ids.push(n.id));
    ids
}

pub fn count_nodes(nodes: &[MenuNode]) -> usize {
    let mut count = 0;
    walk(nodes, &mut |_| count += 1);
    count
}

/// Pre-order visit of every node.
pub fn walk<'a>(nodes: &'a [MenuNode], f: &mut impl FnMut(&'a MenuNode)) {
    for node in nodes {
        f(node);
        walk(&node.children, f);
    }
}

// ─── Rebuilding mutations ────────────────────────────────────────────────

/// Copy of `node` with a replacement child list.
fn with_children(node: &MenuNode, children: Vec<MenuNode>) -> MenuNode {
    MenuNode {
        id: node.id,
        label: node.label.clone(),
        kind: node.kind,
        url: node.url.clone(),
        target: node.target,
        source_ref: node.source_ref.clone(),
        parent_id: node.parent_id,
        depth: node.depth,
        order: node.order,
        children,
        visible: node.visible,
        is_expanded: node.is_expanded,
    }
}

/// Excise `id` and its entire subtree. No-op if absent.
pub fn remove_by_id(nodes: &[MenuNode], id: MenuId) -> Vec<MenuNode> {
    let pruned = prune(nodes, id);
    renumber(pruned)
}

fn prune(nodes: &[MenuNode], id: MenuId) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|n| n.id != id)
        .map(|n| with_children(n, prune(&n.children, id)))
        .collect()
}

/// Merge `patch` into the node named `id`; structure is unchanged.
pub fn update_by_id(nodes: &[MenuNode], id: MenuId, patch: &MenuNodePatch) -> Vec<MenuNode> {
    nodes
        .iter()
        .map(|n| {
            let mut copy = with_children(n, update_by_id(&n.children, id, patch));
            if n.id == id {
                copy.apply_patch(patch);
            }
            copy
        })
        .collect()
}

pub fn set_visibility(nodes: &[MenuNode], id: MenuId, visible: bool) -> Vec<MenuNode> {
    update_by_id(nodes, id, &MenuNodePatch::visible(visible))
}

pub fn toggle_visibility(nodes: &[MenuNode], id: MenuId) -> Vec<MenuNode> {
    match find_by_id(nodes, id) {
        Some(node) => set_visibility(nodes, id, !node.visible),
        None => nodes.to_vec(),
    }
}

pub fn set_expanded(nodes: &[MenuNode], id: MenuId, expanded: bool) -> Vec<MenuNode> {
    update_by_id(nodes, id, &MenuNodePatch::expanded(expanded))
}

pub fn toggle_expand(nodes: &[MenuNode], id: MenuId) -> Vec<MenuNode> {
    match find_by_id(nodes, id) {
        Some(node) => set_expanded(nodes, id, !node.is_expanded),
        None => nodes.to_vec(),
    }
}

/// Set `is_expanded` on every node that has children.
pub fn expand_all(nodes: &[MenuNode], expanded: bool) -> Vec<MenuNode> {
    nodes
        .iter()
        .map(|n| {
            let mut copy = with_children(n, expand_all(&n.children, expanded));
            if !copy.children.is_empty() {
                copy.is_expanded = expanded;
            }
            copy
        })
        .collect()
}

/// Insert `node` into `parent`'s children (or the root list) at `index`,
/// clamped to the list length. Unknown parents leave the tree unchanged.
pub fn insert_at(
    nodes: &[MenuNode],
    parent: Option<MenuId>,
    index: usize,
    node: MenuNode,
) -> Vec<MenuNode> {
    let Some(parent_id) = parent else {
        let mut roots = nodes.to_vec();
        let at = index.min(roots.len());
        roots.insert(at, node);
        return renumber(roots);
    };
    if find_by_id(nodes, parent_id).is_none() {
        log::debug!("insert_at: parent {parent_id} not in tree, ignoring");
        return nodes.to_vec();
    }
    let mut slot = Some(node);
    let rebuilt = insert_into(nodes, parent_id, index, &mut slot);
    renumber(rebuilt)
}

fn insert_into(
    nodes: &[MenuNode],
    parent_id: MenuId,
    index: usize,
    slot: &mut Option<MenuNode>,
) -> Vec<MenuNode> {
    nodes
        .iter()
        .map(|n| {
            let mut children = insert_into(&n.children, parent_id, index, slot);
            if n.id == parent_id
                && let Some(node) = slot.take()
            {
                let at = index.min(children.len());
                children.insert(at, node);
            }
            with_children(n, children)
        })
        .collect()
}

// ─── Depth & order ───────────────────────────────────────────────────────

/// Copy of `node` with `depth` rewritten to `base_depth` and descendants to
/// match. Used after relocation, when the stored depths are stale.
pub fn recompute_depths(node: &MenuNode, base_depth: usize) -> MenuNode {
    let children = node
        .children
        .iter()
        .map(|c| recompute_depths(c, base_depth + 1))
        .collect();
    let mut copy = with_children(node, children);
    copy.depth = base_depth;
    copy
}

/// Rewrite `parent_id`, `depth` and sibling `order` from tree position.
pub fn renumber(mut nodes: Vec<MenuNode>) -> Vec<MenuNode> {
    renumber_level(&mut nodes, None, 0);
    nodes
}

fn renumber_level(nodes: &mut [MenuNode], parent: Option<MenuId>, depth: usize) {
    for (order, node) in nodes.iter_mut().enumerate() {
        node.parent_id = parent;
        node.depth = depth;
        node.order = order;
        renumber_level(&mut node.children, Some(node.id), depth + 1);
    }
}

/// Enforce `MAX_DEPTH` structurally: the descendants of a node that already
/// sits at the deepest level are lifted, in pre-order, to become its
/// following siblings. Depths are renumbered afterwards.
pub fn clamp_depth(nodes: Vec<MenuNode>) -> Vec<MenuNode> {
    renumber(clamp_level(nodes, 0))
}

fn clamp_level(nodes: Vec<MenuNode>, depth: usize) -> Vec<MenuNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        let children = std::mem::take(&mut node.children);
        if depth >= MAX_DEPTH {
            if !children.is_empty() {
                log::debug!(
                    "clamp_depth: lifting {} descendant(s) of {} to depth {depth}",
                    count_nodes(&children),
                    node.id
                );
            }
            out.push(node);
            lift(children, &mut out);
        } else {
            node.children = clamp_level(children, depth + 1);
            out.push(node);
        }
    }
    out
}

fn lift(nodes: Vec<MenuNode>, out: &mut Vec<MenuNode>) {
    for mut node in nodes {
        let children = std::mem::take(&mut node.children);
        out.push(node);
        lift(children, out);
    }
}

// ─── Read-only views ─────────────────────────────────────────────────────

/// Only nodes with `visible = true`. A hidden node drops its whole subtree,
/// whatever the descendants' own flags say.
pub fn get_visible_subset(nodes: &[MenuNode]) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter(|n| n.visible)
        .map(|n| with_children(n, get_visible_subset(&n.children)))
        .collect()
}

/// Pre-order rows as shown in the builder: collapsed nodes hide their
/// children. This is the set of possible drag targets.
pub fn flatten_visible_order(nodes: &[MenuNode]) -> Vec<&MenuNode> {
    let mut rows = Vec::new();
    push_rows(nodes, &mut rows);
    rows
}

fn push_rows<'a>(nodes: &'a [MenuNode], rows: &mut Vec<&'a MenuNode>) {
    for node in nodes {
        rows.push(node);
        if node.is_expanded {
            push_rows(&node.children, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItemKind;
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> MenuNode {
        MenuNode::new(MenuId::intern(id), id, MenuItemKind::CustomLink, format!("/{id}"))
    }

    /// home, shop { bread { rye }, cakes }, about
    fn sample() -> Vec<MenuNode> {
        renumber(vec![
            node("home"),
            node("shop").with_children(vec![
                node("bread").with_children(vec![node("rye")]),
                node("cakes"),
            ]),
            node("about"),
        ])
    }

    fn id(s: &str) -> MenuId {
        MenuId::intern(s)
    }

    fn labels(nodes: &[MenuNode]) -> Vec<String> {
        nodes.iter().map(|n| n.label.clone()).collect()
    }

    #[test]
    fn find_by_id_and_parent() {
        let tree = sample();
        assert_eq!(find_by_id(&tree, id("rye")).unwrap().depth, 2);
        assert_eq!(find_parent(&tree, id("rye")).unwrap().id, id("bread"));
        assert!(find_parent(&tree, id("home")).is_none());
        assert!(find_by_id(&tree, id("missing")).is_none());
    }

    #[test]
    fn paths_resolve_back_to_nodes() {
        let tree = sample();
        let path = find_path(&tree, id("cakes")).unwrap();
        assert_eq!(path.as_slice(), &[1, 1]);
        assert_eq!(node_at_path(&tree, &path).unwrap().id, id("cakes"));
        let (siblings, index) = sibling_position(&tree, id("cakes")).unwrap();
        assert_eq!(siblings.len(), 2);
        assert_eq!(index, 1);
    }

    #[test]
    fn remove_cascades_and_renumbers() {
        let tree = sample();
        let out = remove_by_id(&tree, id("shop"));
        assert_eq!(labels(&out), vec!["home", "about"]);
        assert_eq!(count_nodes(&out), 2);
        assert_eq!(out[1].order, 1);
        // Input untouched.
        assert_eq!(count_nodes(&tree), 6);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let tree = sample();
        assert_eq!(remove_by_id(&tree, id("ghost")), tree);
    }

    #[test]
    fn update_merges_patch() {
        let tree = sample();
        let out = update_by_id(&tree, id("bread"), &MenuNodePatch::label("Breads"));
        assert_eq!(find_by_id(&out, id("bread")).unwrap().label, "Breads");
        assert_eq!(find_by_id(&out, id("rye")).unwrap().parent_id, Some(id("bread")));
        assert_eq!(find_by_id(&tree, id("bread")).unwrap().label, "bread");
    }

    #[test]
    fn toggles_flip_flags() {
        let tree = sample();
        let hidden = toggle_visibility(&tree, id("cakes"));
        assert!(!find_by_id(&hidden, id("cakes")).unwrap().visible);
        let collapsed = toggle_expand(&tree, id("shop"));
        assert!(!find_by_id(&collapsed, id("shop")).unwrap().is_expanded);
        assert_eq!(toggle_expand(&tree, id("ghost")), tree);
    }

    #[test]
    fn effective_visibility_follows_ancestors() {
        let tree = set_visibility(&sample(), id("shop"), false);
        assert!(find_by_id(&tree, id("rye")).unwrap().visible);
        assert!(!is_effectively_visible(&tree, id("rye")));
        assert!(is_effectively_visible(&tree, id("home")));
    }

    #[test]
    fn visible_subset_gates_descendants() {
        let tree = set_visibility(&sample(), id("bread"), false);
        let visible = get_visible_subset(&tree);
        assert!(find_by_id(&visible, id("bread")).is_none());
        assert!(find_by_id(&visible, id("rye")).is_none());
        assert!(find_by_id(&visible, id("cakes")).is_some());
        // Underlying flags untouched.
        assert!(find_by_id(&tree, id("rye")).unwrap().visible);
    }

    #[test]
    fn flatten_respects_collapse() {
        let tree = sample();
        let all: Vec<_> = flatten_visible_order(&tree).iter().map(|n| n.id).collect();
        assert_eq!(
            all,
            vec![id("home"), id("shop"), id("bread"), id("rye"), id("cakes"), id("about")]
        );

        let collapsed = set_expanded(&tree, id("bread"), false);
        let rows: Vec<_> = flatten_visible_order(&collapsed).iter().map(|n| n.id).collect();
        assert_eq!(
            rows,
            vec![id("home"), id("shop"), id("bread"), id("cakes"), id("about")]
        );
    }

    #[test]
    fn recompute_depths_rebases_subtree() {
        let tree = sample();
        let shop = find_by_id(&tree, id("shop")).unwrap();
        let moved = recompute_depths(shop, 1);
        assert_eq!(moved.depth, 1);
        assert_eq!(moved.children[0].depth, 2);
        assert_eq!(moved.children[0].children[0].depth, 3);
    }

    #[test]
    fn clamp_lifts_too_deep_descendants() {
        // a { b { c { d } } }: d sits at depth 3.
        let deep = vec![node("a").with_children(vec![
            node("b").with_children(vec![node("c").with_children(vec![node("d")])]),
        ])];
        let out = clamp_depth(deep);
        let b = find_by_id(&out, id("b")).unwrap();
        assert_eq!(labels(&b.children), vec!["c", "d"]);
        assert_eq!(find_by_id(&out, id("d")).unwrap().depth, 2);
        assert_eq!(find_by_id(&out, id("d")).unwrap().parent_id, Some(id("b")));
        assert_eq!(find_by_id(&out, id("d")).unwrap().order, 1);
    }

    #[test]
    fn insert_at_clamps_index_and_ignores_unknown_parent() {
        let tree = sample();
        let out = insert_at(&tree, Some(id("shop")), 99, node("pies"));
        let shop = find_by_id(&out, id("shop")).unwrap();
        assert_eq!(labels(&shop.children), vec!["bread", "cakes", "pies"]);
        assert_eq!(shop.children[2].depth, 1);

        let out = insert_at(&tree, None, 0, node("sale"));
        assert_eq!(out[0].id, id("sale"));
        assert_eq!(out[1].order, 1);

        assert_eq!(insert_at(&tree, Some(id("ghost")), 0, node("x")), tree);
    }

    #[test]
    fn expand_all_only_touches_parents() {
        let out = expand_all(&sample(), false);
        assert!(!find_by_id(&out, id("shop")).unwrap().is_expanded);
        assert!(find_by_id(&out, id("home")).unwrap().is_expanded);
    }

    #[test]
    fn descendant_check() {
        let tree = sample();
        assert!(is_descendant_of(&tree, id("shop"), id("rye")));
        assert!(!is_descendant_of(&tree, id("rye"), id("shop")));
        assert!(!is_descendant_of(&tree, id("shop"), id("shop")));
    }
}
