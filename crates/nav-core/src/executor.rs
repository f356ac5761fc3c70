//! Applies a classified `DropIntent` to a menu tree.
//!
//! The active node is always fully detached before it is reattached, so it
//! can never land inside its own subtree. Positions are resolved against the
//! detached tree by id, which keeps stale intents (computed a few pointer
//! moves ago) from pointing at shifted indices.

use crate::id::MenuId;
use crate::model::{DropIntent, DropKind, MAX_DEPTH, MenuNode};
use crate::tree::{
    clamp_depth, find_by_id, find_parent, insert_at, is_descendant_of, recompute_depths,
    remove_by_id, set_expanded, sibling_position,
};

/// Where the detached node goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Landing {
    parent: Option<MenuId>,
    index: usize,
    depth: usize,
    /// Reveal the new parent (nest).
    expand_parent: bool,
}

/// Move `active_id` according to `intent`, relative to `target_id`.
///
/// Returns the tree unchanged when the move is meaningless: unknown active
/// or target, the active node dropped on itself, or a target inside the
/// active node's own subtree. The subtree check does not apply to unnesting
/// a child, which ignores the target. Depth overflow is clamped, never
/// rejected.
pub fn apply_drop_intent(
    nodes: &[MenuNode],
    active_id: MenuId,
    target_id: Option<MenuId>,
    intent: &DropIntent,
) -> Vec<MenuNode> {
    let Some(active) = find_by_id(nodes, active_id) else {
        log::debug!("drop ignored: active {active_id} not in tree");
        return nodes.to_vec();
    };
    if let Some(target) = target_id {
        if target == active_id {
            return nodes.to_vec();
        }
        if find_by_id(nodes, target).is_none() {
            log::debug!("drop ignored: target {target} not in tree");
            return nodes.to_vec();
        }
        // Unnest of a child lands after its former parent, so where the
        // pointer hovers does not matter.
        let lands_after_parent = intent.kind == DropKind::Unnest && find_parent(nodes, active_id).is_some();
        if !lands_after_parent && is_descendant_of(nodes, active_id, target) {
            log::debug!("drop ignored: {target} is inside {active_id}");
            return nodes.to_vec();
        }
    }

    let former_parent = find_parent(nodes, active_id).map(|p| p.id);
    let moving_down_same_list = match (target_id, sibling_position(nodes, active_id)) {
        (Some(target), Some((siblings, active_index))) => siblings
            .iter()
            .position(|s| s.id == target)
            .is_some_and(|target_index| active_index < target_index),
        _ => false,
    };

    let detached = remove_by_id(nodes, active_id);
    let Some(landing) = resolve_landing(
        &detached,
        target_id,
        former_parent,
        moving_down_same_list,
        intent.kind,
    ) else {
        return nodes.to_vec();
    };

    if landing.depth != intent.projected_depth {
        log::trace!(
            "drop of {active_id}: intent projected depth {}, landing at {}",
            intent.projected_depth,
            landing.depth
        );
    }

    let subtree = recompute_depths(active, landing.depth);
    let mut out = insert_at(&detached, landing.parent, landing.index, subtree);
    if landing.expand_parent
        && let Some(parent) = landing.parent
    {
        out = set_expanded(&out, parent, true);
    }
    clamp_depth(out)
}

fn resolve_landing(
    detached: &[MenuNode],
    target_id: Option<MenuId>,
    former_parent: Option<MenuId>,
    moving_down_same_list: bool,
    kind: DropKind,
) -> Option<Landing> {
    let Some(target) = target_id else {
        return Some(Landing {
            parent: None,
            index: detached.len(),
            depth: 0,
            expand_parent: false,
        });
    };

    match kind {
        DropKind::Nest => {
            let target_node = find_by_id(detached, target)?;
            if target_node.depth >= MAX_DEPTH {
                // No room below the target: land right after it instead.
                return after(detached, target);
            }
            Some(Landing {
                parent: Some(target),
                index: target_node.children.len(),
                depth: target_node.depth + 1,
                expand_parent: true,
            })
        }
        DropKind::Unnest => match former_parent {
            Some(parent) => after(detached, parent),
            None => resolve_landing(
                detached,
                target_id,
                former_parent,
                moving_down_same_list,
                DropKind::Reorder,
            ),
        },
        DropKind::Reorder => {
            let (_, target_index) = sibling_position(detached, target)?;
            let target_node = find_by_id(detached, target)?;
            // Same-list moves take the target's former slot: downwards
            // that is just after it, upwards just before it.
            let index = if moving_down_same_list {
                target_index + 1
            } else {
                target_index
            };
            Some(Landing {
                parent: target_node.parent_id,
                index,
                depth: target_node.depth,
                expand_parent: false,
            })
        }
    }
}

/// Landing slot immediately after `sibling`, at its level.
fn after(detached: &[MenuNode], sibling: MenuId) -> Option<Landing> {
    let (_, index) = sibling_position(detached, sibling)?;
    let node = find_by_id(detached, sibling)?;
    Some(Landing {
        parent: node.parent_id,
        index: index + 1,
        depth: node.depth,
        expand_parent: false,
    })
}
