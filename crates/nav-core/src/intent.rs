//! Drop-intent classification.
//!
//! Turns the continuous drag signal (horizontal offset from the drag start
//! plus the row under the pointer) into a discrete structural decision.
//! Runs on every pointer move for live feedback; only the intent computed
//! last is applied when the drag ends.

use crate::id::MenuId;
use crate::model::{DropIntent, DropKind, MAX_DEPTH, MenuNode};
use crate::tree::{find_by_id, find_parent, sibling_position};
use serde::{Deserialize, Serialize};

/// One indentation level in the builder UI, in pixels.
pub const DEFAULT_NEST_THRESHOLD_PX: f32 = 32.0;

/// What a drop over empty space (no row under the pointer) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyDropPolicy {
    /// Move the item to the end of the root list.
    #[default]
    AppendToRoot,
    /// Leave the tree unchanged.
    Ignore,
}

/// Tunables for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSettings {
    /// Horizontal distance that counts as one level of (un)nesting.
    pub nest_threshold_px: f32,
    pub empty_drop: EmptyDropPolicy,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            nest_threshold_px: DEFAULT_NEST_THRESHOLD_PX,
            empty_drop: EmptyDropPolicy::AppendToRoot,
        }
    }
}

/// Levels gained (positive) or lost from a horizontal offset.
///
/// Rounds half up, like `Math.round` in the browser: 16px of a 32px
/// threshold is one level, -16px is zero.
pub fn depth_delta(offset_px: f32, threshold_px: f32) -> i64 {
    if threshold_px.is_nan() || threshold_px <= 0.0 || !offset_px.is_finite() {
        return 0;
    }
    ((offset_px / threshold_px) + 0.5).floor() as i64
}

/// `active_depth + delta`, clamped to `0..=MAX_DEPTH`.
pub fn project_depth(active_depth: usize, offset_px: f32, threshold_px: f32) -> usize {
    let raw = (active_depth as i64).saturating_add(depth_delta(offset_px, threshold_px));
    raw.clamp(0, MAX_DEPTH as i64) as usize
}

/// Classify a drop of `active` while `hover` is under the pointer.
///
/// Returns `None` when there is nothing to apply: the active node is gone,
/// the hover node is gone, or the pointer is over empty space under
/// `EmptyDropPolicy::Ignore`.
pub fn classify_drop(
    nodes: &[MenuNode],
    active: MenuId,
    hover: Option<MenuId>,
    offset_px: f32,
    settings: &DropSettings,
) -> Option<DropIntent> {
    let active_node = find_by_id(nodes, active)?;

    let Some(hover) = hover else {
        return match settings.empty_drop {
            EmptyDropPolicy::AppendToRoot => Some(DropIntent {
                kind: DropKind::Reorder,
                target_parent_id: None,
                target_index: nodes.len(),
                projected_depth: 0,
            }),
            EmptyDropPolicy::Ignore => None,
        };
    };
    let hover_node = find_by_id(nodes, hover)?;

    let projected = project_depth(active_node.depth, offset_px, settings.nest_threshold_px);

    if projected > hover_node.depth && hover_node.depth < MAX_DEPTH {
        return Some(DropIntent {
            kind: DropKind::Nest,
            target_parent_id: Some(hover),
            target_index: hover_node.children.len(),
            projected_depth: hover_node.depth + 1,
        });
    }

    if projected < active_node.depth
        && let Some(parent) = find_parent(nodes, active)
    {
        let grandparent = find_parent(nodes, parent.id).map(|g| g.id);
        let parent_index = sibling_position(nodes, parent.id).map_or(0, |(_, i)| i);
        return Some(DropIntent {
            kind: DropKind::Unnest,
            target_parent_id: grandparent,
            target_index: parent_index + 1,
            projected_depth: active_node.depth.saturating_sub(1),
        });
    }

    let hover_index = sibling_position(nodes, hover).map_or(0, |(_, i)| i);
    Some(DropIntent {
        kind: DropKind::Reorder,
        target_parent_id: find_parent(nodes, hover).map(|p| p.id),
        target_index: hover_index,
        projected_depth: hover_node.depth,
    })
}
