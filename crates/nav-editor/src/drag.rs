//! Drag session: one pointer drag from handle press to release.
//!
//! The session only tracks ephemeral state. Every move recomputes the drop
//! intent from scratch against the current tree, so the preview always
//! matches what `end` will hand back. Nothing here mutates a tree.

use crate::input::{DragEvent, DragOver};
use nav_core::tree::find_by_id;
use nav_core::{DropIntent, DropSettings, MenuId, MenuLocation, MenuNode, classify_drop};

/// State of the drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub location: MenuLocation,
    pub active: MenuId,
    pub start_x: f32,
    /// Horizontal distance from `start_x` at the last move.
    pub offset_x: f32,
    pub over: DragOver,
    /// Intent for the last move; `None` while outside the list.
    pub intent: Option<DropIntent>,
}

/// What to apply once the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRequest {
    pub location: MenuLocation,
    pub active: MenuId,
    pub target: Option<MenuId>,
    pub intent: DropIntent,
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    current: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ActiveDrag> {
        self.current.as_ref()
    }

    pub fn location(&self) -> Option<MenuLocation> {
        self.current.map(|d| d.location)
    }

    /// Begin dragging `id`. Ignored while another drag is running or when
    /// `id` is not in `nodes`.
    pub fn start(&mut self, nodes: &[MenuNode], location: MenuLocation, id: MenuId, x: f32) -> bool {
        if let Some(running) = &self.current {
            log::debug!(
                "drag start on {id} ignored: {} is already being dragged",
                running.active
            );
            return false;
        }
        if find_by_id(nodes, id).is_none() {
            log::debug!("drag start on unknown item {id} ignored");
            return false;
        }
        self.current = Some(ActiveDrag {
            location,
            active: id,
            start_x: x,
            offset_x: 0.0,
            over: DragOver::Outside,
            intent: None,
        });
        true
    }

    /// Track the pointer. `nodes` must be the tree the drag started in.
    pub fn update(
        &mut self,
        nodes: &[MenuNode],
        x: f32,
        over: DragOver,
        settings: &DropSettings,
    ) -> Option<DropIntent> {
        let drag = self.current.as_mut()?;
        drag.offset_x = x - drag.start_x;
        drag.over = over;
        drag.intent = match over {
            DragOver::Outside => None,
            DragOver::Node(_) | DragOver::EmptySpace => {
                classify_drop(nodes, drag.active, over.node(), drag.offset_x, settings)
            }
        };
        log::trace!(
            "drag {} offset {:.1} over {:?}: {:?}",
            drag.active,
            drag.offset_x,
            over,
            drag.intent
        );
        drag.intent
    }

    /// Release the pointer. Returns the drop to apply, if any.
    pub fn end(&mut self) -> Option<DropRequest> {
        let drag = self.current.take()?;
        let intent = drag.intent?;
        Some(DropRequest {
            location: drag.location,
            active: drag.active,
            target: drag.over.node(),
            intent,
        })
    }

    /// Abandon the drag. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Event-driven entry point. `nodes_for` yields the tree of a location.
    pub fn handle<'a>(
        &mut self,
        event: &DragEvent,
        nodes_for: impl Fn(MenuLocation) -> &'a [MenuNode],
        settings: &DropSettings,
    ) -> Option<DropRequest> {
        match *event {
            DragEvent::Start { location, id, x } => {
                self.start(nodes_for(location), location, id, x);
                None
            }
            DragEvent::Move { x, over } => {
                if let Some(location) = self.location() {
                    self.update(nodes_for(location), x, over, settings);
                }
                None
            }
            DragEvent::End => self.end(),
            DragEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }
}
