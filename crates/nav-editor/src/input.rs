//! Drag input events.
//!
//! Pointer coordinates arrive relative to the menu list. The host resolves
//! the row under the pointer (see `hit::row_at`) before building a `Move`.

use nav_core::{MenuId, MenuLocation};

/// What the pointer is over during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOver {
    /// A row of the list.
    Node(MenuId),
    /// Inside the list, below the last row.
    EmptySpace,
    /// Off the list entirely.
    Outside,
}

impl DragOver {
    pub fn node(self) -> Option<MenuId> {
        match self {
            Self::Node(id) => Some(id),
            Self::EmptySpace | Self::Outside => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pointer pressed on a row's drag handle.
    Start {
        location: MenuLocation,
        id: MenuId,
        x: f32,
    },
    Move { x: f32, over: DragOver },
    /// Pointer released.
    End,
    /// Escape pressed or pointer capture lost.
    Cancel,
}
