//! Hit testing: vertical pointer position → row.

use crate::input::DragOver;
use nav_core::MenuNode;

/// Map `y` (relative to the top of the list) onto the visible rows.
///
/// Rows are laid out top to bottom with a uniform `row_height`.
pub fn row_at(rows: &[&MenuNode], y: f32, row_height: f32) -> DragOver {
    if !y.is_finite() || y < 0.0 || row_height.is_nan() || row_height <= 0.0 {
        return DragOver::Outside;
    }
    let index = (y / row_height).floor() as usize;
    match rows.get(index) {
        Some(node) => DragOver::Node(node.id),
        None => DragOver::EmptySpace,
    }
}
