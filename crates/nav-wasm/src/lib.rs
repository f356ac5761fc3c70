//! WASM bridge for the menu builder, loaded by the dashboard webview.
//!
//! Compiled via `wasm-pack build --target web`. Trees, source items and
//! patches cross the boundary as JSON strings; pointer coordinates are
//! relative to the top-left corner of the menu list.

mod host;

pub use host::{JsClock, LocalStorage};

use nav_core::{DropIntent, LinkTarget, MenuId, MenuLocation, MenuNode, MenuNodePatch, SourceItem};
use nav_editor::{ActiveDrag, BuilderConfig, MenuBuilder};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The JS-facing menu builder.
///
/// Hosts call `tick` from a timer (e.g. `requestAnimationFrame` or a
/// `setTimeout` armed with `next_deadline`) to let autosave fire.
#[wasm_bindgen]
pub struct MenuBuilderHandle {
    builder: MenuBuilder<LocalStorage, JsClock>,
}

#[wasm_bindgen]
impl MenuBuilderHandle {
    /// Load both menus from local storage. `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<MenuBuilderHandle, JsValue> {
        host::panic_hook_setup();
        host::init_logging(log::LevelFilter::Info);
        let config = parse_config(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            builder: MenuBuilder::load(LocalStorage::new(), JsClock, config),
        })
    }

    /// Change console verbosity: "error", "warn", "info", "debug" or "trace".
    pub fn set_log_level(&self, level: &str) -> bool {
        match level.parse::<log::LevelFilter>() {
            Ok(filter) => {
                log::set_max_level(filter);
                true
            }
            Err(_) => false,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Full tree of a location as JSON, `[]` for an unknown location.
    pub fn tree_json(&self, location: &str) -> String {
        parse_location(location)
            .map(|loc| to_json(self.builder.tree(loc)))
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Tree as the live site shows it (hidden branches pruned).
    pub fn visible_tree_json(&self, location: &str) -> String {
        parse_location(location)
            .map(|loc| to_json(&self.builder.visible_tree(loc)))
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Flat rows in display order, for the list renderer.
    pub fn rows_json(&self, location: &str) -> String {
        parse_location(location)
            .map(|loc| {
                let rows: Vec<Row<'_>> = self.builder.rows(loc).into_iter().map(Row::from).collect();
                to_json(&rows)
            })
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Flat list as it would be stored.
    pub fn flat_json(&self, location: &str) -> String {
        parse_location(location)
            .map(|loc| to_json(&self.builder.flat(loc)))
            .unwrap_or_else(|| "[]".to_string())
    }

    pub fn is_dirty(&self) -> bool {
        self.builder.is_dirty()
    }

    /// Milliseconds timestamp of the pending autosave, or -1.
    pub fn next_deadline(&self) -> f64 {
        self.builder.next_deadline().map_or(-1.0, |d| d as f64)
    }

    /// The drag in progress as JSON, or `null`.
    pub fn drag_preview_json(&self) -> String {
        match self.builder.drag_preview() {
            Some(drag) => to_json(&DragPreview::from(drag)),
            None => "null".to_string(),
        }
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Add catalog items from a JSON array of `{id, name, url, kind}`.
    /// Returns the number added.
    pub fn add_items(&mut self, location: &str, items_json: &str) -> usize {
        let Some(loc) = parse_location(location) else {
            return 0;
        };
        match serde_json::from_str::<Vec<SourceItem>>(items_json) {
            Ok(items) => self.builder.add_items(loc, &items),
            Err(e) => {
                log::warn!("add_items: bad source item JSON: {e}");
                0
            }
        }
    }

    /// Returns the new item's id, or an empty string if rejected.
    pub fn add_custom_link(&mut self, location: &str, label: &str, url: &str, new_tab: bool) -> String {
        let Some(loc) = parse_location(location) else {
            return String::new();
        };
        let target = if new_tab {
            LinkTarget::NewTab
        } else {
            LinkTarget::SameTab
        };
        self.builder
            .add_custom_link(loc, label, url, target)
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    pub fn remove_item(&mut self, location: &str, id: &str) -> bool {
        parse_location(location).is_some_and(|loc| self.builder.remove_item(loc, MenuId::intern(id)))
    }

    /// Apply a JSON patch such as `{"label": "Shop all"}`.
    pub fn update_item(&mut self, location: &str, id: &str, patch_json: &str) -> bool {
        let Some(loc) = parse_location(location) else {
            return false;
        };
        match serde_json::from_str::<MenuNodePatch>(patch_json) {
            Ok(patch) => self.builder.update_item(loc, MenuId::intern(id), &patch),
            Err(e) => {
                log::warn!("update_item: bad patch JSON: {e}");
                false
            }
        }
    }

    pub fn toggle_visibility(&mut self, location: &str, id: &str) -> bool {
        parse_location(location).is_some_and(|loc| self.builder.toggle_visibility(loc, MenuId::intern(id)))
    }

    pub fn toggle_expand(&mut self, location: &str, id: &str) -> bool {
        parse_location(location).is_some_and(|loc| self.builder.toggle_expand(loc, MenuId::intern(id)))
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer pressed on a row's drag handle.
    pub fn handle_pointer_down(&mut self, location: &str, id: &str, x: f32) -> bool {
        parse_location(location).is_some_and(|loc| self.builder.drag_start(loc, MenuId::intern(id), x))
    }

    /// Returns the current drop intent as JSON, or `null`.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> String {
        intent_json(self.builder.drag_pointer(x, y).as_ref())
    }

    /// Returns `true` if the drop changed the menu.
    pub fn handle_pointer_up(&mut self) -> bool {
        self.builder.drag_end()
    }

    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.builder.drag_cancel()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Returns `true` if an autosave was written.
    pub fn tick(&mut self) -> bool {
        self.builder.tick()
    }

    pub fn save_now(&mut self) -> bool {
        self.builder.save_now().is_ok()
    }

    pub fn revert(&mut self) {
        self.builder.revert();
    }

    pub fn dispose(&mut self) {
        self.builder.dispose();
    }
}

// ─── JSON shapes ─────────────────────────────────────────────────────────

/// One rendered list row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
    id: MenuId,
    label: &'a str,
    depth: usize,
    visible: bool,
    has_children: bool,
    is_expanded: bool,
}

impl<'a> From<&'a MenuNode> for Row<'a> {
    fn from(node: &'a MenuNode) -> Self {
        Self {
            id: node.id,
            label: &node.label,
            depth: node.depth,
            visible: node.visible,
            has_children: !node.children.is_empty(),
            is_expanded: node.is_expanded,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DragPreview {
    location: MenuLocation,
    active: MenuId,
    offset_x: f32,
    over: Option<MenuId>,
    intent: Option<DropIntent>,
}

impl From<&ActiveDrag> for DragPreview {
    fn from(drag: &ActiveDrag) -> Self {
        Self {
            location: drag.location,
            active: drag.active,
            offset_x: drag.offset_x,
            over: drag.over.node(),
            intent: drag.intent,
        }
    }
}

fn parse_location(name: &str) -> Option<MenuLocation> {
    let location = MenuLocation::parse(name);
    if location.is_none() {
        log::warn!("unknown menu location `{name}`");
    }
    location
}

fn parse_config(json: &str) -> Result<BuilderConfig, nav_editor::ConfigError> {
    if json.trim().is_empty() {
        return Ok(BuilderConfig::default());
    }
    BuilderConfig::from_json(json)
}

fn intent_json(intent: Option<&DropIntent>) -> String {
    match intent {
        Some(intent) => to_json(intent),
        None => "null".to_string(),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {e}");
        "null".to_string()
    })
}
