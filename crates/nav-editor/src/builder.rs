//! Menu builder: the stateful owner of the header and footer trees.
//!
//! All edits go through here. Each edit that actually changes a tree marks
//! the builder dirty and (re)starts the autosave window; `tick` writes both
//! menus once the window has passed without further edits.
//!
//! Persistence failures never surface as errors from edits or `tick`. They
//! are logged, the builder stays dirty, and the next edit or `save_now`
//! retries.

use crate::autosave::Debouncer;
use crate::clock::Clock;
use crate::config::BuilderConfig;
use crate::drag::{ActiveDrag, DragSession};
use crate::hit::row_at;
use crate::input::{DragEvent, DragOver};
use crate::store::{KeyValueStore, StoreError};
use nav_core::lint::{LintSeverity, lint_tree};
use nav_core::tree::{self, find_by_id, flatten_visible_order, get_visible_subset};
use nav_core::{
    DropIntent, LinkTarget, MenuId, MenuItemFlat, MenuLocation, MenuNode, MenuNodePatch,
    SourceError, SourceItem, apply_drop_intent, flat_to_json, flat_to_tree, parse_flat_json, seed,
    tree_to_flat,
};

/// Prefix for ids of items added through the builder.
const ID_PREFIX: &str = "menu";

pub struct MenuBuilder<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    config: BuilderConfig,
    header: Vec<MenuNode>,
    footer: Vec<MenuNode>,
    /// Last successfully written (or loaded) flat list per location.
    saved_header: Vec<MenuItemFlat>,
    saved_footer: Vec<MenuItemFlat>,
    dirty: bool,
    autosave: Debouncer,
    drag: DragSession,
    disposed: bool,
}

impl<S: KeyValueStore, C: Clock> MenuBuilder<S, C> {
    /// Read both menus from `store`, falling back to the starter menus for
    /// missing or unreadable keys.
    pub fn load(store: S, clock: C, config: BuilderConfig) -> Self {
        let header = read_menu(&store, &config, MenuLocation::Header);
        let footer = read_menu(&store, &config, MenuLocation::Footer);
        let autosave = Debouncer::new(config.autosave_delay_ms);
        Self {
            saved_header: tree_to_flat(&header),
            saved_footer: tree_to_flat(&footer),
            header,
            footer,
            store,
            clock,
            config,
            dirty: false,
            autosave,
            drag: DragSession::new(),
            disposed: false,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn tree(&self, location: MenuLocation) -> &[MenuNode] {
        match location {
            MenuLocation::Header => &self.header,
            MenuLocation::Footer => &self.footer,
        }
    }

    /// The tree as the live site renders it: hidden branches pruned.
    pub fn visible_tree(&self, location: MenuLocation) -> Vec<MenuNode> {
        get_visible_subset(self.tree(location))
    }

    /// Rows offered to the drag layer, top to bottom.
    pub fn rows(&self, location: MenuLocation) -> Vec<&MenuNode> {
        flatten_visible_order(self.tree(location))
    }

    pub fn flat(&self, location: MenuLocation) -> Vec<MenuItemFlat> {
        tree_to_flat(self.tree(location))
    }

    pub fn saved(&self, location: MenuLocation) -> &[MenuItemFlat] {
        match location {
            MenuLocation::Header => &self.saved_header,
            MenuLocation::Footer => &self.saved_footer,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// When the pending autosave fires, if one is pending.
    pub fn next_deadline(&self) -> Option<u64> {
        self.autosave.deadline()
    }

    /// The drag in progress, for rendering the drop preview.
    pub fn drag_preview(&self) -> Option<&ActiveDrag> {
        self.drag.current()
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Append each valid source item as a new root. Returns how many were
    /// added; invalid items are logged and skipped.
    pub fn add_items(&mut self, location: MenuLocation, items: &[SourceItem]) -> usize {
        let mut added = 0;
        for item in items {
            match item.to_node(self.fresh_id()) {
                Ok(node) => {
                    self.append_root(location, node);
                    added += 1;
                }
                Err(err) => log::warn!("skipping {} item: {err}", location.as_str()),
            }
        }
        if added > 0 {
            self.mark_dirty();
        }
        added
    }

    /// Append a user-authored link as a new root.
    pub fn add_custom_link(
        &mut self,
        location: MenuLocation,
        label: &str,
        url: &str,
        target: LinkTarget,
    ) -> Result<MenuId, SourceError> {
        let id = self.fresh_id();
        let mut node = SourceItem::custom(label, url)
            .to_node(id)
            .inspect_err(|err| log::warn!("rejected custom link: {err}"))?;
        node.target = target;
        self.append_root(location, node);
        self.mark_dirty();
        Ok(id)
    }

    /// Apply a classified drop. Invalid drops leave the tree as it was.
    pub fn reorder(
        &mut self,
        location: MenuLocation,
        active: MenuId,
        target: Option<MenuId>,
        intent: &DropIntent,
    ) -> bool {
        let next = apply_drop_intent(self.tree(location), active, target, intent);
        self.commit(location, next)
    }

    /// Remove `id` and everything below it.
    pub fn remove_item(&mut self, location: MenuLocation, id: MenuId) -> bool {
        let next = tree::remove_by_id(self.tree(location), id);
        self.commit(location, next)
    }

    pub fn update_item(&mut self, location: MenuLocation, id: MenuId, patch: &MenuNodePatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let next = tree::update_by_id(self.tree(location), id, patch);
        self.commit(location, next)
    }

    pub fn toggle_visibility(&mut self, location: MenuLocation, id: MenuId) -> bool {
        let next = tree::toggle_visibility(self.tree(location), id);
        self.commit(location, next)
    }

    pub fn toggle_expand(&mut self, location: MenuLocation, id: MenuId) -> bool {
        let next = tree::toggle_expand(self.tree(location), id);
        self.commit(location, next)
    }

    /// Expand or collapse every branch of one menu.
    pub fn set_all_expanded(&mut self, location: MenuLocation, expanded: bool) -> bool {
        let next = tree::expand_all(self.tree(location), expanded);
        self.commit(location, next)
    }

    /// Throw away unsaved edits and go back to the last saved menus.
    pub fn revert(&mut self) {
        self.header = flat_to_tree(&self.saved_header);
        self.footer = flat_to_tree(&self.saved_footer);
        self.dirty = false;
        self.autosave.cancel();
        self.drag.cancel();
        log::debug!("reverted menus to last saved state");
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    pub fn drag_start(&mut self, location: MenuLocation, id: MenuId, x: f32) -> bool {
        let nodes = match location {
            MenuLocation::Header => &self.header,
            MenuLocation::Footer => &self.footer,
        };
        self.drag.start(nodes, location, id, x)
    }

    /// Track the pointer over an already resolved row.
    pub fn drag_move(&mut self, x: f32, over: DragOver) -> Option<DropIntent> {
        let location = self.drag.location()?;
        let settings = self.config.drop_settings();
        let nodes = match location {
            MenuLocation::Header => &self.header,
            MenuLocation::Footer => &self.footer,
        };
        self.drag.update(nodes, x, over, &settings)
    }

    /// Track the pointer by list-relative coordinates.
    pub fn drag_pointer(&mut self, x: f32, y: f32) -> Option<DropIntent> {
        let location = self.drag.location()?;
        let over = row_at(&self.rows(location), y, self.config.row_height_px);
        self.drag_move(x, over)
    }

    /// Release the pointer and apply the last intent. Returns whether the
    /// tree changed.
    pub fn drag_end(&mut self) -> bool {
        match self.drag.end() {
            Some(request) => self.reorder(request.location, request.active, request.target, &request.intent),
            None => false,
        }
    }

    pub fn drag_cancel(&mut self) -> bool {
        self.drag.cancel()
    }

    /// Feed one drag event. Returns whether a tree changed.
    pub fn handle_drag(&mut self, event: &DragEvent) -> bool {
        let settings = self.config.drop_settings();
        let (header, footer) = (&self.header, &self.footer);
        let request = self.drag.handle(
            event,
            |location| match location {
                MenuLocation::Header => header.as_slice(),
                MenuLocation::Footer => footer.as_slice(),
            },
            &settings,
        );
        match request {
            Some(r) => self.reorder(r.location, r.active, r.target, &r.intent),
            None => false,
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Fire the autosave if its window has passed. Returns whether a save
    /// completed.
    pub fn tick(&mut self) -> bool {
        if self.disposed || !self.autosave.is_due(self.clock.now_ms()) {
            return false;
        }
        self.autosave.cancel();
        if !self.dirty {
            return false;
        }
        match self.persist() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("autosave failed, changes kept for retry: {err}");
                false
            }
        }
    }

    /// Write both menus now, regardless of the autosave window.
    pub fn save_now(&mut self) -> Result<(), StoreError> {
        self.autosave.cancel();
        self.persist()
            .inspect_err(|err| log::warn!("save failed, changes kept for retry: {err}"))
    }

    /// Stop the pending autosave and any drag. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.autosave.cancel();
        self.drag.cancel();
        if self.dirty {
            log::debug!("builder disposed with unsaved changes");
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn fresh_id(&self) -> MenuId {
        MenuId::unique(ID_PREFIX, |id| {
            find_by_id(&self.header, id).is_some() || find_by_id(&self.footer, id).is_some()
        })
    }

    fn tree_mut(&mut self, location: MenuLocation) -> &mut Vec<MenuNode> {
        match location {
            MenuLocation::Header => &mut self.header,
            MenuLocation::Footer => &mut self.footer,
        }
    }

    fn append_root(&mut self, location: MenuLocation, node: MenuNode) {
        let tree = self.tree(location);
        let next = tree::insert_at(tree, None, tree.len(), node);
        *self.tree_mut(location) = next;
    }

    /// Install `next` if it differs from the current tree.
    fn commit(&mut self, location: MenuLocation, next: Vec<MenuNode>) -> bool {
        if self.tree(location) == next.as_slice() {
            return false;
        }
        *self.tree_mut(location) = next;
        self.mark_dirty();
        true
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        if self.disposed {
            return;
        }
        let deadline = self.autosave.schedule(self.clock.now_ms());
        log::trace!("autosave scheduled for {deadline}");
    }

    /// Write each location independently. A location's snapshot only
    /// advances when its own write succeeds; dirty clears only when both do.
    fn persist(&mut self) -> Result<(), StoreError> {
        let mut first_error = None;
        for location in MenuLocation::ALL {
            let flat = self.flat(location);
            let key = self.config.key_for(location).to_string();
            let written = flat_to_json(&flat)
                .map_err(|err| StoreError::WriteFailed {
                    key: key.clone(),
                    reason: err.to_string(),
                })
                .and_then(|json| self.store.set(&key, &json));
            match written {
                Ok(()) => {
                    log::debug!("saved {} menu ({} items)", location.as_str(), flat.len());
                    match location {
                        MenuLocation::Header => self.saved_header = flat,
                        MenuLocation::Footer => self.saved_footer = flat,
                    }
                }
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(_) => {}
            }
        }
        match first_error {
            None => {
                self.dirty = false;
                Ok(())
            }
            Some(err) => Err(err),
        }
    }
}

/// Stored flat list for `location`, or its starter menu.
fn read_menu<S: KeyValueStore>(store: &S, config: &BuilderConfig, location: MenuLocation) -> Vec<MenuNode> {
    let key = config.key_for(location);
    let flat = match store.get(key) {
        None => {
            log::debug!("no stored {} menu under `{key}`, using defaults", location.as_str());
            seed::default_for(location)
        }
        Some(json) => match parse_flat_json(&json) {
            Ok(flat) => flat,
            Err(err) => {
                log::warn!("stored {} menu is unreadable ({err}), using defaults", location.as_str());
                seed::default_for(location)
            }
        },
    };
    let tree = flat_to_tree(&flat);
    for diag in lint_tree(&tree) {
        match diag.severity {
            LintSeverity::Error => log::warn!("{}: [{}] {}", location.as_str(), diag.rule, diag.message),
            LintSeverity::Warning => log::debug!("{}: [{}] {}", location.as_str(), diag.rule, diag.message),
        }
    }
    tree
}
