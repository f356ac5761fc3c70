//! Core data model for navigation menus.
//!
//! A menu is an ordered forest of `MenuNode` values: the roots are the
//! top-level entries, and each node owns its children exclusively. The
//! persisted form is a flat list of `MenuItemFlat` records linked by
//! `parent_id`, converted by the `codec` module.
//!
//! `depth` and `order` on `MenuNode` are derived from tree position. They are
//! rewritten after every structural change and never trusted as input.

use crate::id::MenuId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deepest allowed nesting level: root (0), child (1), grandchild (2).
pub const MAX_DEPTH: usize = 2;

// ─── Enumerations ────────────────────────────────────────────────────────

/// What a menu entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuItemKind {
    PageReference,
    CategoryReference,
    ProductReference,
    CustomLink,
    /// Built-in entries (home, cart, account) that exist without a catalog record.
    System,
}

impl MenuItemKind {
    /// Whether items of this kind carry a `source_ref` into a catalog.
    pub fn is_reference(self) -> bool {
        match self {
            Self::PageReference | Self::CategoryReference | Self::ProductReference => true,
            Self::CustomLink | Self::System => false,
        }
    }
}

/// Where a link opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkTarget {
    #[default]
    #[serde(alias = "_self")]
    SameTab,
    #[serde(alias = "_blank")]
    NewTab,
}

/// Which of the two independent menus an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuLocation {
    Header,
    Footer,
}

impl MenuLocation {
    pub const ALL: [MenuLocation; 2] = [MenuLocation::Header, MenuLocation::Footer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "header" => Some(Self::Header),
            "footer" => Some(Self::Footer),
            _ => None,
        }
    }
}

// ─── Tree form ───────────────────────────────────────────────────────────

/// One navigation entry in tree form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub id: MenuId,
    pub label: String,
    pub kind: MenuItemKind,
    /// Destination path (`/products/bakery`) or absolute URL.
    pub url: String,
    pub target: LinkTarget,
    /// Catalog id (page / category / product) for reference kinds.
    pub source_ref: Option<String>,
    pub parent_id: Option<MenuId>,
    pub depth: usize,
    pub order: usize,
    pub children: Vec<MenuNode>,
    /// Own visibility flag. Effective visibility also depends on ancestors.
    pub visible: bool,
    /// Display state only; no effect on ordering.
    pub is_expanded: bool,
}

impl MenuNode {
    /// A visible, expanded root-level node with no children.
    pub fn new(id: MenuId, label: impl Into<String>, kind: MenuItemKind, url: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            url: url.into(),
            target: LinkTarget::SameTab,
            source_ref: None,
            parent_id: None,
            depth: 0,
            order: 0,
            children: Vec::new(),
            visible: true,
            is_expanded: true,
        }
    }

    /// Builder-style helper for attaching children in tests and seed data.
    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    /// Apply `patch`, overwriting only the fields it sets.
    pub fn apply_patch(&mut self, patch: &MenuNodePatch) {
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(expanded) = patch.is_expanded {
            self.is_expanded = expanded;
        }
    }

    /// Strip the tree-only fields for persistence.
    pub fn to_flat(&self, parent_id: Option<MenuId>, order: usize) -> MenuItemFlat {
        MenuItemFlat {
            id: self.id,
            label: self.label.clone(),
            kind: self.kind,
            url: self.url.clone(),
            target: self.target,
            source_ref: self.source_ref.clone(),
            parent_id,
            order,
            visible: self.visible,
        }
    }
}

/// Field-wise update for a `MenuNode`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuNodePatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub target: Option<LinkTarget>,
    pub visible: Option<bool>,
    pub is_expanded: Option<bool>,
}

impl MenuNodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn expanded(expanded: bool) -> Self {
        Self {
            is_expanded: Some(expanded),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Flat form ───────────────────────────────────────────────────────────

/// The persisted projection of a `MenuNode`.
///
/// `order` is authoritative here: a flat list has no positional index per
/// sibling group to infer it from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemFlat {
    pub id: MenuId,
    pub label: String,
    pub kind: MenuItemKind,
    pub url: String,
    #[serde(default)]
    pub target: LinkTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(default)]
    pub parent_id: Option<MenuId>,
    #[serde(default)]
    pub order: usize,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl MenuItemFlat {
    /// Shell node for the codec: no children, depth 0, expanded.
    pub fn to_node(&self) -> MenuNode {
        MenuNode {
            id: self.id,
            label: self.label.clone(),
            kind: self.kind,
            url: self.url.clone(),
            target: self.target,
            source_ref: self.source_ref.clone(),
            parent_id: self.parent_id,
            depth: 0,
            order: self.order,
            children: Vec::new(),
            visible: self.visible,
            is_expanded: true,
        }
    }
}

// ─── Catalog sources ─────────────────────────────────────────────────────

/// Kind of catalog entity a `SourceItem` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Page,
    Category,
    Product,
    /// A user-authored link with no catalog record behind it.
    Custom,
}

impl SourceKind {
    pub fn menu_kind(self) -> MenuItemKind {
        match self {
            Self::Page => MenuItemKind::PageReference,
            Self::Category => MenuItemKind::CategoryReference,
            Self::Product => MenuItemKind::ProductReference,
            Self::Custom => MenuItemKind::CustomLink,
        }
    }
}

/// A catalog entry (or custom link) offered for adding to a menu.
/// Read-only from the menu's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
}

/// A `SourceItem` that cannot become a menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("source item `{id}` has no name")]
    MissingName { id: String },
    #[error("source item `{name}` has no url")]
    MissingUrl { name: String },
    #[error("{kind:?} source item `{name}` has no catalog id")]
    MissingId { name: String, kind: SourceKind },
}

impl SourceItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        kind: SourceKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            kind,
        }
    }

    /// A custom link typed in by the user.
    pub fn custom(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new("", name, url, SourceKind::Custom)
    }

    /// Check the fields node creation relies on.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.name.trim().is_empty() {
            return Err(SourceError::MissingName {
                id: self.id.clone(),
            });
        }
        if self.url.trim().is_empty() {
            return Err(SourceError::MissingUrl {
                name: self.name.clone(),
            });
        }
        if self.kind != SourceKind::Custom && self.id.trim().is_empty() {
            return Err(SourceError::MissingId {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        Ok(())
    }

    /// Build a new root-level node carrying `id`.
    pub fn to_node(&self, id: MenuId) -> Result<MenuNode, SourceError> {
        self.validate()?;
        let kind = self.kind.menu_kind();
        let mut node = MenuNode::new(id, self.name.trim(), kind, self.url.trim());
        if kind.is_reference() {
            node.source_ref = Some(self.id.clone());
        }
        if self.kind == SourceKind::Custom && is_external_url(&node.url) {
            node.target = LinkTarget::NewTab;
        }
        Ok(node)
    }
}

/// Absolute http(s) URLs open in a new tab by default.
fn is_external_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// ─── Drop intents ────────────────────────────────────────────────────────

/// Structural outcome of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKind {
    /// Move next to the target at the target's level.
    Reorder,
    /// Become the last child of the target.
    Nest,
    /// Become a sibling of the current parent, right after it.
    Unnest,
}

/// A classified drop, computed per pointer move and applied once at drag end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIntent {
    pub kind: DropKind,
    /// `None` means the root list.
    pub target_parent_id: Option<MenuId>,
    /// Insertion index in the target parent's children, measured before the
    /// active node is detached.
    pub target_index: usize,
    pub projected_depth: usize,
}
