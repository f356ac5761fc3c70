//! Starter menus used when nothing has been stored yet.

use crate::id::MenuId;
use crate::model::{LinkTarget, MenuItemFlat, MenuItemKind, MenuLocation};

fn item(
    id: &str,
    label: &str,
    kind: MenuItemKind,
    url: &str,
    source_ref: Option<&str>,
    parent: Option<&str>,
    order: usize,
) -> MenuItemFlat {
    MenuItemFlat {
        id: MenuId::intern(id),
        label: label.to_string(),
        kind,
        url: url.to_string(),
        target: LinkTarget::SameTab,
        source_ref: source_ref.map(str::to_string),
        parent_id: parent.map(MenuId::intern),
        order,
        visible: true,
    }
}

/// Home, Shop (with two categories), About, Contact.
pub fn default_header() -> Vec<MenuItemFlat> {
    use MenuItemKind::*;
    vec![
        item("header-home", "Home", System, "/", None, None, 0),
        item("header-shop", "Shop", PageReference, "/products", Some("page-products"), None, 1),
        item(
            "header-new-arrivals",
            "New Arrivals",
            CategoryReference,
            "/products/new-arrivals",
            Some("cat-new-arrivals"),
            Some("header-shop"),
            0,
        ),
        item(
            "header-best-sellers",
            "Best Sellers",
            CategoryReference,
            "/products/best-sellers",
            Some("cat-best-sellers"),
            Some("header-shop"),
            1,
        ),
        item("header-about", "About", PageReference, "/about", Some("page-about"), None, 2),
        item("header-contact", "Contact", PageReference, "/contact", Some("page-contact"), None, 3),
    ]
}

/// Legal and support links.
pub fn default_footer() -> Vec<MenuItemFlat> {
    use MenuItemKind::*;
    vec![
        item("footer-shipping", "Shipping & Returns", PageReference, "/shipping", Some("page-shipping"), None, 0),
        item("footer-privacy", "Privacy Policy", PageReference, "/privacy", Some("page-privacy"), None, 1),
        item("footer-terms", "Terms of Service", PageReference, "/terms", Some("page-terms"), None, 2),
        item("footer-contact", "Contact", PageReference, "/contact", Some("page-contact"), None, 3),
    ]
}

pub fn default_for(location: MenuLocation) -> Vec<MenuItemFlat> {
    match location {
        MenuLocation::Header => default_header(),
        MenuLocation::Footer => default_footer(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::flat_to_tree;
    use crate::lint::lint_tree;

    #[test]
    fn seeds_load_cleanly() {
        for location in MenuLocation::ALL {
            let tree = flat_to_tree(&default_for(location));
            assert!(!tree.is_empty());
            assert!(lint_tree(&tree).is_empty(), "{location:?} seed has lint findings");
        }
    }

    #[test]
    fn header_seed_nests_categories_under_shop() {
        let tree = flat_to_tree(&default_header());
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[1].label, "Shop");
        assert_eq!(tree[1].children.len(), 2);
    }
}
