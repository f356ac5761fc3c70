use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for menu item IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Counter behind generated IDs. Shared by all prefixes.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// An interned identifier for a menu item.
/// Internally a `Spur` index: 4 bytes, Copy, Eq and Hash in O(1).
///
/// Serializes as the plain string, so persisted menus stay readable JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(Spur);

impl MenuId {
    /// Intern a string as a MenuId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        MenuId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate an ID with a prefix (e.g. `menu_4`).
    ///
    /// Not collision-free against IDs that were loaded from storage;
    /// use [`MenuId::unique`] when inserting into an existing tree.
    pub fn with_prefix(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// Generate a prefixed ID that `is_taken` does not claim.
    pub fn unique(prefix: &str, is_taken: impl Fn(MenuId) -> bool) -> Self {
        loop {
            let id = Self::with_prefix(prefix);
            if !is_taken(id) {
                return id;
            }
            log::trace!("generated id {} already taken, retrying", id.as_str());
        }
    }
}

impl fmt::Debug for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MenuId {
    fn from(s: &str) -> Self {
        MenuId::intern(s)
    }
}

impl Serialize for MenuId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MenuId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(MenuId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = MenuId::intern("nav-home");
        let b = MenuId::intern("nav-home");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "nav-home");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = MenuId::with_prefix("menu");
        let b = MenuId::with_prefix("menu");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("menu_"));
    }

    #[test]
    fn unique_skips_taken_ids() {
        let first = MenuId::with_prefix("skip");
        // Everything up to and including the next two counter values is taken.
        let next: u64 = first.as_str()["skip_".len()..].parse().unwrap();
        let taken = |id: MenuId| {
            id.as_str()["skip_".len()..]
                .parse::<u64>()
                .is_ok_and(|n| n <= next + 2)
        };
        let id = MenuId::unique("skip", taken);
        assert!(!taken(id));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = MenuId::intern("footer-about");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"footer-about\"");
        let back: MenuId = serde_json::from_str("\"footer-about\"").unwrap();
        assert_eq!(back, id);
    }
}
