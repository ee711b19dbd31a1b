//! Registry identities and the ways callers name an item.

use std::fmt;

/// Identity of a registered NeRF item.
///
/// Assigned by the session in increasing order starting at zero and never
/// reused within a session, even after the item is destroyed. The raw form
/// is what hosts store on scene objects to point back at an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Raw integer form for host-side storage.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a host scene object.
///
/// The session never interprets it; it is only a key for bindings between
/// scene objects and items.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneKey(String);

impl SceneKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SceneKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three ways callers name a NeRF: by registry id, through a scene
/// object binding, or with the engine handle itself.
#[derive(Debug)]
pub enum ItemRef<'a, N> {
    Id(ItemId),
    Scene(&'a SceneKey),
    Handle(&'a N),
}
