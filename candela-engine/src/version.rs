//! Engine build version identification.

use std::fmt;

/// A `major.minor.patch` engine build version.
///
/// Compatibility between this toolkit and an engine build is exact equality
/// of the triple. There are no range semantics at this layer; the engine's
/// ABI moves too fast for anything looser to be honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
