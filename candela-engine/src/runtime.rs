//! Runtime capability probing.

/// Outcome of the engine's environment check.
///
/// Probing may initialize devices on the engine side, so callers are
/// expected to run it once and cache the value. An unsupported runtime is a
/// report, not an error: the toolkit keeps working in a degraded mode and
/// surfaces `detail` to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeCheck {
    /// Whether the engine can run on this machine.
    pub supported: bool,
    /// Device the engine selected, when one was found.
    pub device: Option<String>,
    /// Human-readable detail: driver problems, missing capabilities.
    pub detail: Option<String>,
}

impl RuntimeCheck {
    /// A passing check on the named device.
    pub fn supported(device: impl Into<String>) -> Self {
        Self {
            supported: true,
            device: Some(device.into()),
            detail: None,
        }
    }

    /// A failing check with an explanation.
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self {
            supported: false,
            device: None,
            detail: Some(detail.into()),
        }
    }
}
