//! Session-level error types.

use crate::item::{ItemId, SceneKey};
use candela_engine::{EngineError, Version};
use thiserror::Error;

/// Errors the session registry adds on top of engine failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No item with this id, either never registered or already destroyed.
    #[error("unknown NeRF item id {0}")]
    UnknownItem(ItemId),

    /// A scene key with no binding in the registry.
    #[error("scene object '{0}' is not bound to a NeRF item")]
    MissingAssociation(SceneKey),

    /// A property path nothing registered at startup.
    #[error("property '{0}' is not registered")]
    UnknownProperty(String),

    /// The linked engine build is not the one this toolkit was written for.
    #[error("engine version {found} does not match required {required}")]
    VersionMismatch { found: Version, required: Version },

    /// Engine-side failure, passed through unchanged.
    #[error("{0}")]
    Engine(#[from] EngineError),
}
