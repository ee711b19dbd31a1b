//! Error types engines report through the capability surface.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised on the engine side of the surface.
///
/// The session layer forwards these unmodified; it never retries or
/// rewraps. Anything the engine cannot express with the structured variants
/// travels as [`EngineError::Runtime`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A dataset path could not be opened or its contents parsed.
    #[error("failed to load dataset {}: {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    /// A snapshot file could not be read back into a NeRF.
    #[error("failed to read snapshot {}: {reason}", path.display())]
    SnapshotLoad { path: PathBuf, reason: String },

    /// A NeRF could not be serialized to the given path.
    #[error("failed to write snapshot {}: {reason}", path.display())]
    SnapshotSave { path: PathBuf, reason: String },

    /// The engine rejected an operation (unknown handle, device fault, ...).
    #[error("engine runtime error: {0}")]
    Runtime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
