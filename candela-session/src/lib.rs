//! Candela Session
//!
//! Bookkeeping for NeRF work inside a host application. One [`Session`] owns
//! the connection to an engine build: it hands out stable item ids for the
//! engine's opaque NeRF handles, lazily constructs the engine's manager and
//! bridge views the first time something needs them, and keeps host-side
//! state (scene bindings, registered bridge properties) that the engine
//! knows nothing about.
//!
//! ## Modules
//!
//! - `session`: the registry itself and the training control surface
//! - `item`: item ids, scene keys, and the ways callers name an item
//! - `properties`: the startup-built table of bridge property bindings
//! - `error`: session-level error types

pub mod error;
pub mod item;
pub mod properties;
pub mod session;

pub use error::SessionError;
pub use item::{ItemId, ItemRef, SceneKey};
pub use properties::{PropertySpec, PropertyTable};
pub use session::{DEFAULT_IMAGE_BATCH_SIZE, REQUIRED_ENGINE_VERSION, Session};

// Re-exported for downstream convenience.
pub use candela_engine::{Engine, PropertyValue};
