//! Candela Engine Surface
//!
//! The narrow surface the rest of the workspace uses to talk to a NeRF
//! engine. The engine itself is external: dataset parsing, GPU training and
//! rendering all happen on the other side of these traits. This crate only
//! pins down the contract. Handle types stay opaque associated types, and
//! every hard operation is a trait method an engine build implements.
//!
//! ## Modules
//!
//! - [`traits`]: the `Engine` / `NerfManager` / `Dataset` / `TrainingBridge` contract
//! - [`error`]: errors engines report through the surface
//! - [`version`]: engine build version identification
//! - [`runtime`]: the one-shot runtime capability check result
//! - [`value`]: loosely-typed values for the bridge's named sub-objects

pub mod error;
pub mod runtime;
pub mod traits;
pub mod value;
pub mod version;

pub use error::EngineError;
pub use runtime::RuntimeCheck;
pub use traits::{Dataset, Engine, NerfManager, TrainingBridge};
pub use value::PropertyValue;
pub use version::Version;
