//! Candela Sim Engine
//!
//! An in-memory implementation of the `candela-engine` contract. Handles are
//! slots in a shared state table, datasets are shallow `transforms.json`
//! reads, and training is a step counter the caller advances explicitly with
//! [`SimBridge::tick`]. No GPU, no network, no real reconstruction.
//!
//! The point is observability: the engine counts how often each view was
//! constructed, the bridge keeps a log of every command it received, and the
//! manager exposes the recorded state of each NeRF. Session-level tests
//! assert against those.
//!
//! ## Example
//!
//! ```ignore
//! let mut engine = SimEngine::new();
//! let mut manager = engine.manager()?;
//! let nerf = manager.create()?;
//! let mut bridge = engine.bridge()?;
//! bridge.load_training_images(&nerf, 1 << 21)?;
//! bridge.start_training();
//! bridge.tick(100);
//! assert_eq!(bridge.training_step(), 100);
//! ```

mod bridge;
mod dataset;
mod engine;
mod manager;
mod state;

pub use bridge::{BridgeCommand, SimBridge};
pub use dataset::{FrameMeta, SimDataset};
pub use engine::{SIM_ENGINE_VERSION, SimEngine};
pub use manager::{SimManager, SimNerf};
