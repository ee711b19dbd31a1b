//! The engine capability contract.
//!
//! An engine build implements these traits; everything above them treats
//! NeRFs, datasets and snapshots as opaque. `candela-sim` carries the
//! in-repo reference implementation; a native build wraps its FFI surface
//! in the same shape.

use crate::error::EngineError;
use crate::runtime::RuntimeCheck;
use crate::value::PropertyValue;
use crate::version::Version;
use std::path::Path;

/// Entry point to an engine build.
///
/// One value of the implementing type stands for the linked engine; the
/// session layer constructs its manager and bridge through it lazily and
/// keeps each for the life of the session.
pub trait Engine {
    /// Opaque NeRF handle. Cloning duplicates the handle, never the model.
    type Nerf: Clone;
    /// Opaque dataset handle.
    type Dataset: Dataset;
    /// Factory and serialization surface.
    type Manager: NerfManager<Nerf = Self::Nerf, Dataset = Self::Dataset>;
    /// Training and status mediator.
    type Bridge: TrainingBridge<Nerf = Self::Nerf>;

    /// Version string of the linked engine build.
    fn version(&self) -> Version;

    /// Probe the environment (device discovery, driver checks).
    ///
    /// May initialize devices as a side effect; callers cache the result
    /// and do not probe twice.
    fn check_runtime(&mut self) -> RuntimeCheck;

    /// Construct the factory/serialization surface.
    fn manager(&mut self) -> Result<Self::Manager, EngineError>;

    /// Construct the training mediator.
    fn bridge(&mut self) -> Result<Self::Bridge, EngineError>;
}

/// Factory and serialization operations on NeRFs.
pub trait NerfManager {
    type Nerf;
    type Dataset;

    /// Create an empty NeRF.
    fn create(&mut self) -> Result<Self::Nerf, EngineError>;

    /// Duplicate a NeRF's internal state into a fresh handle.
    fn duplicate(&mut self, nerf: &Self::Nerf) -> Result<Self::Nerf, EngineError>;

    /// Release a NeRF and everything it owns engine-side.
    fn destroy(&mut self, nerf: Self::Nerf) -> Result<(), EngineError>;

    /// Open a dataset at a filesystem path.
    ///
    /// Opening is cheap and does no parsing; call
    /// [`Dataset::load_transforms`] before attaching.
    fn open_dataset(&mut self, path: &Path) -> Result<Self::Dataset, EngineError>;

    /// Bind a loaded dataset to a NeRF as its training input.
    fn attach_dataset(
        &mut self,
        nerf: &Self::Nerf,
        dataset: Self::Dataset,
    ) -> Result<(), EngineError>;

    /// Deserialize a NeRF from a snapshot file.
    fn load_snapshot(&mut self, path: &Path) -> Result<Self::Nerf, EngineError>;

    /// Serialize a NeRF's trained state to a snapshot file.
    fn save_snapshot(&mut self, nerf: &Self::Nerf, path: &Path) -> Result<(), EngineError>;
}

/// A dataset handle between `open` and `attach`.
pub trait Dataset {
    /// Parse the camera transform metadata backing this dataset.
    fn load_transforms(&mut self) -> Result<(), EngineError>;

    /// Number of frames described by the loaded transforms.
    fn frame_count(&self) -> usize;
}

/// Training control and status queries.
///
/// The engine owns the training state machine (idle or training); this
/// trait only observes and pokes it. Status reads may race an engine-side
/// training thread and are snapshots, not synchronized views.
pub trait TrainingBridge {
    type Nerf;

    fn is_training(&self) -> bool;

    /// Current optimization step of the active training run.
    fn training_step(&self) -> u32;

    fn is_ready_to_train(&self) -> bool;

    fn is_image_data_loaded(&self) -> bool;

    /// Stage a NeRF's training images in memory, `batch_size` rays at a time.
    fn load_training_images(
        &mut self,
        nerf: &Self::Nerf,
        batch_size: usize,
    ) -> Result<(), EngineError>;

    /// Drop staged image data.
    fn unload_training_images(&mut self);

    /// Switch to training. No-op when already training.
    fn start_training(&mut self);

    /// Switch to idle. No-op when already idle.
    fn stop_training(&mut self);

    /// Zero the step counter without leaving the current state.
    fn reset_training(&mut self);

    /// Read `object.property`; `None` when either name is absent.
    fn read_property(&self, object: &str, property: &str) -> Option<PropertyValue>;

    /// Write `object.property`; returns false (write dropped) when the
    /// sub-object is absent.
    fn write_property(&mut self, object: &str, property: &str, value: PropertyValue) -> bool;
}
