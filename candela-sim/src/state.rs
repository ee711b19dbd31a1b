//! State shared between the sim engine's manager and bridge views.

use crate::bridge::BridgeCommand;
use candela_engine::PropertyValue;
use std::collections::{BTreeMap, HashMap};

/// Per-NeRF state the sim tracks.
#[derive(Debug, Clone, Default)]
pub(crate) struct NerfState {
    pub(crate) frames: usize,
    pub(crate) camera_extent: f32,
    /// Training progress recorded for this NeRF, kept in sync with the
    /// global step counter while its images are staged.
    pub(crate) step: u32,
}

/// Everything one sim engine build tracks.
///
/// A native engine keeps the equivalent on its own heap where manager and
/// bridge handles both reach it. The sim puts it behind one lock so its
/// views observe each other the same way: training state read through the
/// bridge matches what the manager serializes into snapshots.
#[derive(Debug)]
pub(crate) struct SimState {
    pub(crate) next_slot: u64,
    pub(crate) nerfs: HashMap<u64, NerfState>,
    pub(crate) training: bool,
    pub(crate) step: u32,
    pub(crate) images_loaded: bool,
    /// Slot whose images are currently staged.
    pub(crate) active: Option<u64>,
    pub(crate) last_batch_size: Option<usize>,
    pub(crate) commands: Vec<BridgeCommand>,
    pub(crate) objects: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

impl SimState {
    pub(crate) fn new() -> Self {
        // The trainer sub-object ships with the build; other objects only
        // exist if a caller inserts them.
        let mut trainer = BTreeMap::new();
        trainer.insert("step_limit".to_string(), PropertyValue::Int(100_000));
        trainer.insert("shuffle".to_string(), PropertyValue::Bool(true));
        let mut objects = BTreeMap::new();
        objects.insert("trainer".to_string(), trainer);

        Self {
            next_slot: 0,
            nerfs: HashMap::new(),
            training: false,
            step: 0,
            images_loaded: false,
            active: None,
            last_batch_size: None,
            commands: Vec::new(),
            objects,
        }
    }
}
