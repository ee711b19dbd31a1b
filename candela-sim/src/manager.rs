//! Factory and serialization view of the sim engine.

use crate::dataset::SimDataset;
use crate::engine::SIM_ENGINE_VERSION;
use crate::state::{NerfState, SimState};
use candela_engine::{Dataset as _, EngineError, NerfManager};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Opaque NeRF handle: a slot in the sim's state table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimNerf {
    slot: u64,
}

impl SimNerf {
    #[cfg(test)]
    pub(crate) fn from_slot(slot: u64) -> Self {
        Self { slot }
    }

    /// Raw slot index, mostly for assertions.
    pub fn slot(&self) -> u64 {
        self.slot
    }
}

/// On-disk form of a sim snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    engine_version: String,
    step: u32,
    frames: usize,
    camera_extent: f32,
}

/// Creates, duplicates, destroys and serializes NeRFs.
#[derive(Debug)]
pub struct SimManager {
    state: Arc<Mutex<SimState>>,
}

impl SimManager {
    pub(crate) fn new(state: Arc<Mutex<SimState>>) -> Self {
        Self { state }
    }

    fn unknown(slot: u64) -> EngineError {
        EngineError::Runtime(format!("unknown NeRF handle (slot {slot})"))
    }

    /// Number of NeRFs currently alive engine-side.
    pub fn live_nerfs(&self) -> usize {
        self.state.lock().expect("sim state lock").nerfs.len()
    }

    /// Training step recorded for a handle, `None` for released handles.
    pub fn nerf_step(&self, nerf: &SimNerf) -> Option<u32> {
        let state = self.state.lock().expect("sim state lock");
        state.nerfs.get(&nerf.slot).map(|n| n.step)
    }

    /// Frame count recorded for a handle, `None` for released handles.
    pub fn nerf_frames(&self, nerf: &SimNerf) -> Option<usize> {
        let state = self.state.lock().expect("sim state lock");
        state.nerfs.get(&nerf.slot).map(|n| n.frames)
    }
}

impl NerfManager for SimManager {
    type Nerf = SimNerf;
    type Dataset = SimDataset;

    fn create(&mut self) -> Result<SimNerf, EngineError> {
        let mut state = self.state.lock().expect("sim state lock");
        let slot = state.next_slot;
        state.next_slot += 1;
        state.nerfs.insert(slot, NerfState::default());
        debug!(slot, "created NeRF");
        Ok(SimNerf { slot })
    }

    fn duplicate(&mut self, nerf: &SimNerf) -> Result<SimNerf, EngineError> {
        let mut state = self.state.lock().expect("sim state lock");
        let copied = state
            .nerfs
            .get(&nerf.slot)
            .cloned()
            .ok_or_else(|| Self::unknown(nerf.slot))?;
        let slot = state.next_slot;
        state.next_slot += 1;
        state.nerfs.insert(slot, copied);
        debug!(source = nerf.slot, slot, "duplicated NeRF");
        Ok(SimNerf { slot })
    }

    fn destroy(&mut self, nerf: SimNerf) -> Result<(), EngineError> {
        let mut state = self.state.lock().expect("sim state lock");
        state
            .nerfs
            .remove(&nerf.slot)
            .ok_or_else(|| Self::unknown(nerf.slot))?;
        if state.active == Some(nerf.slot) {
            state.active = None;
            state.images_loaded = false;
        }
        debug!(slot = nerf.slot, "destroyed NeRF");
        Ok(())
    }

    fn open_dataset(&mut self, path: &Path) -> Result<SimDataset, EngineError> {
        Ok(SimDataset::open(path))
    }

    fn attach_dataset(
        &mut self,
        nerf: &SimNerf,
        dataset: SimDataset,
    ) -> Result<(), EngineError> {
        let frames = dataset.frame_count();
        let camera_extent = dataset.camera_extent();
        let mut state = self.state.lock().expect("sim state lock");
        let entry = state
            .nerfs
            .get_mut(&nerf.slot)
            .ok_or_else(|| Self::unknown(nerf.slot))?;
        entry.frames = frames;
        entry.camera_extent = camera_extent;
        debug!(slot = nerf.slot, frames, camera_extent, "attached dataset");
        Ok(())
    }

    fn load_snapshot(&mut self, path: &Path) -> Result<SimNerf, EngineError> {
        let raw = fs::read_to_string(path).map_err(|e| EngineError::SnapshotLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: SnapshotFile =
            serde_json::from_str(&raw).map_err(|e| EngineError::SnapshotLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if file.engine_version != SIM_ENGINE_VERSION.to_string() {
            warn!(
                found = %file.engine_version,
                "snapshot was written by a different engine build"
            );
        }

        let mut state = self.state.lock().expect("sim state lock");
        let slot = state.next_slot;
        state.next_slot += 1;
        state.nerfs.insert(
            slot,
            NerfState {
                frames: file.frames,
                camera_extent: file.camera_extent,
                step: file.step,
            },
        );
        debug!(slot, step = file.step, "restored snapshot");
        Ok(SimNerf { slot })
    }

    fn save_snapshot(&mut self, nerf: &SimNerf, path: &Path) -> Result<(), EngineError> {
        let file = {
            let state = self.state.lock().expect("sim state lock");
            let entry = state
                .nerfs
                .get(&nerf.slot)
                .ok_or_else(|| Self::unknown(nerf.slot))?;
            SnapshotFile {
                engine_version: SIM_ENGINE_VERSION.to_string(),
                step: entry.step,
                frames: entry.frames,
                camera_extent: entry.camera_extent,
            }
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| EngineError::SnapshotSave {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| EngineError::SnapshotSave {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(slot = nerf.slot, step = file.step, "saved snapshot");
        Ok(())
    }
}
