//! Training and status view of the sim engine.

use crate::manager::SimNerf;
use crate::state::SimState;
use candela_engine::{EngineError, PropertyValue, TrainingBridge};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Commands the bridge received, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    LoadImages,
    UnloadImages,
    StartTraining,
    StopTraining,
    ResetTraining,
}

/// Drives and observes the fake optimizer.
#[derive(Debug)]
pub struct SimBridge {
    state: Arc<Mutex<SimState>>,
}

impl SimBridge {
    pub(crate) fn new(state: Arc<Mutex<SimState>>) -> Self {
        Self { state }
    }

    /// Advance the optimizer. Does nothing unless training is on; the step
    /// counter saturates rather than wrapping.
    pub fn tick(&mut self, steps: u32) {
        let mut state = self.state.lock().expect("sim state lock");
        if !state.training {
            return;
        }
        state.step = state.step.saturating_add(steps);
        let step = state.step;
        if let Some(slot) = state.active {
            if let Some(entry) = state.nerfs.get_mut(&slot) {
                entry.step = step;
            }
        }
    }

    /// Every command received so far.
    pub fn commands(&self) -> Vec<BridgeCommand> {
        self.state.lock().expect("sim state lock").commands.clone()
    }

    /// Batch size of the most recent image load.
    pub fn last_batch_size(&self) -> Option<usize> {
        self.state.lock().expect("sim state lock").last_batch_size
    }

    /// Create an empty named sub-object so writes to it land.
    pub fn insert_object(&mut self, name: &str) {
        let mut state = self.state.lock().expect("sim state lock");
        state.objects.entry(name.to_string()).or_default();
    }
}

impl TrainingBridge for SimBridge {
    type Nerf = SimNerf;

    fn is_training(&self) -> bool {
        self.state.lock().expect("sim state lock").training
    }

    fn training_step(&self) -> u32 {
        self.state.lock().expect("sim state lock").step
    }

    fn is_ready_to_train(&self) -> bool {
        self.state.lock().expect("sim state lock").images_loaded
    }

    fn is_image_data_loaded(&self) -> bool {
        self.state.lock().expect("sim state lock").images_loaded
    }

    fn load_training_images(
        &mut self,
        nerf: &SimNerf,
        batch_size: usize,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock().expect("sim state lock");
        let slot = nerf.slot();
        let recorded_step = match state.nerfs.get(&slot) {
            Some(entry) => entry.step,
            None => {
                return Err(EngineError::Runtime(format!(
                    "unknown NeRF handle (slot {slot})"
                )));
            }
        };
        state.active = Some(slot);
        state.images_loaded = true;
        state.last_batch_size = Some(batch_size);
        // Staging selects which NeRF the optimizer works on, so the global
        // step picks up that NeRF's recorded progress.
        state.step = recorded_step;
        state.commands.push(BridgeCommand::LoadImages);
        debug!(slot, batch_size, "staged training images");
        Ok(())
    }

    fn unload_training_images(&mut self) {
        let mut state = self.state.lock().expect("sim state lock");
        state.images_loaded = false;
        state.active = None;
        state.last_batch_size = None;
        state.commands.push(BridgeCommand::UnloadImages);
        debug!("unloaded training images");
    }

    fn start_training(&mut self) {
        let mut state = self.state.lock().expect("sim state lock");
        state.training = true;
        state.commands.push(BridgeCommand::StartTraining);
        debug!("training started");
    }

    fn stop_training(&mut self) {
        let mut state = self.state.lock().expect("sim state lock");
        state.training = false;
        state.commands.push(BridgeCommand::StopTraining);
        debug!("training stopped");
    }

    fn reset_training(&mut self) {
        let mut state = self.state.lock().expect("sim state lock");
        state.step = 0;
        if let Some(slot) = state.active {
            if let Some(entry) = state.nerfs.get_mut(&slot) {
                entry.step = 0;
            }
        }
        state.commands.push(BridgeCommand::ResetTraining);
        debug!("training progress reset");
    }

    fn read_property(&self, object: &str, property: &str) -> Option<PropertyValue> {
        let state = self.state.lock().expect("sim state lock");
        state
            .objects
            .get(object)
            .and_then(|obj| obj.get(property))
            .cloned()
    }

    fn write_property(&mut self, object: &str, property: &str, value: PropertyValue) -> bool {
        let mut state = self.state.lock().expect("sim state lock");
        match state.objects.get_mut(object) {
            Some(obj) => {
                obj.insert(property.to_string(), value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NerfState;

    fn bridge() -> SimBridge {
        SimBridge::new(Arc::new(Mutex::new(SimState::new())))
    }

    fn bridge_with_nerf() -> (SimBridge, SimNerf) {
        let state = Arc::new(Mutex::new(SimState::new()));
        (SimBridge::new(state), SimNerf::from_slot(0))
    }

    #[test]
    fn test_tick_advances_only_while_training() {
        let mut b = bridge();
        b.tick(10);
        assert_eq!(b.training_step(), 0);

        b.start_training();
        b.tick(10);
        b.tick(5);
        assert_eq!(b.training_step(), 15);

        b.stop_training();
        b.tick(100);
        assert_eq!(b.training_step(), 15);
    }

    #[test]
    fn test_tick_saturates_instead_of_wrapping() {
        let mut b = bridge();
        b.start_training();
        b.tick(u32::MAX);
        b.tick(100);
        assert_eq!(b.training_step(), u32::MAX);
    }

    #[test]
    fn test_reset_zeroes_step_but_keeps_training_flag() {
        let mut b = bridge();
        b.start_training();
        b.tick(42);
        b.reset_training();
        assert_eq!(b.training_step(), 0);
        assert!(b.is_training());
    }

    #[test]
    fn test_command_log_preserves_order() {
        let mut b = bridge();
        b.start_training();
        b.stop_training();
        b.unload_training_images();
        assert_eq!(
            b.commands(),
            vec![
                BridgeCommand::StartTraining,
                BridgeCommand::StopTraining,
                BridgeCommand::UnloadImages,
            ]
        );
    }

    #[test]
    fn test_property_read_of_seeded_object() {
        let b = bridge();
        assert_eq!(
            b.read_property("trainer", "step_limit"),
            Some(PropertyValue::Int(100_000))
        );
        assert_eq!(b.read_property("trainer", "no_such"), None);
        assert_eq!(b.read_property("no_such", "at_all"), None);
    }

    #[test]
    fn test_property_write_requires_existing_object() {
        let mut b = bridge();
        assert!(!b.write_property("renderer", "exposure", PropertyValue::Float(2.0)));

        b.insert_object("renderer");
        assert!(b.write_property("renderer", "exposure", PropertyValue::Float(2.0)));
        assert_eq!(
            b.read_property("renderer", "exposure"),
            Some(PropertyValue::Float(2.0))
        );
    }

    #[test]
    fn test_staging_restores_recorded_step() {
        let (mut b, nerf) = bridge_with_nerf();
        {
            let mut state = b.state.lock().unwrap();
            state
                .nerfs
                .insert(nerf.slot(), NerfState { step: 500, ..Default::default() });
        }

        b.load_training_images(&nerf, 1 << 21).unwrap();
        assert_eq!(b.training_step(), 500);
        assert!(b.is_image_data_loaded());
        assert_eq!(b.last_batch_size(), Some(1 << 21));
    }

    #[test]
    fn test_staging_unknown_handle_fails() {
        let (mut b, nerf) = bridge_with_nerf();
        let err = b.load_training_images(&nerf, 64).unwrap_err();
        assert!(matches!(err, EngineError::Runtime(_)));
        assert!(!b.is_image_data_loaded());
    }
}
