//! The sim engine build.

use crate::bridge::SimBridge;
use crate::dataset::SimDataset;
use crate::manager::{SimManager, SimNerf};
use crate::state::SimState;
use candela_engine::{Engine, EngineError, RuntimeCheck, Version};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Version the sim engine reports.
pub const SIM_ENGINE_VERSION: Version = Version::new(0, 0, 13);

/// In-memory engine build.
///
/// Manager and bridge views handed out by this engine share one state table,
/// so training observed through the bridge is what the manager serializes.
/// The engine also counts how often each view was constructed and how often
/// the runtime was probed, which caching tests assert on.
#[derive(Debug)]
pub struct SimEngine {
    state: Arc<Mutex<SimState>>,
    version: Version,
    device_available: bool,
    runtime_checks: usize,
    managers_built: usize,
    bridges_built: usize,
}

impl SimEngine {
    pub fn new() -> Self {
        Self::with_version(SIM_ENGINE_VERSION)
    }

    /// A build reporting an arbitrary version, for compatibility tests.
    pub fn with_version(version: Version) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new())),
            version,
            device_available: true,
            runtime_checks: 0,
            managers_built: 0,
            bridges_built: 0,
        }
    }

    /// A build whose runtime probe finds no usable device.
    pub fn without_device() -> Self {
        Self {
            device_available: false,
            ..Self::new()
        }
    }

    /// How often the runtime was probed.
    pub fn runtime_checks(&self) -> usize {
        self.runtime_checks
    }

    /// How often a manager view was constructed.
    pub fn managers_built(&self) -> usize {
        self.managers_built
    }

    /// How often a bridge view was constructed.
    pub fn bridges_built(&self) -> usize {
        self.bridges_built
    }
}

impl Default for SimEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for SimEngine {
    type Nerf = SimNerf;
    type Dataset = SimDataset;
    type Manager = SimManager;
    type Bridge = SimBridge;

    fn version(&self) -> Version {
        self.version
    }

    fn check_runtime(&mut self) -> RuntimeCheck {
        self.runtime_checks += 1;
        if self.device_available {
            info!("sim runtime probe: virtual adapter ready");
            RuntimeCheck::supported("candela sim adapter")
        } else {
            RuntimeCheck::unsupported("no compatible device in this build")
        }
    }

    fn manager(&mut self) -> Result<SimManager, EngineError> {
        self.managers_built += 1;
        Ok(SimManager::new(Arc::clone(&self.state)))
    }

    fn bridge(&mut self) -> Result<SimBridge, EngineError> {
        self.bridges_built += 1;
        Ok(SimBridge::new(Arc::clone(&self.state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_engine::{NerfManager as _, TrainingBridge as _};

    #[test]
    fn test_views_share_state() {
        let mut engine = SimEngine::new();
        let mut manager = engine.manager().unwrap();
        let mut bridge = engine.bridge().unwrap();

        let nerf = manager.create().unwrap();
        bridge.load_training_images(&nerf, 256).unwrap();
        bridge.start_training();
        bridge.tick(30);

        // Progress driven through the bridge lands in the manager's record.
        assert_eq!(manager.nerf_step(&nerf), Some(30));
    }

    #[test]
    fn test_construction_counters() {
        let mut engine = SimEngine::new();
        assert_eq!(engine.managers_built(), 0);

        let _ = engine.manager().unwrap();
        let _ = engine.manager().unwrap();
        let _ = engine.bridge().unwrap();
        let _ = engine.check_runtime();

        assert_eq!(engine.managers_built(), 2);
        assert_eq!(engine.bridges_built(), 1);
        assert_eq!(engine.runtime_checks(), 1);
    }

    #[test]
    fn test_runtime_probe_reports_device_state() {
        let mut with_device = SimEngine::new();
        let check = with_device.check_runtime();
        assert!(check.supported);
        assert!(check.device.is_some());

        let mut without = SimEngine::without_device();
        let check = without.check_runtime();
        assert!(!check.supported);
        assert!(check.detail.is_some());
    }

    #[test]
    fn test_reported_version() {
        let engine = SimEngine::new();
        assert_eq!(engine.version(), SIM_ENGINE_VERSION);

        let engine = SimEngine::with_version(Version::new(0, 0, 9));
        assert_eq!(engine.version(), Version::new(0, 0, 9));
    }
}
