//! The session registry and training control surface.

use crate::error::SessionError;
use crate::item::{ItemId, ItemRef, SceneKey};
use crate::properties::{PropertySpec, PropertyTable};
use candela_engine::{
    Dataset, Engine, NerfManager, PropertyValue, RuntimeCheck, TrainingBridge, Version,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Engine build this toolkit is written against.
pub const REQUIRED_ENGINE_VERSION: Version = Version::new(0, 0, 13);

/// Batch size handed to the bridge when staging training images.
pub const DEFAULT_IMAGE_BATCH_SIZE: usize = 2 << 20;

/// Registry of NeRF items and owner of the shared engine views.
///
/// A session wraps one injected engine build. Items map monotonically
/// increasing ids to the engine's opaque NeRF handles; destroyed ids are
/// never reused, so anything a host stored stays unambiguous. The engine's
/// manager and bridge views and the runtime probe result are constructed
/// once, on first use.
///
/// Single-threaded by design: the host drives it from one thread and any
/// blocking happens inside the engine.
pub struct Session<E: Engine> {
    engine: E,
    manager: Option<E::Manager>,
    bridge: Option<E::Bridge>,
    runtime_check: Option<RuntimeCheck>,
    items: BTreeMap<ItemId, E::Nerf>,
    next_id: u64,
    bindings: BTreeMap<SceneKey, ItemId>,
    properties: PropertyTable,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            manager: None,
            bridge: None,
            runtime_check: None,
            items: BTreeMap::new(),
            next_id: 0,
            bindings: BTreeMap::new(),
            properties: PropertyTable::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The engine's manager view, constructed on first use.
    pub fn manager(&mut self) -> Result<&mut E::Manager, SessionError> {
        if self.manager.is_none() {
            debug!("constructing engine manager");
            self.manager = Some(self.engine.manager()?);
        }
        Ok(self.manager.as_mut().expect("manager cached above"))
    }

    /// The engine's training bridge, constructed on first use.
    pub fn bridge(&mut self) -> Result<&mut E::Bridge, SessionError> {
        if self.bridge.is_none() {
            debug!("constructing engine bridge");
            self.bridge = Some(self.engine.bridge()?);
        }
        Ok(self.bridge.as_mut().expect("bridge cached above"))
    }

    /// Whether the engine can run here. Probed once, then cached; a session
    /// outlives neither a driver upgrade nor a GPU hotplug, so a stale
    /// answer is not worth re-probing for.
    pub fn check_runtime(&mut self) -> &RuntimeCheck {
        if self.runtime_check.is_none() {
            let check = self.engine.check_runtime();
            info!(supported = check.supported, "engine runtime probed");
            self.runtime_check = Some(check);
        }
        self.runtime_check.as_ref().expect("runtime check cached above")
    }

    pub fn engine_version(&self) -> Version {
        self.engine.version()
    }

    pub fn is_engine_compatible(&self) -> bool {
        self.engine.version() == REQUIRED_ENGINE_VERSION
    }

    /// Exact-match version gate for operations that talk to the engine.
    pub fn require_compatible(&self) -> Result<(), SessionError> {
        let found = self.engine.version();
        if found == REQUIRED_ENGINE_VERSION {
            Ok(())
        } else {
            Err(SessionError::VersionMismatch {
                found,
                required: REQUIRED_ENGINE_VERSION,
            })
        }
    }

    /// Register an engine handle under the next id.
    pub fn add_item(&mut self, nerf: E::Nerf) -> ItemId {
        let id = ItemId::from(self.next_id);
        self.next_id += 1;
        self.items.insert(id, nerf);
        debug!(%id, "registered NeRF item");
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Live ids in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn item(&self, id: ItemId) -> Result<&E::Nerf, SessionError> {
        self.items.get(&id).ok_or(SessionError::UnknownItem(id))
    }

    /// Handles of all live items, in id order.
    pub fn nerfs(&self) -> Vec<E::Nerf> {
        self.items.values().cloned().collect()
    }

    /// Resolve any way of naming an item to its engine handle.
    pub fn resolve<'a>(&'a self, item: ItemRef<'a, E::Nerf>) -> Result<&'a E::Nerf, SessionError> {
        match item {
            ItemRef::Id(id) => self.items.get(&id).ok_or(SessionError::UnknownItem(id)),
            ItemRef::Scene(key) => {
                let id = self
                    .bindings
                    .get(key)
                    .copied()
                    .ok_or_else(|| SessionError::MissingAssociation(key.clone()))?;
                self.items.get(&id).ok_or(SessionError::UnknownItem(id))
            }
            ItemRef::Handle(nerf) => Ok(nerf),
        }
    }

    /// Import a dataset from disk: open it, read its transforms, create a
    /// NeRF, attach the dataset, and register the result. Nothing is
    /// registered when any step fails, so no id is consumed.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn import_dataset(&mut self, path: &Path) -> Result<ItemId, SessionError> {
        let manager = self.manager()?;
        let mut dataset = manager.open_dataset(path)?;
        dataset.load_transforms()?;
        let frames = dataset.frame_count();
        let nerf = manager.create()?;
        manager.attach_dataset(&nerf, dataset)?;
        let id = self.add_item(nerf);
        info!(%id, frames, "imported dataset");
        Ok(id)
    }

    /// Register a duplicate of an existing handle as a new item.
    pub fn clone_item(&mut self, nerf: &E::Nerf) -> Result<ItemId, SessionError> {
        let duplicate = self.manager()?.duplicate(nerf)?;
        let id = self.add_item(duplicate);
        info!(%id, "cloned NeRF item");
        Ok(id)
    }

    /// Release an item's engine resources and drop it from the registry.
    /// Scene bindings pointing at it are removed; its id is never reused.
    pub fn destroy(&mut self, id: ItemId) -> Result<(), SessionError> {
        let nerf = self
            .items
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownItem(id))?;
        self.manager()?.destroy(nerf)?;
        self.items.remove(&id);
        self.bindings.retain(|_, bound| *bound != id);
        info!(%id, "destroyed NeRF item");
        Ok(())
    }

    /// Restore a NeRF from a snapshot file and register it as a new item.
    /// The path is absolutized first so the engine never resolves it against
    /// its own working directory.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load_snapshot(&mut self, path: &Path) -> Result<ItemId, SessionError> {
        let path = std::path::absolute(path).map_err(candela_engine::EngineError::Io)?;
        let nerf = self.manager()?.load_snapshot(&path)?;
        let id = self.add_item(nerf);
        info!(%id, "loaded snapshot");
        Ok(id)
    }

    /// Serialize an item to a snapshot file. The id is checked before the
    /// engine is asked to do anything, so an unknown id writes nothing.
    #[tracing::instrument(skip_all, fields(%id, path = %path.display()))]
    pub fn save_snapshot(&mut self, id: ItemId, path: &Path) -> Result<(), SessionError> {
        let nerf = self
            .items
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownItem(id))?;
        let path = std::path::absolute(path).map_err(candela_engine::EngineError::Io)?;
        self.manager()?.save_snapshot(&nerf, &path)?;
        info!(%id, "saved snapshot");
        Ok(())
    }

    pub fn is_training(&mut self) -> Result<bool, SessionError> {
        Ok(self.bridge()?.is_training())
    }

    pub fn training_step(&mut self) -> Result<u32, SessionError> {
        Ok(self.bridge()?.training_step())
    }

    pub fn is_ready_to_train(&mut self) -> Result<bool, SessionError> {
        Ok(self.bridge()?.is_ready_to_train())
    }

    pub fn is_image_data_loaded(&mut self) -> Result<bool, SessionError> {
        Ok(self.bridge()?.is_image_data_loaded())
    }

    /// Whether staging training images makes sense right now: something is
    /// registered and images are not already staged.
    ///
    /// TODO: ask the engine instead once the bridge grows a capability probe.
    pub fn can_load_images(&mut self) -> Result<bool, SessionError> {
        if self.items.is_empty() {
            return Ok(false);
        }
        Ok(!self.is_image_data_loaded()?)
    }

    /// Stage an item's training images on the bridge with the default
    /// batch size.
    pub fn load_training_images(
        &mut self,
        item: ItemRef<'_, E::Nerf>,
    ) -> Result<(), SessionError> {
        let nerf = self.resolve(item)?.clone();
        self.bridge()?
            .load_training_images(&nerf, DEFAULT_IMAGE_BATCH_SIZE)?;
        Ok(())
    }

    pub fn unload_training_images(&mut self) -> Result<(), SessionError> {
        self.bridge()?.unload_training_images();
        Ok(())
    }

    pub fn start_training(&mut self) -> Result<(), SessionError> {
        self.bridge()?.start_training();
        Ok(())
    }

    pub fn stop_training(&mut self) -> Result<(), SessionError> {
        self.bridge()?.stop_training();
        Ok(())
    }

    /// Start or stop based on the observed state, whichever applies.
    pub fn toggle_training(&mut self) -> Result<(), SessionError> {
        if self.is_training()? {
            self.stop_training()
        } else {
            self.start_training()
        }
    }

    /// Zero the optimizer's progress. Whether training is running is left
    /// alone; a running session keeps running from step zero.
    pub fn reset_training(&mut self) -> Result<(), SessionError> {
        self.bridge()?.reset_training();
        Ok(())
    }

    /// Make a bridge property reachable through [`Session::bridge_property`].
    pub fn register_property(&mut self, spec: PropertySpec) {
        debug!(path = %spec.path(), "registered bridge property");
        self.properties.register(spec);
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Read a registered property from the bridge. Falls back to the
    /// registered default when the engine build lacks the sub-object or the
    /// property, so UI reads never fail against older builds.
    pub fn bridge_property(&mut self, path: &str) -> Result<PropertyValue, SessionError> {
        let spec = self
            .properties
            .spec(path)
            .ok_or_else(|| SessionError::UnknownProperty(path.to_string()))?;
        let object = spec.object().to_string();
        let property = spec.property().to_string();
        let default = spec.default_value().clone();

        let bridge = self.bridge()?;
        Ok(bridge.read_property(&object, &property).unwrap_or(default))
    }

    /// Write a registered property to the bridge. A build without the
    /// sub-object drops the write silently, mirroring the read fallback.
    pub fn set_bridge_property(
        &mut self,
        path: &str,
        value: PropertyValue,
    ) -> Result<(), SessionError> {
        let spec = self
            .properties
            .spec(path)
            .ok_or_else(|| SessionError::UnknownProperty(path.to_string()))?;
        let object = spec.object().to_string();
        let property = spec.property().to_string();

        let bridge = self.bridge()?;
        if !bridge.write_property(&object, &property, value) {
            debug!(path, "bridge sub-object absent, write dropped");
        }
        Ok(())
    }

    /// Point a scene object at an item. The item must be live; a later
    /// destroy removes the binding again.
    pub fn bind_scene(&mut self, key: impl Into<SceneKey>, id: ItemId) -> Result<(), SessionError> {
        if !self.items.contains_key(&id) {
            return Err(SessionError::UnknownItem(id));
        }
        let key = key.into();
        debug!(%key, %id, "bound scene object");
        self.bindings.insert(key, id);
        Ok(())
    }

    /// Remove a scene binding, returning the id it pointed at.
    pub fn unbind_scene(&mut self, key: &SceneKey) -> Option<ItemId> {
        self.bindings.remove(key)
    }

    pub fn scene_binding(&self, key: &SceneKey) -> Option<ItemId> {
        self.bindings.get(key).copied()
    }
}
