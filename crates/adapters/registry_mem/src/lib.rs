//! # parlor-adapter-registry-mem
//!
//! In-memory implementation of the agent's [`Registry`] port. Entities,
//! areas, devices, and per-assistant exposure overrides live behind a
//! read-write lock; each snapshot clones the current state so a running
//! conversation turn never observes a mutation.
//!
//! ## Dependency rule
//!
//! Depends on `parlor-agent` (port traits) and `parlor-domain` only.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use parlor_agent::ports::Registry;
use parlor_domain::area::Area;
use parlor_domain::device::Device;
use parlor_domain::entity::Entity;
use parlor_domain::error::RegistryError;
use parlor_domain::registry::RegistrySnapshot;
use parlor_domain::state::EntityState;
use parlor_domain::time;

#[derive(Debug, Default)]
struct Inner {
    entities: Vec<Entity>,
    areas: Vec<Area>,
    devices: Vec<Device>,
    /// `assistant -> entity_id -> exposed` overrides.
    overrides: HashMap<String, HashMap<String, bool>>,
}

/// In-memory registry, cheap to populate in tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: RwLock<Inner>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&self, entity: Entity) {
        self.write().entities.push(entity);
    }

    pub fn add_area(&self, area: Area) {
        self.write().areas.push(area);
    }

    pub fn add_device(&self, device: Device) {
        self.write().devices.push(device);
    }

    /// Set or replace the per-assistant exposure override for one entity.
    pub fn set_exposed(&self, assistant: &str, entity_id: &str, exposed: bool) {
        self.write()
            .overrides
            .entry(assistant.to_owned())
            .or_default()
            .insert(entity_id.to_owned(), exposed);
    }

    /// Update the state of the entity with the given `entity_id`, if it
    /// exists. Returns whether an entity was found.
    pub fn set_state(&self, entity_id: &str, state: EntityState) -> bool {
        let mut inner = self.write();
        match inner
            .entities
            .iter_mut()
            .find(|entity| entity.entity_id == entity_id)
        {
            Some(entity) => {
                entity.update_state(state, time::now());
                true
            }
            None => false,
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Registry for InMemoryRegistry {
    async fn snapshot(&self, assistant: &str) -> Result<RegistrySnapshot, RegistryError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(RegistrySnapshot::new(
            inner.entities.clone(),
            inner.areas.clone(),
            inner.devices.clone(),
            inner.overrides.get(assistant).cloned().unwrap_or_default(),
        ))
    }
}
