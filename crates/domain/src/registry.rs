//! Registry snapshot — a read-only view over entities, areas, and devices.
//!
//! The conversation engine resolves targets against one snapshot per request,
//! so every filter stage of a single turn observes the same registry state.
//! Snapshots are produced by a registry adapter and never mutated here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::device::Device;
use crate::entity::Entity;
use crate::id::{AreaId, DeviceId};

/// Domains whose entities are exposed to the conversation engine unless an
/// explicit per-entity override says otherwise.
pub const DEFAULT_EXPOSED_DOMAINS: &[&str] = &[
    "binary_sensor",
    "climate",
    "cover",
    "fan",
    "humidifier",
    "light",
    "lock",
    "scene",
    "script",
    "sensor",
    "switch",
    "vacuum",
    "water_heater",
];

/// Lowercase a name and drop a leading article so that "The Kitchen",
/// "the kitchen", and "kitchen" all compare equal.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_prefix("the ") {
        Some(rest) => rest.to_owned(),
        None => lowered,
    }
}

/// Read-only snapshot of the registry as of one conversation turn.
///
/// Entity order is the registry's iteration order and is preserved through
/// resolution, so repeated turns against an unchanged registry produce
/// identical results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    entities: Vec<Entity>,
    areas: Vec<Area>,
    devices: HashMap<DeviceId, Device>,
    /// Per-entity exposure overrides for the requesting assistant,
    /// keyed by `entity_id`.
    exposure_overrides: HashMap<String, bool>,
}

impl RegistrySnapshot {
    #[must_use]
    pub fn new(
        entities: Vec<Entity>,
        areas: Vec<Area>,
        devices: Vec<Device>,
        exposure_overrides: HashMap<String, bool>,
    ) -> Self {
        Self {
            entities,
            areas,
            devices: devices.into_iter().map(|device| (device.id, device)).collect(),
            exposure_overrides,
        }
    }

    /// All entities, in registry iteration order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All areas.
    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Point lookup of a device.
    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    /// Point lookup of an area.
    #[must_use]
    pub fn area_by_id(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    /// Find the area a name or alias refers to.
    #[must_use]
    pub fn find_area(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.matches_name(name))
    }

    /// The area an entity belongs to, either directly or through its
    /// owning device.
    #[must_use]
    pub fn area_of_entity(&self, entity: &Entity) -> Option<AreaId> {
        entity.area_id.or_else(|| {
            entity
                .device_id
                .and_then(|device_id| self.device(device_id))
                .and_then(|device| device.area_id)
        })
    }

    /// Compute the effective `should_expose` flag for an entity: the explicit
    /// override when one exists, otherwise whether the entity's domain is in
    /// `default_domains`.
    #[must_use]
    pub fn should_expose(&self, entity: &Entity, default_domains: &[String]) -> bool {
        self.exposure_overrides
            .get(&entity.entity_id)
            .copied()
            .unwrap_or_else(|| default_domains.iter().any(|domain| domain == entity.domain()))
    }
}
