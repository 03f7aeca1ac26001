//! Entity — the central addressable concept in parlor.
//!
//! An entity represents a single observable/controllable aspect of a device
//! (e.g., a light's on/off state, a temperature sensor's reading). The
//! conversation engine targets entities by friendly name, by area, or by
//! domain, and never addresses devices directly.

use serde::{Deserialize, Serialize};

use crate::error::{ParlorError, ValidationError};
use crate::id::{AreaId, DeviceId, EntityId};
use crate::state::EntityState;
use crate::time::{Timestamp, now};

/// A single addressable state holder exposed by an integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Stable string id shaped like `domain.object_id` (e.g. `light.kitchen`).
    pub entity_id: String,
    /// Human-readable name matched against `{name}` slots.
    pub friendly_name: String,
    /// Optional refinement of the domain (e.g. `motion` for a binary sensor).
    pub device_class: Option<String>,
    pub state: EntityState,
    pub device_id: Option<DeviceId>,
    pub area_id: Option<AreaId>,
    pub last_changed: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// The domain part of the entity id (`light` for `light.kitchen`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.entity_id.split_once('.').map_or("", |(domain, _)| domain)
    }

    /// The object part of the entity id (`kitchen` for `light.kitchen`).
    #[must_use]
    pub fn object_id(&self) -> &str {
        self.entity_id.split_once('.').map_or("", |(_, object)| object)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Validation`] when the entity id is not shaped
    /// like `domain.object_id` or the friendly name is empty.
    pub fn validate(&self) -> Result<(), ParlorError> {
        match self.entity_id.split_once('.') {
            Some((domain, object)) if !domain.is_empty() && !object.is_empty() => {}
            _ => return Err(ValidationError::MalformedEntityId.into()),
        }
        if self.friendly_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Record a new state, bumping `last_changed` when the state differs.
    pub fn update_state(&mut self, state: EntityState, at: Timestamp) {
        if self.state != state {
            self.state = state;
            self.last_changed = at;
        }
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    entity_id: Option<String>,
    friendly_name: Option<String>,
    device_class: Option<String>,
    state: Option<EntityState>,
    device_id: Option<DeviceId>,
    area_id: Option<AreaId>,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class = Some(device_class.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: AreaId) -> Self {
        self.area_id = Some(area_id);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// When no friendly name is given, one is derived from the object part of
    /// the entity id with underscores turned into spaces (`light.kitchen_spot`
    /// becomes `kitchen spot`).
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Validation`] if the entity id is malformed.
    pub fn build(self) -> Result<Entity, ParlorError> {
        let entity_id = self.entity_id.unwrap_or_default();
        let friendly_name = self.friendly_name.unwrap_or_else(|| {
            entity_id
                .split_once('.')
                .map(|(_, object)| object.replace('_', " "))
                .unwrap_or_default()
        });
        let entity = Entity {
            id: self.id.unwrap_or_default(),
            entity_id,
            friendly_name,
            device_class: self.device_class,
            state: self.state.unwrap_or_default(),
            device_id: self.device_id,
            area_id: self.area_id,
            last_changed: now(),
        };
        entity.validate()?;
        Ok(entity)
    }
}
