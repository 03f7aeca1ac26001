//! Device — a physical or virtual thing that exposes one or more entities.
//!
//! The conversation engine only cares about a device's area membership: a
//! voice satellite's device id flows in through the invocation context and is
//! used to infer the area an areless command refers to.

use serde::{Deserialize, Serialize};

use crate::error::{ParlorError, ValidationError};
use crate::id::{AreaId, DeviceId};

/// A physical or virtual device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub area_id: Option<AreaId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ParlorError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    area_id: Option<AreaId>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: AreaId) -> Self {
        self.area_id = Some(area_id);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, ParlorError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            area_id: self.area_id,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_device_with_area() {
        let area = AreaId::new();
        let device = Device::builder()
            .name("kitchen satellite")
            .area_id(area)
            .build()
            .unwrap();
        assert_eq!(device.area_id, Some(area));
    }

    #[test]
    fn should_reject_empty_name() {
        let result = Device::builder().build();
        assert!(matches!(
            result,
            Err(ParlorError::Validation(ValidationError::EmptyName))
        ));
    }
}
