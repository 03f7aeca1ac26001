//! Area — a logical grouping (room, floor, zone) for devices and entities.

use serde::{Deserialize, Serialize};

use crate::error::{ParlorError, ValidationError};
use crate::id::AreaId;
use crate::registry::normalize_name;

/// A logical grouping such as a room, floor, or zone.
///
/// Utterances address areas by name or by any of their aliases
/// ("living room" vs "lounge").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub aliases: Vec<String>,
}

impl Area {
    /// Create a builder for constructing an [`Area`].
    #[must_use]
    pub fn builder() -> AreaBuilder {
        AreaBuilder::default()
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

    /// Whether `needle` names this area, comparing case-insensitively and
    /// ignoring a leading article against the name and every alias.
    #[must_use]
    pub fn matches_name(&self, needle: &str) -> bool {
        let needle = normalize_name(needle);
        normalize_name(&self.name) == needle
            || self.aliases.iter().any(|alias| normalize_name(alias) == needle)
    }
}

/// Step-by-step builder for [`Area`].
#[derive(Debug, Default)]
pub struct AreaBuilder {
    id: Option<AreaId>,
    name: Option<String>,
    aliases: Vec<String>,
}

impl AreaBuilder {
    #[must_use]
    pub fn id(mut self, id: AreaId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Consume the builder, validate, and return an [`Area`].
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Area, ParlorError> {
        let area = Area {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            aliases: self.aliases,
        };
        area.validate()?;
        Ok(area)
    }
}
