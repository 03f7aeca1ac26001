//! Entity state — the current operational state of an entity.

use serde::{Deserialize, Serialize};

/// Discrete operational state of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
}

impl EntityState {
    /// Whether the entity is reachable (anything but [`Unavailable`](Self::Unavailable)).
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Parse the lowercase wire form (`"on"`, `"off"`, …).
    ///
    /// Unrecognized values map to [`Unknown`](Self::Unknown) — utterances may
    /// carry arbitrary state words and the engine treats those as non-matching
    /// rather than failing.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "on" => Self::On,
            "off" => Self::Off,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_available_for_every_state_but_unavailable() {
        assert!(EntityState::On.is_available());
        assert!(EntityState::Off.is_available());
        assert!(EntityState::Unknown.is_available());
        assert!(!EntityState::Unavailable.is_available());
    }

    #[test]
    fn should_parse_wire_form_back_to_variant() {
        assert_eq!(EntityState::parse("on"), EntityState::On);
        assert_eq!(EntityState::parse("off"), EntityState::Off);
        assert_eq!(EntityState::parse("dimmed"), EntityState::Unknown);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(EntityState::On.to_string(), "on");
        assert_eq!(EntityState::Unavailable.to_string(), "unavailable");
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let json = serde_json::to_string(&EntityState::Off).unwrap();
        assert_eq!(json, "\"off\"");
        let parsed: EntityState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EntityState::Off);
    }
}
