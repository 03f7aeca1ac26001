//! Target resolver — turn one candidate's slots plus invocation context into
//! a concrete set of exposed entities.
//!
//! Resolution is pure with respect to the snapshot: staged filters narrow
//! the entity pool, exposure is applied unconditionally last so explicit
//! filters can never leak unexposed entities, and entity order stays in
//! registry iteration order.

use parlor_domain::area::Area;
use parlor_domain::entity::Entity;
use parlor_domain::registry::{RegistrySnapshot, normalize_name};
use parlor_domain::utterance::ConverseContext;

use crate::config::AgentConfig;
use crate::recognize::IntentCandidate;

/// The concrete targets one candidate resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// Exposed entities satisfying every filter, in registry order.
    pub entities: Vec<Entity>,
    /// The area the command was scoped to, when one was used.
    pub area: Option<Area>,
}

/// Why resolution produced no targets. Each variant carries enough to
/// synthesize distinguishing error speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// A `name` slot matched no entity friendly name and no area name.
    NoEntityNamed(String),
    /// An `area` slot named no known area.
    NoAreaNamed(String),
    /// Entities satisfied the filters but none are exposed.
    NoExposedTargets,
    /// Nothing scoped the command: no name, no area, and no calling-device
    /// context to infer one from.
    NoTargets,
}

impl ResolveFailure {
    /// Error speech for the user.
    #[must_use]
    pub fn speech(&self) -> String {
        match self {
            Self::NoEntityNamed(name) => format!("No device or entity named {name}"),
            Self::NoAreaNamed(area) => format!("No area named {area}"),
            Self::NoExposedTargets => "No exposed device or entity matched".to_string(),
            Self::NoTargets => "No targets to control".to_string(),
        }
    }
}

/// Resolve one candidate against the snapshot.
///
/// A `name` slot that exactly names an area takes the area path instead of
/// single-entity resolution. A device-scoped invocation with neither a name
/// nor an area slot is scoped to the calling device's area.
///
/// # Errors
///
/// Returns a [`ResolveFailure`] describing why no exposed entity qualified.
pub fn resolve(
    candidate: &IntentCandidate,
    context: &ConverseContext,
    snapshot: &RegistrySnapshot,
    config: &AgentConfig,
) -> Result<ResolvedTarget, ResolveFailure> {
    let name_slot = candidate.slot("name");
    let area_slot = candidate.slot("area");
    let domain_slot = candidate.slot("domain");
    let device_class_slot = candidate.slot("device_class");

    // Intents with no target slots at all (Nevermind and friends) resolve
    // to an empty target instead of failing.
    if name_slot.is_none()
        && area_slot.is_none()
        && domain_slot.is_none()
        && device_class_slot.is_none()
    {
        return Ok(ResolvedTarget {
            entities: Vec::new(),
            area: None,
        });
    }

    let mut pool: Vec<&Entity> = snapshot
        .entities()
        .iter()
        .filter(|entity| domain_slot.is_none_or(|domain| entity.domain() == domain))
        .filter(|entity| {
            device_class_slot
                .is_none_or(|class| entity.device_class.as_deref() == Some(class))
        })
        .collect();

    // A name that exactly matches an area name resolves as an area.
    let mut area: Option<&Area> = None;
    let mut name_filter: Option<&str> = None;
    if let Some(name) = name_slot {
        match snapshot.find_area(name) {
            Some(found) => area = Some(found),
            None => name_filter = Some(name),
        }
    }

    if let Some(area_name) = area_slot {
        match snapshot.find_area(area_name) {
            Some(found) => area = Some(found),
            None => return Err(ResolveFailure::NoAreaNamed(area_name.to_string())),
        }
    }

    // Device-context inference: only when the utterance itself named nothing.
    if area.is_none() && name_slot.is_none() && area_slot.is_none() {
        area = context
            .device_id
            .and_then(|device_id| snapshot.device(device_id))
            .and_then(|device| device.area_id)
            .and_then(|area_id| snapshot.area_by_id(area_id));
    }

    if let Some(name) = name_filter {
        let needle = normalize_name(name);
        pool.retain(|entity| normalize_name(&entity.friendly_name) == needle);
        if pool.is_empty() {
            return Err(ResolveFailure::NoEntityNamed(name.to_string()));
        }
    }

    if let Some(area) = area {
        pool.retain(|entity| snapshot.area_of_entity(entity) == Some(area.id));
    }

    if name_filter.is_none() && area.is_none() {
        return Err(ResolveFailure::NoTargets);
    }

    // Exposure last, so nothing above can leak unexposed entities.
    pool.retain(|entity| snapshot.should_expose(entity, &config.exposed_domains));
    if pool.is_empty() {
        return Err(ResolveFailure::NoExposedTargets);
    }

    Ok(ResolvedTarget {
        entities: pool.into_iter().cloned().collect(),
        area: area.cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    use parlor_domain::device::Device;
    use parlor_domain::id::DeviceId;
    use parlor_domain::state::EntityState;

    fn candidate(slots: &[(&str, &str)]) -> IntentCandidate {
        IntentCandidate {
            intent: "TurnOn".to_string(),
            slots: slots
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect::<BTreeMap<_, _>>(),
            specificity: 0,
            template_index: 0,
        }
    }

    struct Fixture {
        snapshot: RegistrySnapshot,
        kitchen: Area,
        satellite: DeviceId,
    }

    /// Kitchen with two lights (one unexposed) and a satellite device;
    /// bedroom with one unexposed light; one areless exposed light.
    fn fixture() -> Fixture {
        let kitchen = Area::builder().name("Kitchen").build().unwrap();
        let bedroom = Area::builder().name("Bedroom").build().unwrap();
        let satellite = Device::builder()
            .name("kitchen satellite")
            .area_id(kitchen.id)
            .build()
            .unwrap();
        let satellite_id = satellite.id;

        let entities = vec![
            Entity::builder()
                .entity_id("light.kitchen_main")
                .friendly_name("kitchen main")
                .area_id(kitchen.id)
                .state(EntityState::Off)
                .build()
                .unwrap(),
            Entity::builder()
                .entity_id("light.kitchen_hidden")
                .friendly_name("kitchen hidden")
                .area_id(kitchen.id)
                .state(EntityState::Off)
                .build()
                .unwrap(),
            Entity::builder()
                .entity_id("light.bedroom_lamp")
                .friendly_name("bedroom lamp")
                .area_id(bedroom.id)
                .state(EntityState::Off)
                .build()
                .unwrap(),
            Entity::builder()
                .entity_id("light.desk_lamp")
                .friendly_name("desk lamp")
                .state(EntityState::Off)
                .build()
                .unwrap(),
        ];
        let overrides = HashMap::from([
            ("light.kitchen_hidden".to_string(), false),
            ("light.bedroom_lamp".to_string(), false),
        ]);
        Fixture {
            snapshot: RegistrySnapshot::new(
                entities,
                vec![kitchen.clone(), bedroom],
                vec![satellite],
                overrides,
            ),
            kitchen,
            satellite: satellite_id,
        }
    }

    #[test]
    fn should_resolve_all_exposed_entities_in_area() {
        let fixture = fixture();
        let target = resolve(
            &candidate(&[("domain", "light"), ("area", "kitchen")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap();

        assert_eq!(target.entities.len(), 1);
        assert_eq!(target.entities[0].entity_id, "light.kitchen_main");
        assert_eq!(target.area.map(|area| area.id), Some(fixture.kitchen.id));
    }

    #[test]
    fn should_fail_for_area_with_only_unexposed_entities() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("domain", "light"), ("area", "bedroom")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        assert_eq!(result.unwrap_err(), ResolveFailure::NoExposedTargets);
    }

    #[test]
    fn should_fail_with_area_name_for_unknown_area() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("domain", "light"), ("area", "missing area")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        let failure = result.unwrap_err();
        assert_eq!(failure, ResolveFailure::NoAreaNamed("missing area".to_string()));
        assert_eq!(failure.speech(), "No area named missing area");
    }

    #[test]
    fn should_fail_with_entity_name_for_unknown_name() {
        let fixture = fixture();
        let failure = resolve(
            &candidate(&[("name", "missing entity")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap_err();
        assert_eq!(failure.speech(), "No device or entity named missing entity");
    }

    #[test]
    fn should_fail_for_named_but_unexposed_entity() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("name", "bedroom lamp")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        assert_eq!(result.unwrap_err(), ResolveFailure::NoExposedTargets);
    }

    #[test]
    fn should_resolve_entity_by_name_ignoring_article_and_case() {
        let fixture = fixture();
        let target = resolve(
            &candidate(&[("name", "The Desk Lamp")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap();
        assert_eq!(target.entities[0].entity_id, "light.desk_lamp");
        assert!(target.area.is_none());
    }

    #[test]
    fn should_take_area_path_when_name_matches_an_area() {
        let fixture = fixture();
        let target = resolve(
            &candidate(&[("domain", "light"), ("name", "kitchen")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap();
        assert_eq!(target.area.map(|area| area.id), Some(fixture.kitchen.id));
        assert_eq!(target.entities.len(), 1);
    }

    #[test]
    fn should_infer_area_from_calling_device() {
        let fixture = fixture();
        let target = resolve(
            &candidate(&[("domain", "light")]),
            &ConverseContext::from_device(fixture.satellite),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap();
        assert_eq!(target.area.map(|area| area.id), Some(fixture.kitchen.id));
        assert_eq!(target.entities[0].entity_id, "light.kitchen_main");
    }

    #[test]
    fn should_let_explicit_area_override_device_context() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("domain", "light"), ("area", "bedroom")]),
            &ConverseContext::from_device(fixture.satellite),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        // The explicit (unexposed) bedroom wins over the kitchen context.
        assert_eq!(result.unwrap_err(), ResolveFailure::NoExposedTargets);
    }

    #[test]
    fn should_fail_bare_domain_command_without_context() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("domain", "light")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        assert_eq!(result.unwrap_err(), ResolveFailure::NoTargets);
    }

    #[test]
    fn should_resolve_slotless_intent_to_empty_target() {
        let fixture = fixture();
        let target = resolve(
            &candidate(&[]),
            &ConverseContext::from_device(fixture.satellite),
            &fixture.snapshot,
            &AgentConfig::default(),
        )
        .unwrap();
        assert!(target.entities.is_empty());
        assert!(target.area.is_none());
    }

    #[test]
    fn should_filter_by_device_class() {
        let fixture = fixture();
        let result = resolve(
            &candidate(&[("name", "desk lamp"), ("device_class", "motion")]),
            &ConverseContext::default(),
            &fixture.snapshot,
            &AgentConfig::default(),
        );
        assert!(result.is_err());
    }
}
