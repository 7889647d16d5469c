//! The life event catalog.
//!
//! An ordered table of [`EventDefinition`]s plus an id index built once at
//! construction. Catalog order is display order and the order in which
//! selected events are applied.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use generations_rules::eligibility::{self, EligibilityContext};
use generations_types::{
    AgeRange, EventDefinition, EventId, SpecialRequirement, StatDeltas, StatName,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Errors that can occur while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two definitions share an id.
    #[error("duplicate event id: {id}")]
    DuplicateEvent {
        /// The repeated id.
        id: EventId,
    },

    /// Failed to read a catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse catalog YAML.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Why a selected id did not take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// No event has this id.
    Unknown,
    /// The event exists but is not available to this character now.
    Ineligible,
}

/// A selected id that was dropped from the effective selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedSelection {
    /// The id as submitted.
    pub id: EventId,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// A selection split into the events that apply and the ids that do not.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSelection<'a> {
    /// Valid, eligible events in catalog order.
    pub effective: Vec<&'a EventDefinition>,
    /// Ids that were dropped, in id order.
    pub dropped: Vec<DroppedSelection>,
}

/// The ordered event table with its id index.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<EventDefinition>,
    index: HashMap<EventId, usize>,
}

impl EventCatalog {
    /// Build a catalog from definitions, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateEvent`] if two definitions share an id.
    pub fn from_definitions(events: Vec<EventDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(events.len());
        for (position, event) in events.iter().enumerate() {
            if index.insert(event.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateEvent {
                    id: event.id.clone(),
                });
            }
        }
        Ok(Self { events, index })
    }

    /// Parse a YAML list of event definitions.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] for malformed YAML and
    /// [`CatalogError::DuplicateEvent`] for repeated ids.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let events: Vec<EventDefinition> = serde_yml::from_str(yaml)?;
        Self::from_definitions(events)
    }

    /// Load a YAML catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise as
    /// [`from_yaml`](Self::from_yaml).
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// The built-in catalog.
    pub fn standard() -> Self {
        let events = standard_events();
        let index = events
            .iter()
            .enumerate()
            .map(|(position, event)| (event.id.clone(), position))
            .collect();
        Self { events, index }
    }

    /// Look up an event by id.
    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.index.get(id).and_then(|&position| self.events.get(position))
    }

    /// Whether an id is in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every event, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The events available at `age` for the given history and marital state.
    pub fn available(
        &self,
        age: u32,
        completed: &BTreeSet<EventId>,
        context: EligibilityContext,
    ) -> Vec<&EventDefinition> {
        eligibility::available_events(&self.events, age, completed, context)
    }

    /// Split a selection into effective events (catalog order) and dropped
    /// ids.
    pub fn resolve_selection(
        &self,
        selected: &BTreeSet<EventId>,
        age: u32,
        completed: &BTreeSet<EventId>,
        context: EligibilityContext,
    ) -> ResolvedSelection<'_> {
        let mut positions = Vec::with_capacity(selected.len());
        let mut dropped = Vec::new();
        for id in selected {
            match self.index.get(id.as_str()) {
                None => dropped.push(DroppedSelection {
                    id: id.clone(),
                    reason: DropReason::Unknown,
                }),
                Some(&position) => {
                    let eligible = self
                        .events
                        .get(position)
                        .is_some_and(|event| {
                            eligibility::is_eligible(event, age, completed, context)
                        });
                    if eligible {
                        positions.push(position);
                    } else {
                        dropped.push(DroppedSelection {
                            id: id.clone(),
                            reason: DropReason::Ineligible,
                        });
                    }
                }
            }
        }
        positions.sort_unstable();
        let effective = positions
            .into_iter()
            .filter_map(|position| self.events.get(position))
            .collect();
        ResolvedSelection { effective, dropped }
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// Lifetime upper bound used by events that never expire.
const LIFETIME: u32 = 200;

struct Blueprint {
    id: &'static str,
    name: &'static str,
    ages: (u32, u32),
    repeatable: bool,
    description: &'static str,
}

fn define(blueprint: &Blueprint, effects: StatDeltas, penalties: StatDeltas) -> EventDefinition {
    EventDefinition {
        id: EventId::from(blueprint.id),
        name: blueprint.name.to_owned(),
        age_range: AgeRange::new(blueprint.ages.0, blueprint.ages.1),
        repeatable: blueprint.repeatable,
        description: blueprint.description.to_owned(),
        effects,
        penalties,
        special_factor: None,
        special_requirement: None,
    }
}

#[allow(clippy::too_many_lines)]
fn standard_events() -> Vec<EventDefinition> {
    use StatName::{
        Agility, Comfort, Education, Health, Intelligence, Labor, Money, Strength, Stress,
    };

    let d = StatDeltas::new;
    vec![
        // Baby (0-2)
        EventDefinition {
            special_factor: Some(Decimal::new(15, 1)),
            ..define(
                &Blueprint {
                    id: "first_steps",
                    name: "Learn to Walk",
                    ages: (0, 2),
                    repeatable: false,
                    description: "Take your first steps! +{bonus} agility",
                },
                d().with(Agility, 5),
                d().with(Health, -2),
            )
        },
        EventDefinition {
            special_factor: Some(Decimal::ONE),
            ..define(
                &Blueprint {
                    id: "first_words",
                    name: "First Words",
                    ages: (0, 2),
                    repeatable: false,
                    description: "Speak your first words! +{bonus} intelligence",
                },
                d().with(Intelligence, 5),
                d().with(Stress, 2),
            )
        },
        define(
            &Blueprint {
                id: "enjoy_life",
                name: "Enjoy Life",
                ages: (0, LIFETIME),
                repeatable: true,
                description: "Do nothing! Reduce a moderate amount of stress.",
            },
            d().with(Stress, -3),
            d(),
        ),
        // Child (3-12)
        EventDefinition {
            special_factor: Some(Decimal::ONE),
            ..define(
                &Blueprint {
                    id: "school",
                    name: "Attend School",
                    ages: (3, 12),
                    repeatable: true,
                    description:
                        "Begin formal education. +{bonus} intelligence and education skills",
                },
                d().with(Intelligence, 1).with(Stress, 1).with(Education, 2),
                d().with(Stress, 5),
            )
        },
        define(
            &Blueprint {
                id: "play_sports",
                name: "Join Sports Team",
                ages: (3, 12),
                repeatable: true,
                description: "Regular physical activity. +{bonus} health, strength, and agility",
            },
            d().with(Health, 1).with(Strength, 3).with(Agility, 2),
            d().with(Health, -3).with(Stress, 1),
        ),
        // Teenager (13-19)
        define(
            &Blueprint {
                id: "part_time_job",
                name: "Get Part-time Job",
                ages: (13, 19),
                repeatable: true,
                description: "Earn your first money. +{bonus} money and labor skills",
            },
            d().with(Labor, 1).with(Money, 500),
            d().with(Health, -3).with(Stress, 3),
        ),
        define(
            &Blueprint {
                id: "high_school",
                name: "Graduate High School",
                ages: (13, 19),
                repeatable: false,
                description: "Complete secondary education. +{bonus} intelligence and education",
            },
            d().with(Intelligence, 1).with(Education, 3),
            d().with(Health, -3).with(Stress, 3),
        ),
        define(
            &Blueprint {
                id: "farm_job",
                name: "Farm Job",
                ages: (13, 64),
                repeatable: true,
                description: "Real work.",
            },
            d().with(Health, -1).with(Labor, 3).with(Money, 1000),
            d().with(Health, -7).with(Stress, 10),
        ),
        // Family
        EventDefinition {
            special_requirement: Some(SpecialRequirement::FindWife),
            ..define(
                &Blueprint {
                    id: "find_wife",
                    name: "Find a Partner",
                    ages: (16, 40),
                    repeatable: true,
                    description: "Look for someone to share your life with.",
                },
                d(),
                d(),
            )
        },
        EventDefinition {
            special_requirement: Some(SpecialRequirement::Wedding),
            ..define(
                &Blueprint {
                    id: "wedding",
                    name: "Wedding",
                    ages: (16, 50),
                    repeatable: false,
                    description: "Marry your chosen partner. +{bonus} comfort",
                },
                d().with(Comfort, 10),
                d().with(Money, -1000),
            )
        },
        EventDefinition {
            special_requirement: Some(SpecialRequirement::TryForChildren),
            ..define(
                &Blueprint {
                    id: "try_for_children",
                    name: "Try for Children",
                    ages: (18, 45),
                    repeatable: true,
                    description: "Start or grow your family.",
                },
                d(),
                d(),
            )
        },
        // Adult (20-64)
        define(
            &Blueprint {
                id: "career",
                name: "Start Career",
                ages: (20, 64),
                repeatable: true,
                description: "Begin professional career. +{bonus} money and labor skills",
            },
            d().with(Labor, 25).with(Money, 2000),
            d().with(Health, -4).with(Stress, 10),
        ),
        EventDefinition {
            special_factor: Some(Decimal::ONE),
            ..define(
                &Blueprint {
                    id: "exercise",
                    name: "Regular Exercise",
                    ages: (20, 64),
                    repeatable: true,
                    description: "Maintain fitness routine. +{bonus} health and strength",
                },
                d().with(Health, 3).with(Strength, 4).with(Agility, 1),
                d().with(Stress, 3),
            )
        },
        // Elder (65+)
        define(
            &Blueprint {
                id: "retirement",
                name: "Retire",
                ages: (65, LIFETIME),
                repeatable: false,
                description: "Enjoy retirement. -{bonus} labor skills but +{bonus} comfort",
            },
            d().with(Labor, -15).with(Comfort, 20),
            d(),
        ),
        define(
            &Blueprint {
                id: "wisdom",
                name: "Share Wisdom",
                ages: (65, LIFETIME),
                repeatable: true,
                description: "Pass on knowledge to others.",
            },
            d(),
            d(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use generations_types::StatCategory;

    use super::*;

    #[test]
    fn standard_catalog_has_unique_ids() {
        let catalog = EventCatalog::standard();
        assert_eq!(catalog.len(), 15);
        let rebuilt = EventCatalog::from_definitions(catalog.iter().cloned().collect());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = EventCatalog::standard();
        let steps = catalog.get("first_steps");
        assert_eq!(steps.map(|e| e.special_factor()), Some(Decimal::new(15, 1)));
        assert_eq!(
            steps.map(|e| e.penalties.get(StatCategory::Innate, StatName::Health)),
            Some(Decimal::from(-2))
        );
        assert!(catalog.get("time_travel").is_none());
    }

    #[test]
    fn duplicates_are_rejected() {
        let catalog = EventCatalog::standard();
        let mut events: Vec<_> = catalog.iter().cloned().collect();
        if let Some(first) = catalog.get("school").cloned() {
            events.push(first);
        }
        assert!(matches!(
            EventCatalog::from_definitions(events),
            Err(CatalogError::DuplicateEvent { id }) if id.as_str() == "school"
        ));
    }

    #[test]
    fn descriptions_render_with_bonuses() {
        let catalog = EventCatalog::standard();
        let retire = catalog.get("retirement").map(EventDefinition::render_description);
        assert_eq!(
            retire.as_deref(),
            Some("Enjoy retirement. -15 labor skills but +20 comfort")
        );
    }

    #[test]
    fn baby_sees_baby_events() {
        let catalog = EventCatalog::standard();
        let ids: Vec<_> = catalog
            .available(0, &BTreeSet::new(), EligibilityContext::default())
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["first_steps", "first_words", "enjoy_life"]);
    }

    #[test]
    fn single_twenty_year_old_can_look_for_a_partner() {
        let catalog = EventCatalog::standard();
        let ids: Vec<_> = catalog
            .available(20, &BTreeSet::new(), EligibilityContext::default())
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["enjoy_life", "farm_job", "find_wife", "career", "exercise"]);
    }

    #[test]
    fn selection_is_resolved_in_catalog_order() {
        let catalog = EventCatalog::standard();
        let selected = BTreeSet::from([
            EventId::from("first_words"),
            EventId::from("enjoy_life"),
            EventId::from("first_steps"),
            EventId::from("career"),
            EventId::from("no_such_event"),
        ]);
        let resolved = catalog.resolve_selection(
            &selected,
            1,
            &BTreeSet::new(),
            EligibilityContext::default(),
        );
        let ids: Vec<_> = resolved.effective.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first_steps", "first_words", "enjoy_life"]);
        assert_eq!(
            resolved.dropped,
            vec![
                DroppedSelection { id: EventId::from("career"), reason: DropReason::Ineligible },
                DroppedSelection {
                    id: EventId::from("no_such_event"),
                    reason: DropReason::Unknown
                },
            ]
        );
    }

    #[test]
    fn yaml_catalog_loads() {
        let yaml = r#"
- id: nap
  name: Take a Nap
  age_range: { min: 0, max: 200 }
  repeatable: true
  description: "Rest. -{bonus} stress"
  effects:
    innate: { stress: -1 }
- id: lottery
  name: Win the Lottery
  age_range: { min: 18, max: 200 }
  repeatable: false
  description: "+{bonus} money"
  effects:
    possessions: { money: 10000 }
  penalties:
    innate: { stress: 5 }
  special_factor: 2
"#;
        let catalog = EventCatalog::from_yaml(yaml);
        assert!(catalog.is_ok());
        let catalog = catalog.unwrap_or_default();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("lottery").map(EventDefinition::special_factor), Some(Decimal::TWO));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            EventCatalog::from_yaml("- id: [unclosed"),
            Err(CatalogError::Yaml { .. })
        ));
    }
}
