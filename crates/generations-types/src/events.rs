//! Life event definitions.
//!
//! An [`EventDefinition`] is immutable catalog data. The catalog itself (the
//! ordered table and its id index) lives in `generations-core`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::SpecialRequirement;
use crate::ids::EventId;
use crate::stats::StatDeltas;

/// Placeholder replaced by effect magnitudes in event descriptions.
pub const BONUS_PLACEHOLDER: &str = "{bonus}";

/// Inclusive range of ages during which an event may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgeRange {
    /// Youngest eligible age.
    pub min: u32,
    /// Oldest eligible age.
    pub max: u32,
}

impl AgeRange {
    /// Create a range (`min..=max`).
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `age` falls inside the range.
    pub const fn contains(self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// A selectable life event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventDefinition {
    /// Unique catalog identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Ages at which the event is offered.
    pub age_range: AgeRange,
    /// Repeatable events may be selected every year; one-time events are
    /// consumed once applied.
    pub repeatable: bool,
    /// Description template. `{bonus}` placeholders are filled by
    /// [`render_description`](Self::render_description).
    pub description: String,
    /// Changes applied once when the event is selected.
    #[serde(default)]
    pub effects: StatDeltas,
    /// Base changes scaled and applied when too many events are selected.
    #[serde(default)]
    pub penalties: StatDeltas,
    /// Extra multiplier on this event's penalties. Defaults to 1.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub special_factor: Option<Decimal>,
    /// Narrative gate for family events.
    #[serde(default)]
    pub special_requirement: Option<SpecialRequirement>,
}

impl EventDefinition {
    /// The penalty multiplier for this event (1 when unset).
    pub fn special_factor(&self) -> Decimal {
        self.special_factor.unwrap_or(Decimal::ONE)
    }

    /// Fill each `{bonus}` placeholder, in order, with the magnitude of the
    /// next effect entry. Placeholders left over once the effects run out
    /// are kept verbatim.
    pub fn render_description(&self) -> String {
        let mut text = self.description.clone();
        for (_, _, delta) in self.effects.iter() {
            let Some(pos) = text.find(BONUS_PLACEHOLDER) else {
                break;
            };
            let end = pos.saturating_add(BONUS_PLACEHOLDER.len());
            text.replace_range(pos..end, &delta.abs().normalize().to_string());
        }
        text
    }
}
