//! Bounded statistics, stat blocks, and sparse delta maps.
//!
//! Every value is an exact [`Decimal`]. A [`Stat`] always holds a value
//! inside its bounds; the upper bound may be absent, in which case the stat
//! is unbounded above.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{StatCategory, StatName};

// ---------------------------------------------------------------------------
// Stat
// ---------------------------------------------------------------------------

/// A single bounded statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stat {
    /// Current value, always within `[min, max]`.
    #[ts(as = "String")]
    pub value: Decimal,
    /// Lower bound (inclusive).
    #[ts(as = "String")]
    pub min: Decimal,
    /// Upper bound (inclusive). `None` means unbounded.
    #[ts(as = "Option<String>")]
    pub max: Option<Decimal>,
}

impl Stat {
    /// Create a stat, clamping the initial value into the bounds.
    pub fn new(value: Decimal, min: Decimal, max: Option<Decimal>) -> Self {
        let mut stat = Self { value: min, min, max };
        stat.set_clamped(value);
        stat
    }

    /// Create a stat with no upper bound.
    pub fn unbounded(value: Decimal, min: Decimal) -> Self {
        Self::new(value, min, None)
    }

    /// Clamp `value` into this stat's bounds without storing it.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        let capped = match self.max {
            Some(max) => value.min(max),
            None => value,
        };
        capped.max(self.min)
    }

    /// Store `value`, clamped into the bounds.
    pub fn set_clamped(&mut self, value: Decimal) {
        self.value = self.clamp(value);
    }

    /// Add a signed delta and clamp. Never panics: the sum saturates at the
    /// decimal range before clamping.
    pub fn apply(&mut self, delta: Decimal) {
        self.set_clamped(self.value.saturating_add(delta));
    }

    /// Whether the current value lies within the bounds.
    pub fn is_within_bounds(&self) -> bool {
        self.value >= self.min && self.max.is_none_or(|max| self.value <= max)
    }
}

// ---------------------------------------------------------------------------
// StatBlock
// ---------------------------------------------------------------------------

/// A character's statistics, grouped by category.
///
/// The block may be sparse: a stat that was never inserted is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct StatBlock(BTreeMap<StatCategory, BTreeMap<StatName, Stat>>);

impl StatBlock {
    /// An empty block.
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// The default stats every new character starts with.
    ///
    /// Health 100, other innate attributes 5, stress 0 (unbounded), skills,
    /// money and comfort 0. Attributes cap at 200, money at 1 000 000.
    pub fn standard() -> Self {
        let cap = Some(Decimal::from(200));
        let mut block = Self::empty();
        block.insert(StatName::Health, Stat::new(Decimal::ONE_HUNDRED, Decimal::ZERO, cap));
        for name in [
            StatName::Beauty,
            StatName::Charisma,
            StatName::Intelligence,
            StatName::Strength,
            StatName::Agility,
            StatName::Luck,
        ] {
            block.insert(name, Stat::new(Decimal::from(5), Decimal::ZERO, cap));
        }
        block.insert(StatName::Stress, Stat::unbounded(Decimal::ZERO, Decimal::ZERO));
        block.insert(StatName::Education, Stat::new(Decimal::ZERO, Decimal::ZERO, cap));
        block.insert(StatName::Labor, Stat::new(Decimal::ZERO, Decimal::ZERO, cap));
        block.insert(
            StatName::Money,
            Stat::new(Decimal::ZERO, Decimal::ZERO, Some(Decimal::from(1_000_000))),
        );
        block.insert(StatName::Comfort, Stat::new(Decimal::ZERO, Decimal::ZERO, cap));
        block
    }

    /// Insert (or replace) a stat under its home category.
    pub fn insert(&mut self, name: StatName, stat: Stat) {
        self.0.entry(name.category()).or_default().insert(name, stat);
    }

    /// Look up a stat under its home category.
    pub fn get(&self, name: StatName) -> Option<&Stat> {
        self.get_in(name.category(), name)
    }

    /// Look up a stat under an explicit category. A name filed under the
    /// wrong category is not found.
    pub fn get_in(&self, category: StatCategory, name: StatName) -> Option<&Stat> {
        self.0.get(&category).and_then(|stats| stats.get(&name))
    }

    /// Mutable lookup under an explicit category.
    pub fn get_in_mut(&mut self, category: StatCategory, name: StatName) -> Option<&mut Stat> {
        self.0.get_mut(&category).and_then(|stats| stats.get_mut(&name))
    }

    /// Mutable lookup under the stat's home category.
    pub fn get_mut(&mut self, name: StatName) -> Option<&mut Stat> {
        self.get_in_mut(name.category(), name)
    }

    /// Current value of a stat, if present.
    pub fn value(&self, name: StatName) -> Option<Decimal> {
        self.get(name).map(|stat| stat.value)
    }

    /// Current value of a stat, or zero when absent.
    pub fn value_or_zero(&self, name: StatName) -> Decimal {
        self.value(name).unwrap_or(Decimal::ZERO)
    }

    /// Iterate over every stat as `(category, name, stat)`.
    pub fn iter(&self) -> impl Iterator<Item = (StatCategory, StatName, &Stat)> {
        self.0.iter().flat_map(|(category, stats)| {
            stats.iter().map(move |(name, stat)| (*category, *name, stat))
        })
    }
}

// ---------------------------------------------------------------------------
// StatDeltas
// ---------------------------------------------------------------------------

/// A sparse map of signed changes, keyed by category and stat name.
///
/// Event effects, penalties, and previews all use this shape. Entries whose
/// category does not match the stat's home category are legal here; they
/// are ignored when the deltas are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct StatDeltas(
    #[ts(as = "BTreeMap<StatCategory, BTreeMap<StatName, String>>")]
    BTreeMap<StatCategory, BTreeMap<StatName, Decimal>>,
);

impl StatDeltas {
    /// An empty delta map.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`add`](Self::add), filing the delta under the stat's
    /// home category.
    #[must_use]
    pub fn with(mut self, name: StatName, delta: impl Into<Decimal>) -> Self {
        self.add(name.category(), name, delta.into());
        self
    }

    /// Accumulate a delta. Repeated entries for the same stat are summed.
    pub fn add(&mut self, category: StatCategory, name: StatName, delta: Decimal) {
        let slot = self.0.entry(category).or_default().entry(name).or_default();
        *slot = slot.saturating_add(delta);
    }

    /// The delta for a stat, or zero when absent.
    pub fn get(&self, category: StatCategory, name: StatName) -> Decimal {
        self.0
            .get(&category)
            .and_then(|stats| stats.get(&name))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Add every entry of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (category, name, delta) in other.iter() {
            self.add(category, name, delta);
        }
    }

    /// Iterate over every entry as `(category, name, delta)`.
    pub fn iter(&self) -> impl Iterator<Item = (StatCategory, StatName, Decimal)> + '_ {
        self.0.iter().flat_map(|(category, stats)| {
            stats.iter().map(move |(name, delta)| (*category, *name, *delta))
        })
    }

    /// Whether the map holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Whether every entry is zero (an empty map counts as zero).
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, _, delta)| delta.is_zero())
    }
}
