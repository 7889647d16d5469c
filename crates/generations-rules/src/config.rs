//! Tunable rule parameters.
//!
//! Every threshold, probability, and formula weight used by the rules lives
//! in [`RulesConfig`]. The defaults reproduce the canonical game balance;
//! `generations-config.yaml` may override any of them under the `rules` key.

use std::collections::BTreeMap;

use generations_types::{AgeGroup, StatBlock};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::RulesError;

/// All rule parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Inclusive age bands with their base yearly death chance, youngest
    /// first. Ages past the last band use the last band.
    #[serde(default = "default_age_bands")]
    pub age_bands: Vec<AgeBand>,

    /// How many events may be selected per turn without penalty.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Elder health decay and succession thresholds.
    #[serde(default)]
    pub aging: AgingConfig,

    /// Reprieve roll parameters.
    #[serde(default)]
    pub death: DeathConfig,

    /// Spouse search, childbirth, and inheritance parameters.
    #[serde(default)]
    pub family: FamilyConfig,

    /// Age at which prestige unlocks (default: 18).
    #[serde(default = "default_prestige_unlock_age")]
    pub prestige_unlock_age: u32,

    /// Stats every new character starts with.
    #[serde(default = "StatBlock::standard")]
    pub starting_stats: StatBlock,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            age_bands: default_age_bands(),
            selection: SelectionConfig::default(),
            aging: AgingConfig::default(),
            death: DeathConfig::default(),
            family: FamilyConfig::default(),
            prestige_unlock_age: default_prestige_unlock_age(),
            starting_stats: StatBlock::standard(),
        }
    }
}

impl RulesConfig {
    /// The band containing `age`, falling back to the last (eldest) band
    /// for ages past the table. `None` only when no bands are configured.
    pub fn age_band(&self, age: u32) -> Option<&AgeBand> {
        self.age_bands
            .iter()
            .find(|band| age >= band.min && age <= band.max)
            .or_else(|| self.age_bands.last())
    }

    /// The age group for `age` (Elder when the table is empty).
    pub fn age_group(&self, age: u32) -> AgeGroup {
        self.age_band(age).map_or(AgeGroup::Elder, |band| band.group)
    }

    /// Base yearly death chance for `age` before stat modifiers.
    pub fn base_death_chance(&self, age: u32) -> Decimal {
        self.age_band(age).map_or(Decimal::ZERO, |band| band.death_chance)
    }

    /// Events that may be selected at `age` without triggering penalties.
    pub fn max_free_selections(&self, age: u32) -> u32 {
        self.selection.max_free(self.age_group(age))
    }

    /// Check that every range and divisor is usable.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.age_bands.is_empty() {
            return Err(invalid("at least one age band is required"));
        }
        if let Some(band) = self.age_bands.iter().find(|band| band.min > band.max) {
            return Err(invalid(&format!(
                "age band {} has min {} above max {}",
                band.group, band.min, band.max
            )));
        }
        if self.death.luck_roll_min > self.death.luck_roll_max {
            return Err(invalid("death.luck_roll_min is above death.luck_roll_max"));
        }
        if self.death.luck_divisor <= Decimal::ZERO {
            return Err(invalid("death.luck_divisor must be positive"));
        }
        let family = &self.family;
        if family.candidate_count_min > family.candidate_count_max {
            return Err(invalid("family.candidate_count_min is above candidate_count_max"));
        }
        for (name, range) in [
            ("family.candidate_scale", &family.candidate_scale),
            ("family.candidate_health_scale", &family.candidate_health_scale),
            ("family.candidate_cost_fraction", &family.candidate_cost_fraction),
        ] {
            if range.low > range.high {
                return Err(invalid(&format!("{name} has low above high")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> RulesError {
    RulesError::InvalidConfig {
        reason: reason.to_owned(),
    }
}

/// One inclusive band of the age table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgeBand {
    /// The group this band represents.
    pub group: AgeGroup,
    /// Youngest age in the band.
    pub min: u32,
    /// Oldest age in the band.
    pub max: u32,
    /// Base yearly death chance (0--1).
    pub death_chance: Decimal,
}

/// Free-selection thresholds per age group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectionConfig {
    /// Free selections for groups without an override (default: 1).
    #[serde(default = "default_free_selections")]
    pub default_free: u32,

    /// Per-group overrides (default: teenagers get 2).
    #[serde(default = "default_free_overrides")]
    pub overrides: BTreeMap<AgeGroup, u32>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_free: default_free_selections(),
            overrides: default_free_overrides(),
        }
    }
}

impl SelectionConfig {
    /// Free selections for an age group.
    pub fn max_free(&self, group: AgeGroup) -> u32 {
        self.overrides.get(&group).copied().unwrap_or(self.default_free)
    }
}

/// Elder health decay and succession thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgingConfig {
    /// Age from which health decays every year (default: 66).
    #[serde(default = "default_health_decay_start")]
    pub health_decay_start: u32,

    /// Health lost per year once decay starts (default: 1).
    #[serde(default = "default_health_decay_base")]
    pub health_decay_base: Decimal,

    /// Age from which decay steepens by one extra point per year past it
    /// (default: 100).
    #[serde(default = "default_steep_decay_start")]
    pub steep_decay_start: u32,

    /// Age at which a parent with children must pick a successor
    /// (default: 65).
    #[serde(default = "default_succession_age")]
    pub succession_age: u32,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            health_decay_start: default_health_decay_start(),
            health_decay_base: default_health_decay_base(),
            steep_decay_start: default_steep_decay_start(),
            succession_age: default_succession_age(),
        }
    }
}

/// Reprieve roll parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeathConfig {
    /// Lowest face of the luck die (default: 1).
    #[serde(default = "default_luck_roll_min")]
    pub luck_roll_min: u32,

    /// Highest face of the luck die, inclusive (default: 100).
    #[serde(default = "default_luck_roll_max")]
    pub luck_roll_max: u32,

    /// Luck is divided by this and floored to get the reprieve threshold
    /// (default: 5).
    #[serde(default = "default_luck_divisor")]
    pub luck_divisor: Decimal,
}

impl Default for DeathConfig {
    fn default() -> Self {
        Self {
            luck_roll_min: default_luck_roll_min(),
            luck_roll_max: default_luck_roll_max(),
            luck_divisor: default_luck_divisor(),
        }
    }
}

/// An inclusive decimal range used for random scaling factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DecimalRange {
    /// Lower bound.
    pub low: Decimal,
    /// Upper bound.
    pub high: Decimal,
}

impl DecimalRange {
    /// Create a range from two decimals.
    pub const fn new(low: Decimal, high: Decimal) -> Self {
        Self { low, high }
    }
}

/// Spouse search, childbirth, and inheritance parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyConfig {
    /// Base spouse-search success chance (default: 0.1).
    #[serde(default = "default_spouse_search_base")]
    pub spouse_search_base: Decimal,

    /// Ceiling on the spouse-search chance (default: 0.8).
    #[serde(default = "default_spouse_search_cap")]
    pub spouse_search_cap: Decimal,

    /// Floor on the health factor of the spouse-search chance (default: 0.5).
    #[serde(default = "default_spouse_search_health_floor")]
    pub spouse_search_health_floor: Decimal,

    /// Base childbirth chance (default: 0.3).
    #[serde(default = "default_childbirth_base")]
    pub childbirth_base: Decimal,

    /// Ceiling on the childbirth chance (default: 0.9).
    #[serde(default = "default_childbirth_cap")]
    pub childbirth_cap: Decimal,

    /// Floor on the stress factor of the childbirth chance (default: 0.1).
    #[serde(default = "default_childbirth_stress_floor")]
    pub childbirth_stress_floor: Decimal,

    /// Fewest candidates a successful search produces (default: 3).
    #[serde(default = "default_candidate_count_min")]
    pub candidate_count_min: u32,

    /// Most candidates a successful search produces (default: 5).
    #[serde(default = "default_candidate_count_max")]
    pub candidate_count_max: u32,

    /// Scaling applied to the player's beauty and charisma (default: 0.8--1.2).
    #[serde(default = "default_candidate_scale")]
    pub candidate_scale: DecimalRange,

    /// Scaling applied to the player's health (default: 0.9--1.1).
    #[serde(default = "default_candidate_health_scale")]
    pub candidate_health_scale: DecimalRange,

    /// Fraction of the player's money a candidate costs (default: 0.05--0.15).
    #[serde(default = "default_candidate_cost_fraction")]
    pub candidate_cost_fraction: DecimalRange,

    /// Weight of the player's stat in a child's stat (default: 0.5).
    #[serde(default = "default_parent_weight")]
    pub parent_weight: Decimal,

    /// Weight of the spouse's stat in a child's stat (default: 0.3).
    #[serde(default = "default_spouse_weight")]
    pub spouse_weight: Decimal,

    /// Flat amount added to every inherited stat (default: 50).
    #[serde(default = "default_inheritance_base")]
    pub inheritance_base: Decimal,

    /// Inherited stats vary uniformly by up to this much either way
    /// (default: 10).
    #[serde(default = "default_inheritance_variation")]
    pub inheritance_variation: Decimal,

    /// Stand-in for a stat the spouse candidate does not show (default: 50).
    #[serde(default = "default_missing_spouse_stat")]
    pub missing_spouse_stat: Decimal,

    /// Upper bound of a child's inherited stats (default: 100).
    #[serde(default = "default_child_stat_max")]
    pub child_stat_max: Decimal,

    /// Fraction of the player's money handed to each newborn (default: 0.2).
    #[serde(default = "default_money_transfer_fraction")]
    pub money_transfer_fraction: Decimal,

    /// Legacy flow: choosing a spouse immediately produces a child
    /// (default: false).
    #[serde(default)]
    pub child_on_spouse_selection: bool,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            spouse_search_base: default_spouse_search_base(),
            spouse_search_cap: default_spouse_search_cap(),
            spouse_search_health_floor: default_spouse_search_health_floor(),
            childbirth_base: default_childbirth_base(),
            childbirth_cap: default_childbirth_cap(),
            childbirth_stress_floor: default_childbirth_stress_floor(),
            candidate_count_min: default_candidate_count_min(),
            candidate_count_max: default_candidate_count_max(),
            candidate_scale: default_candidate_scale(),
            candidate_health_scale: default_candidate_health_scale(),
            candidate_cost_fraction: default_candidate_cost_fraction(),
            parent_weight: default_parent_weight(),
            spouse_weight: default_spouse_weight(),
            inheritance_base: default_inheritance_base(),
            inheritance_variation: default_inheritance_variation(),
            missing_spouse_stat: default_missing_spouse_stat(),
            child_stat_max: default_child_stat_max(),
            money_transfer_fraction: default_money_transfer_fraction(),
            child_on_spouse_selection: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_age_bands() -> Vec<AgeBand> {
    vec![
        AgeBand {
            group: AgeGroup::Baby,
            min: 0,
            max: 2,
            death_chance: Decimal::new(2, 2),
        },
        AgeBand {
            group: AgeGroup::Child,
            min: 3,
            max: 12,
            death_chance: Decimal::new(5, 3),
        },
        AgeBand {
            group: AgeGroup::Teenager,
            min: 13,
            max: 19,
            death_chance: Decimal::new(3, 3),
        },
        AgeBand {
            group: AgeGroup::Adult,
            min: 20,
            max: 65,
            death_chance: Decimal::new(1, 3),
        },
        AgeBand {
            group: AgeGroup::Elder,
            min: 66,
            max: 200,
            death_chance: Decimal::new(1, 2),
        },
    ]
}

const fn default_prestige_unlock_age() -> u32 {
    18
}

const fn default_free_selections() -> u32 {
    1
}

fn default_free_overrides() -> BTreeMap<AgeGroup, u32> {
    BTreeMap::from([(AgeGroup::Teenager, 2)])
}

const fn default_health_decay_start() -> u32 {
    66
}

const fn default_health_decay_base() -> Decimal {
    Decimal::ONE
}

const fn default_steep_decay_start() -> u32 {
    100
}

const fn default_succession_age() -> u32 {
    65
}

const fn default_luck_roll_min() -> u32 {
    1
}

const fn default_luck_roll_max() -> u32 {
    100
}

fn default_luck_divisor() -> Decimal {
    Decimal::from(5)
}

const fn default_spouse_search_base() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_spouse_search_cap() -> Decimal {
    Decimal::from_parts(8, 0, 0, false, 1)
}

const fn default_spouse_search_health_floor() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

const fn default_childbirth_base() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 1)
}

const fn default_childbirth_cap() -> Decimal {
    Decimal::from_parts(9, 0, 0, false, 1)
}

const fn default_childbirth_stress_floor() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_candidate_count_min() -> u32 {
    3
}

const fn default_candidate_count_max() -> u32 {
    5
}

const fn default_candidate_scale() -> DecimalRange {
    DecimalRange::new(
        Decimal::from_parts(8, 0, 0, false, 1),
        Decimal::from_parts(12, 0, 0, false, 1),
    )
}

const fn default_candidate_health_scale() -> DecimalRange {
    DecimalRange::new(
        Decimal::from_parts(9, 0, 0, false, 1),
        Decimal::from_parts(11, 0, 0, false, 1),
    )
}

const fn default_candidate_cost_fraction() -> DecimalRange {
    DecimalRange::new(
        Decimal::from_parts(5, 0, 0, false, 2),
        Decimal::from_parts(15, 0, 0, false, 2),
    )
}

const fn default_parent_weight() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

const fn default_spouse_weight() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 1)
}

const fn default_inheritance_base() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

const fn default_inheritance_variation() -> Decimal {
    Decimal::TEN
}

const fn default_missing_spouse_stat() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

const fn default_child_stat_max() -> Decimal {
    Decimal::ONE_HUNDRED
}

const fn default_money_transfer_fraction() -> Decimal {
    Decimal::from_parts(2, 0, 0, false, 1)
}
