//! The yearly death check.
//!
//! The chance of dying this year starts from the age band's base chance and
//! is scaled up by poor health and by stress:
//!
//! ```text
//! hm    = 1 - health / 100
//! sm    = 1 + stress / 100
//! final = base * (1 + hm + sm + hm * sm)      clamped to [0, 1]
//! ```
//!
//! A character struck by death may still be reprieved by luck: a die from
//! `1..=100` is rolled and the character survives when the roll lands below
//! `floor(luck / 5)`.

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{DeathConfig, RulesConfig};
use crate::dice;

/// The outcome of one death check, with the rolls that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DeathVerdict {
    /// The death roll missed.
    Survived {
        /// The year's death chance.
        chance: Decimal,
        /// The unit roll, at or above `chance`.
        roll: Decimal,
    },
    /// The death roll hit but the luck roll saved the character.
    Reprieved {
        /// The year's death chance.
        chance: Decimal,
        /// The unit roll, below `chance`.
        roll: Decimal,
        /// The luck die.
        luck_roll: u32,
        /// `floor(luck / divisor)`; the die had to land below this.
        threshold: Decimal,
    },
    /// Death is confirmed.
    Died {
        /// The year's death chance.
        chance: Decimal,
        /// The unit roll, below `chance`.
        roll: Decimal,
        /// The luck die.
        luck_roll: u32,
        /// `floor(luck / divisor)`; the die did not land below this.
        threshold: Decimal,
    },
}

impl DeathVerdict {
    /// Whether the character died.
    pub const fn is_dead(&self) -> bool {
        matches!(self, Self::Died { .. })
    }

    /// The death chance the verdict was judged against.
    pub const fn chance(&self) -> Decimal {
        match self {
            Self::Survived { chance, .. }
            | Self::Reprieved { chance, .. }
            | Self::Died { chance, .. } => *chance,
        }
    }
}

/// The year's death chance for the given base chance and stats, in `[0, 1]`.
pub fn death_chance(base: Decimal, health: Decimal, stress: Decimal) -> Decimal {
    let health_factor = Decimal::ONE.saturating_sub(percent(health));
    let stress_factor = Decimal::ONE.saturating_add(percent(stress));
    let multiplier = Decimal::ONE
        .saturating_add(health_factor)
        .saturating_add(stress_factor)
        .saturating_add(health_factor.saturating_mul(stress_factor));
    base.saturating_mul(multiplier).clamp(Decimal::ZERO, Decimal::ONE)
}

/// The year's death chance at `age`, looked up from the age table.
pub fn death_chance_at(
    config: &RulesConfig,
    age: u32,
    health: Decimal,
    stress: Decimal,
) -> Decimal {
    death_chance(config.base_death_chance(age), health, stress)
}

/// A death chance as a percentage in `[0, 100]`.
pub fn death_percentage(chance: Decimal) -> Decimal {
    chance.saturating_mul(Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
}

/// The reprieve threshold: `floor(luck / divisor)`.
pub fn luck_threshold(luck: Decimal, config: &DeathConfig) -> Decimal {
    luck.checked_div(config.luck_divisor)
        .unwrap_or(Decimal::ZERO)
        .floor()
}

/// Judge one death check from explicit rolls.
///
/// `luck_roll` is only consulted when `roll` falls below `chance`.
pub fn judge(
    chance: Decimal,
    roll: Decimal,
    luck: Decimal,
    luck_roll: u32,
    config: &DeathConfig,
) -> DeathVerdict {
    if !dice::succeeds(roll, chance) {
        return DeathVerdict::Survived { chance, roll };
    }
    let threshold = luck_threshold(luck, config);
    if Decimal::from(luck_roll) < threshold {
        DeathVerdict::Reprieved {
            chance,
            roll,
            luck_roll,
            threshold,
        }
    } else {
        DeathVerdict::Died {
            chance,
            roll,
            luck_roll,
            threshold,
        }
    }
}

/// Run the death check for a character at `age` with the given stats.
///
/// Draws at most two values from `rng`: the unit roll, and the luck die
/// only when the unit roll hits.
pub fn resolve_death(
    config: &RulesConfig,
    age: u32,
    health: Decimal,
    stress: Decimal,
    luck: Decimal,
    rng: &mut impl Rng,
) -> DeathVerdict {
    let chance = death_chance_at(config, age, health, stress);
    let roll = dice::unit_roll(rng);
    let luck_roll = if dice::succeeds(roll, chance) {
        rng.random_range(config.death.luck_roll_min..=config.death.luck_roll_max)
    } else {
        0
    };
    judge(chance, roll, luck, luck_roll, &config.death)
}

fn percent(value: Decimal) -> Decimal {
    value.checked_div(Decimal::ONE_HUNDRED).unwrap_or(Decimal::ZERO)
}
