//! Elder health decay.
//!
//! From the decay start age (66) every age-up costs a point of health. From
//! the steep decay age (100) it costs an additional `age - 100` points.

use generations_types::{StatBlock, StatName};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::AgingConfig;

/// Health lost at `age`. Zero before the decay start age.
pub fn health_decay(config: &AgingConfig, age: u32) -> Decimal {
    if age < config.health_decay_start {
        return Decimal::ZERO;
    }
    let steep = age.saturating_sub(config.steep_decay_start);
    config.health_decay_base.saturating_add(Decimal::from(steep))
}

/// Subtract this year's decay from health, clamped at the stat's floor.
/// Returns the decay amount that was applied.
pub fn apply_health_decay(stats: &mut StatBlock, config: &AgingConfig, age: u32) -> Decimal {
    let decay = health_decay(config, age);
    if decay.is_zero() {
        return decay;
    }
    if let Some(health) = stats.get_mut(StatName::Health) {
        health.apply(Decimal::ZERO.saturating_sub(decay));
        debug!(age, %decay, health = %health.value, "Elder health decay");
    }
    decay
}
