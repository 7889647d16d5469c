//! Applying stat deltas to a stat block.

use generations_types::{StatBlock, StatDeltas};
use tracing::trace;

/// Apply every delta to the matching stat, clamping into the stat's bounds.
///
/// Deltas whose `(category, stat)` pair is absent from `stats` are ignored.
/// Zero deltas are no-ops. Arithmetic saturates, so no delta can panic.
pub fn apply_deltas(stats: &mut StatBlock, deltas: &StatDeltas) {
    for (category, name, delta) in deltas.iter() {
        match stats.get_in_mut(category, name) {
            Some(stat) => stat.apply(delta),
            None => trace!(%category, stat = %name, %delta, "Ignoring delta for absent stat"),
        }
    }
}

/// Sum two delta maps entry by entry.
pub fn sum_deltas(a: &StatDeltas, b: &StatDeltas) -> StatDeltas {
    let mut total = a.clone();
    total.merge(b);
    total
}
