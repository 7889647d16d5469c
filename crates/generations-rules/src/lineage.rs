//! Marriage, children, succession, and prestige.
//!
//! The lineage rules carry a family from one generation to the next:
//!
//! 1. **Spouse search** -- a successful roll produces 3--5 candidates and
//!    blocks further age-ups until one is chosen or all are declined.
//! 2. **Wedding** -- marries the chosen spouse.
//! 3. **Childbirth** -- a successful roll produces a child whose innate
//!    stats blend the player's, the spouse's, and a random variation.
//! 4. **Succession** -- from the succession age a child must be promoted to
//!    become the new character. Sibling children and the spouse are lost.
//! 5. **Prestige** -- a once-per-run reset to a brand-new character.

use generations_types::{
    CharacterState, Child, ChildId, EventDefinition, SpouseCandidate, SpouseId, Stat, StatBlock,
    StatName,
};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{FamilyConfig, RulesConfig};
use crate::dice;
use crate::error::RulesError;
use crate::stats::apply_deltas;

/// The stats a spouse candidate shows.
pub const CANDIDATE_STATS: [StatName; 3] = [StatName::Beauty, StatName::Charisma, StatName::Health];

// ---------------------------------------------------------------------------
// Probabilities
// ---------------------------------------------------------------------------

/// Chance that a spouse search succeeds:
/// `min(cap, base * beauty/100 * charisma/100 * max(floor, health/100))`.
pub fn spouse_search_probability(stats: &StatBlock, family: &FamilyConfig) -> Decimal {
    let beauty = percent(stats.value_or_zero(StatName::Beauty));
    let charisma = percent(stats.value_or_zero(StatName::Charisma));
    let health =
        percent(stats.value_or_zero(StatName::Health)).max(family.spouse_search_health_floor);
    family
        .spouse_search_base
        .saturating_mul(beauty)
        .saturating_mul(charisma)
        .saturating_mul(health)
        .min(family.spouse_search_cap)
}

/// Chance that trying for children succeeds:
/// `min(cap, base * health/100 * luck/100 * max(floor, (100 - stress)/100))`.
pub fn childbirth_probability(stats: &StatBlock, family: &FamilyConfig) -> Decimal {
    let health = percent(stats.value_or_zero(StatName::Health));
    let luck = percent(stats.value_or_zero(StatName::Luck));
    let calm = percent(Decimal::ONE_HUNDRED.saturating_sub(stats.value_or_zero(StatName::Stress)))
        .max(family.childbirth_stress_floor);
    family
        .childbirth_base
        .saturating_mul(health)
        .saturating_mul(luck)
        .saturating_mul(calm)
        .min(family.childbirth_cap)
}

fn percent(value: Decimal) -> Decimal {
    value.checked_div(Decimal::ONE_HUNDRED).unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Spouse search and selection
// ---------------------------------------------------------------------------

/// The result of one spouse search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpouseSearch {
    /// The chance the search had.
    pub probability: Decimal,
    /// The unit roll.
    pub roll: Decimal,
    /// Candidates produced (zero on failure).
    pub candidates: usize,
}

impl SpouseSearch {
    /// Whether the search produced candidates.
    pub const fn succeeded(&self) -> bool {
        self.candidates > 0
    }
}

/// Generate a fresh candidate list scaled from the player's stats.
///
/// Beauty and charisma are the player's values scaled by a factor from
/// `candidate_scale`; health uses `candidate_health_scale`. The cost is a
/// fraction of the player's money drawn from `candidate_cost_fraction`.
/// All values are floored.
pub fn generate_candidates(
    stats: &StatBlock,
    family: &FamilyConfig,
    rng: &mut impl Rng,
) -> Vec<SpouseCandidate> {
    let count = rng.random_range(family.candidate_count_min..=family.candidate_count_max);
    let money = stats.value_or_zero(StatName::Money);
    (1..=count)
        .map(|n| {
            let id = SpouseId::from_random_bytes(dice::random_id_bytes(rng));
            let shown = CANDIDATE_STATS
                .iter()
                .map(|&name| {
                    let range = if name == StatName::Health {
                        family.candidate_health_scale
                    } else {
                        family.candidate_scale
                    };
                    let scale = dice::uniform_between(rng, range);
                    (name, stats.value_or_zero(name).saturating_mul(scale).floor())
                })
                .collect();
            let fraction = dice::uniform_between(rng, family.candidate_cost_fraction);
            SpouseCandidate {
                id,
                name: format!("Spouse {n}"),
                stats: shown,
                cost: money.saturating_mul(fraction).floor(),
            }
        })
        .collect()
}

/// Roll for a spouse. On success the candidates are stored and the spouse
/// choice becomes pending.
pub fn attempt_spouse_search(
    state: &mut CharacterState,
    family: &FamilyConfig,
    rng: &mut impl Rng,
) -> SpouseSearch {
    let probability = spouse_search_probability(&state.stats, family);
    let roll = dice::unit_roll(rng);
    if !dice::succeeds(roll, probability) {
        debug!(%probability, %roll, "Spouse search failed");
        return SpouseSearch {
            probability,
            roll,
            candidates: 0,
        };
    }
    state.spouse_candidates = generate_candidates(&state.stats, family, rng);
    state.pending_spouse_selection = true;
    info!(
        %probability,
        %roll,
        candidates = state.spouse_candidates.len(),
        "Spouse candidates found"
    );
    SpouseSearch {
        probability,
        roll,
        candidates: state.spouse_candidates.len(),
    }
}

/// Choose one of the outstanding spouse candidates.
///
/// The candidate's cost is deducted from the player's money. Unless the
/// legacy `child_on_spouse_selection` flow is enabled, no child is created
/// and `Ok(None)` is returned.
///
/// # Errors
///
/// - [`RulesError::Dead`] if the character has died.
/// - [`RulesError::NoSpouseSelectionPending`] if no choice is outstanding.
/// - [`RulesError::UnknownCandidate`] if `candidate_id` is not offered.
/// - [`RulesError::InsufficientFunds`] if the player cannot pay. The state
///   is left unchanged.
pub fn select_spouse(
    state: &mut CharacterState,
    candidate_id: SpouseId,
    config: &RulesConfig,
    rng: &mut impl Rng,
) -> Result<Option<ChildId>, RulesError> {
    if state.is_dead {
        return Err(RulesError::Dead);
    }
    if !state.pending_spouse_selection {
        return Err(RulesError::NoSpouseSelectionPending);
    }
    let candidate = state
        .candidate(candidate_id)
        .cloned()
        .ok_or(RulesError::UnknownCandidate(candidate_id))?;
    let available = state.stats.value_or_zero(StatName::Money);
    if available < candidate.cost {
        return Err(RulesError::InsufficientFunds {
            cost: candidate.cost,
            available,
        });
    }

    if let Some(money) = state.stats.get_mut(StatName::Money) {
        money.apply(Decimal::ZERO.saturating_sub(candidate.cost));
    }
    info!(spouse = %candidate.name, cost = %candidate.cost, "Spouse chosen");
    state.selected_spouse = Some(candidate);
    state.spouse_candidates.clear();
    state.pending_spouse_selection = false;

    if config.family.child_on_spouse_selection {
        return create_child(state, config, rng).map(Some);
    }
    Ok(None)
}

/// Decline every outstanding candidate so play can continue.
pub fn decline_spouse_candidates(state: &mut CharacterState) {
    if state.pending_spouse_selection {
        debug!(candidates = state.spouse_candidates.len(), "Spouse candidates declined");
    }
    state.spouse_candidates.clear();
    state.pending_spouse_selection = false;
}

// ---------------------------------------------------------------------------
// Wedding
// ---------------------------------------------------------------------------

/// Marry the selected spouse, applying the wedding event's effects and
/// penalties once more as the cost of the ceremony.
///
/// Returns `false` (and changes nothing) when there is no spouse or the
/// couple is already married.
pub fn finalize_wedding(state: &mut CharacterState, wedding: &EventDefinition) -> bool {
    if !state.has_spouse() || state.is_married {
        return false;
    }
    apply_deltas(&mut state.stats, &wedding.effects);
    apply_deltas(&mut state.stats, &wedding.penalties);
    state.is_married = true;
    info!(
        spouse = state.selected_spouse.as_ref().map_or("", |s| s.name.as_str()),
        "Married"
    );
    true
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// The result of one attempt at having a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Childbirth {
    /// The chance the attempt had.
    pub probability: Decimal,
    /// The unit roll.
    pub roll: Decimal,
    /// The newborn, on success.
    pub child: Option<ChildId>,
}

/// Derive a child's stat block from the player and spouse.
///
/// Each innate stat except stress is
/// `floor(player * parent_weight + spouse * spouse_weight + base + variation)`
/// clamped to `[0, child_stat_max]`, where the variation is uniform in
/// `[-inheritance_variation, inheritance_variation]`. A stat the spouse does
/// not show counts as `missing_spouse_stat`. Every other stat takes its
/// bounds from `template` and starts at zero, except money, which receives
/// `floor(player_money * money_transfer_fraction)`.
pub fn breed_child(
    player: &StatBlock,
    spouse: &SpouseCandidate,
    template: &StatBlock,
    family: &FamilyConfig,
    rng: &mut impl Rng,
) -> StatBlock {
    let mut block = StatBlock::empty();
    for (_, name, stat) in template.iter() {
        block.insert(name, Stat::new(Decimal::ZERO, stat.min, stat.max));
    }

    for name in StatName::INNATE {
        if name == StatName::Stress {
            continue;
        }
        let from_player = player.value_or_zero(name).saturating_mul(family.parent_weight);
        let from_spouse = spouse
            .stat(name)
            .unwrap_or(family.missing_spouse_stat)
            .saturating_mul(family.spouse_weight);
        let variation = dice::symmetric_variation(rng, family.inheritance_variation);
        let value = from_player
            .saturating_add(from_spouse)
            .saturating_add(family.inheritance_base)
            .saturating_add(variation)
            .floor();
        block.insert(name, Stat::new(value, Decimal::ZERO, Some(family.child_stat_max)));
    }

    let transfer = money_transfer(player, family);
    if let Some(money) = block.get_mut(StatName::Money) {
        money.set_clamped(transfer);
    }
    block
}

/// Money handed to a newborn: `floor(player_money * money_transfer_fraction)`.
pub fn money_transfer(player: &StatBlock, family: &FamilyConfig) -> Decimal {
    player
        .value_or_zero(StatName::Money)
        .saturating_mul(family.money_transfer_fraction)
        .floor()
}

/// Create a child with the selected spouse and add it to the family.
///
/// The transferred money is deducted from the player.
///
/// # Errors
///
/// Returns [`RulesError::NoSpouse`] when no spouse has been chosen.
pub fn create_child(
    state: &mut CharacterState,
    config: &RulesConfig,
    rng: &mut impl Rng,
) -> Result<ChildId, RulesError> {
    let spouse = state.selected_spouse.as_ref().ok_or(RulesError::NoSpouse)?;
    let stats = breed_child(&state.stats, spouse, &config.starting_stats, &config.family, rng);
    let transfer = money_transfer(&state.stats, &config.family);
    if let Some(money) = state.stats.get_mut(StatName::Money) {
        money.apply(Decimal::ZERO.saturating_sub(transfer));
    }

    let id = ChildId::from_random_bytes(dice::random_id_bytes(rng));
    let name = format!("Child {}", state.children.len().saturating_add(1));
    info!(child = %name, %transfer, "Child born");
    state.children.push(Child {
        id,
        name,
        age: 0,
        stats,
    });
    Ok(id)
}

/// Roll for a child. Only married characters with a spouse can succeed.
pub fn attempt_childbirth(
    state: &mut CharacterState,
    config: &RulesConfig,
    rng: &mut impl Rng,
) -> Result<Childbirth, RulesError> {
    if !state.is_married {
        return Ok(Childbirth {
            probability: Decimal::ZERO,
            roll: Decimal::ZERO,
            child: None,
        });
    }
    let probability = childbirth_probability(&state.stats, &config.family);
    let roll = dice::unit_roll(rng);
    if !dice::succeeds(roll, probability) {
        debug!(%probability, %roll, "No child conceived");
        return Ok(Childbirth {
            probability,
            roll,
            child: None,
        });
    }
    let child = create_child(state, config, rng)?;
    Ok(Childbirth {
        probability,
        roll,
        child: Some(child),
    })
}

// ---------------------------------------------------------------------------
// Succession and resets
// ---------------------------------------------------------------------------

/// What a request to pick a successor led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SuccessionRequest {
    /// A succession choice is now pending.
    Pending {
        /// Children available to choose from.
        children: usize,
    },
    /// The character was dead without children and a new life began.
    NewLife,
    /// Nothing happened.
    Unavailable,
}

/// Ask to pick a successor ahead of the succession age.
///
/// With children and at least the prestige unlock age, the choice becomes
/// pending. A dead character without children starts a new life instead.
pub fn request_succession(state: &mut CharacterState, config: &RulesConfig) -> SuccessionRequest {
    if !state.children.is_empty() && state.age >= config.prestige_unlock_age {
        state.pending_succession = true;
        return SuccessionRequest::Pending {
            children: state.children.len(),
        };
    }
    if state.children.is_empty() && state.is_dead {
        reset_for_new_life(state, &config.starting_stats);
        return SuccessionRequest::NewLife;
    }
    SuccessionRequest::Unavailable
}

/// Promote a child to be the new character.
///
/// The child's stats and age replace the character's. Siblings, spouse,
/// candidates, and the event history are discarded; prestige flags carry
/// over and the generation count advances.
///
/// # Errors
///
/// - [`RulesError::NoSuccessionPending`] if no succession choice is open.
/// - [`RulesError::UnknownChild`] if `child_id` is not one of the children.
pub fn promote_child(state: &mut CharacterState, child_id: ChildId) -> Result<(), RulesError> {
    if !state.pending_succession {
        return Err(RulesError::NoSuccessionPending);
    }
    let position = state
        .children
        .iter()
        .position(|child| child.id == child_id)
        .ok_or(RulesError::UnknownChild(child_id))?;
    let heir = state.children.swap_remove(position);

    let mut next = CharacterState::new(heir.stats);
    next.age = heir.age;
    next.prestige_unlocked = state.prestige_unlocked;
    next.prestige_active = state.prestige_active;
    next.generation = state.generation.saturating_add(1);
    info!(
        heir = %heir.name,
        age = heir.age,
        generation = next.generation,
        "Successor chosen"
    );
    *state = next;
    Ok(())
}

/// Start over as a fresh character, keeping prestige flags and the
/// generation count.
pub fn reset_for_new_life(state: &mut CharacterState, starting_stats: &StatBlock) {
    let mut next = CharacterState::new(starting_stats.clone());
    next.prestige_unlocked = state.prestige_unlocked;
    next.prestige_active = state.prestige_active;
    next.generation = state.generation;
    info!(generation = next.generation, "New life started");
    *state = next;
}

// ---------------------------------------------------------------------------
// Prestige
// ---------------------------------------------------------------------------

/// Unlock prestige once the character reaches the unlock age, unless it
/// has already been used. Returns `true` when this call unlocked it.
pub const fn unlock_prestige(state: &mut CharacterState, unlock_age: u32) -> bool {
    if state.prestige_unlocked || state.prestige_active || state.age < unlock_age {
        return false;
    }
    state.prestige_unlocked = true;
    true
}

/// Use prestige: reset to a brand-new character. Possible once per run.
///
/// # Errors
///
/// - [`RulesError::PrestigeAlreadyUsed`] once prestige has been used.
/// - [`RulesError::PrestigeLocked`] before prestige unlocks.
pub fn trigger_prestige(
    state: &mut CharacterState,
    config: &RulesConfig,
) -> Result<(), RulesError> {
    if state.prestige_active {
        return Err(RulesError::PrestigeAlreadyUsed);
    }
    if !state.prestige_unlocked || state.age < config.prestige_unlock_age {
        return Err(RulesError::PrestigeLocked {
            age: state.age,
            unlock_age: config.prestige_unlock_age,
        });
    }
    let mut next = CharacterState::new(config.starting_stats.clone());
    next.prestige_active = true;
    info!(age = state.age, generation = state.generation, "Prestige used");
    *state = next;
    Ok(())
}
