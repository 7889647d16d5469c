//! The game facade the browser UI drives.
//!
//! [`LifeEngine`] owns the event catalog, the rule parameters, and the random
//! source. The character state is always passed in, so a UI can hold it,
//! snapshot it, or render it without going through the engine.

use std::collections::BTreeSet;

use generations_rules::death;
use generations_rules::eligibility::EligibilityContext;
use generations_rules::lineage::{self, SuccessionRequest};
use generations_rules::penalty;
use generations_rules::stats::apply_deltas;
use generations_rules::{RulesConfig, RulesError};
use generations_types::{
    CharacterState, ChildId, EventDefinition, EventId, SpouseId, StatDeltas, StatName,
};
use rand::Rng;
use rust_decimal::Decimal;

use crate::catalog::EventCatalog;
use crate::turn::{self, TurnOutcome};

/// Catalog, rules, and random source for one game.
#[derive(Debug, Clone)]
pub struct LifeEngine<R> {
    catalog: EventCatalog,
    rules: RulesConfig,
    rng: R,
}

impl<R: Rng> LifeEngine<R> {
    /// Create an engine from its parts.
    pub const fn new(catalog: EventCatalog, rules: RulesConfig, rng: R) -> Self {
        Self {
            catalog,
            rules,
            rng,
        }
    }

    /// An engine with the built-in catalog and default rules.
    pub fn with_standard(rng: R) -> Self {
        Self::new(EventCatalog::standard(), RulesConfig::default(), rng)
    }

    /// The event catalog.
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// The rule parameters.
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// A fresh character with the configured starting stats.
    pub fn new_character(&self) -> CharacterState {
        CharacterState::new(self.rules.starting_stats.clone())
    }

    /// Events the character may select this turn, in catalog order.
    pub fn available_events(&self, state: &CharacterState) -> Vec<&EventDefinition> {
        self.catalog.available(
            state.age,
            &state.completed_events,
            EligibilityContext::of(state),
        )
    }

    /// Net stat change the selection would cause this turn, penalties
    /// included. Invalid ids are ignored.
    pub fn preview_stat_changes(
        &self,
        state: &CharacterState,
        selected: &BTreeSet<EventId>,
    ) -> StatDeltas {
        let selection = self.catalog.resolve_selection(
            selected,
            state.age,
            &state.completed_events,
            EligibilityContext::of(state),
        );
        let max_free = self.rules.max_free_selections(state.age);
        penalty::preview_effects_and_penalties(&selection.effective, max_free)
    }

    /// Death chance (0 to 100) at the current age if the selection's stat
    /// changes were applied.
    pub fn preview_death_chance(
        &self,
        state: &CharacterState,
        selected: &BTreeSet<EventId>,
    ) -> Decimal {
        let mut stats = state.stats.clone();
        apply_deltas(&mut stats, &self.preview_stat_changes(state, selected));
        let chance = death::death_chance_at(
            &self.rules,
            state.age,
            stats.value_or_zero(StatName::Health),
            stats.value_or_zero(StatName::Stress),
        );
        death::death_percentage(chance)
    }

    /// Age the character by one year with the given selection.
    pub fn resolve_age_up(
        &mut self,
        state: &mut CharacterState,
        selected: &BTreeSet<EventId>,
    ) -> TurnOutcome {
        turn::resolve_age_up(state, selected, &self.catalog, &self.rules, &mut self.rng)
    }

    /// Use prestige and start over.
    ///
    /// # Errors
    ///
    /// See [`lineage::trigger_prestige`].
    pub fn trigger_prestige(&self, state: &mut CharacterState) -> Result<(), RulesError> {
        lineage::trigger_prestige(state, &self.rules)
    }

    /// Choose one of the offered spouse candidates.
    ///
    /// # Errors
    ///
    /// See [`lineage::select_spouse`].
    pub fn select_spouse(
        &mut self,
        state: &mut CharacterState,
        candidate: SpouseId,
    ) -> Result<Option<ChildId>, RulesError> {
        lineage::select_spouse(state, candidate, &self.rules, &mut self.rng)
    }

    /// Turn down every offered candidate.
    #[allow(clippy::unused_self)]
    pub fn decline_spouse(&self, state: &mut CharacterState) {
        lineage::decline_spouse_candidates(state);
    }

    /// Ask to pick a successor now.
    pub fn request_succession(&self, state: &mut CharacterState) -> SuccessionRequest {
        lineage::request_succession(state, &self.rules)
    }

    /// Continue the lineage as one of the children.
    ///
    /// # Errors
    ///
    /// See [`lineage::promote_child`].
    #[allow(clippy::unused_self)]
    pub fn choose_successor(
        &self,
        state: &mut CharacterState,
        child: ChildId,
    ) -> Result<(), RulesError> {
        lineage::promote_child(state, child)
    }
}

#[cfg(test)]
mod tests {
    use generations_types::{Child, StatBlock, StatCategory};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn engine() -> LifeEngine<SmallRng> {
        LifeEngine::with_standard(SmallRng::seed_from_u64(42))
    }

    fn ids(names: &[&str]) -> BTreeSet<EventId> {
        names.iter().map(|&name| EventId::from(name)).collect()
    }

    #[test]
    fn new_character_is_a_newborn() {
        let state = engine().new_character();
        assert_eq!(state.age, 0);
        assert_eq!(state.generation, 1);
        assert_eq!(state.stats.value(StatName::Health), Some(Decimal::ONE_HUNDRED));
    }

    #[test]
    fn previews_are_idempotent_and_pure() {
        let engine = engine();
        let state = engine.new_character();
        let before = state.clone();
        let selected = ids(&["first_steps", "first_words"]);
        let first = engine.preview_stat_changes(&state, &selected);
        let second = engine.preview_stat_changes(&state, &selected);
        assert_eq!(first, second);
        assert_eq!(state, before);
        // Effects plus over-selection penalties.
        assert_eq!(first.get(StatCategory::Innate, StatName::Health), Decimal::from(-6));
        assert_eq!(first.get(StatCategory::Innate, StatName::Agility), Decimal::from(5));
        assert_eq!(first.get(StatCategory::Innate, StatName::Stress), Decimal::from(4));
    }

    #[test]
    fn preview_ignores_invalid_ids() {
        let engine = engine();
        let state = engine.new_character();
        let with_noise = engine.preview_stat_changes(&state, &ids(&["enjoy_life", "career", "x"]));
        let clean = engine.preview_stat_changes(&state, &ids(&["enjoy_life"]));
        assert_eq!(with_noise, clean);
    }

    #[test]
    fn death_preview_is_a_percentage() {
        let engine = engine();
        let state = engine.new_character();
        let before = state.clone();
        assert_eq!(engine.preview_death_chance(&state, &BTreeSet::new()), Decimal::from(4));
        let risky = engine.preview_death_chance(&state, &ids(&["first_steps", "first_words"]));
        assert!(risky > Decimal::from(4));
        assert!(risky <= Decimal::ONE_HUNDRED);
        assert_eq!(state, before);
    }

    #[test]
    fn age_up_goes_through_the_engine() {
        let mut engine = engine();
        let mut state = engine.new_character();
        let outcome = engine.resolve_age_up(&mut state, &ids(&["enjoy_life"]));
        assert!(!outcome.is_rejected());
        assert_eq!(state.age, 1);
    }

    #[test]
    fn successor_takes_over() {
        let engine = engine();
        let mut state = engine.new_character();
        state.age = 40;
        let heir = ChildId::from_random_bytes([3; 16]);
        state.children.push(Child {
            id: heir,
            name: "Child 1".to_owned(),
            age: 12,
            stats: StatBlock::standard(),
        });
        assert_eq!(
            engine.request_succession(&mut state),
            SuccessionRequest::Pending { children: 1 }
        );
        assert!(engine.choose_successor(&mut state, heir).is_ok());
        assert_eq!(state.age, 12);
        assert!(state.children.is_empty());
        assert!(state.selected_spouse.is_none());
        assert!(!state.is_married);
    }

    #[test]
    fn prestige_requires_unlock() {
        let engine = engine();
        let mut state = engine.new_character();
        assert!(matches!(
            engine.trigger_prestige(&mut state),
            Err(RulesError::PrestigeLocked { .. })
        ));
        state.age = 18;
        state.prestige_unlocked = true;
        assert!(engine.trigger_prestige(&mut state).is_ok());
        assert_eq!(state.age, 0);
        assert!(state.prestige_active);
        assert!(matches!(
            engine.trigger_prestige(&mut state),
            Err(RulesError::PrestigeAlreadyUsed)
        ));
    }
}
