//! The round loop.
//!
//! `Battle` is the authoritative driver for one fight: it owns the party and
//! the boss for its lifetime, sequences phase updates, effect ticks, turns,
//! and termination checks, and is the only place combat actions are resolved
//! against their targets.
//!
//! Per round:
//! 1. the boss re-evaluates its phase,
//! 2. start-of-round effect ticks run over every living combatant in list
//!    order (party first, boss last),
//! 3. the round's turn order is fixed from the currently living,
//! 4. each actor in order (skipped if it died earlier in the round) chooses
//!    and resolves an action, reduces its cooldowns, and both termination
//!    conditions are checked immediately,
//! 5. end-of-round effect ticks run,
//! 6. termination is checked once more.
//!
//! A decided battle returns at once: remaining turns and ticks of that round
//! never run.

use crate::action::{Action, ActionKind, ActionOutcome, ActorId};
use crate::character::{Character, TurnView};
use crate::effect::TickPhase;
use crate::rng::{PcgRng, RngOracle, compute_seed};
use crate::skill::SkillId;
use crate::turn::TurnOrder;

/// Roll context distinguishing crit checks from any future roll kinds.
const CRIT_ROLL_CONTEXT: u32 = 0;

/// Who won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BattleOutcome {
    /// The boss fell.
    Party,
    /// Every hero fell.
    Boss,
    /// Nobody was eliminated within the round limit.
    Draw,
}

/// Result of one `run` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    /// Round the battle was decided in (the full limit for a draw).
    pub rounds: u32,
}

/// One battle: a party of heroes against a boss.
///
/// The battle exclusively owns its combatants while it exists; nothing else
/// mutates them during a run. `run` may be called again on the same instance
/// to continue fighting with the accumulated state.
pub struct Battle {
    party: Vec<Box<dyn Character>>,
    boss: Box<dyn Character>,
    rng: Box<dyn RngOracle>,
    seed: u64,
    nonce: u64,
}

impl Battle {
    /// Creates a battle with the default deterministic roll source.
    pub fn new(party: Vec<Box<dyn Character>>, boss: Box<dyn Character>) -> Self {
        Self {
            party,
            boss,
            rng: Box::new(PcgRng),
            seed: 0,
            nonce: 0,
        }
    }

    /// Sets the base seed for crit rolls (builder form).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Substitutes the roll source (builder form). Tests use this to script
    /// crit outcomes.
    pub fn with_rng(mut self, rng: Box<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn party(&self) -> &[Box<dyn Character>] {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut [Box<dyn Character>] {
        &mut self.party
    }

    pub fn boss(&self) -> &dyn Character {
        self.boss.as_ref()
    }

    pub fn boss_mut(&mut self) -> &mut dyn Character {
        self.boss.as_mut()
    }

    /// Fights up to `max_rounds` rounds and reports the outcome.
    pub fn run(&mut self, max_rounds: u32) -> BattleResult {
        for round in 1..=max_rounds {
            if let Some(outcome) = self.termination() {
                return self.finish(outcome, round.saturating_sub(1));
            }
            tracing::info!(round, "round start");

            // (1) The boss re-reads its HP band.
            if let Some(phases) = self.boss.phase_behavior_mut() {
                phases.update_phase();
            }

            // (2) Start-of-round ticks.
            self.tick_living(TickPhase::Start);

            // (3) Acting order is fixed for the round.
            let order = TurnOrder::new(&self.roster());

            // (4) Turns, with immediate termination checks.
            for actor in order {
                if !self.combatant(actor).state().is_alive() {
                    continue;
                }
                let action = {
                    let view = self.view_for(actor);
                    self.combatant(actor).choose_action(&view)
                };
                self.resolve(actor, action);
                self.combatant_mut(actor).state_mut().reduce_cooldowns();

                if let Some(outcome) = self.termination() {
                    return self.finish(outcome, round);
                }
            }

            // (5) End-of-round ticks (poison can still decide the battle).
            self.tick_living(TickPhase::End);
            tracing::info!(round, "round end");

            // (6) Final check for the round.
            if let Some(outcome) = self.termination() {
                return self.finish(outcome, round);
            }
        }
        self.finish(BattleOutcome::Draw, max_rounds)
    }

    // ========================================================================
    // Round plumbing
    // ========================================================================

    fn finish(&self, outcome: BattleOutcome, rounds: u32) -> BattleResult {
        tracing::info!(%outcome, rounds, "battle over");
        BattleResult { outcome, rounds }
    }

    /// Boss dead beats heroes dead; resolution is one actor at a time, so
    /// both cannot fall in the same instant.
    fn termination(&self) -> Option<BattleOutcome> {
        if !self.boss.state().is_alive() {
            return Some(BattleOutcome::Party);
        }
        if self.party.iter().all(|hero| !hero.state().is_alive()) {
            return Some(BattleOutcome::Boss);
        }
        None
    }

    fn combatant(&self, id: ActorId) -> &dyn Character {
        if id.is_boss() {
            self.boss.as_ref()
        } else {
            self.party[id.index()].as_ref()
        }
    }

    fn combatant_mut(&mut self, id: ActorId) -> &mut dyn Character {
        if id.is_boss() {
            self.boss.as_mut()
        } else {
            self.party[id.index()].as_mut()
        }
    }

    /// Everyone, living or dead, in list order: party first, boss last.
    fn roster(&self) -> Vec<(ActorId, &dyn Character)> {
        let mut roster: Vec<(ActorId, &dyn Character)> = self
            .party
            .iter()
            .enumerate()
            .map(|(slot, hero)| (ActorId::hero(slot), hero.as_ref()))
            .collect();
        roster.push((ActorId::BOSS, self.boss.as_ref()));
        roster
    }

    fn tick_living(&mut self, phase: TickPhase) {
        let ids: Vec<ActorId> = self.roster().iter().map(|(id, _)| *id).collect();
        for id in ids {
            if self.combatant(id).state().is_alive() {
                self.combatant_mut(id).state_mut().tick_effects(phase);
            }
        }
    }

    /// What the acting combatant sees: living allies and living opponents.
    fn view_for(&self, actor: ActorId) -> TurnView<'_> {
        let mut heroes: Vec<(ActorId, &dyn Character)> = Vec::new();
        for (slot, hero) in self.party.iter().enumerate() {
            if hero.state().is_alive() {
                heroes.push((ActorId::hero(slot), hero.as_ref()));
            }
        }
        let mut boss_side: Vec<(ActorId, &dyn Character)> = Vec::new();
        if self.boss.state().is_alive() {
            boss_side.push((ActorId::BOSS, self.boss.as_ref()));
        }

        if actor.is_boss() {
            TurnView {
                allies: boss_side,
                opponents: heroes,
            }
        } else {
            TurnView {
                allies: heroes,
                opponents: boss_side,
            }
        }
    }

    // ========================================================================
    // Action resolution
    // ========================================================================

    fn resolve(&mut self, actor: ActorId, action: Action) {
        match action.kind {
            ActionKind::Wait => {
                tracing::info!(actor = self.combatant(actor).state().name(), "waits");
            }
            ActionKind::BasicAttack => {
                let Some(target) = action.target else {
                    tracing::warn!(%actor, "basic attack without a target forfeited");
                    return;
                };
                let amount = self.combatant(actor).basic_attack();
                tracing::info!(
                    actor = self.combatant(actor).state().name(),
                    defender = self.combatant(target).state().name(),
                    amount,
                    "basic attack"
                );
                self.deal_damage(actor, target, amount);
            }
            ActionKind::Skill(skill) => {
                let Some(target) = action.target else {
                    tracing::warn!(%actor, %skill, "skill without a target forfeited");
                    return;
                };
                self.resolve_skill(actor, skill, target);
            }
        }
    }

    fn resolve_skill(&mut self, actor: ActorId, skill: SkillId, target: ActorId) {
        let outcome = match self.combatant_mut(actor).use_skill(skill) {
            Ok(outcome) => outcome,
            Err(error) => {
                // Auto-logic never selects an illegal action; if a custom
                // character does, only its action is lost.
                tracing::warn!(%actor, %skill, error = %error, "action forfeited");
                return;
            }
        };
        tracing::info!(
            actor = self.combatant(actor).state().name(),
            on = self.combatant(target).state().name(),
            %skill,
            outcome = ?outcome,
            "skill"
        );
        match outcome {
            ActionOutcome::Damage(amount) => self.deal_damage(actor, target, amount),
            ActionOutcome::Heal(amount) => {
                let healed = self.combatant_mut(target).state_mut().heal(amount);
                tracing::info!(
                    recipient = self.combatant(target).state().name(),
                    healed,
                    "healed"
                );
            }
            ActionOutcome::Status(effect) => {
                self.combatant_mut(target).state_mut().add_effect(effect);
            }
        }
    }

    /// Applies damage to the target, rolling a crit when the attacker can.
    ///
    /// A successful crit applies the bonus portion as a second, separate
    /// damage event, so shields intercept it on its own.
    fn deal_damage(&mut self, attacker: ActorId, target: ActorId, amount: u32) {
        if amount == 0 {
            return;
        }

        let crit_params = self
            .combatant(attacker)
            .crit()
            .map(|crit| (crit.crit_chance(), crit.crit_multiplier()));
        let crit_bonus = match crit_params {
            Some((chance, multiplier)) => {
                let seed = compute_seed(self.seed, self.nonce, attacker.0, CRIT_ROLL_CONTEXT);
                self.nonce += 1;
                if self.rng.roll_d100(seed) <= chance {
                    amount * multiplier.saturating_sub(100) / 100
                } else {
                    0
                }
            }
            None => 0,
        };

        let dealt = self.combatant_mut(target).state_mut().receive_damage(amount);
        tracing::info!(
            defender = self.combatant(target).state().name(),
            dealt,
            "damage"
        );

        if crit_bonus > 0 {
            let bonus = self
                .combatant_mut(target)
                .state_mut()
                .receive_damage(crit_bonus);
            tracing::info!(
                defender = self.combatant(target).state().name(),
                bonus,
                "critical bonus"
            );
        }

        if !self.combatant(target).state().is_alive() {
            tracing::info!(defender = self.combatant(target).state().name(), "falls");
        }
    }
}
