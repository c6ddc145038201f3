//! Combatant state and the `Character` capability surface.
//!
//! `ActorState` holds everything every combatant shares: identity, a
//! [`StatBlock`], the ordered effect list, and the cooldown table. Concrete
//! roles (heroes, the boss) wrap an `ActorState` and implement [`Character`]
//! on top of it.
//!
//! Optional capabilities (critical hits, phase behavior) are modeled as
//! interface queries with `None` defaults, so the battle loop asks "can this
//! actor do X" instead of testing concrete types.

use std::collections::BTreeMap;

use crate::action::{Action, ActionOutcome, ActorId};
use crate::config::BattleConfig;
use crate::effect::{Effect, TickPhase};
use crate::skill::{SkillError, SkillId};
use crate::stats::StatBlock;

/// Shared mutable state of one combatant.
pub struct ActorState {
    name: String,
    stats: StatBlock,
    effects: Vec<Box<dyn Effect>>,
    cooldowns: BTreeMap<SkillId, u32>,
}

impl ActorState {
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            stats,
            effects: Vec::new(),
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    /// Silenced while any active effect inhibits skills. Derived, not stored.
    pub fn is_silenced(&self) -> bool {
        self.effects.iter().any(|effect| effect.inhibits_skills())
    }

    // ========================================================================
    // Damage and healing
    // ========================================================================

    /// Takes a hit, letting active effects intercept it first.
    ///
    /// Interception hooks run in application order; each may shrink the
    /// running amount, and the pipeline stops once nothing is left. The
    /// remainder is subtracted from HP (clamped at zero).
    ///
    /// Returns the actual HP lost, not the pre-interception amount. Dead
    /// characters and zero amounts are a no-op returning 0.
    pub fn receive_damage(&mut self, amount: u32) -> u32 {
        if amount == 0 || !self.is_alive() {
            return 0;
        }
        let mut remaining = amount;
        for effect in &mut self.effects {
            remaining = effect.on_damage(remaining);
            if remaining == 0 {
                break;
            }
        }
        let before = self.stats.hp();
        self.stats.set_hp(before.saturating_sub(remaining));
        before - self.stats.hp()
    }

    /// Restores HP up to the maximum.
    ///
    /// Returns the HP actually gained. Dead characters and zero amounts are
    /// a no-op returning 0.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if amount == 0 || !self.is_alive() {
            return 0;
        }
        let before = self.stats.hp();
        self.stats.set_hp(before.saturating_add(amount));
        self.stats.hp() - before
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Attaches an effect, firing its `on_apply` hook.
    pub fn add_effect(&mut self, mut effect: Box<dyn Effect>) {
        tracing::debug!(owner = self.name.as_str(), effect = effect.name(), "effect applied");
        effect.on_apply(self);
        self.effects.push(effect);
    }

    /// Active effects in application order.
    pub fn effects(&self) -> &[Box<dyn Effect>] {
        &self.effects
    }

    /// Removes every effect with the given name, firing `on_expire` on each.
    ///
    /// Returns how many were removed. This is the dispel path used by items;
    /// the round loop never calls it.
    pub fn remove_effects_named(&mut self, name: &str) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].name() == name {
                let mut effect = self.effects.remove(index);
                effect.on_expire(self);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Runs one tick phase over the effect list.
    ///
    /// Each effect is lifted out of the list while its hook runs, so damage
    /// it routes back through [`ActorState::receive_damage`] is intercepted
    /// by the *other* active effects. After an end tick, effects whose
    /// duration reached zero are removed in application order, firing
    /// `on_expire`.
    pub fn tick_effects(&mut self, phase: TickPhase) {
        let mut index = 0;
        while index < self.effects.len() {
            let mut effect = self.effects.remove(index);
            match phase {
                TickPhase::Start => effect.on_turn_start(self),
                TickPhase::End => effect.on_turn_end(self),
            }
            self.effects.insert(index, effect);
            index += 1;
        }

        if phase == TickPhase::End {
            let mut index = 0;
            while index < self.effects.len() {
                if self.effects[index].duration() <= 0 {
                    let mut expired = self.effects.remove(index);
                    tracing::debug!(
                        owner = self.name.as_str(),
                        effect = expired.name(),
                        "effect expired"
                    );
                    expired.on_expire(self);
                } else {
                    index += 1;
                }
            }
        }
    }

    // ========================================================================
    // Skills and cooldowns
    // ========================================================================

    /// Remaining cooldown turns for a skill (0 = ready).
    pub fn cooldown(&self, skill: SkillId) -> u32 {
        self.cooldowns.get(&skill).copied().unwrap_or(0)
    }

    /// True if the skill is off cooldown and the character is not silenced.
    pub fn can_use(&self, skill: SkillId) -> bool {
        self.cooldown(skill) == 0 && !self.is_silenced()
    }

    /// Starts (or restarts) a skill's cooldown.
    pub fn start_cooldown(&mut self, skill: SkillId, turns: u32) {
        self.cooldowns.insert(skill, turns);
    }

    /// Spends MP, failing without side effects if there is not enough.
    pub fn spend_mp(&mut self, amount: u32) -> Result<(), SkillError> {
        let available = self.stats.mp();
        if available < amount {
            return Err(SkillError::InsufficientMana {
                needed: amount,
                available,
            });
        }
        self.stats.set_mp(available - amount);
        Ok(())
    }

    /// Gates and pays for a known skill: silence, then cooldown, then MP.
    /// On success the skill's cooldown is started.
    pub fn prepare_skill(&mut self, skill: SkillId) -> Result<(), SkillError> {
        if self.is_silenced() {
            return Err(SkillError::Silenced {
                actor: self.name.clone(),
            });
        }
        let remaining = self.cooldown(skill);
        if remaining > 0 {
            return Err(SkillError::OnCooldown { skill, remaining });
        }
        self.spend_mp(skill.mp_cost())?;
        self.start_cooldown(skill, skill.cooldown_turns());
        Ok(())
    }

    /// Decrements every nonzero cooldown by one, flooring at zero.
    /// Called once per actor per round, after its action resolves.
    pub fn reduce_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

// ============================================================================
// Capability traits
// ============================================================================

/// What the acting character can see while choosing an action.
///
/// Both lists carry only living combatants, in their battle order.
pub struct TurnView<'a> {
    pub allies: Vec<(ActorId, &'a dyn Character)>,
    pub opponents: Vec<(ActorId, &'a dyn Character)>,
}

/// Critical-hit capability, composed into roles that can crit.
///
/// Chance and multiplier are integer percentages; the battle loop rolls a
/// d100 per damaging hit and applies the bonus portion as its own damage
/// event.
pub trait CritCapable {
    fn crit_chance(&self) -> u32 {
        BattleConfig::DEFAULT_CRIT_CHANCE
    }

    fn crit_multiplier(&self) -> u32 {
        BattleConfig::DEFAULT_CRIT_MULTIPLIER
    }
}

/// Phase capability exposed by combatants whose behavior shifts with HP.
pub trait PhaseBehavior {
    /// Recomputes the phase from the current HP ratio, overwriting the
    /// stored phase when it changed (in either direction).
    fn update_phase(&mut self);

    /// Currently active phase index.
    fn current_phase(&self) -> usize;
}

/// One combatant: shared state plus role behavior.
///
/// The two action operations are declarative: `basic_attack` reports the
/// damage the attack would deal and `use_skill` pays the skill's costs and
/// reports a tagged outcome. The battle loop applies either to the target
/// through its damage/heal/effect pipeline.
pub trait Character {
    fn state(&self) -> &ActorState;

    fn state_mut(&mut self) -> &mut ActorState;

    /// Role noun for logs and errors ("warrior", "boss", ...).
    fn role(&self) -> &'static str;

    /// Damage of this character's basic attack.
    fn basic_attack(&self) -> u32;

    /// Uses a skill, paying MP and starting its cooldown.
    ///
    /// Fails fast with a distinct [`SkillError`] on misuse; a failure aborts
    /// only this action.
    fn use_skill(&mut self, skill: SkillId) -> Result<ActionOutcome, SkillError>;

    /// Per-role auto-logic. The default does nothing, which is what inert
    /// stand-ins (test dummies) want.
    fn choose_action(&self, _view: &TurnView<'_>) -> Action {
        Action::wait()
    }

    /// Critical-hit capability, if this role has one.
    fn crit(&self) -> Option<&dyn CritCapable> {
        None
    }

    /// Phase behavior, if this combatant has any.
    fn phase_behavior_mut(&mut self) -> Option<&mut dyn PhaseBehavior> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Poison, Shield};

    fn actor() -> ActorState {
        ActorState::new("Unit", StatBlock::new(1, 5, 3, 2))
    }

    #[test]
    fn receive_damage_returns_actual_hp_delta() {
        let mut unit = actor();
        let max = unit.stats().max_hp();

        assert_eq!(unit.receive_damage(10), 10);
        assert_eq!(unit.stats().hp(), max - 10);

        // Overkill only costs what was left.
        unit.stats_mut().set_hp(4);
        assert_eq!(unit.receive_damage(100), 4);
        assert!(!unit.is_alive());

        // Dead characters take nothing.
        assert_eq!(unit.receive_damage(5), 0);
    }

    #[test]
    fn heal_clamps_at_max_and_skips_the_dead() {
        let mut unit = actor();
        let max = unit.stats().max_hp();

        unit.stats_mut().set_hp(max - 3);
        assert_eq!(unit.heal(10), 3);

        unit.stats_mut().set_hp(0);
        assert_eq!(unit.heal(10), 0);
    }

    #[test]
    fn interception_runs_in_application_order() {
        let mut unit = actor();
        unit.add_effect(Box::new(Shield::new(5, 3)));
        unit.add_effect(Box::new(Shield::new(5, 3)));

        // First shield eats 5, second eats 3.
        assert_eq!(unit.receive_damage(8), 0);
        // First is spent; second has 2 left.
        assert_eq!(unit.receive_damage(8), 6);
    }

    #[test]
    fn poison_tick_is_intercepted_by_own_shield() {
        let mut unit = actor();
        let hp = unit.stats().hp();
        unit.add_effect(Box::new(Shield::new(20, 5)));
        unit.add_effect(Box::new(Poison::new(7, 1)));

        unit.tick_effects(TickPhase::End);

        // The poison tick routed through the damage pipeline and the shield
        // swallowed it.
        assert_eq!(unit.stats().hp(), hp);
    }

    #[test]
    fn cooldowns_gate_and_decay() {
        let mut unit = actor();
        assert!(unit.can_use(SkillId::PowerStrike));

        unit.start_cooldown(SkillId::PowerStrike, 2);
        assert!(!unit.can_use(SkillId::PowerStrike));
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 2);

        unit.reduce_cooldowns();
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 1);
        unit.reduce_cooldowns();
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 0);
        assert!(unit.can_use(SkillId::PowerStrike));

        // Flooring at zero.
        unit.reduce_cooldowns();
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 0);
    }

    #[test]
    fn prepare_skill_spends_mp_and_starts_cooldown() {
        let mut unit = actor();
        unit.stats_mut().set_mp(15);

        unit.prepare_skill(SkillId::PowerStrike).unwrap();
        assert_eq!(unit.stats().mp(), 5);
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 2);

        assert!(matches!(
            unit.prepare_skill(SkillId::PowerStrike),
            Err(SkillError::OnCooldown { remaining: 2, .. })
        ));
    }

    #[test]
    fn prepare_skill_rejects_insufficient_mp_without_side_effects() {
        let mut unit = actor();
        unit.stats_mut().set_mp(5);

        assert!(matches!(
            unit.prepare_skill(SkillId::PowerStrike),
            Err(SkillError::InsufficientMana {
                needed: 10,
                available: 5
            })
        ));
        assert_eq!(unit.stats().mp(), 5);
        assert_eq!(unit.cooldown(SkillId::PowerStrike), 0);
    }

    #[test]
    fn remove_effects_named_dispels_all_matches() {
        let mut unit = actor();
        unit.add_effect(Box::new(Poison::new(2, 3)));
        unit.add_effect(Box::new(Shield::new(5, 3)));
        unit.add_effect(Box::new(Poison::new(4, 3)));

        assert_eq!(unit.remove_effects_named("Poison"), 2);
        assert_eq!(unit.effects().len(), 1);
        assert_eq!(unit.effects()[0].name(), "Shield");
    }
}
