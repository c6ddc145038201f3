//! Timed status effects.
//!
//! Effects are boxed trait objects owned by the character they were applied
//! to, kept in application order. Every lifecycle hook defaults to a no-op so
//! a concrete effect only implements the phases it cares about.
//!
//! # Tick protocol
//!
//! The owner drives ticking via [`ActorState::tick_effects`]:
//! - `Start`: `on_turn_start` fires on every active effect.
//! - `End`: `on_turn_end` fires on every active effect (this is where
//!   durations decrement), then every effect whose duration reached zero is
//!   removed, firing `on_expire`, in application order.
//!
//! An effect that never decrements its duration never self-removes.
//!
//! [`ActorState::tick_effects`]: crate::character::ActorState::tick_effects

use crate::character::ActorState;

/// Which half of the round a tick belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    Start,
    End,
}

/// A timed status attached to one combatant.
///
/// Hooks receive the owning character and may mutate it freely; damage dealt
/// from a hook flows through the owner's normal damage pipeline, so other
/// active effects (a shield, say) still intercept it.
pub trait Effect {
    /// Display name, also used to remove effects by kind (antidotes).
    fn name(&self) -> &str;

    /// Rounds remaining. The owner removes the effect once this is ≤ 0
    /// at an end-of-round check.
    fn duration(&self) -> i32;

    /// Fired once, synchronously, when the effect is attached.
    fn on_apply(&mut self, _owner: &mut ActorState) {}

    /// Fired at the start-of-round tick.
    fn on_turn_start(&mut self, _owner: &mut ActorState) {}

    /// Fired at the end-of-round tick.
    fn on_turn_end(&mut self, _owner: &mut ActorState) {}

    /// Fired exactly once when the effect is removed.
    fn on_expire(&mut self, _owner: &mut ActorState) {}

    /// Damage interception: given the incoming amount, returns what is left
    /// after this effect. Implementations may reduce, never increase, and the
    /// pipeline stops early once the amount reaches zero.
    fn on_damage(&mut self, incoming: u32) -> u32 {
        incoming
    }

    /// True if this effect forbids skill use while active.
    fn inhibits_skills(&self) -> bool {
        false
    }
}

/// Fixed damage to the owner at every end-of-round tick.
#[derive(Clone, Debug)]
pub struct Poison {
    dps: u32,
    duration: i32,
}

impl Poison {
    pub fn new(dps: u32, duration: i32) -> Self {
        Self { dps, duration }
    }
}

impl Effect for Poison {
    fn name(&self) -> &str {
        "Poison"
    }

    fn duration(&self) -> i32 {
        self.duration
    }

    fn on_turn_end(&mut self, owner: &mut ActorState) {
        if owner.is_alive() && self.dps > 0 {
            let dealt = owner.receive_damage(self.dps);
            tracing::debug!(owner = owner.name(), dealt, "poison tick");
        }
        self.duration -= 1;
    }
}

/// Heals the owner at every end-of-round tick.
#[derive(Clone, Debug)]
pub struct Regen {
    hps: u32,
    duration: i32,
}

impl Regen {
    pub fn new(hps: u32, duration: i32) -> Self {
        Self { hps, duration }
    }
}

impl Effect for Regen {
    fn name(&self) -> &str {
        "Regen"
    }

    fn duration(&self) -> i32 {
        self.duration
    }

    fn on_turn_end(&mut self, owner: &mut ActorState) {
        if owner.is_alive() && self.hps > 0 {
            let healed = owner.heal(self.hps);
            tracing::debug!(owner = owner.name(), healed, "regen tick");
        }
        self.duration -= 1;
    }
}

/// Absorbs incoming damage until its capacity or duration runs out,
/// whichever happens first.
#[derive(Clone, Debug)]
pub struct Shield {
    capacity: u32,
    duration: i32,
}

impl Shield {
    pub fn new(amount: u32, duration: i32) -> Self {
        Self {
            capacity: amount,
            duration,
        }
    }

    /// Absorption left before the shield breaks.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Effect for Shield {
    fn name(&self) -> &str {
        "Shield"
    }

    fn duration(&self) -> i32 {
        self.duration
    }

    fn on_damage(&mut self, incoming: u32) -> u32 {
        if incoming == 0 || self.capacity == 0 {
            return incoming;
        }
        let absorbed = self.capacity.min(incoming);
        self.capacity -= absorbed;
        incoming - absorbed
    }

    fn on_turn_end(&mut self, _owner: &mut ActorState) {
        self.duration -= 1;
        // An exhausted shield drops at this end-of-round check, not when
        // its remaining rounds run out.
        if self.capacity == 0 && self.duration > 0 {
            self.duration = 0;
        }
    }
}

/// Forbids skill use while active.
///
/// The silenced state is derived: a character is silenced exactly while an
/// effect with [`Effect::inhibits_skills`] sits in its effect list, so there
/// is no flag to set or clear.
#[derive(Clone, Debug)]
pub struct Silence {
    duration: i32,
}

impl Silence {
    pub fn new(duration: i32) -> Self {
        Self { duration }
    }
}

impl Effect for Silence {
    fn name(&self) -> &str {
        "Silence"
    }

    fn duration(&self) -> i32 {
        self.duration
    }

    fn on_turn_end(&mut self, _owner: &mut ActorState) {
        self.duration -= 1;
    }

    fn inhibits_skills(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatBlock;

    fn actor(hp: u32) -> ActorState {
        ActorState::new("Target", StatBlock::new(1, 5, 3, 1).with_hp(hp))
    }

    #[test]
    fn poison_ticks_until_expiry() {
        let mut target = actor(100);
        let start = target.stats().hp();
        target.add_effect(Box::new(Poison::new(7, 3)));

        for _ in 0..3 {
            target.tick_effects(TickPhase::End);
        }

        assert_eq!(target.stats().hp(), start - 21);
        assert!(target.effects().is_empty());
    }

    #[test]
    fn regen_heals_until_expiry() {
        let mut target = actor(50);
        target.add_effect(Box::new(Regen::new(8, 2)));

        target.tick_effects(TickPhase::End);
        target.tick_effects(TickPhase::End);

        assert_eq!(target.stats().hp(), (50 + 16).min(target.stats().max_hp()));
        assert!(target.effects().is_empty());
    }

    #[test]
    fn shield_absorbs_then_breaks() {
        let mut target = actor(100);
        let start_hp = target.stats().hp();
        target.add_effect(Box::new(Shield::new(20, 2)));

        // Fully absorbed.
        assert_eq!(target.receive_damage(15), 0);
        // 5 left on the shield; 5 of 10 pass through.
        assert_eq!(target.receive_damage(10), 5);
        assert_eq!(target.stats().hp(), start_hp - 5);

        // Exhausted shield drops at the end tick despite remaining rounds.
        target.tick_effects(TickPhase::End);
        assert!(target.effects().is_empty());

        // Damage now lands in full.
        assert_eq!(target.receive_damage(7), 7);
        assert_eq!(target.stats().hp(), start_hp - 12);
    }

    #[test]
    fn shield_outlived_by_duration_expires_on_time() {
        let mut target = actor(100);
        target.add_effect(Box::new(Shield::new(50, 1)));

        assert_eq!(target.receive_damage(10), 0);
        target.tick_effects(TickPhase::End);

        // Duration elapsed with capacity to spare; shield is gone.
        assert!(target.effects().is_empty());
        assert_eq!(target.receive_damage(10), 10);
    }

    #[test]
    fn silence_is_derived_from_active_effect() {
        let mut target = actor(100);
        assert!(!target.is_silenced());

        target.add_effect(Box::new(Silence::new(2)));
        assert!(target.is_silenced());

        target.tick_effects(TickPhase::End);
        assert!(target.is_silenced());

        target.tick_effects(TickPhase::End);
        assert!(!target.is_silenced());
    }

    #[test]
    fn poison_on_dead_owner_only_counts_down() {
        let mut target = actor(100);
        target.add_effect(Box::new(Poison::new(7, 2)));
        target.stats_mut().set_hp(0);

        target.tick_effects(TickPhase::End);
        assert_eq!(target.stats().hp(), 0);
        assert_eq!(target.effects().len(), 1);
    }
}
