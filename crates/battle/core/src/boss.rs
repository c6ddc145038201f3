//! Boss phases and per-phase targeting strategies.
//!
//! The boss's HP ratio selects one of three phases; each phase owns a pure,
//! stateless [`Strategy`] that picks an action against the living opponents.
//! Phases are re-evaluated once per round and move in both directions:
//! healing the boss walks it back to an earlier phase.

use crate::action::{Action, ActionOutcome, ActorId};
use crate::character::{ActorState, Character, PhaseBehavior, TurnView};
use crate::effect::Poison;
use crate::skill::{SkillError, SkillId};
use crate::stats::StatBlock;

/// Boss decision policy for one phase.
///
/// Strategies are pure: no state, no randomness. `opponents` holds only
/// living combatants in battle order, and ties are broken by the first
/// opponent encountered, so selection is deterministic.
pub trait Strategy {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Picks an action against the given opponents.
    /// An empty opponent list yields a wait action.
    fn choose_action(&self, opponents: &[(ActorId, &dyn Character)]) -> Action;
}

/// Phase 0: single strikes against the fastest opponent.
pub struct AggroStrategy;

impl Strategy for AggroStrategy {
    fn name(&self) -> &'static str {
        "aggro"
    }

    fn choose_action(&self, opponents: &[(ActorId, &dyn Character)]) -> Action {
        let mut fastest: Option<(ActorId, u32)> = None;
        for (id, opponent) in opponents {
            let agility = opponent.state().stats().agility();
            if fastest.is_none_or(|(_, best)| agility > best) {
                fastest = Some((*id, agility));
            }
        }
        match fastest {
            Some((target, _)) => Action::basic_attack(target),
            None => Action::wait(),
        }
    }
}

/// Phase 1: poisons the opponent with the least HP left.
pub struct ToxicStrategy;

impl Strategy for ToxicStrategy {
    fn name(&self) -> &'static str {
        "toxic"
    }

    fn choose_action(&self, opponents: &[(ActorId, &dyn Character)]) -> Action {
        let mut weakest: Option<(ActorId, u32)> = None;
        for (id, opponent) in opponents {
            let hp = opponent.state().stats().hp();
            if weakest.is_none_or(|(_, best)| hp < best) {
                weakest = Some((*id, hp));
            }
        }
        match weakest {
            Some((target, _)) => Action::skill(SkillId::ToxicSpit, target),
            None => Action::wait(),
        }
    }
}

/// Phase 2: enraged, lands heavy blows on the strongest opponent.
pub struct EnrageStrategy;

impl Strategy for EnrageStrategy {
    fn name(&self) -> &'static str {
        "enrage"
    }

    fn choose_action(&self, opponents: &[(ActorId, &dyn Character)]) -> Action {
        let mut strongest: Option<(ActorId, u32)> = None;
        for (id, opponent) in opponents {
            let strength = opponent.state().stats().strength();
            if strongest.is_none_or(|(_, best)| strength > best) {
                strongest = Some((*id, strength));
            }
        }
        match strongest {
            Some((target, _)) => Action::skill(SkillId::EnragedBlow, target),
            None => Action::wait(),
        }
    }
}

/// Phase boundaries as descending percentages of max HP.
///
/// `(upper, lower)` split the HP range into three bands:
/// ratio ≥ upper → phase 0, lower ≤ ratio < upper → phase 1,
/// ratio < lower → phase 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseThresholds {
    upper: u32,
    lower: u32,
}

impl PhaseThresholds {
    /// Creates thresholds from two percentages, ordering them descending.
    pub fn new(first: u32, second: u32) -> Self {
        Self {
            upper: first.max(second),
            lower: first.min(second),
        }
    }

    /// Phase band for the given HP fraction. A zero maximum counts as a
    /// zero ratio.
    fn phase_for(&self, hp: u32, max_hp: u32) -> usize {
        // hp / max >= pct / 100, compared without division.
        let above = |pct: u32| {
            if max_hp == 0 {
                pct == 0
            } else {
                u64::from(hp) * 100 >= u64::from(pct) * u64::from(max_hp)
            }
        };
        if above(self.upper) {
            0
        } else if above(self.lower) {
            1
        } else {
            2
        }
    }
}

impl Default for PhaseThresholds {
    /// The canonical 70% / 30% split.
    fn default() -> Self {
        Self::new(70, 30)
    }
}

/// The opposing side: a phase-driven combatant with one strategy per phase.
pub struct Boss {
    actor: ActorState,
    thresholds: PhaseThresholds,
    current_phase: usize,
    strategies: [Box<dyn Strategy>; 3],
}

impl Boss {
    /// Creates a boss with default thresholds and strategies. The initial
    /// phase is established from the starting HP ratio.
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        let mut boss = Self {
            actor: ActorState::new(name, stats),
            thresholds: PhaseThresholds::default(),
            current_phase: 0,
            strategies: [
                Box::new(AggroStrategy),
                Box::new(ToxicStrategy),
                Box::new(EnrageStrategy),
            ],
        };
        boss.current_phase = boss.phase_from_ratio();
        boss
    }

    /// Overrides the phase thresholds (builder form).
    pub fn with_thresholds(mut self, thresholds: PhaseThresholds) -> Self {
        self.thresholds = thresholds;
        self.current_phase = self.phase_from_ratio();
        self
    }

    /// Overrides the per-phase strategies (builder form).
    pub fn with_strategies(mut self, strategies: [Box<dyn Strategy>; 3]) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn current_phase(&self) -> usize {
        self.current_phase
    }

    /// Dispatches to the active phase's strategy.
    pub fn decide(&self, opponents: &[(ActorId, &dyn Character)]) -> Action {
        self.strategies[self.current_phase].choose_action(opponents)
    }

    fn phase_from_ratio(&self) -> usize {
        let stats = self.actor.stats();
        self.thresholds.phase_for(stats.hp(), stats.max_hp())
    }
}

impl PhaseBehavior for Boss {
    fn update_phase(&mut self) {
        let next = self.phase_from_ratio();
        if next != self.current_phase {
            tracing::info!(
                boss = self.actor.name(),
                from = self.current_phase,
                to = next,
                strategy = self.strategies[next].name(),
                "phase transition"
            );
            self.current_phase = next;
        }
    }

    fn current_phase(&self) -> usize {
        self.current_phase
    }
}

impl Character for Boss {
    fn state(&self) -> &ActorState {
        &self.actor
    }

    fn state_mut(&mut self) -> &mut ActorState {
        &mut self.actor
    }

    fn role(&self) -> &'static str {
        "boss"
    }

    fn basic_attack(&self) -> u32 {
        5 + self.actor.stats().strength() * 2
    }

    fn use_skill(&mut self, skill: SkillId) -> Result<ActionOutcome, SkillError> {
        match skill {
            SkillId::ToxicSpit => {
                self.actor.prepare_skill(skill)?;
                let dps = 4 + self.actor.stats().intellect() / 2;
                Ok(ActionOutcome::Status(Box::new(Poison::new(dps, 2))))
            }
            SkillId::EnragedBlow => {
                self.actor.prepare_skill(skill)?;
                Ok(ActionOutcome::Damage(
                    15 + self.actor.stats().strength() * 3,
                ))
            }
            other => Err(SkillError::UnknownSkill {
                skill: other,
                role: self.role(),
            }),
        }
    }

    fn choose_action(&self, view: &TurnView<'_>) -> Action {
        self.decide(&view.opponents)
    }

    fn phase_behavior_mut(&mut self) -> Option<&mut dyn PhaseBehavior> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heroes::{Healer, Mage, Warrior};

    fn party() -> (Warrior, Mage, Healer) {
        (
            Warrior::new("War", StatBlock::new(1, 6, 3, 1).with_hp(80)),
            Mage::new("Mag", StatBlock::new(1, 1, 5, 7).with_hp(60)),
            Healer::new("Heal", StatBlock::new(1, 1, 2, 6).with_hp(65)),
        )
    }

    fn opponents<'a>(
        war: &'a Warrior,
        mag: &'a Mage,
        heal: &'a Healer,
    ) -> Vec<(ActorId, &'a dyn Character)> {
        vec![
            (ActorId::hero(0), war as &dyn Character),
            (ActorId::hero(1), mag as &dyn Character),
            (ActorId::hero(2), heal as &dyn Character),
        ]
    }

    fn boss_at(ratio_percent: u32) -> Boss {
        let mut boss = Boss::new("Dragon", StatBlock::new(5, 8, 4, 4));
        let max = boss.state().stats().max_hp();
        boss.state_mut().stats_mut().set_hp(max * ratio_percent / 100);
        boss.update_phase();
        boss
    }

    #[test]
    fn phase_tracks_hp_ratio_in_both_directions() {
        let mut boss = Boss::new("Dragon", StatBlock::new(5, 8, 4, 4));
        assert_eq!(boss.current_phase(), 0);

        let max = boss.state().stats().max_hp();

        boss.state_mut().stats_mut().set_hp(max * 65 / 100);
        boss.update_phase();
        assert_eq!(boss.current_phase(), 1);

        boss.state_mut().stats_mut().set_hp(max * 20 / 100);
        boss.update_phase();
        assert_eq!(boss.current_phase(), 2);

        // Healing walks the phase back.
        boss.state_mut().stats_mut().set_hp(max * 80 / 100);
        boss.update_phase();
        assert_eq!(boss.current_phase(), 0);
    }

    #[test]
    fn band_boundaries_are_inclusive_at_the_top() {
        let thresholds = PhaseThresholds::new(70, 30);
        assert_eq!(thresholds.phase_for(70, 100), 0);
        assert_eq!(thresholds.phase_for(69, 100), 1);
        assert_eq!(thresholds.phase_for(30, 100), 1);
        assert_eq!(thresholds.phase_for(29, 100), 2);
    }

    #[test]
    fn thresholds_normalize_ordering() {
        assert_eq!(PhaseThresholds::new(30, 70), PhaseThresholds::new(70, 30));
    }

    #[test]
    fn aggro_phase_targets_the_fastest() {
        let (war, mag, heal) = party();
        let boss = boss_at(100);

        let action = boss.decide(&opponents(&war, &mag, &heal));
        assert_eq!(action, Action::basic_attack(ActorId::hero(1)));
    }

    #[test]
    fn toxic_phase_targets_the_weakest() {
        let (war, mut mag, heal) = party();
        mag.state_mut().stats_mut().set_hp(5);
        let boss = boss_at(50);

        let action = boss.decide(&opponents(&war, &mag, &heal));
        assert_eq!(action, Action::skill(SkillId::ToxicSpit, ActorId::hero(1)));
    }

    #[test]
    fn enrage_phase_targets_the_strongest() {
        let (war, mag, heal) = party();
        let boss = boss_at(20);

        let action = boss.decide(&opponents(&war, &mag, &heal));
        assert_eq!(
            action,
            Action::skill(SkillId::EnragedBlow, ActorId::hero(0))
        );
    }

    #[test]
    fn ties_go_to_the_first_opponent_in_order() {
        let war = Warrior::new("A", StatBlock::new(1, 6, 4, 1));
        let other = Warrior::new("B", StatBlock::new(1, 6, 4, 1));
        let boss = boss_at(100);

        let targets: Vec<(ActorId, &dyn Character)> = vec![
            (ActorId::hero(0), &war as &dyn Character),
            (ActorId::hero(1), &other as &dyn Character),
        ];
        assert_eq!(boss.decide(&targets), Action::basic_attack(ActorId::hero(0)));
    }

    #[test]
    fn empty_opponent_list_waits() {
        let boss = boss_at(100);
        assert_eq!(boss.decide(&[]), Action::wait());
    }

    #[test]
    fn boss_skills_need_no_mana() {
        let mut boss = Boss::new("Dragon", StatBlock::new(3, 8, 4, 5).with_mp(0));

        let spit = boss.use_skill(SkillId::ToxicSpit).unwrap();
        assert!(matches!(spit, ActionOutcome::Status(_)));

        let blow = boss.use_skill(SkillId::EnragedBlow).unwrap();
        assert!(matches!(blow, ActionOutcome::Damage(39)));
    }
}
