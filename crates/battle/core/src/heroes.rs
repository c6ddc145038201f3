//! Hero roles: Warrior, Mage, Healer.
//!
//! Each role wraps an [`ActorState`] and supplies its damage formulas, its
//! skill, and its deterministic auto-logic. Warrior and Mage can land
//! critical hits; the Healer cannot.

use crate::action::{Action, ActionOutcome, ActorId};
use crate::character::{ActorState, Character, CritCapable, TurnView};
use crate::skill::{SkillError, SkillId};
use crate::stats::StatBlock;

/// Physical damage dealer. Skill: `power_strike`.
pub struct Warrior {
    actor: ActorState,
}

impl Warrior {
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            actor: ActorState::new(name, stats),
        }
    }
}

impl CritCapable for Warrior {}

impl Character for Warrior {
    fn state(&self) -> &ActorState {
        &self.actor
    }

    fn state_mut(&mut self) -> &mut ActorState {
        &mut self.actor
    }

    fn role(&self) -> &'static str {
        "warrior"
    }

    fn basic_attack(&self) -> u32 {
        5 + self.actor.stats().strength() * 2
    }

    fn use_skill(&mut self, skill: SkillId) -> Result<ActionOutcome, SkillError> {
        match skill {
            SkillId::PowerStrike => {
                self.actor.prepare_skill(skill)?;
                Ok(ActionOutcome::Damage(
                    10 + self.actor.stats().strength() * 3,
                ))
            }
            other => Err(SkillError::UnknownSkill {
                skill: other,
                role: self.role(),
            }),
        }
    }

    /// Always swings at the boss.
    fn choose_action(&self, view: &TurnView<'_>) -> Action {
        match view.opponents.first() {
            Some((target, _)) => Action::basic_attack(*target),
            None => Action::wait(),
        }
    }

    fn crit(&self) -> Option<&dyn CritCapable> {
        Some(self)
    }
}

/// Magical damage dealer. Skill: `fireball`.
pub struct Mage {
    actor: ActorState,
}

impl Mage {
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            actor: ActorState::new(name, stats),
        }
    }
}

impl CritCapable for Mage {}

impl Character for Mage {
    fn state(&self) -> &ActorState {
        &self.actor
    }

    fn state_mut(&mut self) -> &mut ActorState {
        &mut self.actor
    }

    fn role(&self) -> &'static str {
        "mage"
    }

    fn basic_attack(&self) -> u32 {
        3 + self.actor.stats().intellect() / 2
    }

    fn use_skill(&mut self, skill: SkillId) -> Result<ActionOutcome, SkillError> {
        match skill {
            SkillId::Fireball => {
                self.actor.prepare_skill(skill)?;
                Ok(ActionOutcome::Damage(
                    12 + self.actor.stats().intellect() * 4,
                ))
            }
            other => Err(SkillError::UnknownSkill {
                skill: other,
                role: self.role(),
            }),
        }
    }

    /// Fireball when it is ready and affordable, basic attack otherwise.
    fn choose_action(&self, view: &TurnView<'_>) -> Action {
        let Some((target, _)) = view.opponents.first() else {
            return Action::wait();
        };
        let fireball = SkillId::Fireball;
        if self.actor.can_use(fireball) && self.actor.stats().mp() >= fireball.mp_cost() {
            Action::skill(fireball, *target)
        } else {
            Action::basic_attack(*target)
        }
    }

    fn crit(&self) -> Option<&dyn CritCapable> {
        Some(self)
    }
}

/// Support role. Skill: `heal`, aimed at the most wounded ally.
pub struct Healer {
    actor: ActorState,
}

impl Healer {
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            actor: ActorState::new(name, stats),
        }
    }
}

impl Character for Healer {
    fn state(&self) -> &ActorState {
        &self.actor
    }

    fn state_mut(&mut self) -> &mut ActorState {
        &mut self.actor
    }

    fn role(&self) -> &'static str {
        "healer"
    }

    fn basic_attack(&self) -> u32 {
        2 + self.actor.stats().intellect() / 3
    }

    fn use_skill(&mut self, skill: SkillId) -> Result<ActionOutcome, SkillError> {
        match skill {
            SkillId::Heal => {
                self.actor.prepare_skill(skill)?;
                Ok(ActionOutcome::Heal(10 + self.actor.stats().intellect() * 3))
            }
            other => Err(SkillError::UnknownSkill {
                skill: other,
                role: self.role(),
            }),
        }
    }

    /// Heals the most wounded ally under half HP if the heal is ready and
    /// affordable; otherwise pokes the boss.
    fn choose_action(&self, view: &TurnView<'_>) -> Action {
        let heal = SkillId::Heal;
        if self.actor.can_use(heal) && self.actor.stats().mp() >= heal.mp_cost() {
            let mut wounded: Option<(ActorId, u32)> = None;
            for (id, ally) in &view.allies {
                let stats = ally.state().stats();
                // Below half HP; first in party order wins ties.
                if stats.hp() * 2 < stats.max_hp()
                    && wounded.is_none_or(|(_, lowest)| stats.hp() < lowest)
                {
                    wounded = Some((*id, stats.hp()));
                }
            }
            if let Some((target, _)) = wounded {
                return Action::skill(heal, target);
            }
        }
        match view.opponents.first() {
            Some((target, _)) => Action::basic_attack(*target),
            None => Action::wait(),
        }
    }
}
