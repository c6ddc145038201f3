//! Declarative actions and combatant identifiers.
//!
//! Decision code (hero auto-logic, boss strategies) never mutates anything:
//! it returns an [`Action`] describing what should happen, and the battle
//! loop resolves it. Skill resolution likewise reports a tagged
//! [`ActionOutcome`] instead of overloading the sign of a damage number.

use std::fmt;

use crate::effect::Effect;
use crate::skill::SkillId;

/// Identifies a combatant within one battle.
///
/// Heroes are addressed by their party slot; the boss uses a reserved id so
/// the two sides share one address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier for the boss slot.
    pub const BOSS: Self = Self(u32::MAX);

    /// Identifier for the hero in the given party slot.
    pub fn hero(slot: usize) -> Self {
        Self(slot as u32)
    }

    /// Returns true if this id addresses the boss slot.
    #[inline]
    pub const fn is_boss(self) -> bool {
        self.0 == Self::BOSS.0
    }

    /// Party slot index. Only meaningful for hero ids.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_boss() {
            write!(f, "boss")
        } else {
            write!(f, "hero#{}", self.0)
        }
    }
}

/// What kind of action a combatant takes this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Plain attack computed from the actor's stats.
    BasicAttack,
    /// A named skill use.
    Skill(SkillId),
    /// Do nothing (no legal target or nothing useful to do).
    Wait,
}

/// A chosen, not-yet-resolved action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Target combatant; `None` only for [`ActionKind::Wait`].
    pub target: Option<ActorId>,
}

impl Action {
    /// Basic attack against `target`.
    pub fn basic_attack(target: ActorId) -> Self {
        Self {
            kind: ActionKind::BasicAttack,
            target: Some(target),
        }
    }

    /// Skill use against `target`.
    pub fn skill(skill: SkillId, target: ActorId) -> Self {
        Self {
            kind: ActionKind::Skill(skill),
            target: Some(target),
        }
    }

    /// Do nothing this turn.
    pub fn wait() -> Self {
        Self {
            kind: ActionKind::Wait,
            target: None,
        }
    }
}

/// What a successful skill use does to its target.
///
/// The battle loop applies the outcome through the target's damage, healing,
/// or effect pipeline; the acting character only pays costs.
pub enum ActionOutcome {
    /// Deal this much damage (before interception and crits).
    Damage(u32),
    /// Restore this much HP.
    Heal(u32),
    /// Attach this effect to the target.
    Status(Box<dyn Effect>),
}

impl fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Damage(amount) => write!(f, "Damage({amount})"),
            ActionOutcome::Heal(amount) => write!(f, "Heal({amount})"),
            ActionOutcome::Status(effect) => write!(f, "Status({})", effect.name()),
        }
    }
}
