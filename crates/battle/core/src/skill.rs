//! Skill identifiers, per-skill cost data, and skill misuse errors.

/// Every skill the engine knows about.
///
/// The set is closed: each combat role answers for its own subset and rejects
/// the rest with [`SkillError::UnknownSkill`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkillId {
    /// Warrior: heavy melee strike.
    PowerStrike,
    /// Mage: single-target spell damage.
    Fireball,
    /// Healer: restores an ally's HP.
    Heal,
    /// Boss: applies a short poison, no direct damage.
    ToxicSpit,
    /// Boss: heavy single-target damage.
    EnragedBlow,
}

impl SkillId {
    /// MP spent when the skill is used.
    ///
    /// Boss skills are free so a phase strategy can always select them.
    pub const fn mp_cost(self) -> u32 {
        match self {
            SkillId::PowerStrike => 10,
            SkillId::Fireball => 12,
            SkillId::Heal => 10,
            SkillId::ToxicSpit | SkillId::EnragedBlow => 0,
        }
    }

    /// Cooldown in turns started after a successful use.
    pub const fn cooldown_turns(self) -> u32 {
        match self {
            SkillId::PowerStrike | SkillId::Fireball | SkillId::Heal => 2,
            SkillId::ToxicSpit | SkillId::EnragedBlow => 0,
        }
    }
}

/// Why a skill use was rejected.
///
/// Each variant is a distinct caller error; none of them abort the battle.
/// The auto-logic only selects actions it has confirmed are legal, so in a
/// normal run these surface only from direct skill calls.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    #[error("{actor} is silenced and cannot use skills")]
    Silenced { actor: String },

    #[error("skill {skill} is not known to this {role}")]
    UnknownSkill { skill: SkillId, role: &'static str },

    #[error("skill {skill} is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: SkillId, remaining: u32 },

    #[error("not enough MP: need {needed}, have {available}")]
    InsufficientMana { needed: u32, available: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_names_render_snake_case() {
        assert_eq!(SkillId::PowerStrike.to_string(), "power_strike");
        assert_eq!(SkillId::ToxicSpit.to_string(), "toxic_spit");
    }

    #[test]
    fn boss_skills_are_always_affordable() {
        assert_eq!(SkillId::ToxicSpit.mp_cost(), 0);
        assert_eq!(SkillId::EnragedBlow.mp_cost(), 0);
        assert_eq!(SkillId::ToxicSpit.cooldown_turns(), 0);
        assert_eq!(SkillId::EnragedBlow.cooldown_turns(), 0);
    }
}
