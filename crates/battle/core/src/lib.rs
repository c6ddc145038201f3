//! Deterministic party-vs-boss battle logic.
//!
//! `battle-core` defines the combat rules: bounded stats, timed status
//! effects, cooldown-gated skills, speed-ordered turns, the boss's
//! HP-band strategy machine, and the round loop that drives them. All
//! mutation during a fight flows through [`battle::Battle`]; the only
//! injected dependency is the [`rng::RngOracle`] used for crit rolls, so a
//! run replays identically from its seed.

pub mod action;
pub mod battle;
pub mod boss;
pub mod character;
pub mod config;
pub mod effect;
pub mod heroes;
pub mod items;
pub mod rng;
pub mod skill;
pub mod stats;
pub mod turn;

pub use action::{Action, ActionKind, ActionOutcome, ActorId};
pub use battle::{Battle, BattleOutcome, BattleResult};
pub use boss::{AggroStrategy, Boss, EnrageStrategy, PhaseThresholds, Strategy, ToxicStrategy};
pub use character::{ActorState, Character, CritCapable, PhaseBehavior, TurnView};
pub use config::BattleConfig;
pub use effect::{Effect, Poison, Regen, Shield, Silence, TickPhase};
pub use heroes::{Healer, Mage, Warrior};
pub use items::{Antidote, Ether, Inventory, InventoryError, Item, Potion};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use skill::{SkillError, SkillId};
pub use stats::StatBlock;
pub use turn::TurnOrder;
