/// Battle tunables and balance constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleConfig {
    /// Rounds fought before the battle is called a draw.
    pub max_rounds: u32,
}

impl BattleConfig {
    // ===== balance constants =====
    /// Default critical-hit chance, in percent.
    pub const DEFAULT_CRIT_CHANCE: u32 = 10;
    /// Default critical-hit damage scale, in percent of the base amount.
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 150;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ROUNDS: u32 = 6;

    pub fn new() -> Self {
        Self {
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(max_rounds: u32) -> Self {
        Self { max_rounds }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
