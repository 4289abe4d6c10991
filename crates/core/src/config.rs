//! Battle configuration constants and tunable parameters.

/// Tunable battle parameters supplied by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Minimum stake each participant must escrow at create/join.
    pub min_stake: u64,
    /// Energy granted to a participant when their team is assigned.
    pub starting_energy: u32,
    /// Upper bound on a participant's energy.
    pub max_energy: u32,
    /// Energy regenerated at the start of each of a participant's turns.
    pub energy_per_turn: u32,
    /// Seconds after creation beyond which no further moves are accepted.
    pub max_battle_duration: i64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum creatures per team.
    pub const MAX_TEAM_SIZE: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_STAKE: u64 = 1000;
    pub const DEFAULT_STARTING_ENERGY: u32 = 100;
    pub const DEFAULT_MAX_ENERGY: u32 = 100;
    pub const DEFAULT_ENERGY_PER_TURN: u32 = 10;
    /// One hour, in seconds.
    pub const DEFAULT_MAX_BATTLE_DURATION: i64 = 3600;

    pub fn new() -> Self {
        Self {
            min_stake: Self::DEFAULT_MIN_STAKE,
            starting_energy: Self::DEFAULT_STARTING_ENERGY,
            max_energy: Self::DEFAULT_MAX_ENERGY,
            energy_per_turn: Self::DEFAULT_ENERGY_PER_TURN,
            max_battle_duration: Self::DEFAULT_MAX_BATTLE_DURATION,
        }
    }

    /// Move deadline for a battle created at `created_at`.
    #[inline]
    pub fn deadline(&self, created_at: i64) -> i64 {
        created_at + self.max_battle_duration
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
