//! Error types for battle transitions.
//!
//! Every variant is a guard failure: guards run before any mutation, so a
//! returned error always means the battle and both participants are exactly
//! as they were before the call.

/// Errors surfaced while driving a battle through its transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    #[error("invalid team size {len} (expected 1..={max})")]
    InvalidTeamSize { len: usize, max: usize },

    #[error("move index {index} out of range for active creature with {available} moves")]
    InvalidMoveIndex { index: usize, available: usize },

    #[error("target index {index} out of range for opposing team of {team_len}")]
    InvalidTargetIndex { index: usize, team_len: usize },

    #[error("stake {offered} is below the minimum stake of {min}")]
    InsufficientStake { offered: u64, min: u64 },

    #[error("insufficient energy: move costs {required}, {available} available")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("battle is not waiting for an opponent")]
    BattleNotWaiting,

    #[error("battle already has two participants")]
    BattleFull,

    #[error("battle is not active")]
    BattleNotActive,

    #[error("not this player's turn")]
    NotYourTurn,

    #[error("battle deadline has passed")]
    BattleExpired,

    #[error("battle deadline has not passed yet")]
    BattleNotExpired,

    #[error("active creature has fainted")]
    NoActiveCreature,

    #[error("only the battle creator may cancel")]
    NotBattleCreator,
}
