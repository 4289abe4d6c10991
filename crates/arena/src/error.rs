//! Service-level errors.
//!
//! Engine guard failures and collaborator failures are surfaced under a
//! single caller-facing taxonomy. Registry errors from the creature
//! oracle and escrow ledger are propagated unchanged.

use battle_core::{BattleError, BattleId, CreatureError, CreatureId, EscrowError, PlayerId};

/// Errors surfaced by arena commands.
///
/// Every variant means the command had no effect: guard failures never
/// mutate, and collaborator failures during settlement roll the whole
/// transition back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("{0} not found")]
    BattleNotFound(BattleId),

    #[error("{player} is already in {battle}")]
    PlayerAlreadyInBattle { player: PlayerId, battle: BattleId },

    #[error("{creature} is not owned by {player}")]
    CreatureNotOwned {
        creature: CreatureId,
        player: PlayerId,
    },

    #[error("{0} is locked into another battle")]
    CreatureNotActive(CreatureId),

    /// Engine guard violation, propagated unchanged.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// Creature registry failure, propagated unchanged.
    #[error(transparent)]
    Creature(#[from] CreatureError),

    /// Escrow ledger failure, propagated unchanged.
    #[error(transparent)]
    Escrow(#[from] EscrowError),
}
