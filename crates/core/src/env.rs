//! Traits describing the external collaborators the engine consumes.
//!
//! The engine never implements minting, ownership, or payment rails; it
//! reads creature snapshots and lock flags through [`CreatureOracle`] and
//! requests stake movements through [`EscrowOracle`]. Hosts provide the
//! concrete implementations (the `arena` crate ships in-memory ones for
//! tests and demos).

use crate::creature::{CreatureId, CreatureSnapshot, PlayerId};

/// Errors reported by a creature registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreatureError {
    /// No creature exists under the given identifier.
    #[error("creature {0} not found")]
    NotFound(CreatureId),
}

/// Errors reported by an escrow ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscrowError {
    #[error("insufficient funds: {player} cannot cover stake of {required}")]
    InsufficientFunds { player: PlayerId, required: u64 },

    #[error("payout of {amount} to {player} failed")]
    PayoutFailed { player: PlayerId, amount: u64 },

    #[error("refund of {amount} to {player} failed")]
    RefundFailed { player: PlayerId, amount: u64 },
}

/// Proof of a successful stake collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receipt(pub u64);

/// Read/lock access to the external creature registry.
///
/// `set_active(id, false)` locks a creature into a battle at create/join;
/// `set_active(id, true)` releases it at a terminal transition. In-battle
/// HP is never written back; it lives only in the battle's snapshots.
pub trait CreatureOracle: Send + Sync {
    /// Copy of the creature's battle-relevant stats at full HP.
    fn fetch_snapshot(&self, id: CreatureId) -> Result<CreatureSnapshot, CreatureError>;

    fn is_owned_by(&self, id: CreatureId, player: PlayerId) -> bool;

    /// False while the creature is committed to a battle.
    fn is_active(&self, id: CreatureId) -> bool;

    fn set_active(&mut self, id: CreatureId, active: bool) -> Result<(), CreatureError>;
}

/// Stake collection and disbursement.
pub trait EscrowOracle: Send + Sync {
    fn collect(&mut self, player: PlayerId, amount: u64) -> Result<Receipt, EscrowError>;

    fn payout(&mut self, player: PlayerId, amount: u64) -> Result<(), EscrowError>;

    fn refund(&mut self, player: PlayerId, amount: u64) -> Result<(), EscrowError>;
}
