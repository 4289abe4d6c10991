//! Deterministic creature-battle rules shared across hosts.
//!
//! `battle-core` defines the canonical battle semantics: team snapshots,
//! the per-turn energy budget, move damage, fainting and forced switches,
//! win detection, and the `Waiting -> Active -> Finished` state machine.
//! It is pure by construction: time enters as an explicit timestamp
//! argument, and every external collaborator (creature registry, escrow
//! ledger) is reached through the oracle traits in [`env`]. The service
//! layer that indexes battles and moves money lives in the `arena` crate.
pub mod battle;
pub mod combat;
pub mod config;
pub mod creature;
pub mod env;
pub mod error;
pub mod event;
pub mod moves;
pub mod participant;

pub use battle::{Battle, BattleStatus, MoveOutcome, Outcome, Side};
pub use config::BattleConfig;
pub use creature::{BattleId, CreatureId, CreatureSnapshot, PlayerId, ResourceMeter};
pub use env::{CreatureError, CreatureOracle, EscrowError, EscrowOracle, Receipt};
pub use error::BattleError;
pub use event::BattleEvent;
pub use moves::{MoveCategory, MoveDef};
pub use participant::Participant;
