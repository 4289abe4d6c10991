//! Observable battle events.
//!
//! One event per successful transition, for external indexing and
//! notification. The engine never consumes its own events.

use crate::battle::Outcome;
use crate::creature::{BattleId, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    Created {
        battle: BattleId,
        player: PlayerId,
    },
    Joined {
        battle: BattleId,
        player: PlayerId,
    },
    /// Both participants are ready and the first turn has begun.
    Started {
        battle: BattleId,
    },
    MoveExecuted {
        battle: BattleId,
        player: PlayerId,
        move_name: String,
        damage: u32,
    },
    Finished {
        battle: BattleId,
        outcome: Outcome,
    },
    Cancelled {
        battle: BattleId,
    },
}
