//! Identifiers, resource meters, and battle-local creature snapshots.

use core::fmt;

use crate::moves::MoveDef;

/// Unique identifier for a player taking part in battles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Unique identifier for a creature in the external creature registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureId(pub u64);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "creature#{}", self.0)
    }
}

/// Unique identifier for a battle, allocated by the battle registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleId(pub u64);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "battle#{}", self.0)
    }
}

/// Integer resource meter (HP, energy) with `0 <= current <= maximum`.
///
/// Both bounds are maintained by the mutating helpers, so any meter that
/// is only touched through them stays inside its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    /// Meter starting at its maximum.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Removes up to `amount`, saturating at zero.
    pub fn deduct(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Adds `amount`, capped at the maximum.
    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.maximum);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

/// Battle-local copy of a registry creature, taken at team-assignment time.
///
/// The battle owns its snapshots outright: `hp` changes during the battle,
/// but nothing here is ever written back to the creature registry. The
/// registry entry is only touched for the active-flag lock/unlock.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub name: String,
    /// Species kind tag, reserved for future type effectiveness. Unused by
    /// the damage formula.
    pub species_kind: u8,
    pub hp: ResourceMeter,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Ordered list of known moves; move indices refer into this list.
    pub moves: Vec<MoveDef>,
}

impl CreatureSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CreatureId,
        name: impl Into<String>,
        species_kind: u8,
        max_hp: u32,
        attack: u32,
        defense: u32,
        speed: u32,
        moves: Vec<MoveDef>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            species_kind,
            hp: ResourceMeter::full(max_hp),
            attack,
            defense,
            speed,
            moves,
        }
    }

    #[inline]
    pub fn is_fainted(&self) -> bool {
        self.hp.is_empty()
    }
}
