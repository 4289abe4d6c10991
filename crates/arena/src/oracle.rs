//! In-memory collaborator implementations.
//!
//! HashMap-backed creature registry and escrow ledger for integration
//! tests and demo hosts. Production hosts supply their own oracle
//! implementations; nothing in the engine depends on these.

use std::collections::HashMap;

use battle_core::{
    CreatureError, CreatureId, CreatureOracle, CreatureSnapshot, EscrowError, EscrowOracle,
    PlayerId, Receipt,
};

struct Entry {
    snapshot: CreatureSnapshot,
    owner: PlayerId,
    active: bool,
}

/// In-memory creature registry.
#[derive(Default)]
pub struct MemoryCreatureRegistry {
    entries: HashMap<CreatureId, Entry>,
}

impl MemoryCreatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a creature as owned by `owner`, available for battle.
    pub fn register(&mut self, owner: PlayerId, snapshot: CreatureSnapshot) {
        self.entries.insert(
            snapshot.id,
            Entry {
                snapshot,
                owner,
                active: true,
            },
        );
    }
}

impl CreatureOracle for MemoryCreatureRegistry {
    fn fetch_snapshot(&self, id: CreatureId) -> Result<CreatureSnapshot, CreatureError> {
        self.entries
            .get(&id)
            .map(|entry| entry.snapshot.clone())
            .ok_or(CreatureError::NotFound(id))
    }

    fn is_owned_by(&self, id: CreatureId, player: PlayerId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|entry| entry.owner == player)
    }

    fn is_active(&self, id: CreatureId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.active)
    }

    fn set_active(&mut self, id: CreatureId, active: bool) -> Result<(), CreatureError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(CreatureError::NotFound(id))?;
        entry.active = active;
        Ok(())
    }
}

/// In-memory escrow ledger tracking one balance per player.
#[derive(Default)]
pub struct MemoryLedger {
    balances: HashMap<PlayerId, u64>,
    next_receipt: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, player: PlayerId, amount: u64) {
        *self.balances.entry(player).or_default() += amount;
    }

    pub fn balance_of(&self, player: PlayerId) -> u64 {
        self.balances.get(&player).copied().unwrap_or_default()
    }
}

impl EscrowOracle for MemoryLedger {
    fn collect(&mut self, player: PlayerId, amount: u64) -> Result<Receipt, EscrowError> {
        let balance = self.balances.entry(player).or_default();
        if *balance < amount {
            return Err(EscrowError::InsufficientFunds {
                player,
                required: amount,
            });
        }
        *balance -= amount;
        self.next_receipt += 1;
        Ok(Receipt(self.next_receipt))
    }

    fn payout(&mut self, player: PlayerId, amount: u64) -> Result<(), EscrowError> {
        *self.balances.entry(player).or_default() += amount;
        Ok(())
    }

    fn refund(&mut self, player: PlayerId, amount: u64) -> Result<(), EscrowError> {
        *self.balances.entry(player).or_default() += amount;
        Ok(())
    }
}
