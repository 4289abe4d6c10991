//! Battle registry and caller-facing command surface.
//!
//! [`Arena`] indexes battles by id, maps every player to at most one
//! active battle, and drives the external collaborators: creature locks
//! through [`CreatureOracle`], stake movements through [`EscrowOracle`].
//!
//! Commands are synchronous and atomic. Each one stages the engine
//! transition on a clone of the battle, moves money only after every
//! guard has passed, and commits the staged state last, so a failed
//! escrow call leaves the battle, the registry pointers, and the ledger
//! exactly as they were.

use std::collections::HashMap;

use battle_core::{
    Battle, BattleConfig, BattleEvent, BattleId, CreatureId, CreatureOracle, CreatureSnapshot,
    EscrowOracle, Outcome, PlayerId, Side,
};

use crate::error::ArenaError;

/// Per-player battle tally, updated once per finished battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerRecord {
    pub wins: u64,
    pub losses: u64,
}

/// Battle registry and settlement service.
///
/// Assumes a single-writer host: every command runs to completion before
/// the next one against the same arena is observed. The arena holds no
/// internal locks and never blocks; hosts serialize access however they
/// like (mutex, actor, single thread).
pub struct Arena<C, E>
where
    C: CreatureOracle,
    E: EscrowOracle,
{
    config: BattleConfig,
    creatures: C,
    escrow: E,
    battles: HashMap<BattleId, Battle>,
    /// At most one active battle per player; cleared in the same command
    /// that makes the battle terminal.
    active_battle: HashMap<PlayerId, BattleId>,
    records: HashMap<PlayerId, PlayerRecord>,
    /// Outbox of events emitted by successful transitions, in order.
    events: Vec<BattleEvent>,
    next_battle_id: u64,
}

impl<C, E> Arena<C, E>
where
    C: CreatureOracle,
    E: EscrowOracle,
{
    pub fn new(config: BattleConfig, creatures: C, escrow: E) -> Self {
        Self {
            config,
            creatures,
            escrow,
            battles: HashMap::new(),
            active_battle: HashMap::new(),
            records: HashMap::new(),
            events: Vec::new(),
            next_battle_id: 0,
        }
    }

    // ===== commands =====

    /// Creates a battle in `Waiting` with the caller's team and stake.
    pub fn create_battle(
        &mut self,
        player: PlayerId,
        creature_ids: &[CreatureId],
        stake: u64,
        now: i64,
    ) -> Result<BattleId, ArenaError> {
        self.ensure_not_in_battle(player)?;
        let team = self.checked_team(player, creature_ids)?;

        let battle_id = BattleId(self.next_battle_id);
        let battle = Battle::open(battle_id, player, team, stake, now, &self.config)?;

        self.escrow.collect(player, stake)?;
        self.lock_team(creature_ids, player, stake)?;

        self.next_battle_id += 1;
        self.battles.insert(battle_id, battle);
        self.active_battle.insert(player, battle_id);
        self.events.push(BattleEvent::Created {
            battle: battle_id,
            player,
        });
        tracing::info!(battle = %battle_id, %player, stake, "battle created");
        Ok(battle_id)
    }

    /// Joins a waiting battle; on success the battle starts immediately.
    pub fn join_battle(
        &mut self,
        battle_id: BattleId,
        player: PlayerId,
        creature_ids: &[CreatureId],
        stake: u64,
    ) -> Result<(), ArenaError> {
        self.ensure_not_in_battle(player)?;
        let battle = self
            .battles
            .get(&battle_id)
            .ok_or(ArenaError::BattleNotFound(battle_id))?;

        let team = self.checked_team(player, creature_ids)?;

        // Stage the engine transition before any money moves.
        let mut staged = battle.clone();
        staged.join(player, team, stake, &self.config)?;

        self.escrow.collect(player, stake)?;
        self.lock_team(creature_ids, player, stake)?;

        self.battles.insert(battle_id, staged);
        self.active_battle.insert(player, battle_id);
        self.events.push(BattleEvent::Joined {
            battle: battle_id,
            player,
        });
        self.events.push(BattleEvent::Started { battle: battle_id });
        tracing::info!(battle = %battle_id, %player, stake, "battle joined and started");
        Ok(())
    }

    /// Resolves one move of the current participant. Runs settlement when
    /// the move ends the battle.
    pub fn execute_move(
        &mut self,
        battle_id: BattleId,
        player: PlayerId,
        move_index: usize,
        target_index: usize,
        now: i64,
    ) -> Result<(), ArenaError> {
        let battle = self
            .battles
            .get(&battle_id)
            .ok_or(ArenaError::BattleNotFound(battle_id))?;

        let mut staged = battle.clone();
        let out = staged.execute_move(player, move_index, target_index, now, &self.config)?;

        if let Some(outcome) = out.outcome {
            // Settle before committing: a failed payout aborts the whole
            // transition and the battle stays active.
            self.settle_stakes(&staged, outcome)?;
        }

        self.events.push(BattleEvent::MoveExecuted {
            battle: battle_id,
            player,
            move_name: out.move_name.clone(),
            damage: out.damage,
        });
        tracing::info!(
            battle = %battle_id,
            %player,
            move_name = %out.move_name,
            damage = out.damage,
            fainted = out.target_fainted,
            "move executed"
        );

        match out.outcome {
            Some(outcome) => self.commit_terminal(staged, outcome),
            None => {
                self.battles.insert(battle_id, staged);
            }
        }
        Ok(())
    }

    /// Cancels a waiting battle and refunds the creator's stake.
    pub fn cancel_battle(
        &mut self,
        battle_id: BattleId,
        player: PlayerId,
    ) -> Result<(), ArenaError> {
        let battle = self
            .battles
            .get(&battle_id)
            .ok_or(ArenaError::BattleNotFound(battle_id))?;

        let mut staged = battle.clone();
        staged.cancel(player)?;

        // Refund before committing; a failed refund aborts the cancellation.
        self.escrow.refund(player, staged.stake_of(Side::First))?;

        self.release_creatures(&staged);
        self.active_battle.remove(&player);
        self.battles.insert(battle_id, staged);
        self.events.push(BattleEvent::Cancelled { battle: battle_id });
        tracing::info!(battle = %battle_id, %player, "battle cancelled");
        Ok(())
    }

    /// Forces settlement of a battle whose move deadline has passed.
    /// Callable by anyone; the stalled current-turn player loses the pot.
    pub fn resolve_expired_battle(
        &mut self,
        battle_id: BattleId,
        now: i64,
    ) -> Result<Outcome, ArenaError> {
        let battle = self
            .battles
            .get(&battle_id)
            .ok_or(ArenaError::BattleNotFound(battle_id))?;

        let mut staged = battle.clone();
        let outcome = staged.resolve_expired(now, &self.config)?;

        self.settle_stakes(&staged, outcome)?;
        self.commit_terminal(staged, outcome);
        Ok(outcome)
    }

    // ===== reads =====

    /// Read-only battle snapshot. Never mutates.
    pub fn get_battle(&self, battle_id: BattleId) -> Option<&Battle> {
        self.battles.get(&battle_id)
    }

    pub fn active_battle_of(&self, player: PlayerId) -> Option<BattleId> {
        self.active_battle.get(&player).copied()
    }

    pub fn record_of(&self, player: PlayerId) -> PlayerRecord {
        self.records.get(&player).copied().unwrap_or_default()
    }

    /// Takes all events emitted since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn creatures(&self) -> &C {
        &self.creatures
    }

    pub fn creatures_mut(&mut self) -> &mut C {
        &mut self.creatures
    }

    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    pub fn escrow_mut(&mut self) -> &mut E {
        &mut self.escrow
    }

    // ===== helpers =====

    fn ensure_not_in_battle(&self, player: PlayerId) -> Result<(), ArenaError> {
        match self.active_battle.get(&player) {
            Some(&battle) => Err(ArenaError::PlayerAlreadyInBattle { player, battle }),
            None => Ok(()),
        }
    }

    /// Fetches snapshots and validates ownership and availability for an
    /// entire team. Pure reads; nothing is locked yet.
    fn checked_team(
        &self,
        player: PlayerId,
        creature_ids: &[CreatureId],
    ) -> Result<Vec<CreatureSnapshot>, ArenaError> {
        let mut team = Vec::with_capacity(creature_ids.len());
        for &id in creature_ids {
            let snapshot = self.creatures.fetch_snapshot(id)?;
            if !self.creatures.is_owned_by(id, player) {
                return Err(ArenaError::CreatureNotOwned {
                    creature: id,
                    player,
                });
            }
            if !self.creatures.is_active(id) {
                return Err(ArenaError::CreatureNotActive(id));
            }
            team.push(snapshot);
        }
        Ok(team)
    }

    /// Locks a validated team into the battle. If a lock fails midway, the
    /// already-locked creatures are released and the collected stake is
    /// refunded before the error is returned.
    fn lock_team(
        &mut self,
        creature_ids: &[CreatureId],
        player: PlayerId,
        stake: u64,
    ) -> Result<(), ArenaError> {
        for (locked, &id) in creature_ids.iter().enumerate() {
            if let Err(err) = self.creatures.set_active(id, false) {
                for &unlock in &creature_ids[..locked] {
                    if let Err(err) = self.creatures.set_active(unlock, true) {
                        tracing::warn!(creature = %unlock, %err, "rollback unlock failed");
                    }
                }
                if let Err(err) = self.escrow.refund(player, stake) {
                    tracing::warn!(%player, stake, %err, "rollback refund failed");
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Moves the pot according to the outcome. A draw refunds each side's
    /// own stake; if the second refund fails, the first is re-collected so
    /// the ledger matches the battle state the caller rolls back to.
    fn settle_stakes(&mut self, staged: &Battle, outcome: Outcome) -> Result<(), ArenaError> {
        match outcome {
            Outcome::Winner(winner) => {
                self.escrow.payout(winner, staged.stake_pot())?;
            }
            Outcome::Draw => {
                let (p1, p2) = staged.players();
                let first_stake = staged.stake_of(Side::First);
                self.escrow.refund(p1, first_stake)?;
                if let Some(p2) = p2
                    && let Err(err) = self.escrow.refund(p2, staged.stake_of(Side::Second))
                {
                    if let Err(err) = self.escrow.collect(p1, first_stake) {
                        tracing::warn!(player = %p1, %err, "draw refund compensation failed");
                    }
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Commits a finished battle: releases creature locks, clears both
    /// players' active-battle pointers, updates win/loss records, and
    /// emits the terminal event. Funds have already moved; a failed lock
    /// release is logged rather than rolled back.
    fn commit_terminal(&mut self, staged: Battle, outcome: Outcome) {
        let battle_id = staged.id;
        let (p1, p2) = staged.players();

        self.release_creatures(&staged);
        self.active_battle.remove(&p1);
        if let Some(p2) = p2 {
            self.active_battle.remove(&p2);
        }

        if let Outcome::Winner(winner) = outcome {
            let loser = if winner == p1 { p2 } else { Some(p1) };
            self.records.entry(winner).or_default().wins += 1;
            if let Some(loser) = loser {
                self.records.entry(loser).or_default().losses += 1;
            }
        }

        self.battles.insert(battle_id, staged);
        self.events.push(BattleEvent::Finished {
            battle: battle_id,
            outcome,
        });
        tracing::info!(battle = %battle_id, ?outcome, "battle finished");
    }

    /// Restores the registry's active/available flag for every committed
    /// creature. In-battle HP is never written back.
    fn release_creatures(&mut self, battle: &Battle) {
        for id in battle.creature_ids() {
            if let Err(err) = self.creatures.set_active(id, true) {
                tracing::warn!(battle = %battle.id, creature = %id, %err, "lock release failed");
            }
        }
    }
}
