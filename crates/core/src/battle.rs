//! Battle state machine.
//!
//! A battle is created in `Waiting` by its first participant, becomes
//! `Active` when a second participant joins, and ends in `Finished` or
//! `Cancelled`. Transitions are monotonic: `Waiting -> {Active, Cancelled}`
//! and `Active -> Finished` are the only edges, and a terminal battle is
//! permanently inert.
//!
//! Every operation validates all of its guards before the first mutation,
//! so a returned error leaves the battle untouched. Time enters as an
//! explicit `now` timestamp; the deadline is a guard, not a scheduled
//! cancellation.

use crate::combat;
use crate::config::BattleConfig;
use crate::creature::{BattleId, CreatureId, CreatureSnapshot, PlayerId};
use crate::error::BattleError;
use crate::participant::Participant;

/// Tag for one of the two participant slots.
///
/// Replaces identity comparisons on player structures: all per-side
/// branching indexes through this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    First,
    Second,
}

impl Side {
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Battle lifecycle status.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleStatus {
    #[default]
    Waiting,
    Active,
    Finished,
    Cancelled,
}

/// Terminal result of a finished battle.
///
/// `Draw` covers simultaneous double-defeat: both sides fully fainted by
/// the same move resolution. Stake disposition for a draw is each
/// participant's own stake back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Winner(PlayerId),
    Draw,
}

/// Result of a resolved move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub move_name: String,
    pub damage: u32,
    pub target_fainted: bool,
    /// New active index of the opposing side, when the fainted creature was
    /// their active one and a replacement existed.
    pub switched_to: Option<usize>,
    /// Set when this move ended the battle.
    pub outcome: Option<Outcome>,
}

/// One battle between two participants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub id: BattleId,
    first: Participant,
    second: Option<Participant>,
    /// Stake escrowed per slot; the second entry is 0 until join.
    stakes: [u64; 2],
    pub status: BattleStatus,
    /// 0 while waiting; becomes 1 when the battle goes active.
    pub turn: u64,
    /// Whose turn it is. `Some` exactly while the battle is active.
    current: Option<Side>,
    pub created_at: i64,
    pub finished_at: Option<i64>,
    pub outcome: Option<Outcome>,
}

impl Battle {
    /// Creates a battle in `Waiting` with the creator's team and stake.
    pub fn open(
        id: BattleId,
        player: PlayerId,
        team: Vec<CreatureSnapshot>,
        stake: u64,
        now: i64,
        config: &BattleConfig,
    ) -> Result<Self, BattleError> {
        if stake < config.min_stake {
            return Err(BattleError::InsufficientStake {
                offered: stake,
                min: config.min_stake,
            });
        }
        let first =
            Participant::assign_team(player, team, config.starting_energy, config.max_energy)?;

        Ok(Self {
            id,
            first,
            second: None,
            stakes: [stake, 0],
            status: BattleStatus::Waiting,
            turn: 0,
            current: None,
            created_at: now,
            finished_at: None,
            outcome: None,
        })
    }

    /// Fills the second slot and starts the battle.
    ///
    /// Both participants are ready once their teams are assigned, so a
    /// successful join immediately transitions `Waiting -> Active` with
    /// `turn = 1` and the creator acting first.
    pub fn join(
        &mut self,
        player: PlayerId,
        team: Vec<CreatureSnapshot>,
        stake: u64,
        config: &BattleConfig,
    ) -> Result<(), BattleError> {
        if self.status != BattleStatus::Waiting {
            return Err(BattleError::BattleNotWaiting);
        }
        if self.second.is_some() {
            return Err(BattleError::BattleFull);
        }
        if stake < config.min_stake {
            return Err(BattleError::InsufficientStake {
                offered: stake,
                min: config.min_stake,
            });
        }
        let second =
            Participant::assign_team(player, team, config.starting_energy, config.max_energy)?;

        self.second = Some(second);
        self.stakes[1] = stake;
        self.status = BattleStatus::Active;
        self.turn = 1;
        self.current = Some(Side::First);
        Ok(())
    }

    /// Cancels a battle nobody has joined yet. Only the creator may cancel.
    pub fn cancel(&mut self, caller: PlayerId) -> Result<(), BattleError> {
        if self.status != BattleStatus::Waiting {
            return Err(BattleError::BattleNotWaiting);
        }
        if caller != self.first.player {
            return Err(BattleError::NotBattleCreator);
        }

        self.status = BattleStatus::Cancelled;
        Ok(())
    }

    /// Resolves one move of the current participant.
    ///
    /// Guard order: battle active, caller's turn, deadline, live active
    /// creature, move index, target index, energy budget. All guards pass
    /// before the first mutation.
    pub fn execute_move(
        &mut self,
        caller: PlayerId,
        move_index: usize,
        target_index: usize,
        now: i64,
        config: &BattleConfig,
    ) -> Result<MoveOutcome, BattleError> {
        if self.status != BattleStatus::Active {
            return Err(BattleError::BattleNotActive);
        }
        let side = match self.side_of(caller) {
            Some(side) if Some(side) == self.current => side,
            _ => return Err(BattleError::NotYourTurn),
        };
        if now > config.deadline(self.created_at) {
            return Err(BattleError::BattleExpired);
        }

        // Read-only validation pass.
        let (attacker, defender) = self.pair(side)?;
        let active = attacker.active_creature()?;
        let mv = active
            .moves
            .get(move_index)
            .cloned()
            .ok_or(BattleError::InvalidMoveIndex {
                index: move_index,
                available: active.moves.len(),
            })?;
        if target_index >= defender.team.len() {
            return Err(BattleError::InvalidTargetIndex {
                index: target_index,
                team_len: defender.team.len(),
            });
        }
        if attacker.energy.current < mv.energy_cost {
            return Err(BattleError::InsufficientEnergy {
                required: mv.energy_cost,
                available: attacker.energy.current,
            });
        }
        let damage = combat::damage(active, &defender.team[target_index], &mv);

        // All guards passed; mutate.
        let (target_fainted, switched_to, outcome) = {
            let (attacker, defender) = self.pair_mut(side)?;
            attacker.spend_energy(mv.energy_cost)?;

            let target = &mut defender.team[target_index];
            target.hp.deduct(damage);
            let target_fainted = target.is_fainted();

            let switched_to = if target_fainted && target_index == defender.active_index {
                defender.advance_active()
            } else {
                None
            };

            // Win condition. The attacker's own HP is untouched by this
            // damage model, but the simultaneous case is checked anyway.
            let outcome = match (attacker.is_defeated(), defender.is_defeated()) {
                (false, false) => None,
                (false, true) => Some(Outcome::Winner(attacker.player)),
                (true, false) => Some(Outcome::Winner(defender.player)),
                (true, true) => Some(Outcome::Draw),
            };

            (target_fainted, switched_to, outcome)
        };

        match outcome {
            Some(result) => {
                self.status = BattleStatus::Finished;
                self.outcome = Some(result);
                self.finished_at = Some(now);
                self.current = None;
            }
            None => {
                let next = side.other();
                self.current = Some(next);
                if let Some(incoming) = self.participant_mut(next) {
                    incoming.regen_energy(config.energy_per_turn);
                }
                self.turn += 1;
            }
        }

        Ok(MoveOutcome {
            move_name: mv.name,
            damage,
            target_fainted,
            switched_to,
            outcome,
        })
    }

    /// Forces a terminal transition on a battle whose deadline has passed.
    ///
    /// The current-turn participant is the one who failed to move in time,
    /// so their opponent is declared the winner.
    pub fn resolve_expired(
        &mut self,
        now: i64,
        config: &BattleConfig,
    ) -> Result<Outcome, BattleError> {
        if self.status != BattleStatus::Active {
            return Err(BattleError::BattleNotActive);
        }
        if now <= config.deadline(self.created_at) {
            return Err(BattleError::BattleNotExpired);
        }
        let stalled = self.current.ok_or(BattleError::BattleNotActive)?;
        let winner = self.pair(stalled)?.1.player;

        let result = Outcome::Winner(winner);
        self.status = BattleStatus::Finished;
        self.outcome = Some(result);
        self.finished_at = Some(now);
        self.current = None;
        Ok(result)
    }

    // ===== accessors =====

    pub fn creator(&self) -> PlayerId {
        self.first.player
    }

    /// Slot a player occupies, if they are a participant.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.first.player == player {
            Some(Side::First)
        } else if self.second.as_ref().is_some_and(|p| p.player == player) {
            Some(Side::Second)
        } else {
            None
        }
    }

    /// `Some` exactly while the battle is active.
    pub fn current_side(&self) -> Option<Side> {
        self.current
    }

    pub fn participant(&self, side: Side) -> Option<&Participant> {
        match side {
            Side::First => Some(&self.first),
            Side::Second => self.second.as_ref(),
        }
    }

    fn participant_mut(&mut self, side: Side) -> Option<&mut Participant> {
        match side {
            Side::First => Some(&mut self.first),
            Side::Second => self.second.as_mut(),
        }
    }

    pub fn stake_of(&self, side: Side) -> u64 {
        match side {
            Side::First => self.stakes[0],
            Side::Second => self.stakes[1],
        }
    }

    /// Combined stake collected so far.
    pub fn stake_pot(&self) -> u64 {
        self.stakes[0] + self.stakes[1]
    }

    /// Players in both slots, creator first.
    pub fn players(&self) -> (PlayerId, Option<PlayerId>) {
        (self.first.player, self.second.as_ref().map(|p| p.player))
    }

    /// Registry ids of every creature committed to this battle, both sides.
    pub fn creature_ids(&self) -> Vec<CreatureId> {
        let mut ids: Vec<CreatureId> = self.first.team.iter().map(|c| c.id).collect();
        if let Some(second) = &self.second {
            ids.extend(second.team.iter().map(|c| c.id));
        }
        ids
    }

    /// Ordered (attacker, defender) view for `side`.
    fn pair(&self, side: Side) -> Result<(&Participant, &Participant), BattleError> {
        let second = self.second.as_ref().ok_or(BattleError::BattleNotActive)?;
        Ok(match side {
            Side::First => (&self.first, second),
            Side::Second => (second, &self.first),
        })
    }

    fn pair_mut(&mut self, side: Side) -> Result<(&mut Participant, &mut Participant), BattleError> {
        let second = self.second.as_mut().ok_or(BattleError::BattleNotActive)?;
        Ok(match side {
            Side::First => (&mut self.first, second),
            Side::Second => (second, &mut self.first),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{MoveCategory, MoveDef};

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn tackle() -> MoveDef {
        MoveDef::new("tackle", MoveCategory::Physical, 40, 100, 20)
    }

    fn snapshot(id: u64, hp: u32) -> CreatureSnapshot {
        CreatureSnapshot::new(CreatureId(id), "test", 0, hp, 55, 40, 30, vec![tackle()])
    }

    fn active_battle(p1_team: Vec<CreatureSnapshot>, p2_team: Vec<CreatureSnapshot>) -> Battle {
        let config = BattleConfig::default();
        let mut battle = Battle::open(BattleId(0), P1, p1_team, 1000, 100, &config).unwrap();
        battle.join(P2, p2_team, 1000, &config).unwrap();
        battle
    }

    #[test]
    fn open_starts_waiting_with_escrowed_stake() {
        let config = BattleConfig::default();
        let battle = Battle::open(BattleId(7), P1, vec![snapshot(1, 60)], 1000, 100, &config)
            .unwrap();

        assert_eq!(battle.status, BattleStatus::Waiting);
        assert_eq!(battle.turn, 0);
        assert_eq!(battle.current_side(), None);
        assert_eq!(battle.stake_pot(), 1000);
        assert_eq!(battle.created_at, 100);
    }

    #[test]
    fn open_rejects_stake_below_minimum() {
        let config = BattleConfig::default();
        let err = Battle::open(BattleId(0), P1, vec![snapshot(1, 60)], 999, 100, &config)
            .unwrap_err();
        assert_eq!(
            err,
            BattleError::InsufficientStake {
                offered: 999,
                min: 1000
            }
        );
    }

    #[test]
    fn join_activates_with_creator_acting_first() {
        let battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);

        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.turn, 1);
        assert_eq!(battle.current_side(), Some(Side::First));
        assert_eq!(battle.stake_pot(), 2000);
    }

    #[test]
    fn join_after_cancel_fails_not_waiting() {
        let config = BattleConfig::default();
        let mut battle =
            Battle::open(BattleId(0), P1, vec![snapshot(1, 60)], 1000, 100, &config).unwrap();
        battle.cancel(P1).unwrap();

        let err = battle.join(P2, vec![snapshot(2, 60)], 1000, &config).unwrap_err();
        assert_eq!(err, BattleError::BattleNotWaiting);
        assert_eq!(battle.status, BattleStatus::Cancelled);
    }

    #[test]
    fn cancel_by_non_creator_is_rejected() {
        let config = BattleConfig::default();
        let mut battle =
            Battle::open(BattleId(0), P1, vec![snapshot(1, 60)], 1000, 100, &config).unwrap();

        assert_eq!(battle.cancel(P2).unwrap_err(), BattleError::NotBattleCreator);
        assert_eq!(battle.status, BattleStatus::Waiting);
    }

    #[test]
    fn move_deals_damage_and_swaps_turn() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();

        let out = battle.execute_move(P1, 0, 0, 101, &config).unwrap();

        // floor(40 * 55 / 90) = 24
        assert_eq!(out.damage, 24);
        assert!(!out.target_fainted);
        assert_eq!(out.outcome, None);

        let defender = battle.participant(Side::Second).unwrap();
        assert_eq!(defender.team[0].hp.current, 36);
        assert_eq!(battle.current_side(), Some(Side::Second));
        assert_eq!(battle.turn, 2);

        // Attacker paid the cost; incoming side regenerated up to the cap.
        assert_eq!(battle.participant(Side::First).unwrap().energy.current, 80);
        assert_eq!(defender.energy.current, 100);
    }

    #[test]
    fn insufficient_energy_leaves_state_unchanged() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();
        battle.participant_mut(Side::First).unwrap().energy.current = 15;

        let err = battle.execute_move(P1, 0, 0, 101, &config).unwrap_err();
        assert_eq!(
            err,
            BattleError::InsufficientEnergy {
                required: 20,
                available: 15
            }
        );

        // No HP change, no energy change, no turn advance.
        assert_eq!(battle.participant(Side::Second).unwrap().team[0].hp.current, 60);
        assert_eq!(battle.participant(Side::First).unwrap().energy.current, 15);
        assert_eq!(battle.turn, 1);
        assert_eq!(battle.current_side(), Some(Side::First));
    }

    #[test]
    fn out_of_turn_and_outsider_moves_are_rejected() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();

        assert_eq!(
            battle.execute_move(P2, 0, 0, 101, &config).unwrap_err(),
            BattleError::NotYourTurn
        );
        assert_eq!(
            battle.execute_move(PlayerId(9), 0, 0, 101, &config).unwrap_err(),
            BattleError::NotYourTurn
        );
    }

    #[test]
    fn invalid_move_and_target_indices_are_rejected() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();

        assert_eq!(
            battle.execute_move(P1, 3, 0, 101, &config).unwrap_err(),
            BattleError::InvalidMoveIndex {
                index: 3,
                available: 1
            }
        );
        assert_eq!(
            battle.execute_move(P1, 0, 2, 101, &config).unwrap_err(),
            BattleError::InvalidTargetIndex {
                index: 2,
                team_len: 1
            }
        );
    }

    #[test]
    fn fainting_active_creature_switches_to_next_alive() {
        let mut battle = active_battle(
            vec![snapshot(1, 60)],
            vec![snapshot(2, 20), snapshot(3, 50)],
        );
        let config = BattleConfig::default();

        let out = battle.execute_move(P1, 0, 0, 101, &config).unwrap();

        assert!(out.target_fainted);
        assert_eq!(out.switched_to, Some(1));
        assert_eq!(out.outcome, None);
        assert_eq!(battle.participant(Side::Second).unwrap().active_index, 1);
        assert_eq!(battle.status, BattleStatus::Active);
    }

    #[test]
    fn defeating_last_creature_finishes_with_attacker_as_winner() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 20)]);
        let config = BattleConfig::default();

        let out = battle.execute_move(P1, 0, 0, 101, &config).unwrap();

        assert!(out.target_fainted);
        assert_eq!(out.switched_to, None);
        assert_eq!(out.outcome, Some(Outcome::Winner(P1)));
        assert_eq!(battle.status, BattleStatus::Finished);
        assert_eq!(battle.outcome, Some(Outcome::Winner(P1)));
        assert_eq!(battle.finished_at, Some(101));
        assert_eq!(battle.current_side(), None);
        assert_eq!(battle.turn, 1);
    }

    #[test]
    fn finished_battle_rejects_further_moves() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 20)]);
        let config = BattleConfig::default();
        battle.execute_move(P1, 0, 0, 101, &config).unwrap();

        assert_eq!(
            battle.execute_move(P2, 0, 0, 102, &config).unwrap_err(),
            BattleError::BattleNotActive
        );
    }

    #[test]
    fn move_past_deadline_fails_expired_with_no_change() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();
        let late = battle.created_at + config.max_battle_duration + 1;

        let err = battle.execute_move(P1, 0, 0, late, &config).unwrap_err();
        assert_eq!(err, BattleError::BattleExpired);
        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.participant(Side::Second).unwrap().team[0].hp.current, 60);
    }

    #[test]
    fn resolve_expired_requires_deadline_to_pass() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();

        assert_eq!(
            battle.resolve_expired(battle.created_at + 10, &config).unwrap_err(),
            BattleError::BattleNotExpired
        );
        assert_eq!(battle.status, BattleStatus::Active);
    }

    #[test]
    fn resolve_expired_awards_opponent_of_current() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();
        let late = battle.created_at + config.max_battle_duration + 1;

        // P1 stalled on their own turn; P2 wins.
        let result = battle.resolve_expired(late, &config).unwrap();
        assert_eq!(result, Outcome::Winner(P2));
        assert_eq!(battle.status, BattleStatus::Finished);
        assert_eq!(battle.finished_at, Some(late));
    }

    #[test]
    fn energy_regen_is_capped_at_maximum() {
        let mut battle = active_battle(vec![snapshot(1, 60)], vec![snapshot(2, 60)]);
        let config = BattleConfig::default();

        // Several full turn cycles; neither side may exceed the cap.
        for turn in 0..4 {
            let (caller, side) = if turn % 2 == 0 {
                (P1, Side::First)
            } else {
                (P2, Side::Second)
            };
            battle.execute_move(caller, 0, 0, 101 + turn, &config).unwrap();
            let energy = battle.participant(side).unwrap().energy;
            assert!(energy.current <= energy.maximum);
        }
    }

    #[test]
    fn identical_command_sequences_are_deterministic() {
        let run = || {
            let mut battle = active_battle(
                vec![snapshot(1, 60), snapshot(2, 50)],
                vec![snapshot(3, 60), snapshot(4, 50)],
            );
            let config = BattleConfig::default();
            let mut trace = Vec::new();
            for turn in 0..4 {
                let caller = if turn % 2 == 0 { P1 } else { P2 };
                let out = battle.execute_move(caller, 0, 0, 101 + turn, &config).unwrap();
                trace.push(out.damage);
            }
            (trace, battle)
        };

        let (trace_a, battle_a) = run();
        let (trace_b, battle_b) = run();
        assert_eq!(trace_a, trace_b);
        assert_eq!(battle_a, battle_b);
    }
}
