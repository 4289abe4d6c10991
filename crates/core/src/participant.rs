//! Per-player in-battle state.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::creature::{CreatureSnapshot, PlayerId, ResourceMeter};
use crate::error::BattleError;

/// One side of a battle: a player's team, active-creature pointer,
/// energy budget, and readiness flag.
///
/// The participant owns its creature snapshots outright; nothing here is
/// shared with the creature registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub player: PlayerId,
    pub team: ArrayVec<CreatureSnapshot, { BattleConfig::MAX_TEAM_SIZE }>,
    /// Index into `team` of the creature currently fighting.
    pub active_index: usize,
    pub energy: ResourceMeter,
    /// Set once the participant has submitted a team.
    pub ready: bool,
}

impl Participant {
    /// Builds a ready participant from an owned team.
    ///
    /// # Errors
    ///
    /// `InvalidTeamSize` if the team is empty or larger than
    /// [`BattleConfig::MAX_TEAM_SIZE`].
    pub fn assign_team(
        player: PlayerId,
        creatures: Vec<CreatureSnapshot>,
        starting_energy: u32,
        max_energy: u32,
    ) -> Result<Self, BattleError> {
        let len = creatures.len();
        if len == 0 || len > BattleConfig::MAX_TEAM_SIZE {
            return Err(BattleError::InvalidTeamSize {
                len,
                max: BattleConfig::MAX_TEAM_SIZE,
            });
        }

        let mut team = ArrayVec::new();
        for creature in creatures {
            team.push(creature);
        }

        Ok(Self {
            player,
            team,
            active_index: 0,
            energy: ResourceMeter::new(starting_energy, max_energy),
            ready: true,
        })
    }

    /// The creature currently fighting.
    ///
    /// # Errors
    ///
    /// `NoActiveCreature` if the creature at the active index has fainted;
    /// the defeat-handling step must already have advanced the index.
    pub fn active_creature(&self) -> Result<&CreatureSnapshot, BattleError> {
        let creature = &self.team[self.active_index];
        if creature.is_fainted() {
            return Err(BattleError::NoActiveCreature);
        }
        Ok(creature)
    }

    /// Deducts the energy cost of a move.
    ///
    /// # Errors
    ///
    /// `InsufficientEnergy` if the participant cannot cover `cost`.
    pub fn spend_energy(&mut self, cost: u32) -> Result<(), BattleError> {
        if self.energy.current < cost {
            return Err(BattleError::InsufficientEnergy {
                required: cost,
                available: self.energy.current,
            });
        }
        self.energy.deduct(cost);
        Ok(())
    }

    /// Regenerates energy, capped at the meter maximum.
    pub fn regen_energy(&mut self, amount: u32) {
        self.energy.restore(amount);
    }

    /// True iff every creature in the team has fainted.
    pub fn is_defeated(&self) -> bool {
        self.team.iter().all(CreatureSnapshot::is_fainted)
    }

    /// Switches the active pointer to the first creature with HP > 0, in
    /// team order. Returns the new index, or `None` when the side is
    /// defeated (the pointer is left unchanged in that case).
    pub fn advance_active(&mut self) -> Option<usize> {
        let next = self.team.iter().position(|c| !c.is_fainted())?;
        self.active_index = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::CreatureId;
    use crate::moves::{MoveCategory, MoveDef};

    fn snapshot(id: u64, hp: u32) -> CreatureSnapshot {
        CreatureSnapshot::new(
            CreatureId(id),
            "test",
            0,
            hp,
            50,
            40,
            30,
            vec![MoveDef::new("tackle", MoveCategory::Physical, 40, 100, 20)],
        )
    }

    fn participant(team: Vec<CreatureSnapshot>) -> Participant {
        Participant::assign_team(PlayerId(1), team, 100, 100).unwrap()
    }

    #[test]
    fn empty_team_is_rejected() {
        let err = Participant::assign_team(PlayerId(1), Vec::new(), 100, 100).unwrap_err();
        assert_eq!(err, BattleError::InvalidTeamSize { len: 0, max: 6 });
    }

    #[test]
    fn oversized_team_is_rejected() {
        let team = (0..7).map(|i| snapshot(i, 60)).collect();
        let err = Participant::assign_team(PlayerId(1), team, 100, 100).unwrap_err();
        assert_eq!(err, BattleError::InvalidTeamSize { len: 7, max: 6 });
    }

    #[test]
    fn assign_team_initializes_pointer_energy_and_readiness() {
        let p = participant(vec![snapshot(1, 60), snapshot(2, 50)]);
        assert_eq!(p.active_index, 0);
        assert_eq!(p.energy.current, 100);
        assert!(p.ready);
    }

    #[test]
    fn spend_energy_checks_budget() {
        let mut p = participant(vec![snapshot(1, 60)]);
        p.energy.current = 15;
        let err = p.spend_energy(20).unwrap_err();
        assert_eq!(
            err,
            BattleError::InsufficientEnergy {
                required: 20,
                available: 15
            }
        );
        // No partial deduction.
        assert_eq!(p.energy.current, 15);

        p.spend_energy(15).unwrap();
        assert_eq!(p.energy.current, 0);
    }

    #[test]
    fn active_creature_requires_hp() {
        let mut p = participant(vec![snapshot(1, 60)]);
        assert!(p.active_creature().is_ok());

        p.team[0].hp.deduct(60);
        assert_eq!(p.active_creature().unwrap_err(), BattleError::NoActiveCreature);
    }

    #[test]
    fn advance_active_skips_fainted_in_team_order() {
        let mut p = participant(vec![snapshot(1, 60), snapshot(2, 50), snapshot(3, 40)]);
        p.team[0].hp.deduct(60);
        p.team[1].hp.deduct(50);

        assert_eq!(p.advance_active(), Some(2));
        assert_eq!(p.active_index, 2);
        assert!(!p.is_defeated());
    }

    #[test]
    fn advance_active_reports_defeat() {
        let mut p = participant(vec![snapshot(1, 60)]);
        p.team[0].hp.deduct(60);

        assert_eq!(p.advance_active(), None);
        assert!(p.is_defeated());
    }
}
