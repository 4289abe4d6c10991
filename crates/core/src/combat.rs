//! Damage calculation and application.

use crate::creature::CreatureSnapshot;
use crate::moves::MoveDef;

/// Calculate damage from a move.
///
/// # Formula
///
/// ```text
/// damage = floor(power * attacker.attack / (defender.defense + 50))
/// final  = max(damage, 1)
/// ```
///
/// Deterministic: no randomness, and `accuracy` is never consulted. The
/// stat pair does not depend on the move category, and a zero-power
/// `Status` move therefore computes to exactly 1; callers that want
/// status moves to deal no damage must special-case the category before
/// calling this. All of this matches the reference behavior.
///
/// The intermediate product is computed in `u64` so `power * attack`
/// cannot overflow.
pub fn damage(attacker: &CreatureSnapshot, defender: &CreatureSnapshot, mv: &MoveDef) -> u32 {
    let raw = u64::from(mv.power) * u64::from(attacker.attack) / (u64::from(defender.defense) + 50);
    (raw.min(u64::from(u32::MAX)) as u32).max(1)
}

/// Apply damage to current HP, clamping at 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::CreatureId;
    use crate::moves::MoveCategory;

    fn creature(attack: u32, defense: u32) -> CreatureSnapshot {
        CreatureSnapshot::new(CreatureId(0), "test", 0, 60, attack, defense, 30, Vec::new())
    }

    fn physical(power: u32) -> MoveDef {
        MoveDef::new("tackle", MoveCategory::Physical, power, 100, 20)
    }

    #[test]
    fn formula_matches_reference_values() {
        // floor(40 * 55 / (40 + 50)) = 24
        let attacker = creature(55, 0);
        let defender = creature(0, 40);
        assert_eq!(damage(&attacker, &defender, &physical(40)), 24);
    }

    #[test]
    fn damage_is_at_least_one() {
        let attacker = creature(1, 0);
        let defender = creature(0, 1000);
        assert_eq!(damage(&attacker, &defender, &physical(1)), 1);
    }

    #[test]
    fn faithful_to_reference_status_moves_still_deal_one() {
        // Zero-power status moves compute to 1 under the shared formula.
        // Faithful to reference, not necessarily game-balanced.
        let attacker = creature(55, 0);
        let defender = creature(0, 40);
        let growl = MoveDef::new("growl", MoveCategory::Status, 0, 100, 5);
        assert_eq!(damage(&attacker, &defender, &growl), 1);
    }

    #[test]
    fn faithful_to_reference_category_does_not_change_stat_pair() {
        // Physical and Special use the same attack/defense pair, making the
        // distinction cosmetic. Faithful to reference, not necessarily
        // game-balanced.
        let attacker = creature(55, 0);
        let defender = creature(0, 40);
        let phys = MoveDef::new("slam", MoveCategory::Physical, 40, 100, 20);
        let beam = MoveDef::new("beam", MoveCategory::Special, 40, 100, 20);
        assert_eq!(
            damage(&attacker, &defender, &phys),
            damage(&attacker, &defender, &beam)
        );
    }

    #[test]
    fn apply_damage_clamps_at_zero() {
        assert_eq!(apply_damage(20, 24), 0);
        assert_eq!(apply_damage(60, 24), 36);
    }
}
