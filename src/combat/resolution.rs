//! Fight-to-the-death resolution
//!
//! A fight is not a single exchange. Attacker and defender trade blows,
//! attacker first, until one of them drops to zero health or below.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::constants::{BASE_DAMAGE, MIN_DAMAGE};
use crate::core::types::EntityId;
use crate::entity::Entity;

/// Result of a finished fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightOutcome {
    pub winner: EntityId,
    pub loser: EntityId,
    /// Number of blows landed in total
    pub blows: u32,
}

/// Damage actually applied for a base blow against a given reduction
///
/// Reductions <= 0 are ignored. Otherwise `max(1, floor(d * (1 - r)))`.
pub fn reduced_damage(base: i32, reduction: f64) -> i32 {
    if reduction <= 0.0 {
        return base;
    }
    let reduced = (base as f64 * (1.0 - reduction)).floor() as i32;
    reduced.max(MIN_DAMAGE)
}

/// Resolve a fight with blows drawn uniformly from `BASE_DAMAGE`
pub fn resolve_fight<R: Rng + ?Sized>(
    attacker: &mut Entity,
    defender: &mut Entity,
    rng: &mut R,
) -> FightOutcome {
    resolve_fight_with(attacker, defender, || rng.gen_range(BASE_DAMAGE))
}

/// Resolve a fight with base damage supplied by `next_blow`
///
/// Both entities must start with positive health. Base damage below
/// `MIN_DAMAGE` is raised to it, so the fight always terminates.
pub fn resolve_fight_with<F>(
    attacker: &mut Entity,
    defender: &mut Entity,
    mut next_blow: F,
) -> FightOutcome
where
    F: FnMut() -> i32,
{
    let mut blows = 0;

    loop {
        blows += 1;
        if strike(attacker, defender, next_blow().max(MIN_DAMAGE)) {
            return FightOutcome {
                winner: attacker.id,
                loser: defender.id,
                blows,
            };
        }

        blows += 1;
        if strike(defender, attacker, next_blow().max(MIN_DAMAGE)) {
            return FightOutcome {
                winner: defender.id,
                loser: attacker.id,
                blows,
            };
        }
    }
}

/// One blow. Logs on both sides; returns true if the target died.
fn strike(striker: &mut Entity, target: &mut Entity, base: i32) -> bool {
    let damage = reduced_damage(base, target.damage_reduction);
    target.health -= damage;

    if target.health <= 0 {
        striker
            .log
            .push(format!("{} fought and ate {}!", striker.name, target.name));
        target
            .log
            .push(format!("{} was eaten by {}!", target.name, striker.name));
        striker.stats.creatures_eaten += 1;
        true
    } else {
        striker.log.push(format!(
            "{} fought {} and dealt {} damage!",
            striker.name, target.name, damage
        ));
        target.log.push(format!(
            "{} took {} damage from {}! Health: {}",
            target.name, damage, striker.name, target.health
        ));
        false
    }
}
