pub mod constants;
pub mod resolution;

pub use resolution::{reduced_damage, resolve_fight, resolve_fight_with, FightOutcome};
