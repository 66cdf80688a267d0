//! Entity tuning constants
//!
//! Numbers that shape a kreature's life. Changing them shifts the balance
//! between violence, friendship and population growth.

use std::ops::RangeInclusive;

/// Starting health is drawn from this range; max health is fixed to the draw
pub const STARTING_HEALTH: RangeInclusive<i32> = 80..=120;

/// Starting fight chance; befriend chance is the complement to 100
pub const STARTING_FIGHT_CHANCE: RangeInclusive<i32> = 45..=55;

/// Range of the decision roll. A roll <= chance_to_fight means fight.
pub const DECISION_ROLL: RangeInclusive<i32> = 0..=100;

/// How far one resolved action nudges a disposition
pub const DISPOSITION_STEP: i32 = 5;

/// Dispositions are percentages
pub const DISPOSITION_MIN: i32 = 0;
pub const DISPOSITION_MAX: i32 = 100;

/// Largest shift a child's fight chance can take from its parents' mean
pub const INHERITANCE_JITTER: i32 = 5;

// === REGENERATION ===

/// Chance (out of 10) that an injured entity heals this tick
pub const REGENERATION_CHANCE_IN_TEN: u32 = 3;

/// Points healed on a successful regeneration roll
pub const REGENERATION_AMOUNT: RangeInclusive<i32> = 1..=3;

/// Heals smaller than this are not logged
pub const REGENERATION_LOG_MIN: i32 = 2;

/// Every death logs a line containing this phrase
pub const DEATH_MARKER: &str = "was eaten by";
