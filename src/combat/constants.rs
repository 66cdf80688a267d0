//! Combat constants - all tunable values in one place

use std::ops::RangeInclusive;

/// Base damage of a single blow, before the defender's reduction
pub const BASE_DAMAGE: RangeInclusive<i32> = 15..=25;

/// No blow ever lands for less than this, whatever the reduction
pub const MIN_DAMAGE: i32 = 1;
