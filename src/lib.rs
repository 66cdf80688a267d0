//! Kreatures - turn-based artificial life simulation
//!
//! Kreatures fight, befriend and breed with random neighbours every tick
//! while an adaptive cap keeps the population small enough to stay fast.

pub mod combat;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod ui;
pub mod world;
