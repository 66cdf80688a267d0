//! World state - the live population of kreatures

pub mod population;

pub use population::Population;
