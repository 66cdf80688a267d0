pub mod output;
pub mod performance;
pub mod population;
pub mod state;
pub mod tick;

pub use output::SimulationSummary;
pub use performance::{CapAdjustment, PerformanceMonitor};
pub use population::{can_create_entity, manage_population, try_create_child};
pub use state::{RunOutcome, Simulation};
pub use tick::{resolve_action, run_simulation_tick, TickReport};
