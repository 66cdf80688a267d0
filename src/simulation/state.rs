//! Simulation state and the run loop
//!
//! Owns the population, the RNG and the dynamic cap, and keeps track of
//! which entity the player controls. When the player's kreature dies the
//! run either passes control to a living child or ends.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Tick};
use crate::entity::names::STARTER_NAMES;
use crate::entity::{Entity, NameRegistry};
use crate::simulation::output::SimulationSummary;
use crate::simulation::performance::PerformanceMonitor;
use crate::simulation::tick::{run_simulation_tick, TickReport};
use crate::ui::Presenter;
use crate::world::Population;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The player's kreature died with no living child to take over
    PlayerDied,
    MaxTicksReached,
}

pub struct Simulation {
    pub config: SimulationConfig,
    pub population: Population,
    pub names: NameRegistry,
    pub rng: ChaCha8Rng,
    pub tick: Tick,
    pub running: bool,
    /// Dynamic population cap, moved by the performance monitor
    pub cap: usize,
    pub monitor: PerformanceMonitor,
    /// The entity the player currently controls
    pub player: Option<EntityId>,
    /// The player's entity after it was removed from the population
    player_remains: Option<Entity>,
}

impl Simulation {
    /// Create a world seeded with the starter kreatures. No player yet.
    pub fn new(config: SimulationConfig, names: NameRegistry) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut population = Population::new();
        for name in STARTER_NAMES {
            population.add(Entity::new(*name, config.entity_log_max_size, &mut rng));
        }

        Self {
            cap: config.max_entities,
            monitor: PerformanceMonitor::new(config.performance_window),
            config,
            population,
            names,
            rng,
            tick: 0,
            running: false,
            player: None,
            player_remains: None,
        }
    }

    /// Create the player's kreature at index 0, with early-game protection
    pub fn spawn_player(&mut self, name: impl Into<String>) -> EntityId {
        let mut entity = Entity::new(name, self.config.entity_log_max_size, &mut self.rng);
        if self.config.player_damage_reduction > 0.0 && self.config.early_game_grace_period > 0 {
            entity.grant_protection(
                self.config.player_damage_reduction,
                self.config.early_game_grace_period,
            );
        }

        tracing::info!("{} joins a world of {} kreatures", entity.name, self.population.len());
        let id = self.population.add_front(entity);
        self.player = Some(id);
        self.player_remains = None;
        id
    }

    /// The player's entity, alive or dead
    pub fn player_entity(&self) -> Option<&Entity> {
        let id = self.player?;
        self.population
            .get(id)
            .or_else(|| self.player_remains.as_ref().filter(|e| e.id == id))
    }

    fn player_entity_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player?;
        match self.population.get_mut(id) {
            Some(entity) => Some(entity),
            None => self.player_remains.as_mut().filter(|e| e.id == id),
        }
    }

    pub fn player_has_fallen(&self) -> bool {
        self.player_entity().is_some_and(Entity::has_fallen)
    }

    /// Children of `parent` still in the population, in population order
    pub fn living_children(&self, parent: &Entity) -> Vec<EntityId> {
        self.population
            .iter()
            .filter(|e| e.is_alive() && parent.relations.children.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Hand control to `heir` and move it to the front of the population
    pub fn succeed(&mut self, heir: EntityId) -> bool {
        let parent_name = self
            .player_entity()
            .map(|e| e.name.clone())
            .unwrap_or_default();

        let Some(entity) = self.population.get_mut(heir) else {
            return false;
        };
        // Only lines from the takeover on are shown to the player
        entity.log.mark_read();
        entity.log.push(format!(
            "{} carries on the legacy of {}.",
            entity.name, parent_name
        ));
        tracing::info!("{} takes over from {} at tick {}", entity.name, parent_name, self.tick);

        self.population.promote(heir);
        self.player = Some(heir);
        self.player_remains = None;
        true
    }

    /// Run one tick, keeping hold of the player's entity if it died
    pub fn step(&mut self) -> TickReport {
        let report = run_simulation_tick(self);

        if let Some(id) = self.player {
            if let Some(remains) = report.fallen.iter().find(|e| e.id == id) {
                tracing::info!("{} died at tick {}", remains.name, report.tick);
                self.player_remains = Some(remains.clone());
            }
        }
        report
    }

    /// Print every player log line not shown yet
    pub fn flush_player_log(&mut self, presenter: &mut dyn Presenter) {
        let lines = self
            .player_entity_mut()
            .map(|e| e.log.take_unread())
            .unwrap_or_default();
        for line in &lines {
            presenter.show_line(line);
        }
    }

    /// Try to pass control to a living child of the fallen player
    fn pass_on_control(&mut self, presenter: &mut dyn Presenter) -> bool {
        let Some(fallen) = self.player_entity() else {
            return false;
        };
        let parent_name = fallen.name.clone();
        let heirs = self.living_children(fallen);

        let heir = match heirs.as_slice() {
            [] => return false,
            [only] => *only,
            _ => {
                let candidates: Vec<String> = heirs
                    .iter()
                    .filter_map(|id| self.population.get(*id))
                    .map(|e| e.name.clone())
                    .collect();
                let choice = presenter.choose_heir(&parent_name, &candidates);
                heirs[choice.min(heirs.len() - 1)]
            }
        };
        self.succeed(heir)
    }

    /// Run until the tick limit or the end of the player's line
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> RunOutcome {
        let pause = Duration::try_from_secs_f64(self.config.tick_length).unwrap_or_default();
        self.running = true;

        loop {
            self.flush_player_log(presenter);

            if self.player_has_fallen() && !self.pass_on_control(presenter) {
                tracing::info!("Run ended at tick {}: no successor", self.tick);
                self.running = false;
                return RunOutcome::PlayerDied;
            }

            self.step();
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }

            if self.tick >= self.config.max_ticks {
                self.flush_player_log(presenter);
                presenter.show_line("Maximum iterations reached.");
                tracing::info!("Run ended: reached {} ticks", self.tick);
                self.running = false;
                return RunOutcome::MaxTicksReached;
            }
        }
    }

    pub fn summary(&self, outcome: Option<RunOutcome>) -> Option<SimulationSummary> {
        SimulationSummary::from_simulation(self, outcome)
    }
}
