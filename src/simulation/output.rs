//! End-of-run summary for the player's kreature

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Tick;
use crate::entity::{EntityStats, Temperament};
use crate::simulation::state::{RunOutcome, Simulation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub name: String,
    pub temperament: Temperament,
    pub chance_to_fight: i32,
    pub chance_to_befriend: i32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub survivors: usize,
    pub ticks_elapsed: Tick,
    pub final_cap: usize,
    pub stats: EntityStats,
    pub outcome: Option<RunOutcome>,
}

impl SimulationSummary {
    /// Summarize the current player. None if no player was ever spawned.
    pub fn from_simulation(sim: &Simulation, outcome: Option<RunOutcome>) -> Option<Self> {
        let player = sim.player_entity()?;
        Some(Self {
            name: player.name.clone(),
            temperament: player.temperament(),
            chance_to_fight: player.chance_to_fight,
            chance_to_befriend: player.chance_to_befriend,
            health: player.health,
            max_health: player.max_health,
            alive: player.is_alive(),
            survivors: sim.population.len(),
            ticks_elapsed: sim.tick,
            final_cap: sim.cap,
            stats: player.stats,
            outcome,
        })
    }

    pub fn temperament_line(&self) -> String {
        match self.temperament {
            Temperament::Ferocious => format!("{} was ferocious.", self.name),
            Temperament::Friendly => format!("{} was very friendly.", self.name),
            Temperament::Neutral => format!("{} was neutral.", self.name),
        }
    }

    /// The "=== Summary ===" block, one entry per line
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            self.temperament_line(),
            format!(
                "{}'s chance to get into a fight was {} percent.",
                self.name, self.chance_to_fight
            ),
            format!(
                "{}'s chance to be nice was {} percent.",
                self.name, self.chance_to_befriend
            ),
            format!("Final health: {}/{}", self.health.max(0), self.max_health),
            format!("Kreatures still alive: {}", self.survivors),
            format!("Ticks elapsed: {}", self.ticks_elapsed),
        ]
    }

    /// The "=== Stats ===" block
    pub fn stats_lines(&self) -> Vec<String> {
        vec![
            format!("Friendships forged: {}", self.stats.friendships_forged),
            format!("Babies made: {}", self.stats.offspring),
            format!("Creatures Eaten: {}", self.stats.creatures_eaten),
        ]
    }

    /// Full printable report
    pub fn summary(&self) -> String {
        let mut out = String::from("=== Summary ===\n");
        for line in self.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("=== Stats ===\n");
        for line in self.stats_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
