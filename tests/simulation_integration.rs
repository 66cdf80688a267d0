//! Simulation integration tests
//!
//! Whole runs through the public API with a scripted presenter standing in
//! for the console.

use ahash::AHashSet;
use kreatures::core::config::SimulationConfig;
use kreatures::core::types::EntityId;
use kreatures::entity::NameRegistry;
use kreatures::simulation::{RunOutcome, Simulation};
use kreatures::ui::Presenter;

#[derive(Default)]
struct ScriptedPresenter {
    lines: Vec<String>,
    heir_choice: usize,
    asked: Vec<(String, Vec<String>)>,
}

impl Presenter for ScriptedPresenter {
    fn show_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn choose_heir(&mut self, parent: &str, candidates: &[String]) -> usize {
        self.asked.push((parent.to_string(), candidates.to_vec()));
        self.heir_choice
    }
}

fn config(max_ticks: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(42),
        tick_length: 0.0,
        max_ticks,
        ..Default::default()
    }
}

/// God mode only stops attacks on the player, so make it win the ones it starts
fn harden(sim: &mut Simulation, id: EntityId) {
    let entity = sim.population.get_mut(id).unwrap();
    entity.health = 1_000_000;
    entity.max_health = 1_000_000;
}

#[test]
fn test_world_invariants_hold_every_tick() {
    let mut sim = Simulation::new(config(300), NameRegistry::builtin());
    sim.spawn_player("Nibbles");

    for _ in 0..300 {
        sim.step();

        let ids = sim.population.ids();
        let unique: AHashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate entity in population");
        assert!(sim.population.iter().all(|e| e.is_alive()));
        assert!(sim.population.iter().all(|e| e.health <= e.max_health));
        assert!(sim.cap >= sim.config.min_entities);
        assert!(sim.cap <= sim.config.max_entities_limit);
        assert!(sim
            .population
            .iter()
            .all(|e| e.log.len() <= sim.config.entity_log_max_size));
    }
    assert_eq!(sim.tick, 300);
}

#[test]
fn test_god_mode_player_reaches_max_ticks() {
    let mut sim = Simulation::new(
        SimulationConfig {
            god_mode: true,
            ..config(100)
        },
        NameRegistry::builtin(),
    );
    let player = sim.spawn_player("Nibbles");
    harden(&mut sim, player);
    let mut presenter = ScriptedPresenter::default();

    let outcome = sim.run(&mut presenter);

    assert_eq!(outcome, RunOutcome::MaxTicksReached);
    assert!(sim.population.contains(player));
    assert_eq!(
        presenter.lines.last().map(String::as_str),
        Some("Maximum iterations reached.")
    );
    let summary = sim.summary(Some(outcome)).unwrap();
    assert!(summary.alive);
    assert_eq!(summary.ticks_elapsed, 100);
    assert_eq!(summary.survivors, sim.population.len());
}

#[test]
fn test_single_child_inherits_automatically() {
    let mut sim = Simulation::new(
        SimulationConfig {
            god_mode: true,
            ..config(20)
        },
        NameRegistry::builtin(),
    );
    let player = sim.spawn_player("Nibbles");
    let heir = sim.population.ids()[3];
    harden(&mut sim, heir);
    sim.population.get_mut(player).unwrap().relations.add_child(heir);
    sim.population.get_mut(player).unwrap().health = 0;
    let mut presenter = ScriptedPresenter::default();

    let outcome = sim.run(&mut presenter);

    assert!(presenter.asked.is_empty());
    assert_eq!(outcome, RunOutcome::MaxTicksReached);
    assert_eq!(sim.player, Some(heir));
    assert_eq!(sim.population.ids()[0], heir);
    assert!(presenter
        .lines
        .iter()
        .any(|l| l.ends_with("carries on the legacy of Nibbles.")));
}

#[test]
fn test_player_picks_among_children() {
    let mut sim = Simulation::new(
        SimulationConfig {
            god_mode: true,
            ..config(20)
        },
        NameRegistry::builtin(),
    );
    let player = sim.spawn_player("Nibbles");
    let ids = sim.population.ids();
    let (first, second) = (ids[2], ids[6]);
    harden(&mut sim, first);
    harden(&mut sim, second);
    {
        let entity = sim.population.get_mut(player).unwrap();
        entity.relations.add_child(first);
        entity.relations.add_child(second);
        entity.health = 0;
    }
    let mut presenter = ScriptedPresenter {
        heir_choice: 1,
        ..Default::default()
    };

    sim.run(&mut presenter);

    assert_eq!(presenter.asked.len(), 1);
    assert_eq!(presenter.asked[0].0, "Nibbles");
    assert_eq!(presenter.asked[0].1.len(), 2);
    assert_eq!(sim.player, Some(second));
    assert!(!sim.population.contains(player));
}

#[test]
fn test_player_without_children_ends_run() {
    let mut sim = Simulation::new(config(50), NameRegistry::builtin());
    let player = sim.spawn_player("Nibbles");
    sim.population.get_mut(player).unwrap().health = 0;
    sim.step();
    let mut presenter = ScriptedPresenter::default();

    let outcome = sim.run(&mut presenter);

    assert_eq!(outcome, RunOutcome::PlayerDied);
    assert!(sim.tick < 50);
    let summary = sim.summary(Some(outcome)).unwrap();
    assert!(!summary.alive);
    assert_eq!(summary.outcome, Some(RunOutcome::PlayerDied));
}

#[test]
fn test_player_log_lines_shown_once() {
    let mut sim = Simulation::new(
        SimulationConfig {
            god_mode: true,
            ..config(30)
        },
        NameRegistry::builtin(),
    );
    sim.spawn_player("Nibbles");
    let mut presenter = ScriptedPresenter::default();

    sim.run(&mut presenter);

    assert_eq!(
        presenter
            .lines
            .iter()
            .filter(|l| l.as_str() == "Nibbles was created.")
            .count(),
        1
    );
}
