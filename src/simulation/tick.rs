//! Tick system - one step of the simulation
//!
//! Every live entity acts once against a random target, in population
//! order. Deaths are deferred to the end of the pass, then the world is
//! culled, everyone regenerates and the tick time feeds the cap controller.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::types::{EntityId, Tick};
use crate::entity::{Decision, Entity};
use crate::simulation::performance::CapAdjustment;
use crate::simulation::population::{manage_population, try_create_child};
use crate::simulation::state::Simulation;

/// Everything that happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: Tick,
    /// Entities that died in combat, removed at the end of the pass
    pub fallen: Vec<Entity>,
    /// Entities removed by population management
    pub culled: Vec<Entity>,
    pub births: Vec<EntityId>,
    pub rejected_births: u32,
    pub fights: u32,
    pub friendships: u32,
    /// Fights skipped because of god mode or the player's grace period
    pub spared: u32,
    pub cap_adjustment: Option<CapAdjustment>,
    pub elapsed: Duration,
}

impl TickReport {
    pub fn deaths(&self) -> usize {
        self.fallen.len()
    }
}

/// Run one simulation tick
pub fn run_simulation_tick(sim: &mut Simulation) -> TickReport {
    let started = Instant::now();
    let mut report = TickReport {
        tick: sim.tick,
        ..Default::default()
    };

    expire_player_protection(sim);

    // Snapshot so births during the pass don't act until next tick
    for actor in sim.population.ids() {
        if !is_live(sim, actor) {
            continue;
        }
        let Some(target) = sim.population.pick_random(&mut sim.rng) else {
            continue;
        };
        if target == actor || !is_live(sim, target) {
            continue;
        }

        let decision = match sim.population.get_mut(actor) {
            Some(entity) => entity.decide_action(target, &mut sim.rng),
            None => continue,
        };
        resolve_action(sim, actor, target, decision, &mut report);
    }

    report.fallen = purge_dead(sim);
    let protected = protected_ids(sim, &report.fallen);
    report.culled = manage_population(&mut sim.population, sim.cap, &sim.config, &protected);

    for entity in sim.population.iter_mut() {
        entity.regenerate_health(&mut sim.rng);
    }

    report.elapsed = started.elapsed();
    sim.monitor.record(report.elapsed);
    report.cap_adjustment = adjust_cap(sim);

    tracing::debug!(
        "Tick {}: {} fights, {} deaths, {} births, {} culled, population {}",
        report.tick,
        report.fights,
        report.deaths(),
        report.births.len(),
        report.culled.len(),
        sim.population.len()
    );

    sim.tick += 1;
    report
}

/// Apply a decision `actor` made against `target`
pub fn resolve_action(
    sim: &mut Simulation,
    actor: EntityId,
    target: EntityId,
    decision: Decision,
    report: &mut TickReport,
) {
    match decision {
        Decision::Nothing => {
            if let Some((a, t)) = sim.population.pair_mut(actor, target) {
                a.log.push(format!("{} had an argument with {}!", a.name, t.name));
            }
        }
        Decision::Love => {
            let Some((a, t)) = sim.population.pair_mut(actor, target) else {
                return;
            };
            let parents = a.reproduce(t);
            a.lean_toward_friendship();

            match try_create_child(
                &mut sim.population,
                &sim.names,
                sim.cap,
                parents,
                sim.config.entity_log_max_size,
                &mut sim.rng,
            ) {
                Some(child) => report.births.push(child),
                None => report.rejected_births += 1,
            }
        }
        Decision::Fight => resolve_attack(sim, actor, target, report),
        Decision::Befriend => {
            if let Some((a, t)) = sim.population.pair_mut(actor, target) {
                a.lean_toward_friendship();
                a.befriend(t);
                report.friendships += 1;
            }
        }
    }
}

fn resolve_attack(sim: &mut Simulation, actor: EntityId, target: EntityId, report: &mut TickReport) {
    let player = sim.player;

    if sim.config.god_mode && player == Some(target) {
        report.spared += 1;
        return;
    }

    if player == Some(target) && sim.tick < sim.config.early_game_grace_period {
        let roll: u32 = sim.rng.gen_range(1..=100);
        if roll <= sim.config.attack_avoidance_chance {
            if let Some((a, t)) = sim.population.pair_mut(actor, target) {
                a.log.push(format!("{} decided not to attack {}.", a.name, t.name));
            }
            report.spared += 1;
            return;
        }
    }

    let Some((a, t)) = sim.population.pair_mut(actor, target) else {
        return;
    };
    a.lean_toward_fighting();
    let outcome = a.fight(t, &mut sim.rng);
    report.fights += 1;

    tracing::debug!(
        "{} ate {} after {} blows",
        if outcome.winner == a.id { &a.name } else { &t.name },
        if outcome.loser == a.id { &a.name } else { &t.name },
        outcome.blows
    );
}

fn is_live(sim: &Simulation, id: EntityId) -> bool {
    sim.population.get(id).is_some_and(Entity::is_alive)
}

/// Ids culling must spare: the player, or its living children once it has died
fn protected_ids(sim: &Simulation, fallen: &[Entity]) -> Vec<EntityId> {
    let Some(player) = sim.player else {
        return Vec::new();
    };
    if sim.population.contains(player) {
        return vec![player];
    }

    let mut ids = vec![player];
    let remains = fallen
        .iter()
        .find(|e| e.id == player)
        .or_else(|| sim.player_entity());
    if let Some(remains) = remains {
        ids.extend(sim.living_children(remains));
    }
    ids
}

fn expire_player_protection(sim: &mut Simulation) {
    let tick = sim.tick;
    if let Some(player) = sim.player.and_then(|id| sim.population.get_mut(id)) {
        if player.expire_protection(tick) {
            tracing::debug!("{}'s protection expired at tick {}", player.name, tick);
        }
    }
}

/// Remove every entity that died this tick
fn purge_dead(sim: &mut Simulation) -> Vec<Entity> {
    let dead: Vec<EntityId> = sim
        .population
        .iter()
        .filter(|e| !e.is_alive())
        .map(|e| e.id)
        .collect();

    dead.into_iter()
        .filter_map(|id| sim.population.remove(id))
        .collect()
}

fn adjust_cap(sim: &mut Simulation) -> Option<CapAdjustment> {
    let adjustment = sim
        .monitor
        .evaluate(sim.cap, sim.population.len(), &sim.config)?;

    match adjustment {
        CapAdjustment::Reduced { from, to, mean_secs } => tracing::info!(
            "Lag detected ({:.3}s avg), reducing max entities from {} to {}",
            mean_secs,
            from,
            to
        ),
        CapAdjustment::Increased { from, to, mean_secs } => tracing::info!(
            "Good performance ({:.3}s avg), increasing max entities from {} to {}",
            mean_secs,
            from,
            to
        ),
    }

    sim.cap = adjustment.new_cap();
    Some(adjustment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::NameRegistry;

    fn sim_with(config: SimulationConfig) -> Simulation {
        let mut sim = Simulation::new(config, NameRegistry::builtin());
        sim.population = crate::world::Population::new();
        sim
    }

    fn seeded() -> SimulationConfig {
        SimulationConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_fight_kills_exactly_one() {
        let mut sim = sim_with(seeded());
        let a = sim.population.add(Entity::with_traits("Alison", 100, 100, 50));
        let b = sim.population.add(Entity::with_traits("Barry", 100, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, a, b, Decision::Fight, &mut report);

        assert_eq!(report.fights, 1);
        let alive: Vec<bool> = [a, b]
            .iter()
            .map(|id| sim.population.get(*id).unwrap().is_alive())
            .collect();
        assert_eq!(alive.iter().filter(|x| **x).count(), 1);
        // Initiator drifts toward fighting, capped at 100
        assert_eq!(sim.population.get(a).unwrap().chance_to_fight, 100);
    }

    #[test]
    fn test_nothing_logs_argument() {
        let mut sim = sim_with(seeded());
        let a = sim.population.add(Entity::with_traits("Conrad", 50, 100, 50));
        let b = sim.population.add(Entity::with_traits("Derrick", 50, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, a, b, Decision::Nothing, &mut report);

        let conrad = sim.population.get(a).unwrap();
        assert_eq!(conrad.log.last(), Some("Conrad had an argument with Derrick!"));
        assert_eq!(conrad.chance_to_fight, 50);
    }

    #[test]
    fn test_befriend_drifts_initiator_only() {
        let mut sim = sim_with(seeded());
        let a = sim.population.add(Entity::with_traits("Eric", 50, 100, 50));
        let b = sim.population.add(Entity::with_traits("Francis", 50, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, a, b, Decision::Befriend, &mut report);

        assert_eq!(report.friendships, 1);
        assert_eq!(sim.population.get(a).unwrap().chance_to_befriend, 55);
        assert_eq!(sim.population.get(b).unwrap().chance_to_befriend, 50);
        assert!(sim.population.get(b).unwrap().is_friend(a));
    }

    #[test]
    fn test_love_creates_child() {
        let mut sim = sim_with(seeded());
        let a = sim.population.add(Entity::with_traits("Gary", 50, 100, 50));
        let b = sim.population.add(Entity::with_traits("Harry", 50, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, a, b, Decision::Love, &mut report);

        assert_eq!(report.births.len(), 1);
        assert_eq!(sim.population.len(), 3);
        assert_eq!(sim.population.get(a).unwrap().stats.offspring, 1);
    }

    #[test]
    fn test_love_at_cap_rejected() {
        let mut sim = sim_with(seeded());
        sim.cap = 2;
        let a = sim.population.add(Entity::with_traits("Isabelle", 50, 100, 50));
        let b = sim.population.add(Entity::with_traits("Jasper", 50, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, a, b, Decision::Love, &mut report);

        assert!(report.births.is_empty());
        assert_eq!(report.rejected_births, 1);
        assert_eq!(sim.population.len(), 2);
        assert!(sim.population.get(b).unwrap().log.mentions("too crowded"));
    }

    #[test]
    fn test_god_mode_spares_player_as_target() {
        let mut sim = sim_with(SimulationConfig {
            god_mode: true,
            ..seeded()
        });
        let player = sim.spawn_player("Player");
        let other = sim.population.add(Entity::with_traits("Kyle", 100, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, other, player, Decision::Fight, &mut report);

        assert_eq!(report.fights, 0);
        assert_eq!(report.spared, 1);
        assert!(sim.population.iter().all(Entity::is_alive));
    }

    #[test]
    fn test_god_mode_player_attacks_still_resolve() {
        let mut sim = sim_with(SimulationConfig {
            god_mode: true,
            ..seeded()
        });
        let player = sim.spawn_player("Player");
        {
            let entity = sim.population.get_mut(player).unwrap();
            entity.health = 1_000_000;
            entity.max_health = 1_000_000;
        }
        let other = sim.population.add(Entity::with_traits("Kyle", 100, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, player, other, Decision::Fight, &mut report);

        assert_eq!(report.fights, 1);
        assert_eq!(report.spared, 0);
        assert!(sim.population.get(player).unwrap().is_alive());
        assert!(!sim.population.get(other).unwrap().is_alive());
    }

    #[test]
    fn test_grace_period_avoidance() {
        let mut sim = sim_with(SimulationConfig {
            attack_avoidance_chance: 100,
            ..seeded()
        });
        let player = sim.spawn_player("Player");
        let other = sim.population.add(Entity::with_traits("Adam", 100, 100, 50));

        let mut report = TickReport::default();
        resolve_action(&mut sim, other, player, Decision::Fight, &mut report);

        assert_eq!(report.fights, 0);
        assert_eq!(
            sim.population.get(other).unwrap().log.last(),
            Some("Adam decided not to attack Player.")
        );
    }

    #[test]
    fn test_no_avoidance_after_grace() {
        let mut sim = sim_with(SimulationConfig {
            attack_avoidance_chance: 100,
            ..seeded()
        });
        let player = sim.spawn_player("Player");
        let other = sim.population.add(Entity::with_traits("Billy", 100, 100, 50));
        sim.tick = sim.config.early_game_grace_period;

        let mut report = TickReport::default();
        resolve_action(&mut sim, other, player, Decision::Fight, &mut report);

        assert_eq!(report.fights, 1);
    }

    #[test]
    fn test_tick_purges_dead() {
        let mut sim = sim_with(seeded());
        sim.population.add(Entity::with_traits("Terry", 100, 100, 50));
        sim.population.add(Entity::with_traits("Randy", 100, 100, 50));

        // Two aggressive strangers: whoever acts first settles it
        let mut ticks = 0;
        while sim.population.len() == 2 && ticks < 100 {
            run_simulation_tick(&mut sim);
            ticks += 1;
        }

        assert_eq!(sim.population.len(), 1);
        assert!(sim.population.iter().all(Entity::is_alive));
    }

    #[test]
    fn test_dead_entities_skipped_in_pass() {
        let mut sim = sim_with(seeded());
        let a = sim.population.add(Entity::with_traits("Alison", 100, 100, 50));
        let mut corpse = Entity::with_traits("Barry", 100, 100, 50);
        corpse.health = 0;
        let b = sim.population.add(corpse);

        let report = run_simulation_tick(&mut sim);

        assert_eq!(report.fights, 0);
        assert_eq!(report.fallen.len(), 1);
        assert_eq!(report.fallen[0].id, b);
        assert_eq!(report.fallen[0].stats.actions_taken, 0);
        assert_eq!(sim.population.get(a).unwrap().stats.actions_taken, 0);
        assert_eq!(sim.population.ids(), vec![a]);
    }

    #[test]
    fn test_each_fight_kills_once() {
        let mut sim = sim_with(seeded());
        for name in ["Conrad", "Derrick", "Eric", "Francis", "Gary", "Harry"] {
            sim.population.add(Entity::with_traits(name, 100, 100, 50));
        }

        for _ in 0..20 {
            let report = run_simulation_tick(&mut sim);
            assert_eq!(report.fights as usize, report.deaths());
            assert!(report.fallen.iter().all(|e| !e.is_alive()));
            assert!(sim.population.iter().all(Entity::is_alive));
        }
        assert!(sim.population.len() >= 1);
    }

    #[test]
    fn test_newborns_do_not_act_in_birth_tick() {
        let mut sim = sim_with(seeded());
        let mut a = Entity::with_traits("Isabelle", 0, 100, 50);
        let mut b = Entity::with_traits("Jasper", 0, 100, 50);
        a.relations.add_friend(b.id);
        b.relations.add_friend(a.id);
        sim.population.add(a);
        sim.population.add(b);

        let mut newborns_checked = 0;
        for _ in 0..50 {
            let report = run_simulation_tick(&mut sim);
            for id in &report.births {
                let Some(child) = sim.population.get(*id) else {
                    continue;
                };
                assert_eq!(child.stats.actions_taken, 0);
                assert!(!child.log.mentions("had an argument with"));
                newborns_checked += 1;
            }
            if newborns_checked > 0 {
                break;
            }
        }
        assert!(newborns_checked > 0);
    }

    #[test]
    fn test_heir_survives_cull_on_player_death_tick() {
        let mut sim = sim_with(seeded());
        sim.cap = 20;
        let player = sim.spawn_player("Player");
        let mut child = Entity::with_traits("Heir", 50, 100, 50);
        child.health = 1;
        let child = sim.population.add(child);
        {
            let entity = sim.population.get_mut(player).unwrap();
            entity.relations.add_child(child);
            entity.health = 0;
        }
        for i in 0..20 {
            sim.population
                .add(Entity::with_traits(format!("Filler{}", i), 50, 100, 50));
        }
        // Everyone is friends with everyone: no fights, and births are refused at the cap
        let ids = sim.population.ids();
        for entity in sim.population.iter_mut() {
            for other in &ids {
                if *other != entity.id {
                    entity.relations.add_friend(*other);
                }
            }
        }

        let report = run_simulation_tick(&mut sim);

        assert!(report.births.is_empty());
        assert!(report.fallen.iter().any(|e| e.id == player));
        assert!(!report.culled.is_empty());
        assert!(report.culled.iter().all(|e| e.id != child));
        assert!(sim.population.contains(child));
        assert!(!sim.population.contains(player));
    }

    #[test]
    fn test_tick_advances_and_samples() {
        let mut sim = sim_with(seeded());
        for name in ["Scott", "Peter", "Douglas"] {
            sim.population.add(Entity::with_traits(name, 50, 100, 50));
        }

        let report = run_simulation_tick(&mut sim);

        assert_eq!(report.tick, 0);
        assert_eq!(sim.tick, 1);
        assert_eq!(sim.monitor.len(), 1);
    }

    #[test]
    fn test_protection_expires_on_schedule() {
        let mut sim = sim_with(SimulationConfig {
            early_game_grace_period: 2,
            ..seeded()
        });
        let player = sim.spawn_player("Player");

        run_simulation_tick(&mut sim);
        run_simulation_tick(&mut sim);
        assert!(sim.population.get(player).unwrap().damage_reduction > 0.0);

        run_simulation_tick(&mut sim);
        let entity = sim.population.get(player).unwrap();
        assert_eq!(entity.damage_reduction, 0.0);
        assert!(entity.log.mentions("early-game protection has worn off"));
    }
}
