//! Population management and the child factory
//!
//! Keeps the world under its dynamic cap: refuses births once the cap is
//! reached and culls the weakest when the population runs past the
//! configured threshold.

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::EntityId;
use crate::entity::{Entity, NameRegistry};
use crate::world::Population;

/// Room for one more entity under `cap`
pub fn can_create_entity(population: &Population, cap: usize) -> bool {
    population.len() < cap
}

/// Population size that triggers culling
pub fn cull_trigger(cap: usize, config: &SimulationConfig) -> f64 {
    cap as f64 * config.entity_cull_threshold
}

/// Population size culling brings the world back down to
pub fn cull_target(cap: usize, config: &SimulationConfig) -> usize {
    (cap as f64 * config.entity_cull_target).floor() as usize
}

/// Cull the weakest entities when the world is over its threshold
///
/// Members of `protect` (the player, or its heirs) are never culled.
/// Every culled entity gets a final log line. Returns the removed entities.
pub fn manage_population(
    population: &mut Population,
    cap: usize,
    config: &SimulationConfig,
    protect: &[EntityId],
) -> Vec<Entity> {
    if population.len() as f64 <= cull_trigger(cap, config) {
        return Vec::new();
    }

    let target = cull_target(cap, config);
    let mut culled = population.cull_weakest(target, protect);
    for entity in &mut culled {
        entity
            .log
            .push(format!("{} perished in the overcrowding.", entity.name));
    }

    tracing::debug!(
        "Culled {} entities (cap {}, {} remaining)",
        culled.len(),
        cap,
        population.len()
    );
    culled
}

/// Build a child for two parents if the world has room
///
/// On success the child joins the population with parent links on all
/// three and each parent logs a welcome. When the world is full, both
/// parents log the rejection and nothing else changes. Missing parents
/// yield None without side effects.
pub fn try_create_child<R: Rng + ?Sized>(
    population: &mut Population,
    names: &NameRegistry,
    cap: usize,
    parents: (EntityId, EntityId),
    log_capacity: usize,
    rng: &mut R,
) -> Option<EntityId> {
    let (a, b) = parents;
    if !population.contains(a) || !population.contains(b) {
        return None;
    }

    if !can_create_entity(population, cap) {
        if let Some((pa, pb)) = population.pair_mut(a, b) {
            let line = format!(
                "{} and {} could not have a baby because the world is too crowded.",
                pa.name, pb.name
            );
            pa.log.push(line.clone());
            pb.log.push(line);
        }
        tracing::debug!("Birth refused: population {} at cap {}", population.len(), cap);
        return None;
    }

    let name = names.pick(rng).to_string();
    let child = {
        let parent_a = population.get(a)?;
        let parent_b = population.get(b)?;
        Entity::offspring(name, parent_a, parent_b, log_capacity, rng)
    };
    let child_id = child.id;

    for parent in [a, b] {
        if let Some(entity) = population.get_mut(parent) {
            entity.relations.add_child(child_id);
            entity.log.push(format!(
                "{} welcomed {} into the world!",
                entity.name, child.name
            ));
        }
    }

    tracing::debug!("{} was born", child.name);
    population.add(child);
    Some(child_id)
}
