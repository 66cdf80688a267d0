//! Kreatures and everything one of them can do on its own
//!
//! An entity decides, fights, befriends, reproduces and heals. It never
//! creates other entities and never removes itself: the simulation owns
//! both of those jobs.

pub mod constants;
pub mod log;
pub mod names;
pub mod relations;

pub use log::EntityLog;
pub use names::NameRegistry;
pub use relations::Relations;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{self, FightOutcome};
use crate::core::types::{EntityId, Tick};
use constants::*;

/// What an entity chose to do to its target this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Fight,
    Befriend,
    /// Peaceful roll against an existing friend: the pair reproduces
    Love,
    /// Aggressive roll against an existing friend: friends are never attacked
    Nothing,
}

/// Lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStats {
    pub offspring: u32,
    pub creatures_eaten: u32,
    pub friendships_forged: u32,
    pub actions_taken: u32,
}

/// Overall leaning of an entity, used for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Temperament {
    Ferocious,
    Friendly,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// 0-100. Drifts independently of `chance_to_befriend` after creation.
    pub chance_to_fight: i32,
    pub chance_to_befriend: i32,
    pub health: i32,
    pub max_health: i32,
    /// Fraction of incoming damage ignored, in [0, 1)
    pub damage_reduction: f64,
    /// Tick at which `damage_reduction` lapses, if it is temporary
    pub protection_until: Option<Tick>,
    pub relations: Relations,
    pub log: EntityLog,
    pub stats: EntityStats,
}

impl Entity {
    /// Create an entity with a randomized disposition and health
    pub fn new<R: Rng + ?Sized>(name: impl Into<String>, log_capacity: usize, rng: &mut R) -> Self {
        let chance_to_fight = rng.gen_range(STARTING_FIGHT_CHANCE);
        let health = rng.gen_range(STARTING_HEALTH);
        Self::with_traits(name, chance_to_fight, health, log_capacity)
    }

    /// Create an entity with an explicit fight chance and health
    pub fn with_traits(
        name: impl Into<String>,
        chance_to_fight: i32,
        health: i32,
        log_capacity: usize,
    ) -> Self {
        let name = name.into();
        let chance_to_fight = chance_to_fight.clamp(DISPOSITION_MIN, DISPOSITION_MAX);
        let mut log = EntityLog::new(log_capacity);
        log.push(format!("{} was created.", name));

        Self {
            id: EntityId::new(),
            name,
            chance_to_fight,
            chance_to_befriend: DISPOSITION_MAX - chance_to_fight,
            health,
            max_health: health,
            damage_reduction: 0.0,
            protection_until: None,
            relations: Relations::new(),
            log,
            stats: EntityStats::default(),
        }
    }

    /// Create a child whose temperament leans toward its parents'
    ///
    /// Fight chance is the parents' mean shifted by up to
    /// `INHERITANCE_JITTER`; health is rolled fresh.
    pub fn offspring<R: Rng + ?Sized>(
        name: impl Into<String>,
        parent_a: &Entity,
        parent_b: &Entity,
        log_capacity: usize,
        rng: &mut R,
    ) -> Self {
        let mean = (parent_a.chance_to_fight + parent_b.chance_to_fight) / 2;
        let jitter = rng.gen_range(-INHERITANCE_JITTER..=INHERITANCE_JITTER);
        let health = rng.gen_range(STARTING_HEALTH);

        let mut child = Self::with_traits(name, mean + jitter, health, log_capacity);
        child.relations.add_parent(parent_a.id);
        child.relations.add_parent(parent_b.id);
        child.log.push(format!(
            "{} was born to {} and {}!",
            child.name, parent_a.name, parent_b.name
        ));
        child
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Whether this entity has died, judged by health or by its own log
    pub fn has_fallen(&self) -> bool {
        !self.is_alive() || self.log.mentions(DEATH_MARKER)
    }

    pub fn is_friend(&self, other: EntityId) -> bool {
        self.relations.is_friend(other)
    }

    // === DECISION ===

    /// Roll against `chance_to_fight` and decide what to do to `target`
    pub fn decide_action<R: Rng + ?Sized>(&mut self, target: EntityId, rng: &mut R) -> Decision {
        let roll = rng.gen_range(DECISION_ROLL);
        self.decide_with_roll(target, roll)
    }

    /// Decision policy for a given roll in 0..=100
    ///
    /// roll <= chance_to_fight: Fight, or Nothing if the target is a friend.
    /// Otherwise: Befriend, or Love if the target is already a friend.
    pub fn decide_with_roll(&mut self, target: EntityId, roll: i32) -> Decision {
        let friends = self.is_friend(target);

        let decision = if roll <= self.chance_to_fight {
            if friends {
                Decision::Nothing
            } else {
                Decision::Fight
            }
        } else if friends {
            Decision::Love
        } else {
            Decision::Befriend
        };

        if decision != Decision::Nothing {
            self.stats.actions_taken += 1;
        }
        decision
    }

    // === DISPOSITION DRIFT ===
    // Each side is clamped on its own, so the pair stops summing to 100
    // once either one hits a bound.

    pub fn increase_chance_to_fight(&mut self) {
        self.chance_to_fight = (self.chance_to_fight + DISPOSITION_STEP).min(DISPOSITION_MAX);
    }

    pub fn decrease_chance_to_fight(&mut self) {
        self.chance_to_fight = (self.chance_to_fight - DISPOSITION_STEP).max(DISPOSITION_MIN);
    }

    pub fn increase_chance_to_befriend(&mut self) {
        self.chance_to_befriend = (self.chance_to_befriend + DISPOSITION_STEP).min(DISPOSITION_MAX);
    }

    pub fn decrease_chance_to_befriend(&mut self) {
        self.chance_to_befriend = (self.chance_to_befriend - DISPOSITION_STEP).max(DISPOSITION_MIN);
    }

    /// Drift after initiating a fight
    pub fn lean_toward_fighting(&mut self) {
        self.increase_chance_to_fight();
        self.decrease_chance_to_befriend();
    }

    /// Drift after befriending or reproducing
    pub fn lean_toward_friendship(&mut self) {
        self.increase_chance_to_befriend();
        self.decrease_chance_to_fight();
    }

    pub fn temperament(&self) -> Temperament {
        use std::cmp::Ordering;
        match self.chance_to_fight.cmp(&self.chance_to_befriend) {
            Ordering::Greater => Temperament::Ferocious,
            Ordering::Less => Temperament::Friendly,
            Ordering::Equal => Temperament::Neutral,
        }
    }

    // === INTERACTIONS ===

    /// Fight `other` to the death. Exactly one of the two ends with health <= 0.
    pub fn fight<R: Rng + ?Sized>(&mut self, other: &mut Entity, rng: &mut R) -> FightOutcome {
        combat::resolve_fight(self, other, rng)
    }

    /// Form a mutual friendship
    pub fn befriend(&mut self, other: &mut Entity) {
        self.log.push(format!("{} made friends with {}!", self.name, other.name));
        other.log.push(format!("{} made friends with {}!", other.name, self.name));

        self.relations.add_friend(other.id);
        other.relations.add_friend(self.id);

        self.stats.friendships_forged += 1;
        other.stats.friendships_forged += 1;
    }

    /// Record a birth on both partners and hand back the parent pair
    ///
    /// The child itself is built by the simulation, which knows whether the
    /// world has room for it.
    pub fn reproduce(&mut self, other: &mut Entity) -> (EntityId, EntityId) {
        self.log.push(format!("{} made a baby with {}!", self.name, other.name));
        other.log.push(format!("{} made a baby with {}!", other.name, self.name));

        self.stats.offspring += 1;
        other.stats.offspring += 1;

        (self.id, other.id)
    }

    // === REGENERATION ===

    /// Passive healing, independent of whatever the entity did this tick
    ///
    /// Returns the amount healed, if any.
    pub fn regenerate_health<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<i32> {
        if self.health >= self.max_health {
            return None;
        }
        if rng.gen_range(1..=10) > REGENERATION_CHANCE_IN_TEN {
            return None;
        }
        let amount = rng.gen_range(REGENERATION_AMOUNT);
        Some(self.apply_regeneration(amount))
    }

    /// Heal by `amount`, never past `max_health`; returns points actually gained
    pub fn apply_regeneration(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);

        if amount >= REGENERATION_LOG_MIN {
            self.log.push(format!(
                "{} regenerated {} health! Health: {}/{}",
                self.name, amount, self.health, self.max_health
            ));
        }
        self.health - before
    }

    // === PROTECTION ===

    /// Grant damage reduction until `until`
    pub fn grant_protection(&mut self, reduction: f64, until: Tick) {
        self.damage_reduction = reduction;
        self.protection_until = Some(until);
        self.log.push(format!(
            "{} has early-game protection! ({:.0}% damage reduction)",
            self.name,
            reduction * 100.0
        ));
    }

    /// Drop expired protection. Returns true if it lapsed on this call.
    pub fn expire_protection(&mut self, tick: Tick) -> bool {
        match self.protection_until {
            Some(until) if tick >= until => {
                self.protection_until = None;
                if self.damage_reduction > 0.0 {
                    self.damage_reduction = 0.0;
                    self.log
                        .push(format!("{}'s early-game protection has worn off.", self.name));
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
