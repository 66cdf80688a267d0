//! The population - every live kreature in the world
//!
//! Owns the entities. Order carries no meaning except that index 0 is kept
//! for the player's kreature so it shows up first.

use rand::Rng;

use crate::core::types::EntityId;
use crate::entity::Entity;

#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Entity>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity at the back. An id that is already present is ignored.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if !self.contains(id) {
            self.members.push(entity);
        }
        id
    }

    /// Add an entity at index 0
    pub fn add_front(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if !self.contains(id) {
            self.members.insert(0, entity);
        }
        id
    }

    /// Move an existing member to index 0
    pub fn promote(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                let entity = self.members.remove(idx);
                self.members.insert(0, entity);
                true
            }
            None => false,
        }
    }

    /// Remove an entity and hand it back. Absent ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.index_of(id).map(|idx| self.members.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.members.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.members.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.members.iter_mut().find(|e| e.id == id)
    }

    /// Mutable access to two distinct members at once
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }

        if ia < ib {
            let (left, right) = self.members.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.members.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.members.iter_mut()
    }

    /// Ids in current order. Used as the per-tick iteration snapshot.
    pub fn ids(&self) -> Vec<EntityId> {
        self.members.iter().map(|e| e.id).collect()
    }

    /// Uniform random member, or None for an empty population
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EntityId> {
        if self.members.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.members.len());
        Some(self.members[idx].id)
    }

    /// Remove the weakest members until `target_count` remain
    ///
    /// Weakness is lowest health first, then fewest children. Members in
    /// `protect` are never removed. Stops early once every cullable member
    /// is gone. Returns the removed entities, weakest first.
    pub fn cull_weakest(&mut self, target_count: usize, protect: &[EntityId]) -> Vec<Entity> {
        if self.members.len() <= target_count {
            return Vec::new();
        }

        let mut candidates: Vec<(i32, usize, EntityId)> = self
            .members
            .iter()
            .filter(|e| !protect.contains(&e.id))
            .map(|e| (e.health, e.relations.child_count(), e.id))
            .collect();
        candidates.sort_by_key(|&(health, children, _)| (health, children));

        let excess = self.members.len() - target_count;
        candidates
            .into_iter()
            .take(excess)
            .filter_map(|(_, _, id)| self.remove(id))
            .collect()
    }
}
