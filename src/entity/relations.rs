//! Social graph of an entity
//!
//! Relations hold ids, never entities. Both sides of a bond store each
//! other's id, and dropping one entity leaves nothing dangling that the
//! simulation depends on: lookups go back through the population.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relations {
    pub friends: AHashSet<EntityId>,
    pub parents: AHashSet<EntityId>,
    pub children: AHashSet<EntityId>,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_friend(&self, other: EntityId) -> bool {
        self.friends.contains(&other)
    }

    pub fn add_friend(&mut self, other: EntityId) -> bool {
        self.friends.insert(other)
    }

    pub fn add_parent(&mut self, parent: EntityId) -> bool {
        self.parents.insert(parent)
    }

    pub fn add_child(&mut self, child: EntityId) -> bool {
        self.children.insert(child)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
