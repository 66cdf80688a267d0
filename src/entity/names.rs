//! Name provider for newly created kreatures
//!
//! The core only ever asks for a random name or whether a name is known.
//! Where the list comes from (built-in table or a file) stays out here.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::error::{KreatureError, Result};

/// Built-in name table used when no names file is supplied
pub const DEFAULT_NAMES: &[&str] = &[
    // Classic
    "Jesse", "Juan", "Jose", "Ralph", "Jeremy", "Bobby", "Johnny", "Douglas", "Peter",
    "Scott", "Kyle", "Billy", "Terry", "Randy", "Adam",
    // Traditional
    "Alexander", "Andrew", "Benjamin", "Christopher", "Daniel", "David", "James", "John",
    "Michael", "William", "Robert", "Richard", "Thomas", "Charles", "Joseph", "Edward",
    "George", "Henry", "Samuel", "Matthew", "Anthony", "Patrick", "Stephen", "Timothy",
    "Elizabeth", "Emily", "Emma", "Jessica", "Jennifer", "Katherine", "Margaret", "Mary",
    "Patricia", "Sarah", "Anna", "Catherine", "Charlotte", "Eleanor", "Grace", "Helen",
    "Julia", "Laura", "Lucy", "Rachel", "Rebecca", "Susan", "Victoria", "Alice",
    // Modern
    "Sophia", "Liam", "Noah", "Olivia", "Isabella", "Mason", "Aria", "Aiden", "Blake",
    "Hunter", "Luna", "Quinn", "Riley", "Ava", "Mia", "Harper", "Evelyn", "Logan", "Lucas",
    "Ethan", "Jackson", "Madison", "Chloe", "Zoey", "Nora", "Hazel", "Violet", "Aurora",
    "Stella", "Skylar", "Jayden", "Carter", "Wyatt", "Owen", "Caleb", "Nathan", "Isaac",
    "Dylan", "Grayson", "Levi", "Jordan", "Avery", "Parker", "Rowan", "Sawyer", "Emery",
    "Finley", "Reese", "Morgan", "Taylor", "Casey", "Jamie",
    // International
    "Diego", "Sofia", "Ahmed", "Chen", "Elena", "Hassan", "Yuki", "Zara", "Mateo", "Lucia",
    "Omar", "Fatima", "Wei", "Mei", "Hiroshi", "Sakura", "Ravi", "Priya", "Arjun", "Ananya",
    "Kwame", "Amara", "Chidi", "Nia", "Ivan", "Olga", "Dmitri", "Katya", "Lars", "Ingrid",
    "Sven", "Astrid", "Pierre", "Amelie", "Hans", "Greta", "Marco", "Giulia", "Pedro",
    "Carmen", "Rafael", "Ines", "Tariq", "Layla", "Kenji", "Hana", "Jin", "Soo", "Akira",
    "Leila", "Nikolai", "Anya", "Santiago", "Valentina", "Emilio",
];

/// Names of the kreatures every world starts with
pub const STARTER_NAMES: &[&str] = &[
    "Alison", "Barry", "Conrad", "Derrick", "Eric", "Francis", "Gary", "Harry", "Isabelle",
    "Jasper",
];

/// Ordered, non-empty list of candidate names
#[derive(Debug, Clone)]
pub struct NameRegistry {
    names: Vec<String>,
}

impl NameRegistry {
    /// Registry backed by the built-in table
    pub fn builtin() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Build a registry from any list. Fails on an empty list.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return Err(KreatureError::EmptyNameList("no usable names supplied".into()));
        }

        Ok(Self { names })
    }

    /// Parse a names file: one name per line, `#` starts a comment line
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'));

        Self::from_names(names).map_err(|_| {
            KreatureError::EmptyNameList(format!("{} contains no names", path.display()))
        })
    }

    /// Load a names file, falling back to the built-in table on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::from_file(path) {
            Ok(registry) => {
                tracing::info!("Loaded {} names from {}", registry.len(), path.display());
                registry
            }
            Err(e) => {
                tracing::warn!("Could not use names file ({}), using built-in names", e);
                Self::builtin()
            }
        }
    }

    /// Uniform random pick
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Construction guarantees at least one name
        self.names
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Kreature")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
