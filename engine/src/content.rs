use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::roll::RollOdds;

const BUILTIN_SPECIES: &str = include_str!("../content/species.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Poison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub damage: i32,
    pub miss: f64,
    pub crit: f64,
    #[serde(default)]
    pub inflicts: Option<Status>,
}

impl Attack {
    pub fn odds(&self) -> RollOdds {
        RollOdds::new(self.miss, self.crit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub hp: i32,
    pub attacks: Vec<Attack>,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub mystery_spawn: bool,
}

/// Enemy catalog, kept in file order so uniform picks are reproducible.
#[derive(Debug, Clone)]
pub struct Roster {
    species: IndexMap<String, Species>,
}

impl Roster {
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_json(BUILTIN_SPECIES)
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let list: Vec<Species> = serde_json::from_str(text)?;
        Ok(Self::from_species(list))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read species JSON: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("failed to parse species JSON: {}", path.display()))
    }

    pub fn from_species(list: Vec<Species>) -> Self {
        let species = list.into_iter().map(|s| (s.name.clone(), s)).collect();
        Self { species }
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Species, EngineError> {
        self.get(name)
            .ok_or_else(|| EngineError::UnknownSpecies(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    /// Species placed on the map at the start of a run.
    pub fn wild(&self) -> Vec<&Species> {
        self.iter().filter(|s| !s.boss).collect()
    }

    /// Species a mystery tile may conjure.
    pub fn mystery_pool(&self) -> Vec<&Species> {
        self.iter().filter(|s| s.mystery_spawn && !s.boss).collect()
    }

    pub fn boss(&self) -> Option<&Species> {
        self.iter().find(|s| s.boss)
    }
}
