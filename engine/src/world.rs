use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::content::{Roster, Species};
use crate::error::EngineError;
use crate::grid::{Grid, Pos};
use crate::player::{ItemKind, POTION_HEAL, SUPER_POTION_HEAL};
use crate::Dice;

pub const COIN_VALUE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Enemy { species: String, hp: i32 },
    Potion { heal: i32 },
    SuperPotion { heal: i32 },
    Antidote,
    Coin { value: u32 },
    Mystery,
}

impl ObjectKind {
    pub fn enemy(species: &Species) -> Self {
        ObjectKind::Enemy { species: species.name.clone(), hp: species.hp }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, ObjectKind::Enemy { .. })
    }

    /// The inventory item this object turns into when picked up.
    pub fn item(&self) -> Option<ItemKind> {
        match self {
            ObjectKind::Potion { .. } => Some(ItemKind::Potion),
            ObjectKind::SuperPotion { .. } => Some(ItemKind::SuperPotion),
            ObjectKind::Antidote => Some(ItemKind::Antidote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub pos: Pos,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

/// How many of each object to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectCounts {
    pub enemies: u32,
    pub potions: u32,
    pub super_potions: u32,
    pub antidotes: u32,
    pub coins: u32,
    pub mysteries: u32,
}

impl Default for ObjectCounts {
    fn default() -> Self {
        Self { enemies: 6, potions: 4, super_potions: 2, antidotes: 2, coins: 8, mysteries: 4 }
    }
}

impl ObjectCounts {
    pub const fn empty() -> Self {
        Self { enemies: 0, potions: 0, super_potions: 0, antidotes: 0, coins: 0, mysteries: 0 }
    }

    pub fn total(&self) -> usize {
        [self.enemies, self.potions, self.super_potions, self.antidotes, self.coins, self.mysteries]
            .iter()
            .map(|&n| n as usize)
            .sum()
    }

    /// Reduced counts for the single placement retry: enemies drop by a
    /// quarter (at least one, never below one), everything else by one.
    pub fn shrunk(&self) -> Self {
        let cut = (self.enemies / 4).max(1);
        Self {
            enemies: self.enemies.saturating_sub(cut).max(1),
            potions: self.potions.saturating_sub(1),
            super_potions: self.super_potions.saturating_sub(1),
            antidotes: self.antidotes.saturating_sub(1),
            coins: self.coins.saturating_sub(1),
            mysteries: self.mysteries.saturating_sub(1),
        }
    }
}

/// The grid plus everything standing on it, except the player.
#[derive(Debug, Clone)]
pub struct World {
    pub grid: Grid,
    pub objects: Vec<MapObject>,
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self { grid, objects: Vec::new() }
    }

    /// Clear the map and place `counts` objects on distinct free cells.
    ///
    /// Nothing is placed when the request cannot fit.
    pub fn populate(
        &mut self,
        dice: &mut Dice,
        roster: &Roster,
        counts: ObjectCounts,
        player: Pos,
    ) -> Result<(), EngineError> {
        self.objects.clear();
        let mut free: Vec<Pos> = self.grid.floor_cells().filter(|&p| p != player).collect();
        let requested = counts.total();
        if requested > free.len() {
            return Err(EngineError::Capacity { requested, available: free.len() });
        }
        let wild = roster.wild();
        if counts.enemies > 0 && wild.is_empty() {
            return Err(EngineError::EmptyRoster("wild"));
        }
        dice.shuffle(&mut free);

        let mut place = |kind: ObjectKind, objects: &mut Vec<MapObject>| {
            if let Some(pos) = free.pop() {
                objects.push(MapObject { pos, kind });
            }
        };
        for _ in 0..counts.enemies {
            let species = wild[dice.below(wild.len())];
            place(ObjectKind::enemy(species), &mut self.objects);
        }
        for _ in 0..counts.potions {
            place(ObjectKind::Potion { heal: POTION_HEAL }, &mut self.objects);
        }
        for _ in 0..counts.super_potions {
            place(ObjectKind::SuperPotion { heal: SUPER_POTION_HEAL }, &mut self.objects);
        }
        for _ in 0..counts.antidotes {
            place(ObjectKind::Antidote, &mut self.objects);
        }
        for _ in 0..counts.coins {
            place(ObjectKind::Coin { value: COIN_VALUE }, &mut self.objects);
        }
        for _ in 0..counts.mysteries {
            place(ObjectKind::Mystery, &mut self.objects);
        }
        tracing::debug!(placed = self.objects.len(), "map populated");
        Ok(())
    }

    /// A walkable cell that is neither the player's nor occupied.
    pub fn random_free_cell(&self, dice: &mut Dice, player: Pos) -> Result<Pos, EngineError> {
        let taken: HashSet<Pos> = self.objects.iter().map(|o| o.pos).collect();
        let free: Vec<Pos> = self
            .grid
            .floor_cells()
            .filter(|&p| p != player && !taken.contains(&p))
            .collect();
        dice.pick(&free).copied().ok_or(EngineError::NoFreeCell)
    }

    pub fn enemy_count(&self) -> usize {
        self.objects.iter().filter(|o| o.kind.is_enemy()).count()
    }

    pub fn enemy_at(&self, pos: Pos) -> Option<usize> {
        self.objects.iter().position(|o| o.pos == pos && o.kind.is_enemy())
    }

    pub fn item_at(&self, pos: Pos) -> Option<usize> {
        self.objects.iter().position(|o| o.pos == pos && !o.kind.is_enemy())
    }

    pub fn object_at(&self, pos: Pos) -> Option<&MapObject> {
        self.objects.iter().find(|o| o.pos == pos)
    }

    pub fn count_of(&self, pred: impl Fn(&ObjectKind) -> bool) -> usize {
        self.objects.iter().filter(|o| pred(&o.kind)).count()
    }
}
