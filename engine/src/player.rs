use serde::{Deserialize, Serialize};

use crate::grid::{Pos, START};
use crate::health::{Health, heal};

pub const PLAYER_NAME: &str = "Charmander";
pub const BASE_MAX_HP: i32 = 120;
pub const STARTING_CHARGES: u32 = 3;
pub const POTION_HEAL: i32 = 25;
pub const SUPER_POTION_HEAL: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Potion,
    SuperPotion,
    Antidote,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Potion => "Potion",
            ItemKind::SuperPotion => "Super Potion",
            ItemKind::Antidote => "Antidote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub potions: u32,
    pub super_potions: u32,
    pub antidotes: u32,
}

impl Inventory {
    pub fn count(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Potion => self.potions,
            ItemKind::SuperPotion => self.super_potions,
            ItemKind::Antidote => self.antidotes,
        }
    }

    fn slot(&mut self, kind: ItemKind) -> &mut u32 {
        match kind {
            ItemKind::Potion => &mut self.potions,
            ItemKind::SuperPotion => &mut self.super_potions,
            ItemKind::Antidote => &mut self.antidotes,
        }
    }

    pub fn add(&mut self, kind: ItemKind) {
        *self.slot(kind) += 1;
    }

    /// Take one of `kind`; false when none are left.
    pub fn take(&mut self, kind: ItemKind) -> bool {
        let slot = self.slot(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self { level: 1, xp: 0, xp_to_next: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub hit_streak: u32,
    pub best_streak: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub enemies_defeated: u32,
    pub potions_used: u32,
    pub super_potions_used: u32,
    pub antidotes_used: u32,
}

impl CombatStats {
    pub fn record_hit(&mut self) {
        self.hit_streak += 1;
        self.best_streak = self.best_streak.max(self.hit_streak);
    }

    pub fn break_streak(&mut self) {
        self.hit_streak = 0;
    }

    fn record_item(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Potion => self.potions_used += 1,
            ItemKind::SuperPotion => self.super_potions_used += 1,
            ItemKind::Antidote => self.antidotes_used += 1,
        }
    }
}

/// Everything the run carries between steps and battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub health: Health,
    /// Flamethrower PP.
    pub charges: u32,
    pub inventory: Inventory,
    pub poisoned: bool,
    pub progress: Progress,
    pub score: u32,
    pub steps: u32,
    pub stats: CombatStats,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(START)
    }
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            health: Health::new(BASE_MAX_HP),
            charges: STARTING_CHARGES,
            inventory: Inventory::default(),
            poisoned: false,
            progress: Progress::default(),
            score: 0,
            steps: 0,
            stats: CombatStats::default(),
        }
    }

    pub fn hp(&self) -> i32 {
        self.health.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.health.max_hp
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }
}

/// Use one item from the inventory. Returns true when the item was consumed.
///
/// An antidote is only consumed while poisoned.
pub fn use_item(player: &mut Player, kind: ItemKind, mut log: impl FnMut(String)) -> bool {
    if player.inventory.count(kind) == 0 {
        log(format!("[ITEM][{}] no {} left", PLAYER_NAME, kind.label()));
        return false;
    }
    match kind {
        ItemKind::Potion | ItemKind::SuperPotion => {
            let amount = if kind == ItemKind::Potion { POTION_HEAL } else { SUPER_POTION_HEAL };
            player.inventory.take(kind);
            log(format!("[ITEM][{}] uses {}", PLAYER_NAME, kind.label()));
            heal(PLAYER_NAME, &mut player.health, amount, &mut log);
        }
        ItemKind::Antidote => {
            if !player.poisoned {
                log(format!("[ITEM][{}] is not poisoned", PLAYER_NAME));
                return false;
            }
            player.inventory.take(kind);
            player.poisoned = false;
            log(format!("[ITEM][{}] uses Antidote and is no longer poisoned", PLAYER_NAME));
        }
    }
    player.stats.record_item(kind);
    true
}
