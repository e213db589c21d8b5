use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32, // 0..=max_hp
    pub max_hp: i32,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

/// Apply damage, flooring at 0. Returns true if the creature dropped to 0 this call.
pub fn apply_damage(
    name: &str,
    health: &mut Health,
    dmg: i32,
    mut log: impl FnMut(String),
) -> bool {
    if dmg <= 0 {
        return false;
    }
    let before = health.hp;
    health.hp = (health.hp - dmg).max(0);
    log(format!("[DMG][{}] {} → {} (−{})", name, before, health.hp, dmg));
    if before > 0 && health.hp == 0 {
        log(format!("[STATE][{}] drops to 0 HP", name));
        return true;
    }
    false
}

/// Heal up to max HP. Returns the amount actually restored.
pub fn heal(name: &str, health: &mut Health, amount: i32, mut log: impl FnMut(String)) -> i32 {
    if amount <= 0 {
        return 0;
    }
    let before = health.hp;
    health.hp = (health.hp + amount).min(health.max_hp);
    let gained = health.hp - before;
    log(format!("[HEAL][{}] +{} HP ({} → {})", name, gained, before, health.hp));
    gained
}

/// Raise max HP and heal by the same amount, capped at the new max.
pub fn raise_max(health: &mut Health, amount: i32) {
    health.max_hp += amount;
    health.hp = (health.hp + amount).min(health.max_hp);
}
