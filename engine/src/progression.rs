use crate::health::raise_max;
use crate::player::{PLAYER_NAME, Player};

pub const THRESHOLD_GROWTH: f64 = 1.25;
pub const HP_PER_LEVEL: i32 = 10;

/// Award XP and apply every level-up it pays for, one threshold at a time.
///
/// Each level raises max HP (healing the same amount) and grows the next
/// threshold; even levels also grant one ability charge. Returns true when at
/// least one level was gained.
pub fn add_xp(player: &mut Player, amount: u32, mut log: impl FnMut(String)) -> bool {
    let progress = &mut player.progress;
    progress.xp += amount;
    let mut leveled = false;
    while progress.xp >= progress.xp_to_next {
        progress.xp -= progress.xp_to_next;
        progress.level += 1;
        progress.xp_to_next = (progress.xp_to_next as f64 * THRESHOLD_GROWTH).round() as u32;

        let old_max = player.health.max_hp;
        raise_max(&mut player.health, HP_PER_LEVEL);
        if progress.level % 2 == 0 {
            player.charges += 1;
        }
        log(format!(
            "[LEVEL][{}] Lv.{} max HP {} → {}, PP {}",
            PLAYER_NAME, progress.level, old_max, player.health.max_hp, player.charges
        ));
        leveled = true;
    }
    leveled
}
