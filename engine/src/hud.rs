//! Plain-text frames for a terminal front end.

use std::fmt::Write as _;

use crate::game::Game;
use crate::grid::{Pos, Tile};
use crate::player::Player;
use crate::weather::Weather;
use crate::world::ObjectKind;

pub const HP_BAR_SIZE: usize = 20;

/// `[*****     ] (cur/total)`, with `current` clamped into `[0, total]`.
pub fn draw_bar(current: i32, total: i32, size: usize) -> String {
    let total = if total <= 0 { 1 } else { total };
    let current = current.clamp(0, total);
    let size = size.max(1);
    let filled = (current as usize * size) / total as usize;
    format!(
        "[{}{}] ({}/{})",
        "*".repeat(filled),
        " ".repeat(size - filled),
        current,
        total
    )
}

fn cell_glyph(game: &Game, pos: Pos, tile: Tile) -> &'static str {
    if game.player.pos == pos {
        return " @ ";
    }
    if tile == Tile::Wall {
        return "###";
    }
    match game.world.object_at(pos).map(|o| &o.kind) {
        Some(ObjectKind::Enemy { .. }) => " E ",
        Some(
            ObjectKind::Potion { .. } | ObjectKind::SuperPotion { .. } | ObjectKind::Antidote,
        ) => " * ",
        Some(ObjectKind::Coin { .. }) => " $ ",
        Some(ObjectKind::Mystery) => " ? ",
        None => "   ",
    }
}

/// HUD lines, the bordered map and the key hint. Never mutates the game.
pub fn render_frame(game: &Game) -> String {
    let p = &game.player;
    let grid = &game.world.grid;
    let mut out = String::new();

    let _ = write!(
        out,
        "HP {}  Pot:{} Sup:{} Ant:{}  Enemies:{}  Flame PP:{}",
        draw_bar(p.hp(), p.max_hp(), HP_BAR_SIZE),
        p.inventory.potions,
        p.inventory.super_potions,
        p.inventory.antidotes,
        game.world.enemy_count(),
        p.charges
    );
    if p.poisoned {
        out.push_str("  [POISONED]");
    }
    out.push_str("  (@=you, E=enemies, $=coins, ?=mystery, *=items)\n");

    let weather = &game.weather;
    let turns = if weather.kind != Weather::Clear {
        format!("[{}]", weather.turns)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "Lvl:{}  XP:{}/{}  Score:{}  Steps:{}  Combo:{} (best {})  Weather:{}{}",
        p.level(),
        p.progress.xp,
        p.progress.xp_to_next,
        p.score,
        p.steps,
        p.stats.hit_streak,
        p.stats.best_streak,
        weather.kind.label(),
        turns
    );

    let border = format!("+{}+\n", "-".repeat(grid.width() * 3));
    out.push_str(&border);
    for y in 0..grid.height() {
        out.push('|');
        if let Some(row) = grid.row(y) {
            for (x, &tile) in row.iter().enumerate() {
                out.push_str(cell_glyph(game, Pos::new(x, y), tile));
            }
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out.push_str("Move: w/a/s/d | Help: h | Quit: q\n");
    out
}

pub fn help_text() -> &'static str {
    "Help:\n\
     \x20 - Move with WASD. @ is you. E are enemies. $ are coins.\n\
     \x20 - ? are mystery tiles. * are items.\n\
     \x20 - Items: Potion (+25), Super Potion (+50), Antidote (cures poison).\n\
     \x20 - Defeat all enemies… then face the Boss!\n\
     \x20 - Weather: Sunny (+fire dmg), Rain (-fire dmg), Fog (more misses), Clear (neutral).\n\
     \x20 - In battle: [A] Ember  [L] Flamethrower (limited PP)  [R] Run (50%)\n\
     \x20             [P] Potion  [U] Super Potion  [D] Antidote  [N] Nothing\n"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    HotStreak,
    RoamSlayer,
    CoinHoarder,
}

impl Achievement {
    pub fn title(self) -> &'static str {
        match self {
            Achievement::HotStreak => "HOT STREAK (6+ combo)",
            Achievement::RoamSlayer => "ROAM SLAYER (6+ foes)",
            Achievement::CoinHoarder => "COIN HOARDER (100+)",
        }
    }

    pub fn earned(player: &Player) -> Vec<Achievement> {
        let mut out = Vec::new();
        if player.stats.best_streak >= 6 {
            out.push(Achievement::HotStreak);
        }
        if player.stats.enemies_defeated >= 6 {
            out.push(Achievement::RoamSlayer);
        }
        if player.score >= 100 {
            out.push(Achievement::CoinHoarder);
        }
        out
    }
}

/// End-of-run summary lines.
pub fn run_summary(player: &Player) -> Vec<String> {
    let s = &player.stats;
    let mut lines = vec![
        "=== RUN SUMMARY ===".to_string(),
        format!(
            "Level: {}   XP: {}/{}   Score: {}",
            player.level(),
            player.progress.xp,
            player.progress.xp_to_next,
            player.score
        ),
        format!("Enemies defeated: {}", s.enemies_defeated),
        format!("Steps taken: {}", player.steps),
        format!("Damage dealt: {}   Damage taken: {}", s.damage_dealt, s.damage_taken),
        format!(
            "Potions used: {} Super Potions used: {} Antidotes used: {}",
            s.potions_used, s.super_potions_used, s.antidotes_used
        ),
        format!("Best combo streak: {}", s.best_streak),
    ];
    for a in Achievement::earned(player) {
        lines.push(format!("Achievement: {}", a.title()));
    }
    lines.push("===================".to_string());
    lines
}
