use crate::combat::BattleAction;
use crate::player::{ItemKind, PLAYER_NAME, Player, use_item};
use crate::roll::{RollOdds, apply_variance};
use crate::weather::{Weather, WeatherState};
use crate::Dice;

pub const EMBER_BASE: i32 = 10;
pub const FLAMETHROWER_BASE: i32 = 12;
pub const COMBO_CAP: i32 = 8;
pub const RUN_CHANCE: f64 = 0.5;

const EMBER_CRIT: f64 = 0.13;
const FLAMETHROWER_CRIT: f64 = 0.16;

/// What the player's turn did to the enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnResult {
    pub damage: i32,
    pub escaped: bool,
}

/// Flat bonus from consecutive hits: 2 per hit past the first, capped.
pub fn combo_bonus(hit_streak: u32) -> i32 {
    (2 * (hit_streak as i32 - 1)).clamp(0, COMBO_CAP)
}

/// Base damage of a fire move before variance: level ramp, weather, combo.
/// Returns (base, combo).
pub fn fire_base(move_base: i32, player: &Player, weather: Weather) -> (i32, i32) {
    let ramped = move_base + (player.level() as i32 - 1);
    let combo = combo_bonus(player.stats.hit_streak);
    (weather.adjust_fire(ramped) + combo, combo)
}

fn ember_odds(weather: &WeatherState) -> RollOdds {
    let miss = if weather.is(Weather::Fog) { 0.06 } else { 0.05 };
    RollOdds::new(miss, EMBER_CRIT)
}

// Fog costs Flamethrower two points of accuracy, Ember only one.
fn flamethrower_odds(weather: &WeatherState) -> RollOdds {
    let miss = if weather.is(Weather::Fog) { 0.10 } else { 0.08 };
    RollOdds::new(miss, FLAMETHROWER_CRIT)
}

/// Resolve one player action. Every non-damaging outcome breaks the streak.
pub fn resolve_player_action(
    action: BattleAction,
    player: &mut Player,
    weather: &WeatherState,
    dice: &mut Dice,
    mut log: impl FnMut(String),
) -> TurnResult {
    let result = match action {
        BattleAction::BasicAttack => {
            let (base, combo) = fire_base(EMBER_BASE, player, weather.kind);
            let dmg = apply_variance(dice, base, ember_odds(weather));
            land_fire(player, "Ember", dmg, combo, &mut log)
        }
        BattleAction::ChargedAttack => {
            if player.charges == 0 {
                player.stats.break_streak();
                log(format!("[TURN][{}] no PP left for Flamethrower; turn lost", PLAYER_NAME));
                TurnResult::default()
            } else {
                player.charges -= 1;
                let (base, combo) = fire_base(FLAMETHROWER_BASE, player, weather.kind);
                let dmg = apply_variance(dice, base, flamethrower_odds(weather));
                land_fire(player, "Flamethrower", dmg, combo, &mut log)
            }
        }
        BattleAction::DoNothing => {
            player.stats.break_streak();
            log(format!("[TURN][{}] does nothing…", PLAYER_NAME));
            TurnResult::default()
        }
        BattleAction::UsePotion => item_turn(player, ItemKind::Potion, &mut log),
        BattleAction::UseSuperPotion => item_turn(player, ItemKind::SuperPotion, &mut log),
        BattleAction::UseAntidote => item_turn(player, ItemKind::Antidote, &mut log),
        BattleAction::Run => {
            player.stats.break_streak();
            if dice.chance(RUN_CHANCE) {
                log(format!("[RUN][{}] got away safely!", PLAYER_NAME));
                TurnResult { damage: 0, escaped: true }
            } else {
                log(format!("[RUN][{}] failed to escape", PLAYER_NAME));
                TurnResult::default()
            }
        }
    };
    player.stats.damage_dealt += result.damage.max(0) as u32;
    result
}

fn land_fire(
    player: &mut Player,
    move_name: &str,
    dmg: i32,
    combo: i32,
    log: &mut impl FnMut(String),
) -> TurnResult {
    if dmg > 0 {
        player.stats.record_hit();
        if combo > 0 {
            log(format!("[COMBO][{}] +{}!", PLAYER_NAME, combo));
        }
        log(format!("[ATTACK][{}] {} → HIT (−{} enemy HP)", PLAYER_NAME, move_name, dmg));
    } else {
        player.stats.break_streak();
        log(format!("[ATTACK][{}] {} → MISS", PLAYER_NAME, move_name));
    }
    TurnResult { damage: dmg, escaped: false }
}

fn item_turn(player: &mut Player, kind: ItemKind, log: &mut impl FnMut(String)) -> TurnResult {
    if !use_item(player, kind, &mut *log) {
        log(format!("[TURN][{}] turn lost", PLAYER_NAME));
    }
    player.stats.break_streak();
    TurnResult::default()
}
