use serde::Serialize;

use crate::content::Roster;
use crate::grid::Pos;
use crate::health::heal;
use crate::player::{PLAYER_NAME, Player};
use crate::world::{MapObject, ObjectKind, World};
use crate::Dice;

pub const MYSTERY_HEAL: i32 = 20;
pub const CONSOLATION_SCORE: u32 = 3;
pub const BONUS_SCORE: (i32, i32) = (5, 15);

/// What a mystery tile did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MysteryEffect {
    Healed(i32),
    Poisoned,
    Consolation(u32),
    ChargeGained,
    ScoreBonus(u32),
    Spawned { species: String, pos: Pos },
    SpawnBlocked,
}

/// Roll one of five equally likely effects. The caller removes the tile.
pub fn resolve_mystery(
    player: &mut Player,
    world: &mut World,
    roster: &Roster,
    dice: &mut Dice,
    mut log: impl FnMut(String),
) -> MysteryEffect {
    let roll = dice.unit();
    if roll < 0.20 {
        let gained = heal(PLAYER_NAME, &mut player.health, MYSTERY_HEAL, &mut log);
        log(format!("[MYSTERY] healed +{}", gained));
        MysteryEffect::Healed(gained)
    } else if roll < 0.40 {
        if !player.poisoned {
            player.poisoned = true;
            log("[MYSTERY] uh oh, poisoned!".to_string());
            MysteryEffect::Poisoned
        } else {
            player.score += CONSOLATION_SCORE;
            log(format!("[MYSTERY] fizzles, consolation +{} score", CONSOLATION_SCORE));
            MysteryEffect::Consolation(CONSOLATION_SCORE)
        }
    } else if roll < 0.60 {
        player.charges += 1;
        log(format!("[MYSTERY] +1 PP (now {})", player.charges));
        MysteryEffect::ChargeGained
    } else if roll < 0.80 {
        let bonus = dice.range_inclusive(BONUS_SCORE.0, BONUS_SCORE.1) as u32;
        player.score += bonus;
        log(format!("[MYSTERY] rain of coins, +{} score", bonus));
        MysteryEffect::ScoreBonus(bonus)
    } else {
        spawn_surprise(player.pos, world, roster, dice, log)
    }
}

fn spawn_surprise(
    player: Pos,
    world: &mut World,
    roster: &Roster,
    dice: &mut Dice,
    mut log: impl FnMut(String),
) -> MysteryEffect {
    let pos = match world.random_free_cell(dice, player) {
        Ok(pos) => pos,
        Err(err) => {
            tracing::debug!(%err, "mystery spawn skipped");
            log("[MYSTERY] tried to spawn an enemy, but there is no space".to_string());
            return MysteryEffect::SpawnBlocked;
        }
    };
    let pool = roster.mystery_pool();
    let Some(&species) = dice.pick(&pool) else {
        log("[MYSTERY] nothing answers the call".to_string());
        return MysteryEffect::SpawnBlocked;
    };
    world.objects.push(MapObject { pos, kind: ObjectKind::enemy(species) });
    log(format!("[MYSTERY] a wild {} appears!", species.name));
    MysteryEffect::Spawned { species: species.name.clone(), pos }
}
