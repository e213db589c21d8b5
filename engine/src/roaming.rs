use std::collections::HashSet;

use crate::grid::Pos;
use crate::world::World;
use crate::Dice;

pub const ROAM_CHANCE: f64 = 0.75;

/// Let every enemy take one random step, all against the pre-move snapshot.
///
/// Walls, the player's cell, every enemy's starting cell and any destination
/// already claimed this tick block movement. Items do not. Returns how many
/// enemies moved.
pub fn roam(world: &mut World, dice: &mut Dice, player: Pos) -> usize {
    let mut claimed: HashSet<Pos> = world
        .objects
        .iter()
        .filter(|o| o.kind.is_enemy())
        .map(|o| o.pos)
        .collect();

    let mut moves = Vec::new();
    for (idx, obj) in world.objects.iter().enumerate() {
        if !obj.kind.is_enemy() {
            continue;
        }
        if !dice.chance(ROAM_CHANCE) {
            continue;
        }
        let candidates: Vec<Pos> = world
            .grid
            .open_neighbors(obj.pos)
            .filter(|&p| p != player && !claimed.contains(&p))
            .collect();
        if let Some(&dest) = dice.pick(&candidates) {
            claimed.insert(dest);
            moves.push((idx, dest));
        }
    }

    for &(idx, dest) in &moves {
        world.objects[idx].pos = dest;
    }
    moves.len()
}
