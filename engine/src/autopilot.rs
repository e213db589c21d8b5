//! Demo-mode policy: wanders the maze and fights without human input.

use crate::combat::{ActionSource, BattleAction, BattlePrompt};
use crate::game::Command;
use crate::grid::Direction;
use crate::player::ItemKind;
use crate::Dice;

pub const DEMO_STEP_LIMIT: u32 = 240;

// Up, left, down, right: a slight bias towards moving forward.
const MOVE_WEIGHTS: [(Direction, u32); 4] = [
    (Direction::Up, 1),
    (Direction::Left, 1),
    (Direction::Down, 2),
    (Direction::Right, 3),
];

#[derive(Debug, Clone)]
pub struct Autopilot {
    commands: u32,
    limit: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEMO_STEP_LIMIT)
    }
}

impl Autopilot {
    pub fn new(limit: u32) -> Self {
        Self { commands: 0, limit }
    }

    /// Next synthetic move; `Quit` once the step budget is spent.
    pub fn next_command(&mut self, dice: &mut Dice) -> Command {
        self.commands += 1;
        if self.commands > self.limit {
            return Command::Quit;
        }
        let total: u32 = MOVE_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut r = dice.below(total as usize) as u32;
        for (dir, w) in MOVE_WEIGHTS {
            if r < w {
                return Command::Move(dir);
            }
            r -= w;
        }
        Command::Move(Direction::Right)
    }
}

impl ActionSource for Autopilot {
    fn choose(&mut self, prompt: &BattlePrompt<'_>, dice: &mut Dice) -> BattleAction {
        let player = prompt.player;
        let inv = &player.inventory;
        if player.poisoned && inv.count(ItemKind::Antidote) > 0 && dice.chance(0.75) {
            return BattleAction::UseAntidote;
        }
        if player.hp() <= (0.35 * player.max_hp() as f64) as i32 {
            if inv.count(ItemKind::SuperPotion) > 0 && dice.chance(0.7) {
                return BattleAction::UseSuperPotion;
            }
            if inv.count(ItemKind::Potion) > 0 && dice.chance(0.8) {
                return BattleAction::UsePotion;
            }
        }
        if player.charges > 0 && dice.chance(0.66) {
            return BattleAction::ChargedAttack;
        }
        if dice.chance(0.85) {
            BattleAction::BasicAttack
        } else {
            BattleAction::DoNothing
        }
    }
}
