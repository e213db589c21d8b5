use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod autopilot;
pub mod combat;
pub mod content;
pub mod error;
pub mod game;
pub mod grid;
pub mod health;
pub mod hud;
pub mod mystery;
pub mod player;
pub mod progression;
pub mod roaming;
pub mod roll;
pub mod sim;
pub mod weather;
pub mod world;

pub use combat::{
    ActionSource, BattleAction, BattleOutcome, BattlePrompt, BattleSession, ScriptedActions,
};
pub use content::{Attack, Roster, Species, Status};
pub use error::EngineError;
pub use game::{Command, Difficulty, Game, GameConfig, GameStatus, StepReport};
pub use grid::{Direction, Grid, Pos, Tile};
pub use player::{Inventory, ItemKind, Player};
pub use roll::{RollOdds, RollOutcome};
pub use weather::{Weather, WeatherState};
pub use world::{MapObject, ObjectCounts, ObjectKind, World};

/// The single random source shared by every component.
///
/// Every draw goes through [`Dice::unit`], so a scripted source can pin
/// down any sequence of outcomes exactly.
pub struct Dice {
    source: Source,
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<f64>, cursor: usize },
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Replays `values` in order, wrapping around once exhausted.
    pub fn from_scripted(values: Vec<f64>) -> Self {
        Self { source: Source::Scripted { values, cursor: 0 } }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0.0..1.0),
            Source::Scripted { values, cursor } => {
                if values.is_empty() {
                    return 0.0;
                }
                let v = values[*cursor % values.len()];
                *cursor += 1;
                v.clamp(0.0, 1.0 - f64::EPSILON)
            }
        }
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below(0)");
        ((self.unit() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        lo + self.below((hi - lo + 1) as usize) as i32
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.below(items.len())])
        }
    }

    /// Fisher-Yates, drawing from the same source as everything else.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}
