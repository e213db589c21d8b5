use serde::{Deserialize, Serialize};

use crate::Dice;

/// Damage bonus (Sunny) or penalty (Rain) on the player's fire moves.
pub const FIRE_SHIFT: i32 = 2;
/// Enemy damage that lands in Fog is scaled by this.
pub const FOG_SOFTENING: f64 = 0.7;
/// A weather shift is considered once every this many steps.
pub const SHIFT_EVERY_STEPS: u32 = 6;
pub const SHIFT_CHANCE: f64 = 0.25;

const DEFAULT_TURNS: (i32, i32) = (8, 16);
const SHIFT_TURNS: (i32, i32) = (8, 14);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Sunny,
    Rain,
    Fog,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Sunny, Weather::Rain, Weather::Fog];
    pub const ACTIVE: [Weather; 3] = [Weather::Sunny, Weather::Rain, Weather::Fog];

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Sunny => "Sunny",
            Weather::Rain => "Rain",
            Weather::Fog => "Fog",
        }
    }

    /// Adjust a fire move's base damage before variance.
    pub fn adjust_fire(self, base: i32) -> i32 {
        match self {
            Weather::Sunny => base + FIRE_SHIFT,
            Weather::Rain => (base - FIRE_SHIFT).max(0),
            Weather::Clear | Weather::Fog => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeatherState {
    pub kind: Weather,
    pub turns: u32,
}

impl WeatherState {
    pub fn is(&self, kind: Weather) -> bool {
        self.kind == kind
    }

    /// Missing values are drawn: the state first, then the duration.
    pub fn set(&mut self, dice: &mut Dice, kind: Option<Weather>, turns: Option<u32>) {
        let kind = kind.unwrap_or_else(|| Weather::ALL[dice.below(Weather::ALL.len())]);
        let turns = turns
            .unwrap_or_else(|| dice.range_inclusive(DEFAULT_TURNS.0, DEFAULT_TURNS.1) as u32);
        self.kind = kind;
        self.turns = turns;
        tracing::debug!(weather = kind.label(), turns, "weather set");
    }

    /// Per-step decay; expiry forces Clear.
    pub fn tick(&mut self) {
        if self.turns > 0 {
            self.turns -= 1;
            if self.turns == 0 {
                self.kind = Weather::Clear;
            }
        }
    }

    /// Every sixth step there is a chance to force a fresh non-Clear weather.
    /// Returns the new weather when a shift happened.
    pub fn maybe_shift(&mut self, dice: &mut Dice, steps: u32) -> Option<Weather> {
        if steps == 0 || steps % SHIFT_EVERY_STEPS != 0 || !dice.chance(SHIFT_CHANCE) {
            return None;
        }
        let kind = Weather::ACTIVE[dice.below(Weather::ACTIVE.len())];
        let turns = dice.range_inclusive(SHIFT_TURNS.0, SHIFT_TURNS.1) as u32;
        self.set(dice, Some(kind), Some(turns));
        Some(kind)
    }
}
