use serde::{Deserialize, Serialize};

use crate::autopilot::Autopilot;
use crate::combat::{BattleOutcome, BattleSession};
use crate::content::Roster;
use crate::error::EngineError;
use crate::player::Player;
use crate::progression::add_xp;
use crate::weather::{Weather, WeatherState};
use crate::Dice;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimConfig {
    pub species: String,
    pub trials: u32,
    /// Trial `i` is seeded with `seed + i`.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_level() -> u32 {
    1
}

fn default_max_rounds() -> u32 {
    50
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimSummary {
    pub species: String,
    pub samples: u32,
    pub wins: u32,
    pub losses: u32,
    pub escapes: u32,
    pub unfinished: u32,
    pub avg_rounds_won: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
}

/// A fresh player raised to `level` through the normal XP curve.
pub fn player_at_level(level: u32) -> Player {
    let mut player = Player::default();
    while player.level() < level {
        let need = player.progress.xp_to_next - player.progress.xp;
        add_xp(&mut player, need, |_| {});
    }
    player
}

/// Run many autopiloted battles against one species.
pub fn simulate_battles(cfg: &SimConfig, roster: &Roster) -> Result<SimSummary, EngineError> {
    let species = roster.require(&cfg.species)?;
    let turns = if cfg.weather == Weather::Clear { 0 } else { u32::MAX };
    let weather = WeatherState { kind: cfg.weather, turns };
    let mut summary = SimSummary {
        species: species.name.clone(),
        samples: cfg.trials,
        ..SimSummary::default()
    };
    let mut rounds_won = 0u64;
    let mut dealt = 0u64;
    let mut taken = 0u64;

    for i in 0..cfg.trials {
        let mut dice = Dice::from_seed(cfg.seed.wrapping_add(i as u64));
        let mut player = player_at_level(cfg.level);
        let mut pilot = Autopilot::default();
        let mut session = BattleSession::new(species, species.hp);

        let mut outcome = None;
        while outcome.is_none() && session.rounds() < cfg.max_rounds {
            outcome = session.play_round(&mut player, &weather, &mut dice, &mut pilot, |_| {});
        }
        match outcome {
            Some(BattleOutcome::Won) => {
                summary.wins += 1;
                rounds_won += session.rounds() as u64;
            }
            Some(BattleOutcome::Lost) => summary.losses += 1,
            Some(BattleOutcome::Escaped) => summary.escapes += 1,
            None => summary.unfinished += 1,
        }
        dealt += player.stats.damage_dealt as u64;
        taken += player.stats.damage_taken as u64;
    }

    let n = cfg.trials.max(1) as f64;
    summary.avg_rounds_won = if summary.wins == 0 {
        0.0
    } else {
        rounds_won as f64 / summary.wins as f64
    };
    summary.avg_damage_dealt = dealt as f64 / n;
    summary.avg_damage_taken = taken as f64 / n;
    tracing::debug!(wins = summary.wins, losses = summary.losses, "simulation finished");
    Ok(summary)
}
