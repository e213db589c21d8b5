//! Turn-based battle between the player and one enemy.
//!
//! A round runs: poison tick, enemy attack, player action. The session ends
//! as soon as either side hits 0 HP or the player runs away.

pub mod actions;

use serde::{Deserialize, Serialize};

use crate::content::{Species, Status};
use crate::health::{apply_damage, heal};
use crate::player::{ItemKind, PLAYER_NAME, Player};
use crate::progression::add_xp;
use crate::roll::{roll, scale_damage};
use crate::weather::{FOG_SOFTENING, Weather, WeatherState};
use crate::Dice;

use self::actions::resolve_player_action;

pub const POISON_TICK: i32 = 5;
pub const WIN_SCORE: u32 = 20;
pub const LOOT_HEAL: i32 = 10;
pub const LOOT_HEAL_CHANCE: f64 = 0.3;
pub const LOOT_POTION_CHANCE: f64 = 0.2;
pub const XP_REWARD: (i32, i32) = (30, 45);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleAction {
    BasicAttack,
    ChargedAttack,
    DoNothing,
    UsePotion,
    UseSuperPotion,
    UseAntidote,
    Run,
}

impl BattleAction {
    pub const ALL: [BattleAction; 7] = [
        BattleAction::BasicAttack,
        BattleAction::ChargedAttack,
        BattleAction::DoNothing,
        BattleAction::UsePotion,
        BattleAction::UseSuperPotion,
        BattleAction::UseAntidote,
        BattleAction::Run,
    ];

    /// Menu key used by the terminal front end.
    pub fn key(self) -> char {
        match self {
            BattleAction::BasicAttack => 'A',
            BattleAction::ChargedAttack => 'L',
            BattleAction::DoNothing => 'N',
            BattleAction::UsePotion => 'P',
            BattleAction::UseSuperPotion => 'U',
            BattleAction::UseAntidote => 'D',
            BattleAction::Run => 'R',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            BattleAction::BasicAttack => "Ember",
            BattleAction::ChargedAttack => "Flamethrower",
            BattleAction::DoNothing => "Nothing",
            BattleAction::UsePotion => "Potion",
            BattleAction::UseSuperPotion => "Super Potion",
            BattleAction::UseAntidote => "Antidote",
            BattleAction::Run => "Run",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Won,
    Lost,
    Escaped,
}

/// What the action source sees when asked for a move.
#[derive(Debug)]
pub struct BattlePrompt<'a> {
    pub enemy: &'a str,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub player: &'a Player,
    pub weather: Weather,
    pub options: &'a [BattleAction],
}

/// Supplies the player's action each round. Draws, if any, come from the
/// shared dice.
pub trait ActionSource {
    fn choose(&mut self, prompt: &BattlePrompt<'_>, dice: &mut Dice) -> BattleAction;

    /// Sees every battle log line as it is emitted.
    fn observe(&mut self, _line: &str) {}
}

/// Plays back a fixed list of actions, repeating the last one. An empty list
/// always attacks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedActions {
    actions: Vec<BattleAction>,
    cursor: usize,
}

impl ScriptedActions {
    pub fn new(actions: Vec<BattleAction>) -> Self {
        Self { actions, cursor: 0 }
    }
}

impl ActionSource for ScriptedActions {
    fn choose(&mut self, _prompt: &BattlePrompt<'_>, _dice: &mut Dice) -> BattleAction {
        let idx = self.cursor.min(self.actions.len().saturating_sub(1));
        self.cursor += 1;
        self.actions.get(idx).copied().unwrap_or(BattleAction::BasicAttack)
    }
}

/// Rewards rolled after a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Spoils {
    pub score: u32,
    pub healed: i32,
    pub potion: bool,
    pub xp: u32,
    pub leveled: bool,
}

/// One engagement. The enemy's HP is a working copy; the map object is only
/// touched by the caller once the session is over.
#[derive(Debug)]
pub struct BattleSession<'a> {
    species: &'a Species,
    enemy_hp: i32,
    enemy_max_hp: i32,
    rounds: u32,
    outcome: Option<BattleOutcome>,
}

impl<'a> BattleSession<'a> {
    pub fn new(species: &'a Species, enemy_hp: i32) -> Self {
        Self {
            species,
            enemy_hp: enemy_hp.max(0),
            enemy_max_hp: species.hp.max(enemy_hp),
            rounds: 0,
            outcome: None,
        }
    }

    pub fn enemy_hp(&self) -> i32 {
        self.enemy_hp
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    fn finish(&mut self, outcome: BattleOutcome) -> Option<BattleOutcome> {
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Poison tick, enemy attack, and the loss check.
    pub fn enemy_phase(
        &mut self,
        player: &mut Player,
        weather: &WeatherState,
        dice: &mut Dice,
        mut log: impl FnMut(String),
    ) -> Option<BattleOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.rounds += 1;
        log(format!("[ROUND] {}", self.rounds));

        if player.poisoned {
            log(format!("[STATUS][{}] poison hurts!", PLAYER_NAME));
            apply_damage(PLAYER_NAME, &mut player.health, POISON_TICK, &mut log);
            player.stats.damage_taken += POISON_TICK as u32;
        }

        let name = &self.species.name;
        if let Some(attack) = dice.pick(&self.species.attacks) {
            let mut out = roll(dice, attack.damage, attack.odds());
            if !out.missed && weather.is(Weather::Fog) {
                out.damage = scale_damage(out.damage, FOG_SOFTENING);
            }
            if out.missed {
                log(format!("[ATTACK][{}] {} → MISS", name, attack.name));
            } else if attack.damage > 0 {
                let crit = if out.critical { " CRIT!" } else { "" };
                log(format!(
                    "[ATTACK][{}] {} → HIT (−{} HP){}",
                    name, attack.name, out.damage, crit
                ));
            } else {
                log(format!("[ATTACK][{}] {} (status)", name, attack.name));
            }
            apply_damage(PLAYER_NAME, &mut player.health, out.damage, &mut log);
            player.stats.damage_taken += out.damage as u32;

            if attack.inflicts == Some(Status::Poison) && !out.missed && !player.poisoned {
                player.poisoned = true;
                log(format!("[COND][{}] is poisoned", PLAYER_NAME));
            }
        }

        if player.health.is_down() {
            return self.finish(BattleOutcome::Lost);
        }
        None
    }

    /// Apply the chosen action, then the win check.
    pub fn player_phase(
        &mut self,
        action: BattleAction,
        player: &mut Player,
        weather: &WeatherState,
        dice: &mut Dice,
        mut log: impl FnMut(String),
    ) -> Option<BattleOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let turn = resolve_player_action(action, player, weather, dice, &mut log);
        if turn.escaped {
            return self.finish(BattleOutcome::Escaped);
        }
        if turn.damage > 0 {
            let before = self.enemy_hp;
            self.enemy_hp = (self.enemy_hp - turn.damage).max(0);
            log(format!("[HP][{}] {} → {}", self.species.name, before, self.enemy_hp));
        }
        if self.enemy_hp == 0 {
            return self.finish(BattleOutcome::Won);
        }
        None
    }

    /// One full round, asking `source` for the player's move after the enemy
    /// has acted.
    pub fn play_round(
        &mut self,
        player: &mut Player,
        weather: &WeatherState,
        dice: &mut Dice,
        source: &mut impl ActionSource,
        mut log: impl FnMut(String),
    ) -> Option<BattleOutcome> {
        let done = self.enemy_phase(player, weather, dice, |m| emit(source, &mut log, m));
        if done.is_some() {
            return done;
        }
        let action = {
            let prompt = BattlePrompt {
                enemy: &self.species.name,
                enemy_hp: self.enemy_hp,
                enemy_max_hp: self.enemy_max_hp,
                player,
                weather: weather.kind,
                options: &BattleAction::ALL,
            };
            source.choose(&prompt, dice)
        };
        self.player_phase(action, player, weather, dice, |m| emit(source, &mut log, m))
    }

    /// Fight to a terminal outcome, then settle streak and spoils.
    pub fn run(
        mut self,
        player: &mut Player,
        weather: &WeatherState,
        dice: &mut Dice,
        source: &mut impl ActionSource,
        mut log: impl FnMut(String),
    ) -> BattleOutcome {
        let start = format!(
            "[BATTLE] {} (HP {}) vs {} (HP {})",
            PLAYER_NAME,
            player.hp(),
            self.species.name,
            self.enemy_hp
        );
        emit(source, &mut log, start);
        let outcome = loop {
            if self.enemy_hp == 0 {
                break BattleOutcome::Won;
            }
            if player.health.is_down() {
                break BattleOutcome::Lost;
            }
            if let Some(done) = self.play_round(player, weather, dice, source, &mut log) {
                break done;
            }
        };
        self.outcome = Some(outcome);
        player.stats.break_streak();

        match outcome {
            BattleOutcome::Won => {
                let line = format!(
                    "[END] {} defeated in {} rounds",
                    self.species.name, self.rounds
                );
                emit(source, &mut log, line);
                grant_spoils(player, dice, |m| emit(source, &mut log, m));
            }
            BattleOutcome::Lost => emit(source, &mut log, format!("[END] {} fainted", PLAYER_NAME)),
            BattleOutcome::Escaped => {
                let line = format!("[END] fled from {}", self.species.name);
                emit(source, &mut log, line);
            }
        }
        outcome
    }
}

fn emit(source: &mut impl ActionSource, log: &mut impl FnMut(String), line: String) {
    source.observe(&line);
    log(line);
}

/// Win rewards, rolled in order: heal, potion drop, XP.
pub fn grant_spoils(player: &mut Player, dice: &mut Dice, mut log: impl FnMut(String)) -> Spoils {
    let mut spoils = Spoils { score: WIN_SCORE, ..Spoils::default() };
    player.stats.enemies_defeated += 1;
    player.score += WIN_SCORE;
    log(format!("[LOOT] +{} score", WIN_SCORE));

    if dice.chance(LOOT_HEAL_CHANCE) {
        spoils.healed = heal(PLAYER_NAME, &mut player.health, LOOT_HEAL, &mut log);
    }
    if dice.chance(LOOT_POTION_CHANCE) {
        player.inventory.add(ItemKind::Potion);
        spoils.potion = true;
        log("[LOOT] the enemy dropped a Potion".to_string());
    }
    spoils.xp = dice.range_inclusive(XP_REWARD.0, XP_REWARD.1) as u32;
    log(format!("[LOOT] +{} XP", spoils.xp));
    spoils.leveled = add_xp(player, spoils.xp, &mut log);
    spoils
}
