use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::{ActionSource, BattleOutcome, BattleSession};
use crate::content::{Roster, Species};
use crate::error::EngineError;
use crate::grid::{Direction, Grid, START};
use crate::mystery::resolve_mystery;
use crate::player::{PLAYER_NAME, Player};
use crate::roaming::roam;
use crate::weather::{Weather, WeatherState};
use crate::world::{MapObject, ObjectCounts, ObjectKind, World};
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Scale the requested counts: hard mode brings more enemies and
    /// mysteries, fewer supplies.
    pub fn apply(self, counts: ObjectCounts) -> ObjectCounts {
        match self {
            Difficulty::Normal => counts,
            Difficulty::Hard => {
                let scale = |n: u32, f: f64| (n as f64 * f) as u32;
                ObjectCounts {
                    enemies: scale(counts.enemies, 1.3).max(1),
                    potions: scale(counts.potions, 0.6),
                    super_potions: scale(counts.super_potions, 0.5),
                    antidotes: scale(counts.antidotes, 0.5),
                    coins: scale(counts.coins, 0.8),
                    mysteries: scale(counts.mysteries, 1.2),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GameConfig {
    pub counts: ObjectCounts,
    pub difficulty: Difficulty,
    /// Walking off an edge comes back in on the opposite side.
    pub wrap: bool,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            counts: ObjectCounts::default(),
            difficulty: Difficulty::Normal,
            wrap: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load from JSON, or YAML when the extension says so.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let cfg = if yaml {
            serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse JSON config: {}", path.display()))?
        };
        Ok(cfg)
    }

    pub fn effective_counts(&self) -> ObjectCounts {
        self.difficulty.apply(self.counts)
    }
}

/// One input from the player between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Move(Direction),
    Help,
    Quit,
    Unrecognized,
}

impl Command {
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'w' => Command::Move(Direction::Up),
            's' => Command::Move(Direction::Down),
            'a' => Command::Move(Direction::Left),
            'd' => Command::Move(Direction::Right),
            'h' => Command::Help,
            'q' => Command::Quit,
            _ => Command::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Lost,
    /// Every enemy and the boss cleared.
    Victory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub moved: bool,
    pub battle: Option<BattleOutcome>,
    pub boss_appeared: bool,
    pub status: GameStatus,
    pub log: Vec<String>,
}

/// A run in progress: the map, the player, the weather and the dice.
pub struct Game {
    pub world: World,
    pub player: Player,
    pub weather: WeatherState,
    dice: Dice,
    roster: Roster,
    wrap: bool,
    boss_spawned: bool,
    status: GameStatus,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        Self::with_roster(config, Roster::builtin()?)
    }

    /// Seed, parse the maze and populate it, shrinking the counts once if
    /// they do not fit.
    pub fn with_roster(config: &GameConfig, roster: Roster) -> Result<Self, EngineError> {
        let mut dice = match config.seed {
            Some(seed) => Dice::from_seed(seed),
            None => Dice::from_entropy(),
        };
        let mut world = World::new(Grid::default_maze()?);
        let counts = config.effective_counts();
        match world.populate(&mut dice, &roster, counts, START) {
            Err(err) if err.is_recoverable() => {
                let smaller = counts.shrunk();
                tracing::warn!(%err, retry = smaller.total(), "map too small, shrinking");
                world.populate(&mut dice, &roster, smaller, START)?;
            }
            other => other?,
        }
        let mut game = Self::from_parts(world, Player::new(START), roster, dice, config.wrap);
        game.weather.set(&mut game.dice, Some(Weather::Clear), Some(0));
        Ok(game)
    }

    /// Assemble a game from prepared pieces; nothing is placed or rolled.
    pub fn from_parts(
        world: World,
        player: Player,
        roster: Roster,
        dice: Dice,
        wrap: bool,
    ) -> Self {
        Self {
            world,
            player,
            weather: WeatherState::default(),
            dice,
            roster,
            wrap,
            boss_spawned: false,
            status: GameStatus::InProgress,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn dice_mut(&mut self) -> &mut Dice {
        &mut self.dice
    }

    /// Advance the run by one command. Help, quit and unrecognized input
    /// leave the core untouched apart from the boss/victory check.
    pub fn handle(&mut self, command: Command, source: &mut impl ActionSource) -> StepReport {
        let mut log = Vec::new();
        let mut report = StepReport {
            moved: false,
            battle: None,
            boss_appeared: false,
            status: self.status,
            log: Vec::new(),
        };
        if self.status != GameStatus::InProgress {
            return report;
        }

        if let Command::Move(dir) = command {
            let (moved, battle) = self.step(dir, source, &mut log);
            report.moved = moved;
            report.battle = battle;
        }
        if self.status == GameStatus::InProgress {
            let (appeared, battle) = self.check_boss(source, &mut log);
            report.boss_appeared = appeared;
            report.battle = battle.or(report.battle);
        }
        report.status = self.status;
        report.log = log;
        report
    }

    fn step(
        &mut self,
        dir: Direction,
        source: &mut impl ActionSource,
        log: &mut Vec<String>,
    ) -> (bool, Option<BattleOutcome>) {
        let target = match self.world.grid.neighbor(self.player.pos, dir, self.wrap) {
            Some(p) if self.world.grid.is_walkable(p) => p,
            _ => return (false, None),
        };
        self.player.steps += 1;
        self.player.pos = target;

        let battle = self.enter_cell(source, log);
        if self.status == GameStatus::Lost {
            return (true, battle);
        }

        roam(&mut self.world, &mut self.dice, self.player.pos);
        if let Some(kind) = self.weather.maybe_shift(&mut self.dice, self.player.steps) {
            log.push(format!("[WEATHER] turns {} for {} steps", kind.label(), self.weather.turns));
        }
        self.weather.tick();
        (true, battle)
    }

    /// Fight whatever enemy stands here, then pick up whatever is left.
    fn enter_cell(
        &mut self,
        source: &mut impl ActionSource,
        log: &mut Vec<String>,
    ) -> Option<BattleOutcome> {
        let pos = self.player.pos;
        let mut battle = None;
        if let Some(idx) = self.world.enemy_at(pos) {
            let outcome = self.engage(idx, source, log);
            battle = outcome;
            if outcome == Some(BattleOutcome::Lost) {
                return battle;
            }
        }
        if let Some(idx) = self.world.item_at(pos) {
            self.collect(idx, log);
        }
        battle
    }

    fn engage(
        &mut self,
        idx: usize,
        source: &mut impl ActionSource,
        log: &mut Vec<String>,
    ) -> Option<BattleOutcome> {
        let ObjectKind::Enemy { species, hp } = self.world.objects[idx].kind.clone() else {
            return None;
        };
        let Some(spec) = self.roster.get(&species) else {
            tracing::warn!(%species, "enemy of unknown species removed");
            self.world.objects.remove(idx);
            return None;
        };
        let outcome = fight(spec, hp, &mut self.player, &self.weather, &mut self.dice, source, log);
        match outcome {
            BattleOutcome::Won => {
                self.world.objects.remove(idx);
            }
            BattleOutcome::Escaped => {
                match self.world.random_free_cell(&mut self.dice, self.player.pos) {
                    Ok(p) => self.world.objects[idx].pos = p,
                    Err(err) => {
                        tracing::debug!(%err, "escaped enemy stays put");
                        log.push(format!("[RUN] {} has nowhere to go", species));
                    }
                }
            }
            BattleOutcome::Lost => self.status = GameStatus::Lost,
        }
        Some(outcome)
    }

    fn collect(&mut self, idx: usize, log: &mut Vec<String>) {
        let MapObject { kind, .. } = self.world.objects.remove(idx);
        match kind {
            ObjectKind::Potion { .. } | ObjectKind::SuperPotion { .. } | ObjectKind::Antidote => {
                if let Some(item) = kind.item() {
                    self.player.inventory.add(item);
                    log.push(format!("[PICKUP][{}] found a {} (+1)", PLAYER_NAME, item.label()));
                }
            }
            ObjectKind::Coin { value } => {
                self.player.score += value;
                log.push(format!("[PICKUP][{}] picked up {} coins", PLAYER_NAME, value));
            }
            ObjectKind::Mystery => {
                log.push("[MYSTERY] you step onto a mysterious tile…".to_string());
                resolve_mystery(
                    &mut self.player,
                    &mut self.world,
                    &self.roster,
                    &mut self.dice,
                    |m| log.push(m),
                );
            }
            ObjectKind::Enemy { .. } => {}
        }
    }

    /// Spawn the boss once the regulars are gone; declare victory once it
    /// falls. Returns whether the boss appeared and any in-place battle.
    fn check_boss(
        &mut self,
        source: &mut impl ActionSource,
        log: &mut Vec<String>,
    ) -> (bool, Option<BattleOutcome>) {
        let mut appeared = false;
        let mut battle = None;
        if !self.boss_spawned && self.world.enemy_count() == 0 {
            self.boss_spawned = true;
            if let Some(boss) = self.roster.boss() {
                appeared = true;
                log.push(format!("[BOSS] The ground trembles… {} appears!", boss.name));
                match self.world.random_free_cell(&mut self.dice, self.player.pos) {
                    Ok(pos) => {
                        tracing::debug!(?pos, "boss placed");
                        self.world.objects.push(MapObject { pos, kind: ObjectKind::enemy(boss) });
                    }
                    Err(_) => {
                        log.push("[BOSS] no room to appear, it attacks right here!".to_string());
                        let outcome = fight(
                            boss,
                            boss.hp,
                            &mut self.player,
                            &self.weather,
                            &mut self.dice,
                            source,
                            log,
                        );
                        match outcome {
                            BattleOutcome::Won => {}
                            BattleOutcome::Lost => self.status = GameStatus::Lost,
                            BattleOutcome::Escaped => self.boss_spawned = false,
                        }
                        battle = Some(outcome);
                    }
                }
            }
        }
        if self.status == GameStatus::InProgress
            && self.boss_spawned
            && self.world.enemy_count() == 0
        {
            log.push("[END] all enemies and the boss are cleared".to_string());
            self.status = GameStatus::Victory;
        }
        (appeared, battle)
    }
}

fn fight(
    species: &Species,
    hp: i32,
    player: &mut Player,
    weather: &WeatherState,
    dice: &mut Dice,
    source: &mut impl ActionSource,
    log: &mut Vec<String>,
) -> BattleOutcome {
    BattleSession::new(species, hp).run(player, weather, dice, source, |m| log.push(m))
}
