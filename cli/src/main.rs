use clap::{ArgAction, Parser};
use engine::autopilot::Autopilot;
use engine::combat::{ActionSource, BattleAction, BattlePrompt};
use engine::hud::{draw_bar, help_text, render_frame, run_summary, Achievement};
use engine::{Command, Dice, Difficulty, Game, GameConfig, GameStatus, Player};
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const BANNER: &[&str] = &[
    " ____       _        __  __               ",
    "|  _ \\ ___ | | _____|  \\/  | __ _ _______ ",
    "| |_) / _ \\| |/ / _ \\ |\\/| |/ _` |_  / _ \\",
    "|  __/ (_) |   <  __/ |  | | (_| |/ /  __/",
    "|_|   \\___/|_|\\_\\___|_|  |_|\\__,_/___\\___|",
];

#[derive(Parser)]
#[command(name = "pokemaze")]
#[command(about = "ASCII maze with roaming enemies, turn-based battles and a boss")]
struct Cli {
    /// Play by itself: synthetic moves and battle choices, no input read
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// RNG seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
    /// JSON or YAML game config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of enemies
    #[arg(long)]
    enemies: Option<u32>,
    /// Number of Potions
    #[arg(long)]
    potions: Option<u32>,
    /// Number of Super Potions
    #[arg(long)]
    superpotions: Option<u32>,
    /// Number of Antidotes
    #[arg(long)]
    antidotes: Option<u32>,
    /// Number of Coins
    #[arg(long)]
    coins: Option<u32>,
    /// Number of Mystery tiles
    #[arg(long)]
    mystery: Option<u32>,
    /// Hard mode: more enemies, fewer supplies
    #[arg(long, default_value_t = false)]
    hard: bool,
    /// Disable wrap-around at map borders
    #[arg(long, default_value_t = false)]
    no_wrap: bool,
    /// Skip the splash banner
    #[arg(long, default_value_t = false)]
    quiet_title: bool,
    /// Print the run summary as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut cfg = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let counts = &mut cfg.counts;
        for (flag, slot) in [
            (self.enemies, &mut counts.enemies),
            (self.potions, &mut counts.potions),
            (self.superpotions, &mut counts.super_potions),
            (self.antidotes, &mut counts.antidotes),
            (self.coins, &mut counts.coins),
            (self.mystery, &mut counts.mysteries),
        ] {
            if let Some(n) = flag {
                *slot = n;
            }
        }
        if self.hard {
            cfg.difficulty = Difficulty::Hard;
        }
        if self.no_wrap {
            cfg.wrap = false;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        Ok(cfg)
    }
}

/// End-of-run record printed by `--json`.
#[derive(Serialize)]
struct RunReport<'a> {
    status: GameStatus,
    player: &'a Player,
    achievements: Vec<&'static str>,
}

impl<'a> RunReport<'a> {
    fn new(game: &'a Game) -> Self {
        Self {
            status: game.status(),
            player: &game.player,
            achievements: Achievement::earned(&game.player)
                .into_iter()
                .map(Achievement::title)
                .collect(),
        }
    }
}

/// Line-based stdin front end for moves and battle actions.
struct Console {
    input: Box<dyn BufRead>,
    echoed: VecDeque<String>,
}

impl Console {
    fn new() -> Self {
        Self { input: Box::new(io::BufReader::new(io::stdin())), echoed: VecDeque::new() }
    }

    /// `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_command(&mut self) -> Option<Command> {
        let line = self.read_line("Move (w/a/s/d, h help, q quit): ")?;
        Some(line.chars().next().map(Command::from_key).unwrap_or(Command::Unrecognized))
    }

    /// Print a step's log, skipping lines already shown live during battle.
    fn print_log(&mut self, log: &[String]) {
        for line in log {
            if self.echoed.front() == Some(line) {
                self.echoed.pop_front();
            } else {
                println!("{}", line);
            }
        }
        self.echoed.clear();
    }
}

impl ActionSource for Console {
    fn choose(&mut self, prompt: &BattlePrompt<'_>, _dice: &mut Dice) -> BattleAction {
        let p = prompt.player;
        println!("Charmander: {}", draw_bar(p.hp(), p.max_hp(), 20));
        println!("{}: {}", prompt.enemy, draw_bar(prompt.enemy_hp, prompt.enemy_max_hp, 20));
        println!("Action:");
        let menu: Vec<String> = prompt
            .options
            .iter()
            .map(|a| match a {
                BattleAction::ChargedAttack => {
                    format!("[{}] {} (PP {})", a.key(), a.label(), p.charges)
                }
                _ => format!("[{}] {}", a.key(), a.label()),
            })
            .collect();
        println!("  {}", menu.join("  "));
        loop {
            let Some(line) = self.read_line("> ") else {
                return BattleAction::BasicAttack;
            };
            let Some(first) = line.chars().next() else {
                return BattleAction::BasicAttack;
            };
            if let Some(action) = BattleAction::from_key(first) {
                if prompt.options.contains(&action) {
                    return action;
                }
            }
        }
    }

    fn observe(&mut self, line: &str) {
        println!("{}", line);
        self.echoed.push_back(line.to_string());
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = cli.game_config()?;
    let mut game = Game::new(&cfg)?;
    tracing::debug!(?cfg, "game ready");

    if !cli.quiet_title && !cli.demo {
        for line in BANNER {
            println!("{}", line);
        }
        println!();
    }

    if cli.demo {
        let mut pilot = Autopilot::default();
        while game.status() == GameStatus::InProgress {
            println!("{}", render_frame(&game));
            let command = pilot.next_command(game.dice_mut());
            if command == Command::Quit {
                break;
            }
            let report = game.handle(command, &mut pilot);
            for line in &report.log {
                println!("{}", line);
            }
        }
    } else {
        let mut console = Console::new();
        while game.status() == GameStatus::InProgress {
            print!("\x1b[2J\x1b[H");
            println!("{}", render_frame(&game));
            let Some(command) = console.read_command() else {
                break;
            };
            match command {
                Command::Help => {
                    println!("{}", help_text());
                    let _ = console.read_line("Press ENTER to continue…");
                    continue;
                }
                Command::Quit => {
                    let answer = console.read_line("Quit? (y/N): ");
                    if answer.map_or(true, |a| a.eq_ignore_ascii_case("y")) {
                        println!("Goodbye!");
                        break;
                    }
                    continue;
                }
                _ => {}
            }
            let report = game.handle(command, &mut console);
            console.print_log(&report.log);
            if !report.log.is_empty() && report.status == GameStatus::InProgress {
                let _ = console.read_line("ENTER…");
            }
        }
    }

    match game.status() {
        GameStatus::Lost => println!("You were defeated. Game Over."),
        GameStatus::Victory => println!("Congratulations! You defeated ALL enemies and the Boss."),
        GameStatus::InProgress => {}
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&RunReport::new(&game))?);
    } else {
        for line in run_summary(&game.player) {
            println!("{}", line);
        }
    }
    Ok(())
}
