use anyhow::Context;
use clap::Parser;
use engine::sim::{simulate_battles, SimConfig};
use engine::{Roster, Weather};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulate-battles")]
#[command(about = "Monte Carlo sim: many autopiloted battles vs one species")]
struct Args {
    /// Enemy species name, as in the roster
    #[arg(long, default_value = "Machop")]
    species: String,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Player level going in
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Weather for the whole fight: clear | sunny | rain | fog
    #[arg(long, default_value = "clear")]
    weather: String,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Optional species JSON file (falls back to the bundled roster)
    #[arg(long)]
    species_file: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn to_weather(s: &str) -> anyhow::Result<Weather> {
    Weather::ALL
        .into_iter()
        .find(|w| w.label().eq_ignore_ascii_case(s))
        .with_context(|| format!("unknown weather: {}", s))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let roster = match args.species_file.as_ref() {
        Some(path) => Roster::from_path(path)?,
        None => Roster::builtin()?,
    };
    let cfg = SimConfig {
        species: args.species.clone(),
        trials: args.trials,
        seed: args.seed,
        level: args.level,
        weather: to_weather(&args.weather)?,
        max_rounds: args.max_rounds,
    };
    let summary = simulate_battles(&cfg, &roster)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let pct = |n: u32| n as f64 * 100.0 / summary.samples.max(1) as f64;
    println!("simulate-battles results");
    println!("------------------------");
    println!("trials:             {}", summary.samples);
    println!("species:            {}", summary.species);
    println!("level:              {}", cfg.level);
    println!("weather:            {}", cfg.weather.label());
    println!();
    println!("win rate:           {:.1}%", pct(summary.wins));
    println!("loss rate:          {:.1}%", pct(summary.losses));
    println!("escape rate:        {:.1}%", pct(summary.escapes));
    println!("unfinished:         {}", summary.unfinished);
    println!("avg rounds (wins):  {:.2}", summary.avg_rounds_won);
    println!("avg dmg dealt:      {:.2}", summary.avg_damage_dealt);
    println!("avg dmg taken:      {:.2}", summary.avg_damage_taken);

    Ok(())
}
