//! Slot Simulation CLI
//!
//! Usage:
//!   slot-sim run --preset low --iterations 1000000   - Simulate and print a report
//!   slot-sim run --config game.yaml --runs 8          - Repeated independent runs
//!   slot-sim spin --preset high --seed 7              - Show a single spin
//!   slot-sim presets                                  - List built-in games

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use rf_slot_lab::presets;
use rf_slot_lab::{
    GameConfig, GameDefinition, GameMode, SeededRng, SimulationConfig, SimulationPool,
    SpinEngine, SpinResult, entropy_seed, run_repeated,
};

#[derive(Parser)]
#[command(name = "slot-sim", about = "Slot math simulator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a game and print the statistics report
    Run {
        #[command(flatten)]
        game: GameSource,
        /// Base game spins per run
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        iterations: u64,
        /// Seed for a reproducible run (base seed with --runs)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Independent runs executed in parallel
        #[arg(short, long, default_value_t = 1)]
        runs: usize,
        /// Worker threads (defaults to the CPU count)
        #[arg(long)]
        threads: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a single spin and show the grid
    Spin {
        #[command(flatten)]
        game: GameSource,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Spin on the bonus reels
        #[arg(long)]
        bonus: bool,
        #[arg(long)]
        json: bool,
    },
    /// List built-in presets
    Presets,
}

#[derive(Args)]
struct GameSource {
    /// Built-in preset (low, high)
    #[arg(short, long, default_value = "low", conflicts_with = "config")]
    preset: String,
    /// Game definition file (.json, .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl GameSource {
    fn load(&self) -> Result<Arc<GameConfig>> {
        let definition = match &self.config {
            Some(path) => GameDefinition::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => presets::by_name(&self.preset)?,
        };
        let config = definition
            .compile()
            .with_context(|| format!("Invalid game definition '{}'", definition.name))?;
        Ok(Arc::new(config))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            game,
            iterations,
            seed,
            runs,
            threads,
            json,
        } => run(&game, iterations, seed, runs, threads, json),
        Commands::Spin {
            game,
            seed,
            bonus,
            json,
        } => spin(&game, seed, bonus, json),
        Commands::Presets => list_presets(),
    }
}

fn run(
    game: &GameSource,
    iterations: u64,
    seed: Option<u64>,
    runs: usize,
    threads: Option<usize>,
    json: bool,
) -> Result<()> {
    if runs == 0 {
        bail!("--runs must be at least 1");
    }
    let config = game.load()?;
    log::info!("Loaded '{}' ({:?})", config.name(), config.volatility());

    if runs > 1 {
        let base_seed = seed.unwrap_or_else(entropy_seed);
        let repeated = run_repeated(Arc::clone(&config), iterations, runs, base_seed)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&repeated)?);
            return Ok(());
        }
        for (i, results) in repeated.results.iter().enumerate() {
            let (low, high) = results.rtp_interval();
            println!(
                "run {:>3} | seed {} | RTP {:>7.3}% | 95% CI [{:.3}%, {:.3}%]",
                i,
                base_seed.wrapping_add(i as u64),
                results.total_rtp * 100.0,
                low * 100.0,
                high * 100.0
            );
        }
        let summary = &repeated.summary;
        println!(
            "\nmean RTP {:.3}% | sd across runs {:.3}% | runs {}\n",
            summary.mean_rtp * 100.0,
            summary.rtp_std_dev * 100.0,
            summary.runs
        );
        println!("{}", summary.pooled);
        return Ok(());
    }

    let pool = match threads {
        Some(n) => SimulationPool::with_threads(n)?,
        None => SimulationPool::new()?,
    };
    let mut settings = SimulationConfig::new(iterations);
    settings.seed = seed;

    let handle = pool.submit(config, settings);
    let results = handle.wait_with(|percent| {
        if !json {
            eprint!("\r{percent:>5.1}%");
            let _ = std::io::stderr().flush();
        }
    })?;
    if !json {
        eprintln!();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{results}");
    }
    Ok(())
}

fn spin(game: &GameSource, seed: Option<u64>, bonus: bool, json: bool) -> Result<()> {
    let config = game.load()?;
    let mode = if bonus { GameMode::Bonus } else { GameMode::Base };
    let mut rng = SeededRng::from_seed_option(seed);
    let result = SpinEngine::new(&config).spin(mode, &mut rng);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_spin(&config, &result);
    }
    Ok(())
}

fn print_spin(config: &GameConfig, spin: &SpinResult) {
    println!("{} | {} | stops {:?}\n", config.name(), spin.mode, spin.stops);
    for row in config.grid_names(&spin.grid) {
        let cells: Vec<String> = row.iter().map(|name| format!("{name:^8}")).collect();
        println!("  {}", cells.join("|"));
    }
    println!();
    for line in &spin.win_lines {
        println!(
            "  line {:>2}: {} x{} = {:.2}",
            line.line_index + 1,
            config.symbols().name(line.symbol),
            line.count,
            line.amount
        );
    }
    if spin.feature.triggered {
        println!("  wild feature: {} wilds placed", spin.feature.wilds_placed);
    }
    if spin.bonus_triggered {
        println!("  bonus triggered by {} scatters", spin.scatter_count);
    }
    println!("  total win: {:.2}", spin.total_win);
}

fn list_presets() -> Result<()> {
    for (key, def) in presets::PRESET_NAMES.iter().zip(presets::all()) {
        println!(
            "{:<6} {:<12} {:?} volatility, target RTP {}",
            key,
            def.name,
            def.volatility,
            def.rtp_target
                .map(|t| format!("{:.2}%", t * 100.0))
                .unwrap_or_else(|| "-".into())
        );
        if let Some(profile) = &def.profile {
            println!("       {profile}");
        }
    }
    Ok(())
}
