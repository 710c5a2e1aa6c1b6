//! Simulation Integration Tests
//!
//! Runs the built-in presets end to end.
//! Verifies:
//! - RTP estimates agree with their own confidence margins across runs
//! - Channel bookkeeping (hit rates, zero-hit channels, bonus denominators)
//! - Background runs: progress, completion, cancellation
//! - Definitions loaded from disk

use std::io::Write;
use std::sync::Arc;

use approx::assert_relative_eq;
use rf_slot_lab::presets;
use rf_slot_lab::{
    GameConfig, GameDefinition, GameMode, RunState, SeededRng, SimEvent, Simulation,
    SimulationConfig, SimulationPool, SlotLabError, SpinEngine, run_repeated,
};

fn preset(name: &str) -> Arc<GameConfig> {
    Arc::new(presets::by_name(name).unwrap().compile().unwrap())
}

fn check_repeated_runs(name: &str, iterations: u64, runs: usize) {
    let repeated = run_repeated(preset(name), iterations, runs, 2024).unwrap();
    let summary = &repeated.summary;

    let covered = repeated
        .results
        .iter()
        .filter(|r| summary.covers_mean(r))
        .count();
    // each interval covers the cross-run mean ~95% of the time
    assert!(
        covered * 4 >= runs * 3,
        "{name}: only {covered} of {runs} runs cover mean RTP {:.4}",
        summary.mean_rtp
    );

    // the pooled margin shrinks with the pooled sample size
    let pooled = &summary.pooled;
    assert_eq!(pooled.iterations, iterations * runs as u64);
    assert!(pooled.confidence_margin < repeated.results[0].confidence_margin);
    assert!((pooled.total_rtp - summary.mean_rtp).abs() < 1e-9);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATISTICAL PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_low_volatility_rtp_within_margin() {
    check_repeated_runs("low", 100_000, 8);
}

#[test]
fn test_high_volatility_rtp_within_margin() {
    check_repeated_runs("high", 100_000, 8);
}

#[test]
#[ignore = "ten million spins per run"]
fn test_full_size_rtp_within_margin() {
    check_repeated_runs("low", 10_000_000, 4);
    check_repeated_runs("high", 10_000_000, 4);
}

#[test]
fn test_presets_land_near_their_target() {
    for name in ["low", "high"] {
        let config = preset(name);
        let results = Simulation::new(Arc::clone(&config), SimulationConfig::new(400_000).with_seed(11))
            .run()
            .unwrap();
        assert!(
            (0.80..1.10).contains(&results.total_rtp),
            "{}: RTP {:.4}",
            config.name(),
            results.total_rtp
        );
        assert!(results.std_dev > 0.0);
        assert_relative_eq!(
            results.volatility_index,
            results.confidence_margin * 100.0,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_volatility_ordering() {
    let run = |name: &str| {
        Simulation::new(preset(name), SimulationConfig::new(200_000).with_seed(3))
            .run()
            .unwrap()
    };
    let low = run("low");
    let high = run("high");
    assert!(high.std_dev > low.std_dev);
    assert!(high.bonus.total_rtp > low.bonus.total_rtp);
    assert_eq!(low.bonus.spins_played, low.bonus.rounds_entered * 5);
    assert_eq!(high.bonus.spins_played, high.bonus.rounds_entered * 10);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHANNEL BOOKKEEPING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_bonus_reachable_gives_zero_channels() {
    let mut def = presets::low_volatility();
    def.bonus_game.trigger_count = 16;
    def.base_game.feature_probability = 0.0;
    let config = Arc::new(def.compile().unwrap());

    let results = Simulation::new(config, SimulationConfig::new(20_000).with_seed(8))
        .run()
        .unwrap();

    for report in [
        results.base.feature,
        results.base.bonus_trigger,
        results.bonus.win_lines,
        results.bonus.feature,
    ] {
        assert_eq!(report.hits, 0);
        assert_eq!(report.hit_rate, 0.0);
        assert_eq!(report.average_payout, 0.0);
        assert_eq!(report.rtp, 0.0);
    }
    assert_eq!(results.bonus.rounds_entered, 0);
    assert_eq!(results.bonus.average_spins, 0.0);
    assert!(results.base.win_lines.hits > 0);
    assert_relative_eq!(results.base.win_lines.rtp, results.total_rtp, epsilon = 1e-12);
}

#[test]
fn test_line_evaluation_is_pure() {
    let config = preset("high");
    let engine = SpinEngine::new(&config);
    let mut rng = SeededRng::seeded(5);
    for _ in 0..1_000 {
        let spin = engine.spin(GameMode::Base, &mut rng);
        let first = config.evaluate(&spin.grid);
        let second = config.evaluate(&spin.grid);
        assert_eq!(first, second);
        assert_relative_eq!(
            first.total_win,
            first.win_lines.iter().map(|w| w.amount).sum::<f64>(),
            epsilon = 1e-12
        );
        assert!(first.win_lines.iter().all(|w| (3..=5).contains(&w.count)));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BACKGROUND RUNS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_concurrent_runs_share_one_config() {
    let pool = SimulationPool::with_threads(4).unwrap();
    let config = preset("low");

    let handles: Vec<_> = (0..4)
        .map(|seed| pool.submit(Arc::clone(&config), SimulationConfig::new(20_000).with_seed(seed)))
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.wait().unwrap()).collect();

    for (seed, result) in results.iter().enumerate() {
        let direct = Simulation::new(
            Arc::clone(&config),
            SimulationConfig::new(20_000).with_seed(seed as u64),
        )
        .run()
        .unwrap();
        assert_eq!(result.total_won, direct.total_won);
    }
}

#[test]
fn test_cancelled_run_delivers_no_results() {
    let pool = SimulationPool::with_threads(1).unwrap();
    let mut settings = SimulationConfig::new(1_000_000_000).with_seed(1);
    settings.cancel_check_interval = 256;
    let handle = pool.submit(preset("high"), settings);

    assert!(matches!(handle.next_event(), Some(SimEvent::Progress(p)) if p == 0.0));
    handle.request_cancel();

    let mut completed = false;
    while let Some(event) = handle.next_event() {
        completed |= matches!(event, SimEvent::Completed(_));
    }
    assert!(!completed);
    assert_eq!(handle.state(), RunState::Cancelled);
    assert!(matches!(handle.wait(), Err(SlotLabError::Cancelled)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFINITIONS ON DISK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_definition_from_files() {
    let def = presets::high_volatility();

    let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    json.write_all(def.to_json().unwrap().as_bytes()).unwrap();
    let loaded = GameDefinition::load(json.path()).unwrap();
    assert_eq!(loaded.name, "Inferno 7s");

    let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    yaml.write_all(serde_yml::to_string(&def).unwrap().as_bytes()).unwrap();
    let loaded = GameDefinition::load(yaml.path()).unwrap();
    assert_eq!(loaded.base_game.reels, def.base_game.reels);

    let a = Simulation::new(Arc::new(loaded.compile().unwrap()), SimulationConfig::new(5_000).with_seed(1))
        .run()
        .unwrap();
    let b = Simulation::new(Arc::new(def.compile().unwrap()), SimulationConfig::new(5_000).with_seed(1))
        .run()
        .unwrap();
    assert_eq!(a.total_won, b.total_won);
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        GameDefinition::load("/definitely/not/here.json"),
        Err(SlotLabError::Io(_))
    ));
}
