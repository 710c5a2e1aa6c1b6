//! Simulation driver
//!
//! Runs N iterations of base spin plus bonus cascade against one fresh
//! [`RunningStatistics`], reporting coarse progress and polling a cancel flag.
//! A cancelled run returns [`SlotLabError::Cancelled`] and its partial
//! statistics are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::bonus::BonusRound;
use crate::config::{GameConfig, SimulationConfig};
use crate::error::{SlotLabError, SlotLabResult};
use crate::random::{RandomSource, SeededRng};
use crate::rules::GameMode;
use crate::spin::SpinEngine;
use crate::stats::{RunningStatistics, SimResults};

/// One configured simulation run
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Arc<GameConfig>,
    settings: SimulationConfig,
}

impl Simulation {
    pub fn new(config: Arc<GameConfig>, settings: SimulationConfig) -> Self {
        Self { config, settings }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    /// Generator for this run: seeded when a seed is set, entropy otherwise
    pub fn rng(&self) -> SeededRng {
        SeededRng::from_seed_option(self.settings.seed)
    }

    /// Run to completion on the calling thread
    pub fn run(&self) -> SlotLabResult<SimResults> {
        let never = AtomicBool::new(false);
        self.run_with(&mut self.rng(), &never, |_| {})
    }

    /// Run with an explicit generator, cancel flag and progress callback.
    ///
    /// `progress` receives non-decreasing percentages at the configured
    /// cadence, ending with 100 on success.
    pub fn run_with<R, P>(
        &self,
        rng: &mut R,
        cancel: &AtomicBool,
        progress: P,
    ) -> SlotLabResult<SimResults>
    where
        R: RandomSource + ?Sized,
        P: FnMut(f64),
    {
        let (stats, elapsed) = self.accumulate(rng, cancel, progress)?;
        let mut results = stats.finalize(elapsed);
        results.game = self.config.name().to_string();

        log::info!(
            "Simulation '{}' finished: {} spins, RTP {:.4} ±{:.4}, {} ms",
            results.game,
            results.iterations,
            results.total_rtp,
            results.confidence_margin,
            results.elapsed_ms
        );
        Ok(results)
    }

    fn accumulate<R, P>(
        &self,
        rng: &mut R,
        cancel: &AtomicBool,
        mut progress: P,
    ) -> SlotLabResult<(RunningStatistics, Duration)>
    where
        R: RandomSource + ?Sized,
        P: FnMut(f64),
    {
        let iterations = self.settings.iterations;
        let progress_every = self.settings.progress_interval();
        let check_every = self.settings.cancel_check_interval.max(1);

        log::info!(
            "Starting simulation '{}': {} iterations",
            self.config.name(),
            iterations
        );

        let start = Instant::now();
        let engine = SpinEngine::new(&self.config);
        let round = BonusRound::new(engine);
        let mut stats = RunningStatistics::new();

        for i in 0..iterations {
            if i % check_every == 0 && cancel.load(Ordering::Relaxed) {
                log::debug!("Simulation '{}' cancelled at {}", self.config.name(), i);
                return Err(SlotLabError::Cancelled);
            }
            if let Some(every) = progress_every {
                if i % every == 0 {
                    progress(i as f64 / iterations as f64 * 100.0);
                }
            }

            let base = engine.spin(GameMode::Base, rng);
            let bonus = if base.bonus_triggered {
                Some(round.play(rng, |spin| stats.record_bonus_spin(spin)))
            } else {
                None
            };
            stats.record_iteration(&base, bonus.as_ref());
        }

        if cancel.load(Ordering::Relaxed) {
            log::debug!("Simulation '{}' cancelled at completion", self.config.name());
            return Err(SlotLabError::Cancelled);
        }
        if progress_every.is_some() {
            progress(100.0);
        }

        Ok((stats, start.elapsed()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPEATED RUNS
// ═══════════════════════════════════════════════════════════════════════════════

/// Spread of RTP across independent runs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepeatSummary {
    pub runs: usize,
    pub mean_rtp: f64,
    /// Sample standard deviation of the per-run RTPs
    pub rtp_std_dev: f64,
    /// All runs merged into one accumulator
    pub pooled: SimResults,
}

impl RepeatSummary {
    /// Whether a run's 95% interval contains the mean RTP across runs
    pub fn covers_mean(&self, results: &SimResults) -> bool {
        (results.total_rtp - self.mean_rtp).abs() <= results.confidence_margin
    }
}

/// Results of [`run_repeated`]
#[derive(Debug, Clone, Serialize)]
pub struct RepeatedRuns {
    pub results: Vec<SimResults>,
    pub summary: RepeatSummary,
}

/// Run `runs` independent simulations in parallel on the rayon pool.
/// Run `i` is seeded with `base_seed + i`.
pub fn run_repeated(
    config: Arc<GameConfig>,
    iterations: u64,
    runs: usize,
    base_seed: u64,
) -> SlotLabResult<RepeatedRuns> {
    let never = AtomicBool::new(false);

    let outcomes = (0..runs)
        .into_par_iter()
        .map(|i| -> SlotLabResult<(RunningStatistics, SimResults)> {
            let settings = SimulationConfig::new(iterations)
                .with_seed(base_seed.wrapping_add(i as u64))
                .with_progress_updates(0);
            let sim = Simulation::new(Arc::clone(&config), settings);
            let (stats, elapsed) = sim.accumulate(&mut sim.rng(), &never, |_| {})?;
            let mut results = stats.finalize(elapsed);
            results.game = config.name().to_string();
            Ok((stats, results))
        })
        .collect::<SlotLabResult<Vec<_>>>()?;

    let mut pooled_stats = RunningStatistics::new();
    let mut results = Vec::with_capacity(outcomes.len());
    let mut elapsed_ms = 0;
    for (stats, run) in outcomes {
        pooled_stats.merge(&stats);
        elapsed_ms += run.elapsed_ms;
        results.push(run);
    }

    let mut pooled = pooled_stats.finalize(Duration::from_millis(elapsed_ms));
    pooled.game = config.name().to_string();

    let summary = summarize(&results, pooled);
    log::info!(
        "Repeated {} runs of '{}': mean RTP {:.4}, sd {:.4}",
        summary.runs,
        config.name(),
        summary.mean_rtp,
        summary.rtp_std_dev
    );

    Ok(RepeatedRuns { results, summary })
}

fn summarize(results: &[SimResults], pooled: SimResults) -> RepeatSummary {
    let runs = results.len();
    if runs == 0 {
        return RepeatSummary {
            pooled,
            ..RepeatSummary::default()
        };
    }
    let mean_rtp = results.iter().map(|r| r.total_rtp).sum::<f64>() / runs as f64;
    let rtp_std_dev = if runs > 1 {
        let ss: f64 = results
            .iter()
            .map(|r| (r.total_rtp - mean_rtp).powi(2))
            .sum();
        (ss / (runs - 1) as f64).sqrt()
    } else {
        0.0
    };
    RepeatSummary {
        runs,
        mean_rtp,
        rtp_std_dev,
        pooled,
    }
}
