//! Single spin orchestration
//!
//! A spin samples the mode's reels, rolls the wild feature, counts scatters,
//! evaluates every payline and applies the mode multiplier. Scatters are
//! counted after the feature runs; wilds never land on scatter cells so the
//! count is the same either way.

use serde::Serialize;

use crate::config::GameConfig;
use crate::feature::{FeatureOutcome, roll_feature};
use crate::grid::{Grid, REELS};
use crate::paytable::WinLine;
use crate::random::{RandomSource, SeededRng};
use crate::rules::GameMode;

/// Complete result of one spin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinResult {
    pub mode: GameMode,
    /// Stop index chosen on each reel
    pub stops: [usize; REELS],
    /// Final grid, after the wild overlay
    pub grid: Grid,
    /// Paying lines in payline order, multiplier applied
    pub win_lines: Vec<WinLine>,
    /// Total spin win (bet multiplier)
    pub total_win: f64,
    pub feature: FeatureOutcome,
    /// Scatters anywhere on the grid
    pub scatter_count: u8,
    /// Scatter count reached the bonus trigger
    pub bonus_triggered: bool,
}

impl SpinResult {
    #[inline]
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}

/// Executes spins against a shared, read-only [`GameConfig`]
#[derive(Debug, Clone, Copy)]
pub struct SpinEngine<'a> {
    config: &'a GameConfig,
}

impl<'a> SpinEngine<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Run one spin in `mode`
    pub fn spin<R: RandomSource + ?Sized>(&self, mode: GameMode, rng: &mut R) -> SpinResult {
        let config = self.config;
        let rules = config.rules(mode);

        let (stops, mut grid) = rules.reels.sample_with_stops(rng);

        let feature = roll_feature(
            &mut grid,
            rules.feature_probability,
            config.wild(),
            config.scatter(),
            rng,
        );

        let scatter_count = grid.count(config.scatter());
        let bonus_triggered = config.bonus_rules().is_triggered(scatter_count);

        let mut evaluation = config.evaluate(&grid);
        rules.mode.apply(&mut evaluation);

        SpinResult {
            mode,
            stops,
            grid,
            win_lines: evaluation.win_lines,
            total_win: evaluation.total_win,
            feature,
            scatter_count: scatter_count as u8,
            bonus_triggered,
        }
    }
}

/// One base game spin with a fresh entropy-seeded generator
pub fn spin_once(config: &GameConfig) -> SpinResult {
    spin_once_seeded(config, None)
}

/// One base game spin; a fixed seed gives a reproducible result
pub fn spin_once_seeded(config: &GameConfig, seed: Option<u64>) -> SpinResult {
    let mut rng = SeededRng::from_seed_option(seed);
    SpinEngine::new(config).spin(GameMode::Base, &mut rng)
}
