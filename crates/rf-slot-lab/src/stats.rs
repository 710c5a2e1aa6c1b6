//! Streaming statistics and the finalized result snapshot
//!
//! [`RunningStatistics`] keeps a fixed number of counters per run and no spin
//! history. Each base iteration lands in exactly one channel, with precedence
//! bonus trigger > feature > plain line win. Bonus sub-spins are tracked in
//! their own two channels. [`RunningStatistics::finalize`] turns the counters
//! into an immutable [`SimResults`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::bonus::BonusOutcome;
use crate::spin::SpinResult;

/// Two-sided 95% normal quantile
pub const CONFIDENCE_Z: f64 = 1.96;

// ═══════════════════════════════════════════════════════════════════════════════
// CHANNELS
// ═══════════════════════════════════════════════════════════════════════════════

/// Mutually exclusive outcome buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    BaseLines,
    BaseFeature,
    BonusTrigger,
    BonusLines,
    BonusFeature,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::BaseLines,
        Channel::BaseFeature,
        Channel::BonusTrigger,
        Channel::BonusLines,
        Channel::BonusFeature,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Bonus-internal channels are rated per bonus spin, the rest per iteration
    pub fn is_bonus_internal(self) -> bool {
        matches!(self, Channel::BonusLines | Channel::BonusFeature)
    }
}

/// Hit count and win sum of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelStats {
    pub hits: u64,
    pub win_sum: f64,
}

impl ChannelStats {
    #[inline]
    pub fn record(&mut self, win: f64) {
        self.hits += 1;
        self.win_sum += win;
    }

    pub fn merge(&mut self, other: &ChannelStats) {
        self.hits += other.hits;
        self.win_sum += other.win_sum;
    }

    /// Finalize against a hit-rate denominator and the run's total bet.
    /// A channel with no hits reports zeros.
    pub fn report(&self, denominator: f64, total_bet: f64) -> ChannelReport {
        let rtp = if total_bet > 0.0 {
            self.win_sum / total_bet
        } else {
            0.0
        };
        if self.hits == 0 {
            return ChannelReport {
                hits: 0,
                hit_rate: 0.0,
                average_payout: 0.0,
                rtp,
            };
        }
        let hits = self.hits as f64;
        ChannelReport {
            hits: self.hits,
            hit_rate: denominator / hits,
            average_payout: self.win_sum / hits,
            rtp,
        }
    }
}

/// Finalized channel figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelReport {
    pub hits: u64,
    /// "1 in k" frequency; 0 when the channel never hit
    pub hit_rate: f64,
    /// Mean win per hit
    pub average_payout: f64,
    /// Win sum divided by total bet
    pub rtp: f64,
}

impl ChannelReport {
    fn hit_rate_label(&self) -> String {
        if self.hits > 0 {
            format!("1 in {:.2}", self.hit_rate)
        } else {
            "0".to_string()
        }
    }
}

/// Iteration wins bucketed by size (bet multiples)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinDistribution {
    pub dead: u64,
    /// Below 1x
    pub low: u64,
    /// Below 10x
    pub medium: u64,
    /// Below 50x
    pub big: u64,
    /// Below 100x
    pub huge: u64,
    pub mega: u64,
}

impl WinDistribution {
    #[inline]
    pub fn record(&mut self, win: f64) {
        let bucket = if win <= 0.0 {
            &mut self.dead
        } else if win < 1.0 {
            &mut self.low
        } else if win < 10.0 {
            &mut self.medium
        } else if win < 50.0 {
            &mut self.big
        } else if win < 100.0 {
            &mut self.huge
        } else {
            &mut self.mega
        };
        *bucket += 1;
    }

    pub fn merge(&mut self, other: &WinDistribution) {
        self.dead += other.dead;
        self.low += other.low;
        self.medium += other.medium;
        self.big += other.big;
        self.huge += other.huge;
        self.mega += other.mega;
    }

    pub fn total(&self) -> u64 {
        self.dead + self.low + self.medium + self.big + self.huge + self.mega
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCUMULATOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct BonusTally {
    rounds_entered: u64,
    spins_played: u64,
    total_win: f64,
    max_round_win: f64,
    retriggers_ignored: u64,
}

/// Per-run accumulator; one instance per run, never shared
#[derive(Debug, Clone, Default)]
pub struct RunningStatistics {
    channels: [ChannelStats; 5],
    iterations: u64,
    total_won: f64,
    sum_squares: f64,
    max_win: f64,
    winning_iterations: u64,
    distribution: WinDistribution,
    bonus: BonusTally,
    wild_shortfalls: u64,
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn total_won(&self) -> f64 {
        self.total_won
    }

    pub fn channel(&self, channel: Channel) -> &ChannelStats {
        &self.channels[channel.index()]
    }

    /// Record one bonus sub-spin in the bonus-internal channels
    #[inline]
    pub fn record_bonus_spin(&mut self, spin: &SpinResult) {
        if spin.feature.triggered {
            self.channels[Channel::BonusFeature.index()].record(spin.total_win);
        } else if spin.is_win() {
            self.channels[Channel::BonusLines.index()].record(spin.total_win);
        }
        if spin.feature.is_short() {
            self.wild_shortfalls += 1;
        }
    }

    /// Record one complete iteration: the base spin plus, when it triggered,
    /// the bonus round it led to. Returns the iteration's total win.
    #[inline]
    pub fn record_iteration(&mut self, base: &SpinResult, bonus: Option<&BonusOutcome>) -> f64 {
        let bonus_win = bonus.map_or(0.0, |b| b.total_win);

        if base.bonus_triggered {
            self.channels[Channel::BonusTrigger.index()].record(bonus_win);
        } else if base.feature.triggered {
            self.channels[Channel::BaseFeature.index()].record(base.total_win);
        } else if base.is_win() {
            self.channels[Channel::BaseLines.index()].record(base.total_win);
        }
        if base.feature.is_short() {
            self.wild_shortfalls += 1;
        }

        if let Some(outcome) = bonus {
            self.bonus.rounds_entered += 1;
            self.bonus.spins_played += outcome.spins_played as u64;
            self.bonus.total_win += outcome.total_win;
            self.bonus.retriggers_ignored += outcome.retriggers_ignored as u64;
            if outcome.total_win > self.bonus.max_round_win {
                self.bonus.max_round_win = outcome.total_win;
            }
        }

        let total = base.total_win + bonus_win;
        self.iterations += 1;
        self.total_won += total;
        self.sum_squares += total * total;
        if total > 0.0 {
            self.winning_iterations += 1;
        }
        if total > self.max_win {
            self.max_win = total;
        }
        self.distribution.record(total);

        total
    }

    /// Fold another run's accumulator into this one
    pub fn merge(&mut self, other: &RunningStatistics) {
        for (mine, theirs) in self.channels.iter_mut().zip(other.channels.iter()) {
            mine.merge(theirs);
        }
        self.iterations += other.iterations;
        self.total_won += other.total_won;
        self.sum_squares += other.sum_squares;
        self.max_win = self.max_win.max(other.max_win);
        self.winning_iterations += other.winning_iterations;
        self.distribution.merge(&other.distribution);
        self.bonus.rounds_entered += other.bonus.rounds_entered;
        self.bonus.spins_played += other.bonus.spins_played;
        self.bonus.total_win += other.bonus.total_win;
        self.bonus.max_round_win = self.bonus.max_round_win.max(other.bonus.max_round_win);
        self.bonus.retriggers_ignored += other.bonus.retriggers_ignored;
        self.wild_shortfalls += other.wild_shortfalls;
    }

    /// Produce the immutable result snapshot. An empty run yields all zeros.
    pub fn finalize(&self, elapsed: Duration) -> SimResults {
        let n = self.iterations;
        let total_bet = n as f64;
        let elapsed_ms = elapsed.as_millis() as u64;

        if n == 0 {
            return SimResults {
                elapsed_ms,
                ..SimResults::default()
            };
        }

        let report = |channel: Channel| {
            let denominator = if channel.is_bonus_internal() {
                self.bonus.spins_played as f64
            } else {
                total_bet
            };
            self.channels[channel.index()].report(denominator, total_bet)
        };

        let mean = self.total_won / total_bet;
        let variance = (self.sum_squares / total_bet - mean * mean).max(0.0);
        let std_dev = variance.sqrt();
        let confidence_margin = CONFIDENCE_Z * std_dev / total_bet.sqrt();

        let rounds = self.bonus.rounds_entered;
        SimResults {
            game: String::new(),
            iterations: n,
            total_bet,
            total_won: self.total_won,
            total_rtp: mean,
            variance,
            std_dev,
            confidence_margin,
            volatility_index: confidence_margin * 100.0,
            max_win: self.max_win,
            winning_iterations: self.winning_iterations,
            hit_frequency: if self.winning_iterations > 0 {
                total_bet / self.winning_iterations as f64
            } else {
                0.0
            },
            base: BaseGameReport {
                win_lines: report(Channel::BaseLines),
                feature: report(Channel::BaseFeature),
                bonus_trigger: report(Channel::BonusTrigger),
            },
            bonus: BonusGameReport {
                rounds_entered: rounds,
                spins_played: self.bonus.spins_played,
                average_spins: if rounds > 0 {
                    self.bonus.spins_played as f64 / rounds as f64
                } else {
                    0.0
                },
                total_rtp: self.bonus.total_win / total_bet,
                max_round_win: self.bonus.max_round_win,
                retriggers_ignored: self.bonus.retriggers_ignored,
                win_lines: report(Channel::BonusLines),
                feature: report(Channel::BonusFeature),
            },
            distribution: self.distribution,
            wild_shortfalls: self.wild_shortfalls,
            elapsed_ms,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Base game channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaseGameReport {
    pub win_lines: ChannelReport,
    pub feature: ChannelReport,
    /// Trigger hits; win figures are the cascade totals
    pub bonus_trigger: ChannelReport,
}

/// Bonus round figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BonusGameReport {
    pub rounds_entered: u64,
    pub spins_played: u64,
    pub average_spins: f64,
    /// Bonus winnings divided by total bet
    pub total_rtp: f64,
    pub max_round_win: f64,
    pub retriggers_ignored: u64,
    /// Rated per bonus spin played
    pub win_lines: ChannelReport,
    pub feature: ChannelReport,
}

/// Finalized, immutable result of one simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimResults {
    /// Game name, filled in by the driver
    pub game: String,
    pub iterations: u64,
    /// One unit bet per base spin
    pub total_bet: f64,
    pub total_won: f64,
    pub total_rtp: f64,
    /// Per-iteration win variance
    pub variance: f64,
    pub std_dev: f64,
    /// Half-width of the 95% confidence interval of the RTP
    pub confidence_margin: f64,
    /// Confidence margin in percentage points
    pub volatility_index: f64,
    /// Largest single-iteration total
    pub max_win: f64,
    pub winning_iterations: u64,
    /// "1 in k" of iterations with any win
    pub hit_frequency: f64,
    pub base: BaseGameReport,
    pub bonus: BonusGameReport,
    pub distribution: WinDistribution,
    /// Feature hits that placed fewer wilds than requested
    pub wild_shortfalls: u64,
    pub elapsed_ms: u64,
}

impl SimResults {
    /// 95% confidence interval of the RTP
    pub fn rtp_interval(&self) -> (f64, f64) {
        (
            self.total_rtp - self.confidence_margin,
            self.total_rtp + self.confidence_margin,
        )
    }

    /// Sum of the three base channel contributions
    pub fn channel_rtp(&self) -> f64 {
        self.base.win_lines.rtp + self.base.feature.rtp + self.base.bonus_trigger.rtp
    }
}

fn channel_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    report: &ChannelReport,
    rtp: Option<f64>,
) -> fmt::Result {
    let payout = format!("{:.2}x", report.average_payout);
    let rtp = match rtp {
        Some(value) => format!("{:.2}%", value * 100.0),
        None => "(Inc. in Trigger)".to_string(),
    };
    writeln!(
        f,
        "- {:<10} | Hit Rate: {:<10} | Avg payout: {:<8} | RTP: {}",
        label,
        report.hit_rate_label(),
        payout,
        rtp
    )
}

impl fmt::Display for SimResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "SIMULATION REPORT: {}", self.game)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "(Simulated {} spins in {:.2}s)",
            self.iterations,
            self.elapsed_ms as f64 / 1000.0
        )?;

        writeln!(f, "\n[BASE GAME]")?;
        channel_row(f, "Win Lines", &self.base.win_lines, Some(self.base.win_lines.rtp))?;
        channel_row(f, "Feature #1", &self.base.feature, Some(self.base.feature.rtp))?;
        channel_row(
            f,
            "Free Spins",
            &self.base.bonus_trigger,
            Some(self.base.bonus_trigger.rtp),
        )?;

        writeln!(f, "\n[FREE SPINS] (Avg Spins: {:.1})", self.bonus.average_spins)?;
        channel_row(f, "Win Lines", &self.bonus.win_lines, None)?;
        channel_row(f, "Feature #1", &self.bonus.feature, None)?;
        writeln!(
            f,
            "- Rounds: {} | Max round: {:.2}x | Retriggers ignored: {}",
            self.bonus.rounds_entered, self.bonus.max_round_win, self.bonus.retriggers_ignored
        )?;

        let d = &self.distribution;
        writeln!(
            f,
            "\n[DISTRIBUTION] dead {} | <1x {} | <10x {} | <50x {} | <100x {} | mega {}",
            d.dead, d.low, d.medium, d.big, d.huge, d.mega
        )?;

        writeln!(f, "\n{}", "-".repeat(60))?;
        writeln!(
            f,
            "TOTAL RTP: {:.2}% (±{:.2}%) | MAX WIN: {:.2}x | VOLATILITY (SD): {:.2}",
            self.total_rtp * 100.0,
            self.volatility_index,
            self.max_win,
            self.std_dev
        )?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureOutcome;
    use crate::grid::Grid;
    use crate::rules::GameMode;
    use crate::symbols::SymbolId;
    use approx::assert_relative_eq;

    fn spin(mode: GameMode, win: f64, feature: bool, triggered: bool) -> SpinResult {
        SpinResult {
            mode,
            stops: [0; 5],
            grid: Grid::filled(SymbolId(0)),
            win_lines: Vec::new(),
            total_win: win,
            feature: FeatureOutcome {
                triggered: feature,
                wilds_placed: if feature { 3 } else { 0 },
            },
            scatter_count: if triggered { 3 } else { 0 },
            bonus_triggered: triggered,
        }
    }

    #[test]
    fn test_channel_precedence() {
        let mut stats = RunningStatistics::new();
        let bonus = BonusOutcome {
            spins_played: 5,
            total_win: 12.0,
            retriggers_ignored: 0,
        };

        // trigger beats feature and line win; trigger bucket takes cascade only
        let total = stats.record_iteration(&spin(GameMode::Base, 2.0, true, true), Some(&bonus));
        assert_eq!(total, 14.0);
        // feature beats line win, counted even without a win
        stats.record_iteration(&spin(GameMode::Base, 0.0, true, false), None);
        stats.record_iteration(&spin(GameMode::Base, 3.0, false, false), None);
        stats.record_iteration(&spin(GameMode::Base, 0.0, false, false), None);

        assert_eq!(stats.channel(Channel::BonusTrigger).hits, 1);
        assert_eq!(stats.channel(Channel::BonusTrigger).win_sum, 12.0);
        assert_eq!(stats.channel(Channel::BaseFeature).hits, 1);
        assert_eq!(stats.channel(Channel::BaseLines).hits, 1);
        assert_eq!(stats.channel(Channel::BaseLines).win_sum, 3.0);
        assert_eq!(stats.iterations(), 4);
        assert_eq!(stats.total_won(), 17.0);
    }

    #[test]
    fn test_bonus_spin_channels() {
        let mut stats = RunningStatistics::new();
        stats.record_bonus_spin(&spin(GameMode::Bonus, 4.0, true, false));
        stats.record_bonus_spin(&spin(GameMode::Bonus, 1.5, false, false));
        stats.record_bonus_spin(&spin(GameMode::Bonus, 0.0, false, true));
        assert_eq!(stats.channel(Channel::BonusFeature).hits, 1);
        assert_eq!(stats.channel(Channel::BonusLines).hits, 1);
        assert_eq!(stats.channel(Channel::BonusLines).win_sum, 1.5);
    }

    #[test]
    fn test_finalize_metrics() {
        let mut stats = RunningStatistics::new();
        for win in [0.0, 2.0, 0.0, 6.0] {
            stats.record_iteration(&spin(GameMode::Base, win, false, false), None);
        }
        let results = stats.finalize(Duration::from_millis(1500));

        assert_eq!(results.iterations, 4);
        assert_relative_eq!(results.total_rtp, 2.0);
        // E[x²] = 10, mean² = 4
        assert_relative_eq!(results.variance, 6.0);
        assert_relative_eq!(results.std_dev, 6.0f64.sqrt());
        assert_relative_eq!(results.confidence_margin, 1.96 * 6.0f64.sqrt() / 2.0);
        assert_relative_eq!(results.volatility_index, results.confidence_margin * 100.0);
        assert_relative_eq!(results.base.win_lines.hit_rate, 2.0);
        assert_relative_eq!(results.base.win_lines.average_payout, 4.0);
        assert_relative_eq!(results.base.win_lines.rtp, 2.0);
        assert_relative_eq!(results.hit_frequency, 2.0);
        assert_eq!(results.max_win, 6.0);
        assert_eq!(results.distribution.dead, 2);
        assert_eq!(results.distribution.medium, 2);
        assert_eq!(results.elapsed_ms, 1500);
        assert_relative_eq!(results.channel_rtp(), results.total_rtp);
    }

    #[test]
    fn test_zero_hit_channels_report_zero() {
        let mut stats = RunningStatistics::new();
        for _ in 0..10 {
            stats.record_iteration(&spin(GameMode::Base, 0.0, false, false), None);
        }
        let results = stats.finalize(Duration::ZERO);
        for report in [
            results.base.win_lines,
            results.base.feature,
            results.base.bonus_trigger,
            results.bonus.win_lines,
            results.bonus.feature,
        ] {
            assert_eq!(report.hit_rate, 0.0);
            assert_eq!(report.average_payout, 0.0);
            assert!(report.rtp.is_finite());
        }
        assert_eq!(results.bonus.average_spins, 0.0);
        assert_eq!(results.hit_frequency, 0.0);
        assert_eq!(results.variance, 0.0);
    }

    #[test]
    fn test_empty_run_is_guarded() {
        let results = RunningStatistics::new().finalize(Duration::ZERO);
        assert_eq!(results.iterations, 0);
        assert_eq!(results.total_rtp, 0.0);
        assert!(results.std_dev.is_finite());
        assert!(results.confidence_margin.is_finite());
    }

    #[test]
    fn test_bonus_denominator_is_spins_played() {
        let mut stats = RunningStatistics::new();
        let bonus = BonusOutcome {
            spins_played: 10,
            total_win: 8.0,
            retriggers_ignored: 2,
        };
        for _ in 0..10 {
            stats.record_bonus_spin(&spin(GameMode::Bonus, 0.8, false, false));
        }
        stats.record_iteration(&spin(GameMode::Base, 0.0, false, true), Some(&bonus));
        stats.record_iteration(&spin(GameMode::Base, 0.0, false, false), None);

        let results = stats.finalize(Duration::ZERO);
        assert_eq!(results.bonus.rounds_entered, 1);
        assert_eq!(results.bonus.spins_played, 10);
        assert_relative_eq!(results.bonus.average_spins, 10.0);
        assert_relative_eq!(results.bonus.win_lines.hit_rate, 1.0);
        assert_relative_eq!(results.bonus.win_lines.rtp, 4.0);
        assert_relative_eq!(results.bonus.total_rtp, 4.0);
        assert_eq!(results.bonus.retriggers_ignored, 2);
        assert_relative_eq!(results.base.bonus_trigger.hit_rate, 2.0);
        assert_relative_eq!(results.base.bonus_trigger.average_payout, 8.0);
    }

    #[test]
    fn test_merge_matches_single_accumulator() {
        let wins = [0.0, 1.0, 0.5, 20.0, 0.0, 150.0, 3.0];
        let mut whole = RunningStatistics::new();
        let mut left = RunningStatistics::new();
        let mut right = RunningStatistics::new();
        for (i, &win) in wins.iter().enumerate() {
            let s = spin(GameMode::Base, win, i % 3 == 0, false);
            whole.record_iteration(&s, None);
            if i < 3 {
                left.record_iteration(&s, None);
            } else {
                right.record_iteration(&s, None);
            }
        }
        left.merge(&right);

        let a = whole.finalize(Duration::ZERO);
        let b = left.finalize(Duration::ZERO);
        assert_eq!(a.iterations, b.iterations);
        assert_relative_eq!(a.total_rtp, b.total_rtp);
        assert_relative_eq!(a.variance, b.variance, epsilon = 1e-12);
        assert_eq!(a.distribution, b.distribution);
        assert_eq!(a.max_win, 150.0);
        assert_eq!(b.max_win, 150.0);
        assert_eq!(a.distribution.total(), wins.len() as u64);
    }

    #[test]
    fn test_report_format() {
        let mut stats = RunningStatistics::new();
        stats.record_iteration(&spin(GameMode::Base, 2.0, false, false), None);
        let mut results = stats.finalize(Duration::ZERO);
        results.game = "Neon Fruit".into();
        let text = results.to_string();
        assert!(text.contains("SIMULATION REPORT: Neon Fruit"));
        assert!(text.contains("[BASE GAME]"));
        assert!(text.contains("[FREE SPINS]"));
        assert!(text.contains("Hit Rate: 1 in 1.00"));
        assert!(text.contains("TOTAL RTP: 200.00%"));
    }

    #[test]
    fn test_distribution_buckets() {
        let mut d = WinDistribution::default();
        for win in [0.0, 0.5, 1.0, 9.99, 10.0, 49.0, 50.0, 99.0, 100.0, 5000.0] {
            d.record(win);
        }
        assert_eq!(
            d,
            WinDistribution {
                dead: 1,
                low: 1,
                medium: 2,
                big: 2,
                huge: 2,
                mega: 2
            }
        );
    }
}
