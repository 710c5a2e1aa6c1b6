//! Per-mode rule sets

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::paytable::LineEvaluation;
use crate::reels::ReelSet;

/// Which rule set a spin executes under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Base,
    Bonus,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Base => f.write_str("base game"),
            GameMode::Bonus => f.write_str("bonus game"),
        }
    }
}

/// Mode-specific behaviour; the win multiplier only exists in bonus mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeRules {
    Base,
    Bonus { multiplier: f64 },
}

impl ModeRules {
    pub fn game_mode(&self) -> GameMode {
        match self {
            ModeRules::Base => GameMode::Base,
            ModeRules::Bonus { .. } => GameMode::Bonus,
        }
    }

    /// Scale an evaluation by the bonus multiplier when it exceeds 1.
    /// Total and every line are scaled together.
    pub fn apply(&self, evaluation: &mut LineEvaluation) {
        if let ModeRules::Bonus { multiplier } = *self {
            if multiplier > 1.0 {
                evaluation.scale(multiplier);
            }
        }
    }
}

/// Reel set, feature probability and mode behaviour for one game mode
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    pub reels: ReelSet,
    /// Probability that a spin receives the wild overlay
    pub feature_probability: f64,
    pub mode: ModeRules,
}

/// Scatter trigger and award size of the bonus round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRules {
    /// Scatters anywhere on the grid needed to trigger
    pub trigger_count: u8,
    /// Bonus spins awarded per trigger
    pub award_spins: u32,
}

impl BonusRules {
    #[inline]
    pub fn is_triggered(&self, scatter_count: usize) -> bool {
        scatter_count >= self.trigger_count as usize
    }
}
