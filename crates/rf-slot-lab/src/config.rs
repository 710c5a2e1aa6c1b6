//! Game and simulation configuration
//!
//! A [`GameDefinition`] is the authored shape (symbol names as strings, JSON
//! or YAML). [`GameDefinition::compile`] checks its structure once and
//! produces the frozen [`GameConfig`] that every spin reads.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotLabError, SlotLabResult};
use crate::grid::Grid;
use crate::paytable::{LineEvaluation, PayTable, Payline, evaluate_lines};
use crate::reels::ReelSet;
use crate::rules::{BonusRules, GameMode, ModeRules, RuleSet};
use crate::symbols::{SymbolId, SymbolTable, SymbolType};

// ═══════════════════════════════════════════════════════════════════════════════
// AUTHORED DEFINITION
// ═══════════════════════════════════════════════════════════════════════════════

/// Volatility label carried for reporting; it does not drive the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Volatility {
    Low,
    #[default]
    Medium,
    High,
}

/// Base game section of a definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseGameDefinition {
    /// One strip of symbol names per reel
    pub reels: Vec<Vec<String>>,
    /// Chance per spin of the wild overlay feature
    pub feature_probability: f64,
}

/// Bonus (free spins) section of a definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusGameDefinition {
    /// Scatters needed to enter the bonus round
    pub trigger_count: u8,
    /// Bonus spins awarded per trigger
    pub award_spins: u32,
    pub reels: Vec<Vec<String>>,
    pub feature_probability: f64,
    /// Win multiplier applied to every bonus spin
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Authored game math model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDefinition {
    pub name: String,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub volatility: Volatility,
    /// Design target, informational only
    #[serde(default)]
    pub rtp_target: Option<f64>,
    /// Paying symbols (wild and scatter may be listed or not)
    pub symbols: Vec<String>,
    pub wild_symbol: String,
    pub scatter_symbol: String,
    /// One row index per reel for each line
    pub paylines: Vec<Vec<u8>>,
    /// Pays for 3, 4 and 5 of a kind
    pub paytable: BTreeMap<String, [f64; 3]>,
    pub base_game: BaseGameDefinition,
    pub bonus_game: BonusGameDefinition,
}

impl GameDefinition {
    /// Parse a JSON definition
    pub fn from_json(json: &str) -> SlotLabResult<Self> {
        serde_json::from_str(json).map_err(|e| SlotLabError::Parse(e.to_string()))
    }

    /// Parse a YAML definition
    pub fn from_yaml(yaml: &str) -> SlotLabResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| SlotLabError::Parse(e.to_string()))
    }

    /// Load from a file; `.yaml`/`.yml` parse as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> SlotLabResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotLabResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotLabError::Parse(e.to_string()))
    }

    /// Check structure and freeze into a [`GameConfig`]
    pub fn compile(&self) -> SlotLabResult<GameConfig> {
        let mut symbols = SymbolTable::new();
        for name in &self.symbols {
            symbols.insert(name)?;
        }
        let wild = symbols.get_or_insert(&self.wild_symbol)?;
        let scatter = symbols.get_or_insert(&self.scatter_symbol)?;
        if wild == scatter {
            return Err(SlotLabError::InvalidConfig(format!(
                "wild and scatter are both {}",
                self.wild_symbol
            )));
        }

        let mut paytable = PayTable::new();
        for (name, pays) in &self.paytable {
            let id = symbols.resolve(name)?;
            if let Some(&value) = pays.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(SlotLabError::InvalidPayout {
                    symbol: name.clone(),
                    value,
                });
            }
            paytable.insert(id, *pays);
        }

        if self.paylines.is_empty() {
            return Err(SlotLabError::EmptyPaylines);
        }
        let paylines = self
            .paylines
            .iter()
            .enumerate()
            .map(|(index, rows)| Payline::new(index, rows))
            .collect::<SlotLabResult<Vec<_>>>()?;

        let base = RuleSet {
            reels: ReelSet::from_names(GameMode::Base, &symbols, &self.base_game.reels)?,
            feature_probability: check_probability(
                GameMode::Base,
                self.base_game.feature_probability,
            )?,
            mode: ModeRules::Base,
        };

        let bonus_def = &self.bonus_game;
        if !bonus_def.multiplier.is_finite() || bonus_def.multiplier <= 0.0 {
            return Err(SlotLabError::InvalidMultiplier(bonus_def.multiplier));
        }
        let bonus = RuleSet {
            reels: ReelSet::from_names(GameMode::Bonus, &symbols, &bonus_def.reels)?,
            feature_probability: check_probability(
                GameMode::Bonus,
                bonus_def.feature_probability,
            )?,
            mode: ModeRules::Bonus {
                multiplier: bonus_def.multiplier,
            },
        };

        log::debug!(
            "Compiled game '{}': {} symbols, {} paylines",
            self.name,
            symbols.len(),
            paylines.len()
        );

        Ok(GameConfig {
            name: self.name.clone(),
            profile: self.profile.clone(),
            volatility: self.volatility,
            rtp_target: self.rtp_target,
            symbols,
            wild,
            scatter,
            paylines,
            paytable,
            base,
            bonus,
            bonus_rules: BonusRules {
                trigger_count: bonus_def.trigger_count,
                award_spins: bonus_def.award_spins,
            },
        })
    }
}

fn check_probability(mode: GameMode, value: f64) -> SlotLabResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SlotLabError::InvalidProbability { mode, value })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILED CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Frozen game configuration
///
/// Never mutated after [`GameDefinition::compile`]; share it as
/// `Arc<GameConfig>` across concurrent runs.
#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    name: String,
    profile: Option<String>,
    volatility: Volatility,
    rtp_target: Option<f64>,
    symbols: SymbolTable,
    wild: SymbolId,
    scatter: SymbolId,
    paylines: Vec<Payline>,
    paytable: PayTable,
    base: RuleSet,
    bonus: RuleSet,
    bonus_rules: BonusRules,
}

impl GameConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    pub fn rtp_target(&self) -> Option<f64> {
        self.rtp_target
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn wild(&self) -> SymbolId {
        self.wild
    }

    pub fn scatter(&self) -> SymbolId {
        self.scatter
    }

    pub fn symbol_type(&self, symbol: SymbolId) -> SymbolType {
        if symbol == self.wild {
            SymbolType::Wild
        } else if symbol == self.scatter {
            SymbolType::Scatter
        } else {
            SymbolType::Regular
        }
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    pub fn bonus_rules(&self) -> &BonusRules {
        &self.bonus_rules
    }

    /// Rule set for a game mode
    #[inline]
    pub fn rules(&self, mode: GameMode) -> &RuleSet {
        match mode {
            GameMode::Base => &self.base,
            GameMode::Bonus => &self.bonus,
        }
    }

    /// Evaluate all paylines on a grid, unscaled
    pub fn evaluate(&self, grid: &Grid) -> LineEvaluation {
        evaluate_lines(grid, &self.paylines, &self.paytable, self.wild)
    }

    /// Render a grid as rows of symbol names
    pub fn grid_names(&self, grid: &Grid) -> Vec<Vec<String>> {
        grid.rows()
            .iter()
            .map(|row| row.iter().map(|&s| self.symbols.name(s).to_string()).collect())
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATION SETTINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Settings for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Base game spins to simulate
    pub iterations: u64,
    /// Fixed seed; `None` draws one from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Progress notifications per run (0 disables them)
    #[serde(default = "default_progress_updates")]
    pub progress_updates: u32,
    /// Iterations between cancellation checks
    #[serde(default = "default_cancel_check_interval")]
    pub cancel_check_interval: u64,
}

fn default_progress_updates() -> u32 {
    20
}

fn default_cancel_check_interval() -> u64 {
    4096
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000_000,
            seed: None,
            progress_updates: default_progress_updates(),
            cancel_check_interval: default_cancel_check_interval(),
        }
    }
}

impl SimulationConfig {
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress_updates(mut self, updates: u32) -> Self {
        self.progress_updates = updates;
        self
    }

    /// Iterations between progress notifications, `None` when disabled
    pub fn progress_interval(&self) -> Option<u64> {
        if self.progress_updates == 0 {
            return None;
        }
        Some((self.iterations / self.progress_updates as u64).max(1))
    }
}
