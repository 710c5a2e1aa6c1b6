//! Built-in game presets
//!
//! Two complete 5×3, ten line games: a low volatility fruit machine and a
//! high volatility game that funds a large free spin budget.

use std::collections::BTreeMap;

use crate::config::{BaseGameDefinition, BonusGameDefinition, GameDefinition, Volatility};
use crate::error::{SlotLabError, SlotLabResult};
use crate::grid::REELS;
use crate::paytable::standard_10_paylines;

/// Preset names accepted by [`by_name`]
pub const PRESET_NAMES: [&str; 2] = ["low", "high"];

/// "Neon Fruit": frequent small wins, most of the RTP in the base game
pub fn low_volatility() -> GameDefinition {
    GameDefinition {
        name: "Neon Fruit".into(),
        profile: Some(
            "High player retention model. Frequent small wins recycle the balance.".into(),
        ),
        volatility: Volatility::Low,
        rtp_target: Some(0.96),
        symbols: names(&["10", "J", "Q", "K", "A", "CHERRY", "BAR", "7"]),
        wild_symbol: "W".into(),
        scatter_symbol: "S".into(),
        paylines: paylines(),
        paytable: paytable(&[
            ("10", [0.4, 2.0, 5.0]),
            ("J", [0.4, 2.0, 5.0]),
            ("Q", [1.0, 3.0, 8.0]),
            ("K", [1.0, 3.0, 8.0]),
            ("A", [1.5, 5.0, 10.0]),
            ("CHERRY", [2.0, 8.0, 15.0]),
            ("BAR", [3.0, 10.0, 20.0]),
            ("7", [5.0, 15.0, 25.0]),
            ("W", [5.0, 15.0, 25.0]),
        ]),
        base_game: BaseGameDefinition {
            reels: strips(&NEON_FRUIT_BASE),
            feature_probability: 0.069335,
        },
        bonus_game: BonusGameDefinition {
            trigger_count: 3,
            award_spins: 5,
            reels: strips(&NEON_FRUIT_BONUS),
            feature_probability: 0.15,
            multiplier: 1.0,
        },
    }
}

/// "Inferno 7s": thin base game, most of the RTP in free spins
pub fn high_volatility() -> GameDefinition {
    GameDefinition {
        name: "Inferno 7s".into(),
        profile: Some(
            "Gambler profile. Base game RTP suppressed to fund a large free spins budget.".into(),
        ),
        volatility: Volatility::High,
        rtp_target: Some(0.96),
        symbols: names(&["10", "J", "Q", "K", "A", "BAR", "DIAMOND", "7"]),
        wild_symbol: "W".into(),
        scatter_symbol: "S".into(),
        paylines: paylines(),
        paytable: paytable(&[
            ("10", [0.2, 0.4, 2.0]),
            ("J", [0.2, 0.4, 2.0]),
            ("Q", [0.45, 0.9, 4.0]),
            ("K", [0.45, 0.9, 4.0]),
            ("A", [1.0, 4.0, 10.0]),
            ("BAR", [4.0, 15.0, 50.0]),
            ("DIAMOND", [8.0, 30.0, 90.0]),
            ("7", [15.0, 70.0, 275.0]),
            ("W", [15.0, 70.0, 275.0]),
        ]),
        base_game: BaseGameDefinition {
            reels: strips(&INFERNO_BASE),
            feature_probability: 0.028032,
        },
        bonus_game: BonusGameDefinition {
            trigger_count: 3,
            award_spins: 10,
            reels: strips(&INFERNO_BONUS),
            feature_probability: 0.25,
            multiplier: 1.0,
        },
    }
}

/// Look up a preset by short name ("low"/"high") or full game name
pub fn by_name(name: &str) -> SlotLabResult<GameDefinition> {
    match name.to_ascii_lowercase().as_str() {
        "low" | "low-vol" | "neon fruit" => Ok(low_volatility()),
        "high" | "high-vol" | "inferno 7s" => Ok(high_volatility()),
        _ => Err(SlotLabError::UnknownPreset(name.to_string())),
    }
}

/// Every built-in preset
pub fn all() -> Vec<GameDefinition> {
    vec![low_volatility(), high_volatility()]
}

fn names(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

fn strips(reels: &[&[&str]; REELS]) -> Vec<Vec<String>> {
    reels.iter().map(|strip| names(strip)).collect()
}

fn paylines() -> Vec<Vec<u8>> {
    standard_10_paylines().iter().map(|line| line.to_vec()).collect()
}

fn paytable(entries: &[(&str, [f64; 3])]) -> BTreeMap<String, [f64; 3]> {
    entries
        .iter()
        .map(|(symbol, pays)| (symbol.to_string(), *pays))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// REEL STRIPS
// ═══════════════════════════════════════════════════════════════════════════════

const NEON_FRUIT_BASE: [&[&str]; REELS] = [
    &[
        "10", "J", "Q", "10", "J", "CHERRY", "S", "K", "A", "10", "J", "W", "7", "BAR", "10",
        "J", "Q", "A", "CHERRY", "10", "J", "Q", "K", "A", "10", "J", "10", "J", "Q", "S",
    ],
    &[
        "10", "J", "Q", "K", "10", "J", "CHERRY", "10", "K", "A", "10", "J", "W", "7", "BAR",
        "10", "J", "Q", "A", "CHERRY", "10", "J", "Q", "K", "A", "10", "J", "10", "J", "Q",
    ],
    &[
        "10", "J", "Q", "K", "A", "10", "J", "CHERRY", "S", "K", "A", "10", "J", "W", "7", "BAR",
        "10", "J", "Q", "A", "CHERRY", "10", "S", "Q", "K", "A", "10", "J", "10", "J",
    ],
    &[
        "10", "J", "Q", "K", "A", "CHERRY", "10", "J", "CHERRY", "10", "K", "A", "10", "J", "W",
        "7", "BAR", "10", "J", "Q", "A", "CHERRY", "10", "J", "Q", "K", "A", "10", "J",
    ],
    &[
        "10", "J", "Q", "K", "A", "CHERRY", "BAR", "10", "J", "CHERRY", "S", "K", "A", "10", "J",
        "W", "7", "BAR", "10", "J", "Q", "A", "CHERRY", "10", "J", "Q", "K", "A", "S",
    ],
];

const NEON_FRUIT_BONUS: [&[&str]; REELS] = [
    &[
        "10", "J", "Q", "W", "10", "J", "7", "S", "K", "A", "W", "J", "W", "7", "BAR", "10", "J",
        "Q", "A", "7", "10", "J", "Q", "K", "A", "W", "J", "10", "J", "Q", "S",
    ],
    &[
        "10", "J", "Q", "W", "10", "J", "7", "S", "K", "A", "W", "J", "W", "7", "BAR", "10", "J",
        "Q", "A", "7", "10", "J", "Q", "K", "A", "W", "J", "10", "J", "Q", "S",
    ],
    &[
        "10", "J", "Q", "W", "A", "10", "J", "7", "S", "K", "A", "W", "J", "W", "7", "BAR", "10",
        "J", "Q", "A", "7", "10", "J", "Q", "K", "A", "W", "J", "10", "J", "Q", "S",
    ],
    &[
        "10", "J", "Q", "W", "A", "7", "10", "J", "7", "S", "K", "A", "W", "J", "W", "7", "BAR",
        "10", "J", "Q", "A", "7", "10", "J", "Q", "K", "A", "W", "J", "10", "J", "S",
    ],
    &[
        "10", "J", "Q", "W", "A", "7", "BAR", "10", "J", "7", "S", "K", "A", "W", "J", "W", "7",
        "BAR", "10", "J", "Q", "A", "7", "10", "J", "Q", "K", "A", "W", "J", "S",
    ],
];

const INFERNO_BASE: [&[&str]; REELS] = [
    &[
        "10", "J", "Q", "K", "A", "10", "J", "Q", "W", "7", "DIAMOND", "10", "J", "Q", "K", "A",
        "10", "J", "Q", "K", "A", "10", "J", "Q", "K", "A", "10", "J", "Q", "K", "A", "10", "J",
        "Q", "S",
    ],
    &[
        "10", "J", "Q", "K", "BAR", "10", "J", "W", "7", "DIAMOND", "10", "J", "Q", "BAR", "10",
        "K", "S", "10", "J", "Q", "K", "BAR", "10", "J", "Q", "K", "BAR", "10", "J", "Q", "K",
        "A", "10",
    ],
    &[
        "10", "J", "Q", "K", "A", "10", "J", "W", "7", "DIAMOND", "10", "J", "Q", "K", "A", "10",
        "J", "Q", "K", "A", "10", "J", "S", "10", "Q", "K", "A", "10", "Q", "K", "A", "10", "Q",
        "K", "A", "S",
    ],
    &[
        "10", "J", "Q", "K", "A", "DIAMOND", "10", "J", "Q", "W", "7", "10", "J", "Q", "A", "10",
        "J", "Q", "A", "10", "J", "Q", "A", "10", "J", "Q", "A", "10", "J", "Q", "A", "10", "J",
        "Q", "A",
    ],
    &[
        "10", "J", "Q", "K", "A", "DIAMOND", "BAR", "10", "J", "Q", "W", "7", "10", "J", "Q",
        "K", "A", "10", "J", "Q", "K", "A", "10", "Q", "K", "A", "10", "Q", "K", "A", "10", "Q",
        "K", "A", "S",
    ],
];

const INFERNO_BONUS: [&[&str]; REELS] = [
    &[
        "10", "J", "Q", "W", "7", "S", "K", "A", "W", "7", "BAR", "10", "J", "Q", "A", "7",
        "DIAMOND", "W", "10", "J", "10", "J", "Q", "K", "10", "J",
    ],
    &[
        "10", "J", "Q", "W", "7", "10", "K", "A", "W", "7", "BAR", "10", "J", "Q", "A", "7",
        "DIAMOND", "W", "10", "J", "10", "J", "Q", "K", "10", "J",
    ],
    &[
        "10", "J", "Q", "W", "A", "10", "J", "7", "S", "K", "A", "W", "7", "BAR", "DIAMOND", "A",
        "7", "W", "10", "J", "10", "J", "Q", "K", "10", "J",
    ],
    &[
        "10", "J", "Q", "W", "A", "7", "10", "J", "7", "10", "K", "A", "W", "7", "BAR",
        "DIAMOND", "A", "7", "W", "10", "J", "10", "J", "Q", "K", "10", "J",
    ],
    &[
        "10", "J", "Q", "W", "A", "7", "BAR", "10", "J", "7", "S", "K", "A", "W", "7", "BAR",
        "DIAMOND", "A", "7", "W", "10", "J", "10", "J", "Q", "K", "10", "J",
    ],
];
