//! Error types for the slot lab engine

use thiserror::Error;

use crate::rules::GameMode;

/// Slot lab errors
///
/// Everything here is raised while a game definition is loaded or compiled,
/// or by the run lifecycle. Spin evaluation itself never fails.
#[derive(Error, Debug)]
pub enum SlotLabError {
    #[error("{mode} reel {column} has an empty strip")]
    EmptyReelStrip { mode: GameMode, column: usize },

    #[error("{mode} reel set has {actual} strips, expected {expected}")]
    ReelCountMismatch {
        mode: GameMode,
        expected: usize,
        actual: usize,
    },

    #[error("No paylines configured")]
    EmptyPaylines,

    #[error("Payline {index} has {len} positions")]
    PaylineLength { index: usize, len: usize },

    #[error("Payline {index} uses row {row} on reel {column}")]
    PaylineRowOutOfRange { index: usize, column: usize, row: u8 },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("{mode} feature probability {value} is outside [0, 1]")]
    InvalidProbability { mode: GameMode, value: f64 },

    #[error("Invalid bonus multiplier: {0}")]
    InvalidMultiplier(f64),

    #[error("Invalid payout for {symbol}: {value}")]
    InvalidPayout { symbol: String, value: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Simulation cancelled")]
    Cancelled,
}

/// Result type for slot lab operations
pub type SlotLabResult<T> = Result<T, SlotLabError>;
