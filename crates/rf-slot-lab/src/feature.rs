//! Random wild overlay feature

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, REELS, ROWS};
use crate::random::RandomSource;
use crate::symbols::SymbolId;

/// Wilds the feature tries to place
pub const MAX_WILDS: u8 = 3;
/// Cell draws before placement gives up
pub const MAX_PLACEMENT_ATTEMPTS: u8 = 20;

/// Whether the wild feature fired on a spin, and how many wilds it actually placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOutcome {
    pub triggered: bool,
    pub wilds_placed: u8,
}

impl FeatureOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    /// Fired, but ran out of attempts before placing every wild
    pub fn is_short(&self) -> bool {
        self.triggered && self.wilds_placed < MAX_WILDS
    }
}

/// Roll the feature trigger and, on success, overlay wilds onto `grid`
pub fn roll_feature<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    probability: f64,
    wild: SymbolId,
    scatter: SymbolId,
    rng: &mut R,
) -> FeatureOutcome {
    if !rng.chance(probability) {
        return FeatureOutcome::none();
    }
    FeatureOutcome {
        triggered: true,
        wilds_placed: inject_wilds(grid, wild, scatter, rng),
    }
}

/// Place up to [`MAX_WILDS`] wilds on random cells that hold neither a
/// scatter nor a wild. Returns the number placed, which may be fewer than
/// requested once [`MAX_PLACEMENT_ATTEMPTS`] draws are spent.
pub fn inject_wilds<R: RandomSource + ?Sized>(
    grid: &mut Grid,
    wild: SymbolId,
    scatter: SymbolId,
    rng: &mut R,
) -> u8 {
    let mut placed = 0u8;
    let mut attempts = 0u8;

    while placed < MAX_WILDS && attempts < MAX_PLACEMENT_ATTEMPTS {
        let row = rng.next_index(ROWS);
        let reel = rng.next_index(REELS);

        let current = grid.get(row, reel);
        if current != scatter && current != wild {
            grid.set(row, reel, wild);
            placed += 1;
        }
        attempts += 1;
    }

    placed
}
