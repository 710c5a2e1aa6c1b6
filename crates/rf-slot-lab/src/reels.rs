//! Reel strips and window sampling

use serde::Serialize;

use crate::error::{SlotLabError, SlotLabResult};
use crate::grid::{Grid, REELS, ROWS};
use crate::random::RandomSource;
use crate::rules::GameMode;
use crate::symbols::{SymbolId, SymbolTable};

/// A circular reel strip; never empty once constructed
#[derive(Debug, Clone, Serialize)]
pub struct ReelStrip {
    symbols: Vec<SymbolId>,
}

impl ReelStrip {
    /// Get symbol at position (wraps around)
    #[inline]
    pub fn symbol_at(&self, position: usize) -> SymbolId {
        self.symbols[position % self.symbols.len()]
    }

    /// `ROWS` consecutive symbols starting at `stop`, wrapping past the end
    #[inline]
    pub fn window(&self, stop: usize) -> [SymbolId; ROWS] {
        [
            self.symbol_at(stop),
            self.symbol_at(stop + 1),
            self.symbol_at(stop + 2),
        ]
    }

    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// One strip per reel for a single game mode
#[derive(Debug, Clone, Serialize)]
pub struct ReelSet {
    strips: Vec<ReelStrip>,
}

impl ReelSet {
    /// Build a reel set from symbol ids, rejecting empty strips and wrong reel counts
    pub fn new(mode: GameMode, strips: Vec<Vec<SymbolId>>) -> SlotLabResult<Self> {
        if strips.len() != REELS {
            return Err(SlotLabError::ReelCountMismatch {
                mode,
                expected: REELS,
                actual: strips.len(),
            });
        }
        if let Some(column) = strips.iter().position(Vec::is_empty) {
            return Err(SlotLabError::EmptyReelStrip { mode, column });
        }
        Ok(Self {
            strips: strips
                .into_iter()
                .map(|symbols| ReelStrip { symbols })
                .collect(),
        })
    }

    /// Build a reel set from symbol names
    pub fn from_names(
        mode: GameMode,
        table: &SymbolTable,
        strips: &[Vec<String>],
    ) -> SlotLabResult<Self> {
        let resolved = strips
            .iter()
            .map(|strip| {
                strip
                    .iter()
                    .map(|name| table.resolve(name))
                    .collect::<SlotLabResult<Vec<_>>>()
            })
            .collect::<SlotLabResult<Vec<_>>>()?;
        Self::new(mode, resolved)
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }

    /// Sample a window: one independent uniform stop per reel
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Grid {
        self.sample_with_stops(rng).1
    }

    /// Sample a window and report the stop index chosen on each reel
    pub fn sample_with_stops<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> ([usize; REELS], Grid) {
        let mut stops = [0usize; REELS];
        let mut grid = Grid::filled(self.strips[0].symbol_at(0));

        for (reel, strip) in self.strips.iter().enumerate() {
            let stop = rng.next_index(strip.len());
            stops[reel] = stop;
            for (row, symbol) in strip.window(stop).into_iter().enumerate() {
                grid.set(row, reel, symbol);
            }
        }

        (stops, grid)
    }
}
