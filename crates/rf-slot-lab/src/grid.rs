//! The visible 3×5 symbol window

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;

/// Visible rows per reel
pub const ROWS: usize = 3;
/// Reels (columns) on the grid
pub const REELS: usize = 5;

/// Visible symbol window, indexed `[row][reel]`
///
/// Lives for one spin: sampled, optionally overlaid with wilds, evaluated,
/// then handed out inside the spin result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [[SymbolId; REELS]; ROWS],
}

impl Grid {
    /// Grid with every cell set to `symbol`
    pub fn filled(symbol: SymbolId) -> Self {
        Self {
            cells: [[symbol; REELS]; ROWS],
        }
    }

    pub fn from_rows(cells: [[SymbolId; REELS]; ROWS]) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn get(&self, row: usize, reel: usize) -> SymbolId {
        self.cells[row][reel]
    }

    #[inline]
    pub fn set(&mut self, row: usize, reel: usize, symbol: SymbolId) {
        self.cells[row][reel] = symbol;
    }

    pub fn rows(&self) -> &[[SymbolId; REELS]; ROWS] {
        &self.cells
    }

    /// Symbols of one reel, top to bottom
    pub fn column(&self, reel: usize) -> [SymbolId; ROWS] {
        [self.cells[0][reel], self.cells[1][reel], self.cells[2][reel]]
    }

    /// Symbols along a path of one row index per reel
    #[inline]
    pub fn line(&self, rows: &[u8; REELS]) -> [SymbolId; REELS] {
        let mut out = [self.cells[0][0]; REELS];
        for (reel, &row) in rows.iter().enumerate() {
            out[reel] = self.cells[row as usize][reel];
        }
        out
    }

    /// Occurrences of `symbol` anywhere on the grid
    pub fn count(&self, symbol: SymbolId) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&s| s == symbol)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: SymbolId = SymbolId(0);
    const B: SymbolId = SymbolId(1);
    const S: SymbolId = SymbolId(2);

    #[test]
    fn test_line_follows_rows() {
        let grid = Grid::from_rows([[A, A, B, A, A], [B, B, A, B, B], [S, S, S, S, S]]);
        assert_eq!(grid.line(&[0, 0, 0, 0, 0]), [A, A, B, A, A]);
        assert_eq!(grid.line(&[0, 1, 2, 1, 0]), [A, B, S, B, A]);
        assert_eq!(grid.column(2), [B, A, S]);
    }

    #[test]
    fn test_count_is_grid_wide() {
        let mut grid = Grid::filled(A);
        grid.set(0, 0, S);
        grid.set(2, 4, S);
        grid.set(1, 2, S);
        assert_eq!(grid.count(S), 3);
        assert_eq!(grid.count(A), ROWS * REELS - 3);
        assert_eq!(grid.iter().count(), 15);
    }
}
