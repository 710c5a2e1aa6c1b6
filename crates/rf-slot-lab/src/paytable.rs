//! Paylines, paytable and line win evaluation

use serde::{Deserialize, Serialize};

use crate::error::{SlotLabError, SlotLabResult};
use crate::grid::{Grid, REELS, ROWS};
use crate::symbols::SymbolId;

/// Shortest run that can pay
pub const MIN_MATCH: u8 = 3;

/// A payline definition: one row index per reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payline {
    rows: [u8; REELS],
}

impl Payline {
    /// Validated payline; `index` is only used for error reporting
    pub fn new(index: usize, rows: &[u8]) -> SlotLabResult<Self> {
        let rows: [u8; REELS] = rows.try_into().map_err(|_| SlotLabError::PaylineLength {
            index,
            len: rows.len(),
        })?;
        if let Some((column, &row)) = rows.iter().enumerate().find(|(_, r)| **r as usize >= ROWS) {
            return Err(SlotLabError::PaylineRowOutOfRange { index, column, row });
        }
        Ok(Self { rows })
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(row: u8) -> Self {
        Self {
            rows: [row.min(ROWS as u8 - 1); REELS],
        }
    }

    pub fn rows(&self) -> &[u8; REELS] {
        &self.rows
    }
}

/// The ten classic lines of a 5×3 game
pub fn standard_10_paylines() -> Vec<[u8; REELS]> {
    vec![
        // Straight lines
        [0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1],
        [2, 2, 2, 2, 2],
        // V shapes
        [0, 1, 2, 1, 0],
        [2, 1, 0, 1, 2],
        // Dips and bumps
        [0, 0, 1, 0, 0],
        [2, 2, 1, 2, 2],
        [1, 2, 2, 2, 1],
        [1, 0, 0, 0, 1],
        // Zigzag
        [0, 1, 0, 1, 0],
    ]
}

/// Payout multipliers for 3, 4 and 5 of a kind, indexed by symbol id
#[derive(Debug, Clone, Default, Serialize)]
pub struct PayTable {
    pays: Vec<Option<[f64; 3]>>,
}

impl PayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 3/4/5-of-a-kind pays for `symbol`
    pub fn insert(&mut self, symbol: SymbolId, pays: [f64; 3]) {
        let idx = symbol.index();
        if self.pays.len() <= idx {
            self.pays.resize(idx + 1, None);
        }
        self.pays[idx] = Some(pays);
    }

    #[inline]
    pub fn contains(&self, symbol: SymbolId) -> bool {
        matches!(self.pays.get(symbol.index()), Some(Some(_)))
    }

    pub fn pays(&self, symbol: SymbolId) -> Option<&[f64; 3]> {
        self.pays.get(symbol.index()).and_then(Option::as_ref)
    }

    /// Get pay value for a match count; counts outside 3..=5 pay nothing
    #[inline]
    pub fn payout(&self, symbol: SymbolId, count: u8) -> f64 {
        if count < MIN_MATCH {
            return 0.0;
        }
        let idx = (count - MIN_MATCH) as usize;
        self.pays(symbol)
            .and_then(|p| p.get(idx))
            .copied()
            .unwrap_or(0.0)
    }
}

/// A win result on a single payline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinLine {
    /// Payline index in declaration order
    pub line_index: usize,
    /// Anchor symbol the run was matched against
    pub symbol: SymbolId,
    /// Consecutive matches from the leftmost reel (3..=5)
    pub count: u8,
    /// Win amount (bet multiplier)
    pub amount: f64,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineEvaluation {
    /// Winning lines in payline order
    pub win_lines: Vec<WinLine>,
    /// Sum of line amounts
    pub total_win: f64,
}

impl LineEvaluation {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Multiply the total and every line by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.total_win *= factor;
        for line in &mut self.win_lines {
            line.amount *= factor;
        }
    }
}

/// Match a single line of symbols, left to right.
///
/// The anchor is the first symbol, or the first non-wild when the line opens
/// with wilds (the wild itself when every symbol is wild). The run stops at the
/// first symbol that is neither the anchor nor wild. Returns `(anchor, count,
/// amount)` only for a positive payout.
pub fn evaluate_line(
    symbols: &[SymbolId; REELS],
    paytable: &PayTable,
    wild: SymbolId,
) -> Option<(SymbolId, u8, f64)> {
    let first = symbols[0];
    if first != wild && !paytable.contains(first) {
        return None;
    }

    let anchor = if first == wild {
        symbols.iter().copied().find(|&s| s != wild).unwrap_or(wild)
    } else {
        first
    };
    if !paytable.contains(anchor) {
        return None;
    }

    let count = symbols
        .iter()
        .take_while(|&&s| s == anchor || s == wild)
        .count() as u8;

    let amount = paytable.payout(anchor, count);
    (amount > 0.0).then_some((anchor, count, amount))
}

/// Evaluate every payline on `grid`
pub fn evaluate_lines(
    grid: &Grid,
    paylines: &[Payline],
    paytable: &PayTable,
    wild: SymbolId,
) -> LineEvaluation {
    let mut evaluation = LineEvaluation::default();

    for (line_index, payline) in paylines.iter().enumerate() {
        let symbols = grid.line(payline.rows());
        if let Some((symbol, count, amount)) = evaluate_line(&symbols, paytable, wild) {
            evaluation.total_win += amount;
            evaluation.win_lines.push(WinLine {
                line_index,
                symbol,
                count,
                amount,
            });
        }
    }

    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: SymbolId = SymbolId(0);
    const B: SymbolId = SymbolId(1);
    const X: SymbolId = SymbolId(2);
    const Y: SymbolId = SymbolId(3);
    const W: SymbolId = SymbolId(4);
    const S: SymbolId = SymbolId(5);

    fn paytable() -> PayTable {
        let mut table = PayTable::new();
        table.insert(A, [1.0, 4.0, 10.0]);
        table.insert(B, [0.5, 2.0, 5.0]);
        table.insert(X, [0.2, 0.4, 2.0]);
        table.insert(Y, [0.2, 0.4, 2.0]);
        table.insert(W, [15.0, 70.0, 275.0]);
        table
    }

    #[test]
    fn test_three_of_a_kind() {
        let table = paytable();
        assert_eq!(evaluate_line(&[A, A, A, X, Y], &table, W), Some((A, 3, 1.0)));
    }

    #[test]
    fn test_leading_wilds_take_first_paying_anchor() {
        let table = paytable();
        assert_eq!(evaluate_line(&[W, W, A, A, B], &table, W), Some((A, 4, 4.0)));
    }

    #[test]
    fn test_all_wild_line() {
        let table = paytable();
        assert_eq!(evaluate_line(&[W, W, W, W, W], &table, W), Some((W, 5, 275.0)));
    }

    #[test]
    fn test_wild_inside_run() {
        let table = paytable();
        assert_eq!(evaluate_line(&[B, W, B, W, A], &table, W), Some((B, 4, 2.0)));
        assert_eq!(evaluate_line(&[A, W, W, W, W], &table, W), Some((A, 5, 10.0)));
    }

    #[test]
    fn test_short_runs_pay_nothing() {
        let table = paytable();
        assert_eq!(evaluate_line(&[A, A, B, A, A], &table, W), None);
        assert_eq!(evaluate_line(&[W, A, B, B, B], &table, W), None);
    }

    #[test]
    fn test_no_right_to_left_or_gaps() {
        let table = paytable();
        assert_eq!(evaluate_line(&[X, Y, A, A, A], &table, W), None);
        assert_eq!(evaluate_line(&[A, A, X, A, A], &table, W), None);
    }

    #[test]
    fn test_non_paying_anchor() {
        let table = paytable();
        // scatter leads
        assert_eq!(evaluate_line(&[S, S, S, S, S], &table, W), None);
        // wilds lead into a scatter
        assert_eq!(evaluate_line(&[W, W, S, A, A], &table, W), None);
    }

    #[test]
    fn test_payout_out_of_range() {
        let table = paytable();
        assert_eq!(table.payout(A, 0), 0.0);
        assert_eq!(table.payout(A, 2), 0.0);
        assert_eq!(table.payout(A, 6), 0.0);
        assert_eq!(table.payout(S, 5), 0.0);
    }

    #[test]
    fn test_zero_pay_entry_is_not_a_win() {
        let mut table = paytable();
        table.insert(B, [0.0, 2.0, 5.0]);
        assert_eq!(evaluate_line(&[B, B, B, A, A], &table, W), None);
    }

    #[test]
    fn test_evaluate_lines_orders_and_sums() {
        let table = paytable();
        let paylines: Vec<Payline> = standard_10_paylines()
            .iter()
            .enumerate()
            .map(|(i, rows)| Payline::new(i, rows).unwrap())
            .collect();
        let grid = Grid::from_rows([
            [A, A, A, A, A],
            [B, B, B, X, Y],
            [S, X, Y, S, X],
        ]);

        let eval = evaluate_lines(&grid, &paylines, &table, W);
        // line 0: A×5, line 1: B×3, line 5 [0,0,1,0,0]: A A B -> A×2 no
        let indices: Vec<usize> = eval.win_lines.iter().map(|w| w.line_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(eval.total_win, 10.0 + 0.5);
        assert!(eval.win_lines.iter().all(|w| w.amount > 0.0 && w.count >= MIN_MATCH));

        // pure: same grid, same answer
        assert_eq!(evaluate_lines(&grid, &paylines, &table, W), eval);
    }

    #[test]
    fn test_payline_validation() {
        assert!(Payline::new(0, &[0, 1, 2, 1, 0]).is_ok());
        assert!(matches!(
            Payline::new(3, &[0, 1, 2]),
            Err(SlotLabError::PaylineLength { index: 3, len: 3 })
        ));
        assert!(matches!(
            Payline::new(1, &[0, 1, 3, 1, 0]),
            Err(SlotLabError::PaylineRowOutOfRange { index: 1, column: 2, row: 3 })
        ));
        assert_eq!(Payline::straight(1).rows(), &[1, 1, 1, 1, 1]);
    }
}
