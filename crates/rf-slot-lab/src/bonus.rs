//! Free spin bonus round

use serde::Serialize;

use crate::random::RandomSource;
use crate::rules::GameMode;
use crate::spin::{SpinEngine, SpinResult};

/// Summary of one played bonus round
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BonusOutcome {
    pub spins_played: u32,
    /// Sum of bonus spin wins, multiplier included
    pub total_win: f64,
    /// Bonus spins that landed enough scatters to trigger again.
    /// Retriggers award nothing; they are only counted.
    pub retriggers_ignored: u32,
}

/// Plays the fixed number of bonus spins awarded by a trigger
#[derive(Debug, Clone, Copy)]
pub struct BonusRound<'a> {
    engine: SpinEngine<'a>,
    award_spins: u32,
}

impl<'a> BonusRound<'a> {
    pub fn new(engine: SpinEngine<'a>) -> Self {
        let award_spins = engine.config().bonus_rules().award_spins;
        Self {
            engine,
            award_spins,
        }
    }

    pub fn award_spins(&self) -> u32 {
        self.award_spins
    }

    /// Play every awarded spin, handing each result to `on_spin` as it lands
    pub fn play<R, F>(&self, rng: &mut R, mut on_spin: F) -> BonusOutcome
    where
        R: RandomSource + ?Sized,
        F: FnMut(&SpinResult),
    {
        let mut outcome = BonusOutcome::default();

        for _ in 0..self.award_spins {
            let spin = self.engine.spin(GameMode::Bonus, rng);
            outcome.spins_played += 1;
            outcome.total_win += spin.total_win;
            if spin.bonus_triggered {
                outcome.retriggers_ignored += 1;
            }
            on_spin(&spin);
        }

        outcome
    }
}
