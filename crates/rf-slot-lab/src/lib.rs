//! # rf-slot-lab: Slot math simulation engine
//!
//! Monte Carlo engine for 5×3 line slots. Estimates RTP, hit rates and
//! volatility of a game model by running millions of spins.
//!
//! ## Features
//!
//! - **Reel Model**: circular strips, one uniform stop per reel
//! - **Wild Feature**: random wild overlay that never covers a scatter
//! - **Line Evaluator**: left-to-right runs with wild substitution
//! - **Bonus Cascade**: scatter-triggered free spins with their own reels
//! - **Streaming Statistics**: constant memory per run, 95% confidence margin
//! - **Background Runs**: worker pool, progress events, cooperative cancellation
//!
//! ## Architecture
//!
//! ```text
//! GameDefinition (JSON / YAML / preset)
//!     │ compile()
//!     v
//! Arc<GameConfig> ──> Simulation ──> SpinEngine ──> ReelSet → wild feature → paylines
//!                         │              │
//!                         │              └── BonusRound (bonus mode spins)
//!                         v
//!                  RunningStatistics → SimResults
//! ```

pub mod bonus;
pub mod config;
pub mod driver;
pub mod error;
pub mod feature;
pub mod grid;
pub mod paytable;
pub mod pool;
pub mod presets;
pub mod random;
pub mod reels;
pub mod rules;
pub mod spin;
pub mod stats;
pub mod symbols;

pub use bonus::*;
pub use config::*;
pub use driver::*;
pub use error::*;
pub use feature::*;
pub use grid::*;
pub use paytable::*;
pub use pool::*;
pub use random::*;
pub use reels::*;
pub use rules::*;
pub use spin::*;
pub use stats::*;
pub use symbols::*;
