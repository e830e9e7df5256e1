pub mod alpha_beta;
pub mod evaluation;
pub mod move_ordering;
pub mod parallel_search;

pub use alpha_beta::AlphaBetaEngine;
pub use evaluation::*;
pub use move_ordering::*;

use crate::core::{Board, Move, Rules, Side};
use crate::error::ConfigError;
use lazy_static::lazy_static;
use std::time::{Duration, Instant};

/// Deepest iteration a search may be configured for.
pub const MAX_DEPTH: u8 = 64;

/// Table size used by the one-shot [`find_best_move`].
const ONE_SHOT_TT_MB: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// None = sem limite de tempo
    pub max_time: Option<Duration>,
    pub threads: usize,
    pub tt_size_mb: usize,
    pub use_tt: bool,
    pub parallel_root: bool,
    pub rules: Rules,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 10,
            max_time: None,
            threads: num_cpus::get().clamp(1, 16),
            tt_size_mb: 64,
            use_tt: true,
            parallel_root: true,
            rules: Rules::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return Err(ConfigError::InvalidDepth {
                depth: self.max_depth,
                max: MAX_DEPTH,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.use_tt && self.tt_size_mb == 0 {
            return Err(ConfigError::ZeroTableSize);
        }
        Ok(())
    }
}

/// Resultado da busca
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// None when the side to move has no legal move (it has already won).
    pub best_move: Option<Move>,
    /// From the mover's point of view; positive is good for the mover.
    pub score: i32,
    /// Deepest completed iteration, 0 if none completed.
    pub depth: u8,
    pub nodes_searched: u64,
    pub time_elapsed: Duration,
    pub pv_line: Vec<Move>,
}

impl SearchResult {
    pub fn nps(&self) -> u64 {
        let secs = self.time_elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes_searched as f64 / secs) as u64
        } else {
            0
        }
    }
}

pub fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

lazy_static! {
    /// Engine behind [`find_best_move`], built on first use so the table and
    /// thread pool are not paid for on every call.
    static ref ONE_SHOT: AlphaBetaEngine = AlphaBetaEngine::build(SearchConfig {
        tt_size_mb: ONE_SHOT_TT_MB,
        ..SearchConfig::default()
    });
}

/// Best move for `side` searching up to `max_depth` plies (at least 1) and at
/// most `time_limit_ms` milliseconds (0 = no limit) with default rules.
///
/// The time limit is wall-clock from the moment of the call. The table is
/// shared between calls; that never changes the chosen move.
pub fn find_best_move(board: &Board, side: Side, max_depth: u8, time_limit_ms: u64) -> SearchResult {
    let start = Instant::now();
    let max_time = (time_limit_ms > 0).then(|| Duration::from_millis(time_limit_ms));
    ONE_SHOT.search_from(board, side, max_depth, max_time, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.threads >= 1 && config.threads <= 16);
    }

    #[test]
    fn test_config_validation() {
        let zero_depth = SearchConfig {
            max_depth: 0,
            ..SearchConfig::default()
        };
        assert_eq!(
            zero_depth.validate(),
            Err(ConfigError::InvalidDepth { depth: 0, max: MAX_DEPTH })
        );

        let no_table = SearchConfig {
            tt_size_mb: 0,
            ..SearchConfig::default()
        };
        assert_eq!(no_table.validate(), Err(ConfigError::ZeroTableSize));
        let disabled = SearchConfig {
            use_tt: false,
            ..no_table
        };
        assert_eq!(disabled.validate(), Ok(()));
    }

    #[test]
    fn test_nps_and_pv_formatting() {
        let result = SearchResult {
            best_move: Some(Move::step(9, 13, false)),
            score: 0,
            depth: 1,
            nodes_searched: 5000,
            time_elapsed: Duration::from_millis(500),
            pv_line: vec![Move::step(9, 13, false), Move::step(22, 18, false)],
        };
        assert_eq!(result.nps(), 10_000);
        assert_eq!(format_pv(&result.pv_line), "c3-d4 f6-e5");
    }
}
