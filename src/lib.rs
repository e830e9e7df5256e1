// Motor de Damas "perde-ganha" (giveaway / poddavki)
//
// Whoever runs out of moves first, usually by losing every piece, wins.

pub mod core;
pub mod engine;
pub mod error;
pub mod intrinsics;
pub mod moves;
pub mod search;

pub use crate::core::*;
pub use error::{BoardError, ConfigError, FenError};
pub use moves::{evaluate_terminal, has_legal_moves, legal_moves, legal_moves_with};
pub use search::{find_best_move, AlphaBetaEngine as Engine, SearchConfig, SearchResult};

/// Successor of `board` after `side` plays `mv` (a move generated for this board and side).
#[inline]
pub fn apply(board: &Board, mv: &Move, side: Side) -> Board {
    board.apply(mv, side)
}
