//! Error types for board construction, position parsing and engine configuration.
//!
//! Move generation, move application and search never fail: running out of
//! moves or out of time are ordinary results, not errors.

use crate::core::types::Bitboard;

/// A set of masks that violates the board invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("squares {overlap:#010x} are occupied by both sides")]
    Overlap { overlap: Bitboard },

    #[error("king marks {orphans:#010x} are not on any piece")]
    OrphanKings { orphans: Bitboard },
}

/// Malformed position text (`W:Wa1,c3:Bf6,Kh8`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("position text is missing the {0} section")]
    MissingSection(&'static str),

    #[error("invalid side to move: {0:?}")]
    InvalidSide(String),

    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("square {0} is listed twice")]
    DuplicateSquare(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Rejected search configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("search depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: u8, max: u8 },

    #[error("at least one search thread is required")]
    ZeroThreads,

    #[error("transposition table size must be at least 1 MB")]
    ZeroTableSize,
}
