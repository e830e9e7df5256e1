// Giveaway evaluation: losing material is good.

use crate::core::*;
use crate::intrinsics::{popcount, BitboardOps};

pub const MAN_VALUE: i32 = 100;
pub const KING_VALUE: i32 = 300;

/// Score of a won position (side to move has no legal move) at ply 0.
pub const MATE_SCORE: i32 = 10_000;
pub const MAX_PLY: i32 = 128;
/// Scores at or beyond this magnitude are forced wins or losses.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY;
/// Bound strictly above every reachable score.
pub const INFINITY: i32 = MATE_SCORE + 1;

/// Bonus for men still close to their own back rank, from White's point of view.
/// Black reads it mirrored.
#[rustfmt::skip]
const BACK_RANK_BONUS: [i32; 32] = [
    10, 10, 10, 10,
     8,  8,  8,  8,
     6,  6,  6,  6,
     4,  4,  4,  4,
     2,  2,  2,  2,
     1,  1,  1,  1,
     0,  0,  0,  0,
     0,  0,  0,  0,
];

#[inline(always)]
fn back_rank_bonus(side: Side, square: u8) -> i32 {
    match side {
        Side::White => BACK_RANK_BONUS[square as usize],
        Side::Black => BACK_RANK_BONUS[31 - square as usize],
    }
}

/// Conventional material of `side`: piece values plus the back-rank bonus of its men.
pub fn material(board: &Board, side: Side) -> i32 {
    let men = board.men_of(side);
    let kings = board.kings_of(side);

    let mut score = popcount(men) as i32 * MAN_VALUE + popcount(kings) as i32 * KING_VALUE;
    for square in men.iter_squares() {
        score += back_rank_bonus(side, square);
    }
    score
}

/// Static score from `side`'s point of view: the opponent's material minus our own.
/// Does not detect terminal positions; the search does.
#[inline]
pub fn evaluate(board: &Board, side: Side) -> i32 {
    material(board, !side) - material(board, side)
}

/// Score of the side to move when it has no legal move at `ply`.
#[inline(always)]
pub const fn mate_in(ply: i32) -> i32 {
    MATE_SCORE - ply
}

#[inline(always)]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}
