// Ficheiro: src/moves/king.rs
// King moves: flying slides and flying captures along the four diagonals.
// With `Rules::flying_kings` off, kings step and jump like men in every direction.

use super::ChainSearch;
use crate::core::*;
use crate::intrinsics::{square_bb, BitboardOps};

/// First piece met along `dir` from `square`, if the rules let the king reach it.
#[inline]
fn first_occupied(search: &ChainSearch, square: u8, dir: Direction) -> Option<u8> {
    let mut current = neighbor(square, dir)?;
    if !search.rules.flying_kings {
        return (!search.is_empty(current)).then_some(current);
    }
    while search.is_empty(current) {
        current = neighbor(current, dir)?;
    }
    Some(current)
}

/// Extends a king's capture chain from `square`.
///
/// `captured` holds the pieces already taken; they stay on the board as
/// blockers and cannot be jumped again. `promoted` is carried into the
/// emitted move when the chain started as a man crowned on the way.
pub(crate) fn king_chain(search: &mut ChainSearch, square: u8, captured: Bitboard, promoted: bool) {
    let mut extended = false;

    for dir in Direction::ALL {
        let Some(victim) = first_occupied(search, square, dir) else {
            continue;
        };
        if !search.is_capturable(victim, captured) {
            continue;
        }

        let taken = captured | square_bb(victim);
        let mut landing = neighbor(victim, dir);
        while let Some(target) = landing {
            if !search.is_empty(target) {
                break;
            }
            extended = true;
            king_chain(search, target, taken, promoted);
            if !search.rules.flying_kings {
                break;
            }
            landing = neighbor(target, dir);
        }
    }

    if !extended && captured != 0 {
        search.emit(square, captured, promoted);
    }
}

/// Appends every complete capture chain of `side`'s kings.
pub fn generate_king_captures(board: &Board, side: Side, rules: &Rules, out: &mut Vec<Move>) {
    for square in board.kings_of(side).iter_squares() {
        let mut search = ChainSearch::new(board, side, rules, square, out);
        king_chain(&mut search, square, 0, false);
    }
}

/// Appends the non-capturing king moves of `side`.
pub fn generate_king_slides(board: &Board, side: Side, rules: &Rules, out: &mut Vec<Move>) {
    let empty = board.empty_squares();

    for from in board.kings_of(side).iter_squares() {
        for dir in Direction::ALL {
            let mut next = neighbor(from, dir);
            while let Some(to) = next {
                if empty & square_bb(to) == 0 {
                    break;
                }
                out.push(Move::step(from, to, false));
                if !rules.flying_kings {
                    break;
                }
                next = neighbor(to, dir);
            }
        }
    }
}
