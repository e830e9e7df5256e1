// Ficheiro: src/moves/man.rs
// Man moves: forward steps, jumps in any direction (rules permitting) and crowning.

use super::{king, ChainSearch};
use crate::core::*;
use crate::intrinsics::{square_bb, BitboardOps};

fn man_chain(search: &mut ChainSearch, square: u8, captured: Bitboard) {
    let forward = search.side.forward_directions();
    let promotion_rank = search.side.promotion_rank();
    let mut extended = false;

    for dir in Direction::ALL {
        if !search.rules.men_capture_backward && !forward.contains(&dir) {
            continue;
        }
        let Some(victim) = neighbor(square, dir) else {
            continue;
        };
        if !search.is_capturable(victim, captured) {
            continue;
        }
        let Some(landing) = neighbor(victim, dir) else {
            continue;
        };
        if !search.is_empty(landing) {
            continue;
        }

        extended = true;
        let taken = captured | square_bb(victim);
        let crowned = promotion_rank & square_bb(landing) != 0;
        if crowned && search.rules.promotion == PromotionPolicy::MidCapture {
            // Crowned on landing: the rest of the chain is played as a king.
            king::king_chain(search, landing, taken, true);
        } else {
            man_chain(search, landing, taken);
        }
    }

    if !extended && captured != 0 {
        let promotes = promotion_rank & square_bb(square) != 0;
        search.emit(square, captured, promotes);
    }
}

/// Appends every complete capture chain of `side`'s men.
pub fn generate_man_captures(board: &Board, side: Side, rules: &Rules, out: &mut Vec<Move>) {
    for square in board.men_of(side).iter_squares() {
        let mut search = ChainSearch::new(board, side, rules, square, out);
        man_chain(&mut search, square, 0);
    }
}

/// Appends the one-square forward steps of `side`'s men.
pub fn generate_man_steps(board: &Board, side: Side, out: &mut Vec<Move>) {
    let empty = board.empty_squares();
    let promotion_rank = side.promotion_rank();

    for from in board.men_of(side).iter_squares() {
        for dir in side.forward_directions() {
            if let Some(to) = neighbor(from, dir) {
                let to_bb = square_bb(to);
                if empty & to_bb != 0 {
                    out.push(Move::step(from, to, promotion_rank & to_bb != 0));
                }
            }
        }
    }
}
