// Legal move generation: mandatory captures, maximum-capture rule, quiet moves.

pub mod king;
pub mod man;

use crate::core::*;
use crate::intrinsics::{square_bb, BitboardOps};

/// State shared by the recursive capture-chain walkers of one piece.
pub(crate) struct ChainSearch<'a> {
    pub side: Side,
    pub rules: &'a Rules,
    pub opponents: Bitboard,
    /// Occupied squares with the moving piece lifted off its origin.
    /// Pieces captured earlier in the chain stay here until the move ends.
    pub occupied: Bitboard,
    pub origin: Bitboard,
    pub out: &'a mut Vec<Move>,
}

impl<'a> ChainSearch<'a> {
    pub fn new(board: &Board, side: Side, rules: &'a Rules, origin: u8, out: &'a mut Vec<Move>) -> Self {
        let origin = square_bb(origin);
        ChainSearch {
            side,
            rules,
            opponents: board.pieces(!side),
            occupied: board.occupied() & !origin,
            origin,
            out,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self, square: u8) -> bool {
        self.occupied & square_bb(square) == 0
    }

    /// True if `square` holds an opponent piece not yet taken in this chain.
    #[inline(always)]
    pub fn is_capturable(&self, square: u8, captured: Bitboard) -> bool {
        let bb = square_bb(square);
        self.opponents & bb != 0 && captured & bb == 0
    }

    #[inline(always)]
    pub fn emit(&mut self, square: u8, captured: Bitboard, promotes: bool) {
        self.out.push(Move {
            from: self.origin,
            to: square_bb(square),
            captured,
            promotes,
        });
    }
}

/// Legal moves for `side` under the default (Russian giveaway) rules.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    legal_moves_with(board, side, &Rules::default())
}

/// Legal moves for `side`: the maximal captures if any capture exists,
/// otherwise every quiet move. Empty means `side` has won.
pub fn legal_moves_with(board: &Board, side: Side, rules: &Rules) -> Vec<Move> {
    let mut captures = generate_captures(board, side, rules);
    if !captures.is_empty() {
        retain_maximal_captures(&mut captures);
        return captures;
    }
    generate_quiet_moves(board, side, rules)
}

/// Every complete capture chain, before the maximum-capture filter.
/// Chains reachable by different hop orders are reported once.
pub fn generate_captures(board: &Board, side: Side, rules: &Rules) -> Vec<Move> {
    let mut captures = Vec::new();
    man::generate_man_captures(board, side, rules, &mut captures);
    king::generate_king_captures(board, side, rules, &mut captures);

    captures.sort_unstable();
    captures.dedup();
    captures
}

/// Keeps only the captures that remove the largest number of pieces.
pub fn retain_maximal_captures(captures: &mut Vec<Move>) {
    let max = captures.iter().map(Move::capture_count).max().unwrap_or(0);
    captures.retain(|mv| mv.capture_count() == max);
}

/// Non-capturing moves; only legal when no capture exists.
pub fn generate_quiet_moves(board: &Board, side: Side, rules: &Rules) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    man::generate_man_steps(board, side, &mut moves);
    king::generate_king_slides(board, side, rules, &mut moves);
    moves
}

/// Cheap test for "does `side` have any legal move".
pub fn has_legal_moves(board: &Board, side: Side, rules: &Rules) -> bool {
    let empty = board.empty_squares();

    // Any quiet step means a move exists, whether or not it is itself legal.
    for square in board.men_of(side).iter_squares() {
        for dir in side.forward_directions() {
            if neighbor(square, dir).is_some_and(|t| empty & square_bb(t) != 0) {
                return true;
            }
        }
    }
    for square in board.kings_of(side).iter_squares() {
        for dir in Direction::ALL {
            if neighbor(square, dir).is_some_and(|t| empty & square_bb(t) != 0) {
                return true;
            }
        }
    }

    !generate_captures(board, side, rules).is_empty()
}

/// True when `side` has no legal move, i.e. the game is over and `side` has won.
pub fn evaluate_terminal(board: &Board, side: Side) -> bool {
    !has_legal_moves(board, side, &Rules::default())
}
