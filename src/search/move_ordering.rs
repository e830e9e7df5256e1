use crate::core::*;
use crate::intrinsics::square_bb;

const TT_MOVE_BONUS: i32 = 1_000_000;
const CAPTURE_BONUS: i32 = 1_000;
const OFFER_BONUS: i32 = 500;
const PROMOTION_PENALTY: i32 = 300;

/// Ordena lances para maximizar podas. Stable: ties keep generator order,
/// so the search stays deterministic.
#[inline(always)]
pub fn order_moves(board: &Board, side: Side, moves: &mut [Move], tt_move: Option<(u8, u8)>) {
    moves.sort_by_key(|mv| std::cmp::Reverse(score_move(board, side, mv, tt_move)));
}

/// Pontua lance para ordenação (quanto maior, melhor).
#[inline(always)]
fn score_move(board: &Board, side: Side, mv: &Move, tt_move: Option<(u8, u8)>) -> i32 {
    let mut score = 0;

    if tt_move == Some((mv.from_square(), mv.to_square())) {
        score += TT_MOVE_BONUS;
    }

    score += mv.capture_count() as i32 * CAPTURE_BONUS;

    // Giving a piece away is the point of the game: try landings the
    // opponent can jump first.
    if lands_en_prise(board, side, mv) {
        score += OFFER_BONUS;
    }

    // A crowned piece is hard to lose.
    if mv.promotes {
        score -= PROMOTION_PENALTY;
    }

    score
}

/// True if an adjacent opponent piece could jump the moved piece on its landing square.
fn lands_en_prise(board: &Board, side: Side, mv: &Move) -> bool {
    let next = board.apply(mv, side);
    let opponents = next.pieces(!side);
    let empty = next.empty_squares();
    let to = mv.to_square();

    Direction::ALL.into_iter().any(|dir| {
        let attacker = neighbor(to, dir);
        let landing = neighbor(to, dir.opposite());
        match (attacker, landing) {
            (Some(a), Some(l)) => opponents & square_bb(a) != 0 && empty & square_bb(l) != 0,
            _ => false,
        }
    })
}
