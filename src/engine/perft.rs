// Perft: contagem de folhas da árvore de lances, com cache por hash.
use crate::core::*;
use crate::moves::legal_moves_with;
use std::collections::HashMap;

/// (hash, depth) -> leaf count
type PerftCache = HashMap<(u64, u8), u64>;

/// Number of move sequences of exactly `depth` plies.
pub fn perft(board: &Board, side: Side, depth: u8, rules: &Rules) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves_with(board, side, rules);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| perft(&board.apply(mv, side), !side, depth - 1, rules))
        .sum()
}

/// Same count as [`perft`], reusing subtrees reached by transposition.
pub fn perft_cached(board: &Board, side: Side, depth: u8, rules: &Rules) -> u64 {
    count_cached(board, side, depth, rules, &mut PerftCache::with_capacity(1 << 16))
}

fn count_cached(board: &Board, side: Side, depth: u8, rules: &Rules, cache: &mut PerftCache) -> u64 {
    if depth == 0 {
        return 1;
    }
    let key = (board.hash(side, rules), depth);
    if let Some(&nodes) = cache.get(&key) {
        return nodes;
    }

    let moves = legal_moves_with(board, side, rules);
    let nodes = if depth == 1 {
        moves.len() as u64
    } else {
        moves
            .iter()
            .map(|mv| count_cached(&board.apply(mv, side), !side, depth - 1, rules, cache))
            .sum()
    };

    cache.insert(key, nodes);
    nodes
}

/// Leaf count below each root move.
pub fn perft_divide(board: &Board, side: Side, depth: u8, rules: &Rules) -> Vec<(Move, u64)> {
    let mut cache = PerftCache::new();
    legal_moves_with(board, side, rules)
        .into_iter()
        .map(|mv| {
            let nodes = count_cached(&board.apply(&mv, side), !side, depth.saturating_sub(1), rules, &mut cache);
            (mv, nodes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_counts() {
        let rules = Rules::default();
        let board = Board::new();
        assert_eq!(perft(&board, Side::White, 0, &rules), 1);
        assert_eq!(perft(&board, Side::White, 1, &rules), 7);
        assert_eq!(perft(&board, Side::White, 2, &rules), 49);
        assert_eq!(perft(&board, Side::White, 3, &rules), 302);
    }

    #[test]
    fn test_cache_agrees_with_plain_perft() {
        let rules = Rules::default();
        let board = Board::new();
        for depth in 0..=5 {
            assert_eq!(perft_cached(&board, Side::White, depth, &rules), perft(&board, Side::White, depth, &rules));
        }

        let (midgame, side) = Board::from_fen("W:Wa1,c1,e1,b2,f2,c3,g3,d4:Bd6,f6,h6,a7,c7,g7,b8,Kh4").expect("valid position");
        assert_eq!(perft_cached(&midgame, side, 4, &rules), perft(&midgame, side, 4, &rules));
    }

    #[test]
    fn test_divide_sums_to_total() {
        let rules = Rules::default();
        let board = Board::new();
        let divide = perft_divide(&board, Side::White, 3, &rules);

        assert_eq!(divide.len(), 7);
        let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
        assert_eq!(total, perft(&board, Side::White, 3, &rules));
    }

    #[test]
    fn test_won_position_has_no_leaves() {
        let board = Board::empty().with_piece(Side::White, PieceKind::Man, 9);
        assert_eq!(perft(&board, Side::Black, 3, &Rules::default()), 0);
    }
}
