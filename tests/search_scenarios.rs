use giveaway::search::{is_mate_score, MATE_SCORE, MATE_THRESHOLD};
use giveaway::*;

fn mv(from: &str, to: &str) -> Move {
    let from = parse_square(from).expect("valid square");
    let to = parse_square(to).expect("valid square");
    Move::step(from, to, false)
}

fn engine(max_depth: u8, parallel_root: bool) -> Engine {
    Engine::new(SearchConfig {
        max_depth,
        tt_size_mb: 4,
        threads: 4,
        parallel_root,
        ..SearchConfig::default()
    })
    .expect("valid config")
}

const POSITIONS: [&str; 4] = [
    "W:Wa1,c1,e1,g1,b2,d2,f2,h2,a3,c3,e3,g3:Bb6,d6,f6,h6,a7,c7,e7,g7,b8,d8,f8,h8",
    "W:Wa1,c1,e1,b2,f2,c3,g3,d4:Bd6,f6,h6,a7,c7,g7,b8,Kh4",
    "B:WKa1,Kh2,c3,e3:BKd8,Kb6,f6,g7",
    "W:Wc1,e1,d2,f4:Bb6,e7,g7,h8",
];

#[test]
fn engine_gives_its_last_piece_away() {
    // c3-d4 forces e5xc3 and leaves White without pieces
    let (board, side) = Board::from_fen("W:Wc3:Be5").expect("valid position");

    for depth in 2..=6 {
        let result = find_best_move(&board, side, depth, 0);
        assert_eq!(result.best_move, Some(mv("c3", "d4")), "depth {}", depth);
        assert_eq!(result.score, MATE_SCORE - 2, "depth {}", depth);
        assert_eq!(result.pv_line.len(), 2);
    }
}

#[test]
fn engine_does_not_leave_the_opponent_without_moves() {
    // a1-b2 would box in a3 and hand Black the win
    let (board, side) = Board::from_fen("W:Wa1,c1:Ba3").expect("valid position");

    for depth in 4..=8 {
        let result = find_best_move(&board, side, depth, 0);
        assert_eq!(result.best_move, Some(mv("c1", "b2")), "depth {}", depth);
        assert_eq!(result.score, MATE_SCORE - 4, "depth {}", depth);
    }

    let shallow = find_best_move(&board, side, 1, 0);
    assert_ne!(shallow.best_move, Some(mv("a1", "b2")));

    let boxed_in = apply(&board, &mv("a1", "b2"), side);
    assert!(evaluate_terminal(&boxed_in, Side::Black));
    let result = find_best_move(&boxed_in, Side::Black, 5, 0);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, MATE_SCORE);
    assert_eq!(result.depth, 0);
}

#[test]
fn losing_side_sees_a_negative_mate_score() {
    // Whatever Black does, White gets rid of its pieces first
    let (board, _) = Board::from_fen("W:Wa1,c1:Ba3").expect("valid position");
    let after = apply(&board, &mv("c1", "b2"), Side::White);
    let result = find_best_move(&after, Side::Black, 6, 0);

    assert!(result.score <= -MATE_THRESHOLD, "score {}", result.score);
    assert!(result.best_move.is_some_and(|m| m.is_capture()));
}

#[test]
fn forced_results_stay_put_on_deeper_searches() {
    // White to win by giving everything away, then Black on the losing end
    for fen in ["W:Wa1,c1:Ba3", "B:Wa1,b2:Ba3", "W:Wc3:Be5"] {
        let (board, side) = Board::from_fen(fen).expect("valid position");
        let warm = engine(10, false);

        let first = warm.search(&board, side);
        assert!(is_mate_score(first.score), "{} scored {}", fen, first.score);
        let proven_at = first.depth;

        // Same engine, so every later search starts from the table of the earlier ones
        for depth in proven_at + 1..=proven_at + 3 {
            let deeper = warm.search_to_depth(&board, side, depth);
            assert_eq!(deeper.best_move, first.best_move, "{} depth {}", fen, depth);
            assert_eq!(deeper.score, first.score, "{} depth {}", fen, depth);
            assert_eq!(deeper.depth, proven_at, "{} depth {}", fen, depth);
        }

        let cold = engine(proven_at + 3, false).search(&board, side);
        assert_eq!(cold.best_move, first.best_move, "{}", fen);
        assert_eq!(cold.score, first.score, "{}", fen);
    }
}

#[test]
fn sequential_and_parallel_root_agree() {
    let sequential = engine(5, false);
    let parallel = engine(5, true);

    for fen in POSITIONS {
        let (board, side) = Board::from_fen(fen).expect("valid position");
        sequential.clear_tt();
        parallel.clear_tt();

        let a = sequential.search(&board, side);
        let b = parallel.search(&board, side);
        assert_eq!(a.best_move, b.best_move, "{}", fen);
        assert_eq!(a.score, b.score, "{}", fen);
        assert_eq!(a.depth, b.depth, "{}", fen);
    }
}

#[test]
fn warm_table_does_not_change_the_move() {
    for parallel_root in [false, true] {
        let warm = engine(5, parallel_root);

        for fen in POSITIONS {
            let (board, side) = Board::from_fen(fen).expect("valid position");
            let cold = engine(5, parallel_root).search(&board, side);

            // Fill the table with a deeper search of the same position first
            warm.search_to_depth(&board, side, 7);

            let first = warm.search(&board, side);
            let second = warm.search(&board, side);
            assert_eq!(first.best_move, cold.best_move, "{}", fen);
            assert_eq!(second.best_move, cold.best_move, "{}", fen);
            assert_eq!(second.score, cold.score, "{}", fen);
        }
    }
}

#[test]
fn disabling_the_table_keeps_the_result() {
    let with_tt = engine(5, false);
    let without_tt = Engine::new(SearchConfig {
        use_tt: false,
        ..with_tt.config().clone()
    })
    .expect("valid config");

    for fen in POSITIONS {
        let (board, side) = Board::from_fen(fen).expect("valid position");
        let a = with_tt.search(&board, side);
        let b = without_tt.search(&board, side);
        assert_eq!(a.best_move, b.best_move, "{}", fen);
        assert_eq!(a.score, b.score, "{}", fen);
        assert!(without_tt.tt_stats().is_none());
    }
}

#[test]
fn tiny_time_limit_still_returns_a_legal_move() {
    for fen in POSITIONS {
        let (board, side) = Board::from_fen(fen).expect("valid position");
        let result = find_best_move(&board, side, 30, 1);

        let chosen = result.best_move.expect("position has moves");
        assert!(legal_moves(&board, side).contains(&chosen), "{}", fen);
        assert!(result.depth < 30);
    }
}

#[test]
fn engine_plays_legal_games_against_itself() {
    let engine = engine(3, true);
    let mut board = Board::new();
    let mut side = Side::White;

    for _ in 0..60 {
        let result = engine.search(&board, side);
        let Some(chosen) = result.best_move else {
            assert!(evaluate_terminal(&board, side));
            return;
        };
        assert!(legal_moves(&board, side).contains(&chosen));
        board = apply(&board, &chosen, side);
        side = !side;
    }
}
