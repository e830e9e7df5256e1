// Orçamento de tempo de `find_best_move` medido de fora, com o relógio de parede.
// Kept in its own test binary so no other search competes for the pool.
use giveaway::*;
use std::time::{Duration, Instant};

const LIMIT_MS: u64 = 40;
const SLACK: Duration = Duration::from_millis(250);

#[test]
fn find_best_move_stays_within_its_wall_clock_budget() {
    let limit = Duration::from_millis(LIMIT_MS);
    let positions = [
        Board::new(),
        Board::from_fen("W:Wa1,c1,e1,b2,f2,c3,g3,d4:Bd6,f6,h6,a7,c7,g7,b8,Kh4")
            .expect("valid position")
            .0,
    ];

    // The first call also pays for building the shared table and pool
    for board in positions.iter().chain(positions.iter()) {
        let before = Instant::now();
        let result = find_best_move(board, Side::White, 64, LIMIT_MS);
        let wall = before.elapsed();

        assert!(result.best_move.is_some());
        assert!(wall < limit + SLACK, "took {:?}", wall);
        assert!(result.time_elapsed <= wall, "reported {:?}, took {:?}", result.time_elapsed, wall);
        assert!(result.depth < 64);
    }
}
