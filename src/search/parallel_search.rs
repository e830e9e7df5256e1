// Paralelismo na raiz: uma tarefa rayon por lance, cada uma sobre a sua
// própria cópia do tabuleiro. Only the table, node counter and stop flag
// are shared, all atomics.

use crate::core::*;
use crate::search::alpha_beta::{RootOutcome, SearchContext};
use crate::search::evaluation::INFINITY;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

/// Pool for root searches, or None (sequential search) if the OS refuses threads.
pub(crate) fn build_pool(threads: usize) -> Option<ThreadPool> {
    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("giveaway-search-{}", i))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(%err, threads, "could not build the search thread pool, searching sequentially");
            None
        }
    }
}

/// Searches every root move with a full window on `pool` and reduces to the
/// highest score, earliest move on ties. None if the clock ran out.
pub(crate) fn search_root_parallel(
    ctx: &SearchContext,
    pool: &ThreadPool,
    board: &Board,
    side: Side,
    moves: &[Move],
    depth: u8,
) -> Option<RootOutcome> {
    let results: Vec<(i32, Vec<Move>)> = pool.install(|| {
        moves
            .par_iter()
            .map(|mv| {
                let child = board.apply(mv, side);
                let (score, pv_line) = ctx.negamax(&child, !side, depth - 1, 1, -INFINITY, INFINITY);

                let mut line = Vec::with_capacity(pv_line.len() + 1);
                line.push(*mv);
                line.extend(pv_line);
                (-score, line) // Nega o score do filho
            })
            .collect()
    });

    if ctx.stopped() {
        return None;
    }

    let mut best: Option<RootOutcome> = None;
    for (index, (score, line)) in results.into_iter().enumerate() {
        if best.as_ref().map_or(true, |(_, best_score, _)| score > *best_score) {
            best = Some((index, score, line));
        }
    }
    best
}
