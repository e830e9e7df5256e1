use crate::core::*;
use crate::engine::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable};
use crate::error::ConfigError;
use crate::moves::{has_legal_moves, legal_moves_with};
use crate::search::evaluation::*;
use crate::search::move_ordering::order_moves;
use crate::search::parallel_search;
use crate::search::{format_pv, SearchConfig, SearchResult, MAX_DEPTH};
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Nodes between two looks at the clock.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Root move index, score and principal variation of one completed root search.
pub(crate) type RootOutcome = (usize, i32, Vec<Move>);

/// Estado partilhado por todas as threads de uma busca.
pub(crate) struct SearchContext<'a> {
    pub rules: Rules,
    tt: Option<&'a TranspositionTable>,
    nodes: CachePadded<AtomicU64>,
    stop: CachePadded<AtomicBool>,
    deadline: Option<Instant>,
}

impl<'a> SearchContext<'a> {
    pub fn new(rules: Rules, tt: Option<&'a TranspositionTable>, start: Instant, max_time: Option<Duration>) -> Self {
        SearchContext {
            rules,
            tt,
            nodes: CachePadded::new(AtomicU64::new(0)),
            stop: CachePadded::new(AtomicBool::new(false)),
            deadline: max_time.map(|limit| start + limit),
        }
    }

    #[inline(always)]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Raises the stop flag once the deadline has passed.
    pub fn out_of_time(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stop.store(true, Ordering::Relaxed);
            }
        }
        self.stopped()
    }

    /// Counts a node; polls the clock every TIME_CHECK_INTERVAL nodes.
    #[inline(always)]
    fn tick(&self) -> bool {
        let nodes = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
        if nodes % TIME_CHECK_INTERVAL == 0 {
            return self.out_of_time();
        }
        self.stopped()
    }

    /// Negamax fail-soft. The score is from `side`'s point of view; a side
    /// with no legal move has won. Once the stop flag is up the returned
    /// value is meaningless and must be discarded by the caller.
    pub fn negamax(&self, board: &Board, side: Side, depth: u8, ply: i32, mut alpha: i32, beta: i32) -> (i32, Vec<Move>) {
        if self.tick() {
            return (0, Vec::new());
        }

        if depth == 0 {
            if !has_legal_moves(board, side, &self.rules) {
                return (mate_in(ply), Vec::new());
            }
            return (evaluate(board, side), Vec::new());
        }

        let original_alpha = alpha;
        let hash = self.tt.map(|_| board.hash(side, &self.rules));

        // ========== TT PROBE ==========
        let mut tt_move = None;
        if let (Some(tt), Some(hash)) = (self.tt, hash) {
            if let Some(entry) = tt.probe(hash) {
                tt_move = entry.best_move;
                // Cutoffs only at exactly this depth; deeper entries just order moves.
                if entry.depth == depth {
                    let score = score_from_tt(entry.score, ply);
                    let cutoff = match entry.bound {
                        Bound::Exact => true,
                        Bound::Lower => score >= beta,
                        Bound::Upper => score <= alpha,
                    };
                    if cutoff {
                        return (score, Vec::new());
                    }
                }
            }
        }

        let mut moves = legal_moves_with(board, side, &self.rules);
        if moves.is_empty() {
            return (mate_in(ply), Vec::new());
        }
        order_moves(board, side, &mut moves, tt_move);

        let mut best_score = -INFINITY;
        let mut best_move: Option<Move> = None;
        let mut best_pv = Vec::new();

        for mv in &moves {
            let child = board.apply(mv, side);
            let (score, mut pv_line) = self.negamax(&child, !side, depth - 1, ply + 1, -beta, -alpha);
            let score = -score; // Negamax: sempre nega o score do filho

            if self.stopped() {
                return (alpha, Vec::new());
            }

            if score > best_score {
                best_score = score;
                best_move = Some(*mv);
                best_pv = vec![*mv];
                best_pv.append(&mut pv_line);
            }

            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        // ========== TT STORE ==========
        if let (Some(tt), Some(hash)) = (self.tt, hash) {
            let bound = if best_score <= original_alpha {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            let hint = best_move.map(|mv| (mv.from_square(), mv.to_square()));
            tt.store(hash, depth, score_to_tt(best_score, ply), bound, hint);
        }

        (best_score, best_pv)
    }

    /// Alpha-beta over the root moves in the given order. The first move
    /// with the highest score wins; None if the clock ran out.
    pub fn search_root_sequential(&self, board: &Board, side: Side, moves: &[Move], depth: u8) -> Option<RootOutcome> {
        let mut alpha = -INFINITY;
        let mut best: Option<RootOutcome> = None;

        for (index, mv) in moves.iter().enumerate() {
            let child = board.apply(mv, side);
            let (score, pv_line) = self.negamax(&child, !side, depth - 1, 1, -INFINITY, -alpha);
            let score = -score;

            if self.stopped() {
                return None;
            }

            if best.as_ref().map_or(true, |(_, best_score, _)| score > *best_score) {
                let mut line = Vec::with_capacity(pv_line.len() + 1);
                line.push(*mv);
                line.extend(pv_line);
                best = Some((index, score, line));
            }
            alpha = alpha.max(score);
        }

        best
    }
}

/// Motor Alpha-Beta com TT lock-free e paralelismo opcional na raiz.
///
/// The table survives between calls to [`AlphaBetaEngine::search`]; it only
/// speeds the search up and never changes the chosen move.
pub struct AlphaBetaEngine {
    config: SearchConfig,
    tt: Option<TranspositionTable>,
    pool: Option<rayon::ThreadPool>,
}

impl AlphaBetaEngine {
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Builds without validation; `config` must already be valid.
    pub(crate) fn build(config: SearchConfig) -> Self {
        let tt = config.use_tt.then(|| TranspositionTable::new(config.tt_size_mb));
        let pool = if config.parallel_root && config.threads > 1 {
            parallel_search::build_pool(config.threads)
        } else {
            None
        };
        AlphaBetaEngine { config, tt, pool }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// True when root moves are searched on the rayon pool.
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    pub fn clear_tt(&self) {
        if let Some(tt) = &self.tt {
            tt.clear();
        }
    }

    /// (hits, misses) of the transposition table, if one is in use.
    pub fn tt_stats(&self) -> Option<(u64, u64)> {
        self.tt.as_ref().map(TranspositionTable::get_stats)
    }

    /// Iterative deepening up to `config.max_depth` within `config.max_time`.
    pub fn search(&self, board: &Board, side: Side) -> SearchResult {
        self.search_to_depth(board, side, self.config.max_depth)
    }

    /// Same as [`AlphaBetaEngine::search`] with a one-off depth limit (clamped to 1..=MAX_DEPTH).
    pub fn search_to_depth(&self, board: &Board, side: Side, max_depth: u8) -> SearchResult {
        self.search_from(board, side, max_depth, self.config.max_time, Instant::now())
    }

    /// Iterative deepening whose clock started at `start`, which may be
    /// earlier than the call; `max_time` counts from `start`.
    pub(crate) fn search_from(
        &self,
        board: &Board,
        side: Side,
        max_depth: u8,
        max_time: Option<Duration>,
        start: Instant,
    ) -> SearchResult {
        let max_depth = max_depth.clamp(1, MAX_DEPTH);
        let rules = self.config.rules;

        let mut root_moves = legal_moves_with(board, side, &rules);
        if root_moves.is_empty() {
            info!(%side, "no legal moves, the side to move has already won");
            return SearchResult {
                best_move: None,
                score: MATE_SCORE,
                depth: 0,
                nodes_searched: 0,
                time_elapsed: start.elapsed(),
                pv_line: Vec::new(),
            };
        }

        // Lance forçado: com relógio não vale a pena buscar
        if root_moves.len() == 1 && max_time.is_some() {
            let forced = root_moves[0];
            debug!(%side, mv = %forced, "single legal move, not searching");
            return SearchResult {
                best_move: Some(forced),
                score: evaluate(board, side),
                depth: 0,
                nodes_searched: 0,
                time_elapsed: start.elapsed(),
                pv_line: vec![forced],
            };
        }

        if let Some(tt) = &self.tt {
            tt.new_search();
        }
        let ctx = SearchContext::new(rules, self.tt.as_ref(), start, max_time);
        order_moves(board, side, &mut root_moves, None);

        // Fallback if not even depth 1 completes in time.
        let mut result = SearchResult {
            best_move: Some(root_moves[0]),
            score: evaluate(board, side),
            depth: 0,
            nodes_searched: 0,
            time_elapsed: Duration::ZERO,
            pv_line: vec![root_moves[0]],
        };

        // Busca iterativa por profundidade
        for depth in 1..=max_depth {
            if ctx.out_of_time() {
                break;
            }

            let outcome = match &self.pool {
                Some(pool) => parallel_search::search_root_parallel(&ctx, pool, board, side, &root_moves, depth),
                None => ctx.search_root_sequential(board, side, &root_moves, depth),
            };
            let Some((index, score, pv_line)) = outcome else {
                debug!(depth, completed = result.depth, "iteration interrupted by the clock");
                break;
            };

            // Melhor lance da iteração anterior vai primeiro
            let best = root_moves.remove(index);
            root_moves.insert(0, best);

            result = SearchResult {
                best_move: Some(best),
                score,
                depth,
                nodes_searched: ctx.nodes(),
                time_elapsed: start.elapsed(),
                pv_line,
            };
            debug!(
                depth,
                score,
                nodes = result.nodes_searched,
                nps = result.nps(),
                pv = %format_pv(&result.pv_line),
                "iteration complete"
            );

            // Se encontrou vitória/derrota forçada, para a busca
            if is_mate_score(score) {
                break;
            }
        }

        result.nodes_searched = ctx.nodes();
        result.time_elapsed = start.elapsed();
        info!(
            %side,
            best_move = %result.best_move.map(|mv| mv.to_string()).unwrap_or_default(),
            score = result.score,
            depth = result.depth,
            nodes = result.nodes_searched,
            time_ms = result.time_elapsed.as_millis() as u64,
            tt_hit_rate = self.tt.as_ref().map_or(0.0, TranspositionTable::hit_rate),
            "search finished"
        );
        result
    }
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::build(SearchConfig::default())
    }
}
