// Linha de comando do motor: análise, perft e partidas motor contra motor.
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use giveaway::engine::{perft_cached, perft_divide};
use giveaway::search::format_pv;
use giveaway::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "giveaway", version, about = "Giveaway checkers (poddavki) engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a position and print the best move
    Analyze {
        /// Position as `W:Wa1,c3,Kd4:Bf6,Kh8`; defaults to the start position
        #[arg(long)]
        fen: Option<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Count move sequences to a fixed depth
    Perft {
        #[arg(long)]
        fen: Option<String>,
        #[arg(short, long, default_value_t = 6)]
        depth: u8,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
        #[command(flatten)]
        rules: RulesArgs,
    },
    /// Let the engine play both sides
    Selfplay {
        #[arg(long)]
        fen: Option<String>,
        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(short, long, default_value_t = 10)]
    depth: u8,
    /// Time limit per move in milliseconds (0 = none)
    #[arg(short, long, default_value_t = 0)]
    time_ms: u64,
    /// Root search threads (default: number of CPUs, at most 16)
    #[arg(long)]
    threads: Option<usize>,
    /// Transposition table size in MB
    #[arg(long, default_value_t = 64)]
    tt_mb: usize,
    #[arg(long)]
    no_tt: bool,
    /// Search root moves one after another
    #[arg(long)]
    sequential: bool,
    #[command(flatten)]
    rules: RulesArgs,
}

#[derive(Args)]
struct RulesArgs {
    #[arg(long, value_enum, default_value_t = Variant::Russian)]
    variant: Variant,
    /// Crown a man only if its move ends on the far rank
    #[arg(long)]
    promote_at_end: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Flying kings, men capture backwards
    Russian,
    /// Short kings, men capture forwards only
    Short,
}

impl RulesArgs {
    fn rules(&self) -> Rules {
        let mut rules = match self.variant {
            Variant::Russian => Rules::default(),
            Variant::Short => Rules {
                flying_kings: false,
                men_capture_backward: false,
                ..Rules::default()
            },
        };
        if self.promote_at_end {
            rules.promotion = PromotionPolicy::EndOfMove;
        }
        rules
    }
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            max_depth: self.depth,
            max_time: (self.time_ms > 0).then(|| Duration::from_millis(self.time_ms)),
            threads: self.threads.unwrap_or(defaults.threads),
            tt_size_mb: self.tt_mb,
            use_tt: !self.no_tt,
            parallel_root: !self.sequential,
            rules: self.rules.rules(),
        }
    }
}

fn load_position(fen: Option<&str>) -> Result<(Board, Side)> {
    match fen {
        Some(text) => Board::from_fen(text).with_context(|| format!("invalid position {:?}", text)),
        None => Ok((Board::new(), Side::White)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Analyze { fen, search } => analyze(fen.as_deref(), &search),
        Command::Perft {
            fen,
            depth,
            divide,
            rules,
        } => run_perft(fen.as_deref(), depth, divide, &rules.rules()),
        Command::Selfplay { fen, max_plies, search } => selfplay(fen.as_deref(), max_plies, &search),
    }
}

fn analyze(fen: Option<&str>, args: &SearchArgs) -> Result<()> {
    let (board, side) = load_position(fen)?;
    let engine = Engine::new(args.config()).context("invalid search configuration")?;
    tracing::debug!(parallel = engine.is_parallel(), threads = engine.config().threads, "engine ready");

    println!("{}", board);
    println!("{} to move", side);

    let result = engine.search(&board, side);
    match result.best_move {
        Some(mv) => println!("bestmove {}", mv),
        None => println!("bestmove none ({} has no moves and wins)", side),
    }
    println!(
        "score {} depth {} nodes {} nps {} time {}ms",
        result.score,
        result.depth,
        result.nodes_searched,
        result.nps(),
        result.time_elapsed.as_millis()
    );
    if !result.pv_line.is_empty() {
        println!("pv {}", format_pv(&result.pv_line));
    }
    if let Some((hits, misses)) = engine.tt_stats() {
        println!("tt hits {} misses {}", hits, misses);
    }
    Ok(())
}

fn run_perft(fen: Option<&str>, depth: u8, divide: bool, rules: &Rules) -> Result<()> {
    let (board, side) = load_position(fen)?;
    let start = Instant::now();

    let total = if divide {
        let mut total = 0;
        for (mv, nodes) in perft_divide(&board, side, depth, rules) {
            println!("{}: {}", mv, nodes);
            total += nodes;
        }
        total
    } else {
        perft_cached(&board, side, depth, rules)
    };

    println!("perft({}) = {} in {:.3}s", depth, total, start.elapsed().as_secs_f64());
    Ok(())
}

fn selfplay(fen: Option<&str>, max_plies: usize, args: &SearchArgs) -> Result<()> {
    let (mut board, mut side) = load_position(fen)?;
    let config = args.config();
    let rules = config.rules;
    let engine = Engine::new(config).context("invalid search configuration")?;

    for ply in 1..=max_plies {
        let result = engine.search(&board, side);
        let Some(mv) = result.best_move else {
            println!("{}", board);
            println!("{} has no moves left and wins after {} plies", side, ply - 1);
            return Ok(());
        };
        if !legal_moves_with(&board, side, &rules).contains(&mv) {
            bail!("engine produced an illegal move {} in {}", mv, board.to_fen(side));
        }

        println!("{:>3}. {} {} (score {}, depth {})", ply, side, mv, result.score, result.depth);
        board = apply(&board, &mv, side);
        side = !side;
    }

    println!("{}", board);
    println!("stopped after {} plies: {}", max_plies, board.to_fen(side));
    Ok(())
}
