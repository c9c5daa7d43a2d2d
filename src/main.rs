use ai_2048_minimax::engine::{self as GameEngine, Board, Move};
use ai_2048_minimax::minimax::{BranchEval, Minimax, MinimaxParallel, SearchConfig, SearchStats};
use ai_2048_minimax::policy;
use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level).context("failed to install logger")?;
    GameEngine::new();

    let cfg = args.search.to_config();
    match args.cmd.unwrap_or(Cmd::Play { seed: None, max_moves: None, quiet: false }) {
        Cmd::Recommend { board } => recommend(&board, cfg, args.search.parallel),
        Cmd::Play { seed, max_moves, quiet } => {
            play(cfg, args.search.parallel, seed, max_moves, quiet);
            Ok(())
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ai-2048-minimax", about = "Alpha-beta minimax move recommender for 2048")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Cmd>,

    #[command(flatten)]
    search: SearchArgs,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::Level,
}

#[derive(Debug, ClapArgs)]
struct SearchArgs {
    /// Always search this deep instead of following the max-tile policy
    #[arg(long, global = true)]
    depth: Option<u32>,

    /// Upper bound on the max-tile depth policy
    #[arg(long, global = true)]
    depth_cap: Option<u32>,

    /// Disable alpha-beta cut-offs (exhaustive minimax, same answers, slower)
    #[arg(long, global = true)]
    no_pruning: bool,

    /// Also search spawns into cells with no occupied neighbour
    #[arg(long, global = true)]
    keep_isolated_spawns: bool,

    /// Explore the four root moves in parallel
    #[arg(long, global = true)]
    parallel: bool,
}

impl SearchArgs {
    fn to_config(&self) -> SearchConfig {
        SearchConfig {
            depth_cap: self.depth_cap,
            fixed_depth: self.depth,
            pruning: !self.no_pruning,
            skip_isolated_spawns: !self.keep_isolated_spawns,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Recommend a move for one board
    Recommend {
        /// 16 tile values, row-major, separated by spaces, commas or '/' (0 = empty)
        #[arg(long)]
        board: String,
    },
    /// Self-play a game from two random tiles (the default)
    Play {
        /// Seed for tile spawns and fallback picks
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long)]
        max_moves: Option<u64>,
        /// Only print the summary
        #[arg(long)]
        quiet: bool,
    },
}

/// One searcher type for the driver, whichever variant was asked for.
enum Searcher {
    Seq(Minimax),
    Par(MinimaxParallel),
}

impl Searcher {
    fn new(cfg: SearchConfig, parallel: bool) -> Self {
        if parallel { Searcher::Par(MinimaxParallel::with_config(cfg)) } else { Searcher::Seq(Minimax::with_config(cfg)) }
    }

    fn recommend_move(&mut self, board: &Board) -> Option<Move> {
        match self {
            Searcher::Seq(s) => s.recommend_move(board),
            Searcher::Par(s) => s.recommend_move(board),
        }
    }

    fn branch_evals(&mut self, board: &Board) -> [BranchEval; 4] {
        match self {
            Searcher::Seq(s) => s.branch_evals(board),
            Searcher::Par(s) => s.branch_evals(board),
        }
    }

    fn last_stats(&self) -> SearchStats {
        match self {
            Searcher::Seq(s) => s.last_stats(),
            Searcher::Par(s) => s.last_stats(),
        }
    }
}

fn recommend(board: &str, cfg: SearchConfig, parallel: bool) -> anyhow::Result<()> {
    let board: Board = board.parse().context("invalid --board")?;
    let mut searcher = Searcher::new(cfg, parallel);
    println!("{}", board);
    for branch in searcher.branch_evals(&board) {
        let dir = format!("{:?}", branch.dir);
        if branch.legal {
            println!("{:>5}: {}", dir, branch.score);
        } else {
            println!("{:>5}: no change", dir);
        }
    }
    let stats = searcher.last_stats();
    match searcher.recommend_move(&board) {
        Some(dir) => println!("Recommended: {:?}", dir),
        None => match policy::legal_moves(&board).as_slice() {
            [] => println!("Recommended: none (game over)"),
            legal => println!("Recommended: none, fall back to one of {:?}", legal),
        },
    }
    println!("Depth: {}, nodes: {}, cut-offs: {}", stats.depth, stats.nodes, stats.player_cutoffs + stats.spawn_cutoffs);
    Ok(())
}

fn play(cfg: SearchConfig, parallel: bool, seed: Option<u64>, max_moves: Option<u64>, quiet: bool) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut searcher = Searcher::new(cfg, parallel);
    let mut board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    if !quiet {
        println!("{}", board);
    }

    let start = Instant::now();
    let mut move_count: u64 = 0;
    let mut fallbacks: u64 = 0;
    let mut total_nodes: u64 = 0;
    while max_moves.map_or(true, |limit| move_count < limit) {
        let recommended = searcher.recommend_move(&board);
        total_nodes = total_nodes.saturating_add(searcher.last_stats().nodes);
        let dir = match recommended {
            Some(dir) => dir,
            None => {
                let Some(dir) = policy::fallback_move(&board, &mut rng) else { break };
                fallbacks += 1;
                dir
            }
        };
        board = board.make_move(dir, &mut rng);
        move_count += 1;
        if !quiet {
            println!("{:?}\n{}", dir, board);
        }
    }

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    println!(
        "Moves: {} | score: {} | highest tile: {} | fallbacks: {} | nodes: {} (peak {}) | moves/sec: {:.1}",
        move_count,
        board.score(),
        board.highest_tile(),
        fallbacks,
        total_nodes,
        searcher.last_stats().peak_nodes,
        move_count as f64 / elapsed
    );
}
