use log::{debug, trace};

use crate::engine::Move;
use crate::grid::GameBoard;

use super::heuristic::{evaluate, SPAWN_DISTRIBUTION};
use super::{BranchEval, SearchConfig, SearchStats, LOSS, WIN};

/// Whose turn a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Turn {
    /// Pick a direction; maximizing.
    Player,
    /// Insert a tile into an empty cell; minimizing.
    Spawn,
}

/// Single-threaded alpha-beta search.
pub struct Minimax {
    cfg: SearchConfig,
    stats: SearchStats,
}

impl Minimax {
    pub fn new() -> Self { Self::with_config(SearchConfig::default()) }

    pub fn with_config(cfg: SearchConfig) -> Self { Self { cfg, stats: SearchStats::default() } }

    #[inline]
    pub fn config(&self) -> &SearchConfig { &self.cfg }

    /// Best direction for `board`, or `None` when no direction changes the
    /// board or none scores above zero.
    ///
    /// Ties go to the direction that comes first in [`Move::ALL`]. The board
    /// is only read; every hypothetical move happens on a clone.
    ///
    /// ```
    /// use ai_2048_minimax::engine::Board;
    /// use ai_2048_minimax::minimax::Minimax;
    /// let locked = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// assert_eq!(Minimax::new().recommend_move(&locked), None);
    /// ```
    pub fn recommend_move<B: GameBoard>(&mut self, board: &B) -> Option<Move> {
        let branches = self.branch_evals(board);
        let best = pick_best(&branches);
        debug!(
            "recommend {:?} at depth {} ({} nodes, {} cut-offs)",
            best,
            self.stats.depth,
            self.stats.nodes,
            self.stats.player_cutoffs + self.stats.spawn_cutoffs
        );
        best
    }

    /// Root score for every direction, in [`Move::ALL`] order.
    ///
    /// Each legal direction is searched with the full `(LOSS, WIN)` window, so
    /// its score is exact for the depth bound.
    pub fn branch_evals<B: GameBoard>(&mut self, board: &B) -> [BranchEval; 4] {
        let depth = self.cfg.depth_for(board);
        let mut stats = SearchStats { depth, ..Default::default() };
        let out = Move::ALL.map(|dir| root_branch(board, dir, depth, &self.cfg, &mut stats));
        self.record(stats);
        out
    }

    /// Depth bound `board` would be searched with.
    #[inline]
    pub fn search_depth<B: GameBoard>(&self, board: &B) -> u32 { self.cfg.depth_for(board) }

    /// Statistics collected from the last call to [`Self::recommend_move`]
    /// or [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn record(&mut self, mut stats: SearchStats) {
        stats.peak_nodes = self.stats.peak_nodes.max(stats.nodes);
        self.stats = stats;
    }
}

impl Default for Minimax { fn default() -> Self { Self::new() } }

/// Highest-scoring legal branch. Scores must beat a baseline of zero, and
/// ties keep the earlier branch.
pub(super) fn pick_best(branches: &[BranchEval]) -> Option<Move> {
    let mut best = None;
    let mut best_score = 0.0;
    for branch in branches.iter().filter(|b| b.legal) {
        if branch.score > best_score {
            best_score = branch.score;
            best = Some(branch.dir);
        }
    }
    best
}

/// Move `board` towards `dir` and search the spawn ply below it.
pub(super) fn root_branch<B: GameBoard>(
    board: &B,
    dir: Move,
    depth: u32,
    cfg: &SearchConfig,
    stats: &mut SearchStats,
) -> BranchEval {
    let mut next = board.clone();
    if !next.apply_move(dir) {
        return BranchEval::illegal(dir);
    }
    let score = ply_search(&next, Turn::Spawn, depth.saturating_sub(1), LOSS, WIN, cfg, stats);
    BranchEval { dir, score, legal: true }
}

/// Score of `board` with `depth` plies left, `turn` to act, inside the
/// `(alpha, beta)` window.
///
/// Depth 0 is a leaf whichever side is to act.
pub(super) fn ply_search<B: GameBoard>(
    board: &B,
    turn: Turn,
    depth: u32,
    alpha: f64,
    beta: f64,
    cfg: &SearchConfig,
    stats: &mut SearchStats,
) -> f64 {
    stats.nodes += 1;
    if depth == 0 {
        stats.leaves += 1;
        return evaluate(board) as f64;
    }
    match turn {
        Turn::Player => player_ply(board, depth, alpha, beta, cfg, stats),
        Turn::Spawn => spawn_ply(board, depth, alpha, beta, cfg, stats),
    }
}

fn player_ply<B: GameBoard>(
    board: &B,
    depth: u32,
    alpha: f64,
    beta: f64,
    cfg: &SearchConfig,
    stats: &mut SearchStats,
) -> f64 {
    let mut best = alpha;
    for dir in Move::ALL {
        let mut next = board.clone();
        if !next.apply_move(dir) {
            continue;
        }
        let (lo, hi) = if cfg.pruning { (best, beta) } else { (LOSS, WIN) };
        best = best.max(ply_search(&next, Turn::Spawn, depth - 1, lo, hi, cfg, stats));
        if cfg.pruning && best > beta {
            stats.player_cutoffs += 1;
            trace!("player turn cut-off {alpha} - {beta}");
            return beta;
        }
    }
    best
}

fn spawn_ply<B: GameBoard>(
    board: &B,
    depth: u32,
    alpha: f64,
    beta: f64,
    cfg: &SearchConfig,
    stats: &mut SearchStats,
) -> f64 {
    let vacant = board.vacant_points();
    // Nothing can spawn: the branch is worth no more than what the player already has.
    if vacant.is_empty() {
        return alpha;
    }
    let mut worst = beta;
    for &(value, _) in SPAWN_DISTRIBUTION.iter() {
        for &p in &vacant {
            if cfg.skip_isolated_spawns && board.smoothness(p, value) == 0 {
                stats.skipped_spawns += 1;
                continue;
            }
            let mut next = board.clone();
            next.set_cell(p, value);
            let (lo, hi) = if cfg.pruning { (alpha, worst) } else { (LOSS, WIN) };
            worst = worst.min(ply_search(&next, Turn::Player, depth - 1, lo, hi, cfg, stats));
            if cfg.pruning && alpha > worst {
                stats.spawn_cutoffs += 1;
                trace!("spawn turn cut-off {alpha} - {worst}");
                return alpha;
            }
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use crate::grid::Point;
    use rand::{rngs::StdRng, SeedableRng};

    const LOCKED: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    fn fixed(depth: u32, pruning: bool) -> Minimax {
        Minimax::with_config(SearchConfig { fixed_depth: Some(depth), pruning, ..Default::default() })
    }

    fn midgame() -> Vec<Board> {
        vec![
            Board::from_rows([[64, 32, 16, 4], [8, 16, 4, 2], [4, 2, 0, 0], [2, 0, 0, 0]]),
            Board::from_rows([[128, 64, 8, 2], [32, 16, 4, 0], [4, 2, 0, 0], [0, 2, 0, 0]]),
            Board::from_rows([[2, 0, 4, 0], [0, 8, 0, 2], [16, 0, 0, 4], [2, 32, 0, 0]]),
        ]
    }

    #[test]
    fn locked_board_yields_no_move() {
        let board = Board::from_rows(LOCKED);
        let mut search = Minimax::new();
        assert_eq!(search.recommend_move(&board), None);
        assert!(search.branch_evals(&board).iter().all(|b| !b.legal && b.score == LOSS));
    }

    #[test]
    fn lone_tile_moves_towards_a_corner() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut search = Minimax::new();
        assert_eq!(search.search_depth(&board), 4);
        let branches = search.branch_evals(&board);
        assert_eq!(branches.map(|b| b.legal), [false, false, true, true]);
        // Down and Right mirror each other, so they tie and Down comes first.
        assert_eq!(branches[2].score, branches[3].score);
        assert_eq!(search.recommend_move(&board), Some(Move::Down));
    }

    #[test]
    fn never_recommends_a_no_op() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut search = fixed(2, true);
        let mut board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
        for _ in 0..80 {
            match search.recommend_move(&board) {
                Some(dir) => {
                    assert_ne!(board.shift(dir), board, "{board:?} {dir:?}");
                    board = board.make_move(dir, &mut rng);
                }
                None => break,
            }
        }
    }

    #[test]
    fn pruning_matches_exhaustive_search() {
        for depth in [2, 3, 4] {
            for board in midgame() {
                let mut pruned = fixed(depth, true);
                let mut exhaustive = fixed(depth, false);
                assert_eq!(pruned.branch_evals(&board), exhaustive.branch_evals(&board), "depth {depth}");
                assert_eq!(pruned.recommend_move(&board), exhaustive.recommend_move(&board));
                assert!(pruned.last_stats().nodes <= exhaustive.last_stats().nodes);
                assert_eq!(exhaustive.last_stats().player_cutoffs + exhaustive.last_stats().spawn_cutoffs, 0);
            }
        }
    }

    #[test]
    fn pruning_skips_nodes() {
        let board = midgame()[0];
        let mut pruned = fixed(4, true);
        let mut exhaustive = fixed(4, false);
        pruned.recommend_move(&board);
        exhaustive.recommend_move(&board);
        let (p, e) = (pruned.last_stats(), exhaustive.last_stats());
        assert!(p.spawn_cutoffs + p.player_cutoffs > 0);
        assert!(p.nodes < e.nodes);
    }

    #[test]
    fn full_spawn_node_returns_alpha() {
        let board = Board::from_rows(LOCKED);
        for pruning in [true, false] {
            let cfg = SearchConfig { pruning, ..Default::default() };
            let mut stats = SearchStats::default();
            assert_eq!(ply_search(&board, Turn::Spawn, 3, 123.0, 456.0, &cfg, &mut stats), 123.0);
            assert_eq!(stats.leaves, 0);
        }
    }

    #[test]
    fn stuck_player_node_returns_alpha() {
        let board = Board::from_rows(LOCKED);
        let cfg = SearchConfig::default();
        let mut stats = SearchStats::default();
        assert_eq!(ply_search(&board, Turn::Player, 2, 7.0, 9.0, &cfg, &mut stats), 7.0);
    }

    #[test]
    fn depth_zero_scores_the_moved_board() {
        let board = midgame()[1];
        let branches = fixed(0, true).branch_evals(&board);
        for branch in branches {
            let moved = board.shift(branch.dir);
            if branch.legal {
                assert_eq!(branch.score, evaluate(&moved) as f64);
            } else {
                assert_eq!(moved, board);
            }
        }
    }

    #[test]
    fn isolated_spawns_are_skipped() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut stats = SearchStats::default();
        let cfg = SearchConfig::default();
        ply_search(&board, Turn::Spawn, 1, LOSS, WIN, &cfg, &mut stats);
        // Only (0, 1) and (1, 0) touch the tile, for both spawn values.
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.skipped_spawns, 2 * 13);

        let cfg = SearchConfig { skip_isolated_spawns: false, ..Default::default() };
        let mut stats = SearchStats::default();
        ply_search(&board, Turn::Spawn, 1, LOSS, WIN, &cfg, &mut stats);
        assert_eq!(stats.leaves, 2 * 15);
    }

    #[test]
    fn spawn_ply_takes_the_minimum() {
        let mut board = Board::EMPTY;
        board.set_cell(Point::new(0, 0), 8);
        let cfg = SearchConfig::default();
        let mut stats = SearchStats::default();
        let score = ply_search(&board, Turn::Spawn, 1, LOSS, WIN, &cfg, &mut stats);
        let expected = [(Point::new(0, 1), 2), (Point::new(1, 0), 2), (Point::new(0, 1), 4), (Point::new(1, 0), 4)]
            .into_iter()
            .map(|(p, v)| {
                let mut b = board;
                b.set_cell(p, v);
                evaluate(&b)
            })
            .min()
            .unwrap();
        assert_eq!(score, expected as f64);
    }

    #[test]
    fn no_safe_move_yields_none() {
        // Left and Right both merge the 32s, and every spawn after either locks the board.
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [128, 256, 128, 256], [8, 16, 32, 32]]);
        let mut search = Minimax::new();
        let branches = search.branch_evals(&board);
        assert_eq!(branches.map(|b| b.legal), [false, true, false, true]);
        assert!(branches.iter().all(|b| b.score == LOSS));
        assert_eq!(search.recommend_move(&board), None);
    }

    #[test]
    fn stats_track_peak() {
        let mut search = fixed(3, true);
        let boards = midgame();
        search.recommend_move(&boards[0]);
        let first = search.last_stats();
        assert_eq!(first.depth, 3);
        assert_eq!(first.peak_nodes, first.nodes);
        search.recommend_move(&Board::from_rows(LOCKED));
        assert_eq!(search.last_stats().nodes, 0);
        assert_eq!(search.last_stats().peak_nodes, first.nodes);
        search.reset_stats();
        assert_eq!(search.last_stats(), SearchStats::default());
    }
}
