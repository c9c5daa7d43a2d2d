use log::debug;
use rayon::prelude::*;

use crate::engine::Move;
use crate::grid::GameBoard;

use super::search_seq::{pick_best, root_branch};
use super::{BranchEval, SearchConfig, SearchStats};

/// Alpha-beta search with the four root moves explored on the rayon pool.
///
/// Every root move gets its own clone and its own window, so the subtrees
/// share nothing and the result matches [`super::Minimax`] exactly.
pub struct MinimaxParallel {
    cfg: SearchConfig,
    stats: SearchStats,
}

impl MinimaxParallel {
    pub fn new() -> Self { Self::with_config(SearchConfig::default()) }

    pub fn with_config(cfg: SearchConfig) -> Self { Self { cfg, stats: SearchStats::default() } }

    #[inline]
    pub fn config(&self) -> &SearchConfig { &self.cfg }

    /// Best direction for `board`; same contract as [`super::Minimax::recommend_move`].
    ///
    /// ```
    /// use ai_2048_minimax::engine::Board;
    /// use ai_2048_minimax::minimax::{Minimax, MinimaxParallel};
    /// let b = Board::from_rows([[4, 2, 0, 0], [2, 0, 0, 0], [0; 4], [0; 4]]);
    /// let mut par = MinimaxParallel::new();
    /// assert_eq!(par.recommend_move(&b), Minimax::new().recommend_move(&b));
    /// ```
    pub fn recommend_move<B: GameBoard + Sync>(&mut self, board: &B) -> Option<Move> {
        let branches = self.branch_evals(board);
        let best = pick_best(&branches);
        debug!("recommend {:?} at depth {} ({} nodes, parallel)", best, self.stats.depth, self.stats.nodes);
        best
    }

    /// Root score for every direction, in [`Move::ALL`] order.
    pub fn branch_evals<B: GameBoard + Sync>(&mut self, board: &B) -> [BranchEval; 4] {
        let depth = self.cfg.depth_for(board);
        let cfg = &self.cfg;
        let results: Vec<(BranchEval, SearchStats)> = Move::ALL
            .par_iter()
            .map(|&dir| {
                let mut stats = SearchStats::default();
                let eval = root_branch(board, dir, depth, cfg, &mut stats);
                (eval, stats)
            })
            .collect();

        let mut stats = SearchStats { depth, ..Default::default() };
        let mut out = Move::ALL.map(BranchEval::illegal);
        for (slot, (eval, branch_stats)) in out.iter_mut().zip(results) {
            *slot = eval;
            stats.absorb(&branch_stats);
        }
        stats.peak_nodes = self.stats.peak_nodes.max(stats.nodes);
        self.stats = stats;
        out
    }

    /// Statistics summed over the four subtrees of the last search.
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl Default for MinimaxParallel { fn default() -> Self { Self::new() } }
