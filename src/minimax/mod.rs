//! Alpha-beta minimax move search for 2048.
//!
//! The tree alternates two kinds of ply: the player picks one of four
//! directions (maximizing), then a spawn drops a 2 or a 4 into an empty cell
//! (minimizing). Leaves are scored by the template heuristic in [`heuristic`]
//! and the depth bound grows with the largest tile (see [`depth_for_max_tile`]).
//!
//! Two searchers share the same surface:
//! - [`Minimax`]: single-threaded.
//! - [`MinimaxParallel`]: explores the four root moves on the rayon pool.
//!
//! Both are deterministic. They return `None` when no move scores above
//! zero; pair them with [`crate::policy::next_move`] to always get a move on a
//! board that can still change.
//!
//! Quick start
//! ```
//! use ai_2048_minimax::engine::{Board, Move};
//! use ai_2048_minimax::minimax::Minimax;
//!
//! let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut search = Minimax::new();
//! let m = search.recommend_move(&board);
//! assert!(matches!(m, Some(Move::Down) | Some(Move::Right)));
//! ```

use crate::engine::Move;

mod depth;
pub mod heuristic;
mod search_par;
mod search_seq;

pub use depth::{depth_for_max_tile, BASE_DEPTH};
pub use heuristic::{evaluate, template_scores, SPAWN_DISTRIBUTION, TEMPLATES};
pub use search_par::MinimaxParallel;
pub use search_seq::Minimax;

/// Score of a branch that cannot continue. Also the root's initial alpha.
pub const LOSS: f64 = f64::NEG_INFINITY;
/// Root's initial beta.
pub const WIN: f64 = f64::INFINITY;

/// Configurable knobs for the search. Defaults play the standard policy.
///
/// - `depth_cap`: optional upper bound on the max-tile depth policy.
/// - `fixed_depth`: ignore the policy and always search this deep.
/// - `pruning`: alpha-beta cut-offs. Disabling them runs the exhaustive
///   minimax, which scores every branch identically but visits more nodes.
/// - `skip_isolated_spawns`: skip spawns into cells with no occupied neighbour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub depth_cap: Option<u32>,
    pub fixed_depth: Option<u32>,
    pub pruning: bool,
    pub skip_isolated_spawns: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { depth_cap: None, fixed_depth: None, pruning: true, skip_isolated_spawns: true }
    }
}

/// Root score for one direction.
///
/// `legal` is false when the move leaves the board unchanged; such branches
/// are never searched and carry a score of [`LOSS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub score: f64,
    pub legal: bool,
}

impl BranchEval {
    fn illegal(dir: Move) -> Self { BranchEval { dir, score: LOSS, legal: false } }
}

/// Counters for the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Depth bound the search ran with.
    pub depth: u32,
    /// Nodes visited, leaves included.
    pub nodes: u64,
    /// Leaves scored by the heuristic.
    pub leaves: u64,
    pub player_cutoffs: u64,
    pub spawn_cutoffs: u64,
    /// Spawn branches skipped for lack of an occupied neighbour.
    pub skipped_spawns: u64,
    /// Largest `nodes` seen since the last reset.
    pub peak_nodes: u64,
}

impl SearchStats {
    fn absorb(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.player_cutoffs += other.player_cutoffs;
        self.spawn_cutoffs += other.spawn_cutoffs;
        self.skipped_spawns += other.skipped_spawns;
    }
}
