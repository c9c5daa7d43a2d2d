use crate::grid::GameBoard;

use super::SearchConfig;

/// Depth used until the board reaches 1024.
pub const BASE_DEPTH: u32 = 4;

/// Search depth for a board whose largest tile is `max_tile`.
///
/// Larger tiles mean fewer safe moves, so late positions get a deeper look.
///
/// ```
/// use ai_2048_minimax::minimax::depth_for_max_tile;
/// assert_eq!(depth_for_max_tile(512), 4);
/// assert_eq!(depth_for_max_tile(1024), 5);
/// assert_eq!(depth_for_max_tile(4096), 6);
/// ```
pub fn depth_for_max_tile(max_tile: u32) -> u32 {
    match max_tile {
        t if t >= 2048 => BASE_DEPTH + 2,
        t if t >= 1024 => BASE_DEPTH + 1,
        _ => BASE_DEPTH,
    }
}

impl SearchConfig {
    /// Depth bound for `board`: `fixed_depth` when set, otherwise the
    /// max-tile policy clamped to `depth_cap`.
    pub fn depth_for<B: GameBoard>(&self, board: &B) -> u32 {
        if let Some(depth) = self.fixed_depth {
            return depth;
        }
        let depth = depth_for_max_tile(board.max_tile());
        match self.depth_cap {
            Some(cap) => depth.min(cap),
            None => depth,
        }
    }
}
