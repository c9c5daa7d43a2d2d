//! Turning a recommendation into a move a game loop can always play.
//!
//! The search answers `None` when it finds nothing worth playing. A game loop
//! still has to move while any direction changes the board, so it falls
//! back to a uniform pick among those directions.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::Move;
use crate::grid::GameBoard;
use crate::minimax::Minimax;

/// Directions that change `board`, in [`Move::ALL`] order.
pub fn legal_moves<B: GameBoard>(board: &B) -> Vec<Move> {
    Move::ALL.into_iter().filter(|&dir| board.clone().apply_move(dir)).collect()
}

/// Uniform choice among all board-changing directions; `None` when the board
/// cannot change.
pub fn fallback_move<B: GameBoard, R: Rng + ?Sized>(board: &B, rng: &mut R) -> Option<Move> {
    legal_moves(board).choose(rng).copied()
}

/// `recommended` if present, otherwise [`fallback_move`].
pub fn or_fallback<B: GameBoard, R: Rng + ?Sized>(
    recommended: Option<Move>,
    board: &B,
    rng: &mut R,
) -> Option<Move> {
    recommended.or_else(|| {
        let dir = fallback_move(board, rng);
        debug!("no recommendation, falling back to {dir:?}");
        dir
    })
}

/// Ask `search` for a move and fall back to a random legal one.
///
/// Only returns `None` when the game is over.
///
/// ```
/// use ai_2048_minimax::engine::Board;
/// use ai_2048_minimax::minimax::Minimax;
/// use ai_2048_minimax::policy::next_move;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut search = Minimax::new();
/// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
/// assert!(next_move(&mut search, &b, &mut rng).is_some());
/// ```
pub fn next_move<B: GameBoard, R: Rng + ?Sized>(search: &mut Minimax, board: &B, rng: &mut R) -> Option<Move> {
    let recommended = search.recommend_move(board);
    or_fallback(recommended, board, rng)
}
