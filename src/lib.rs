//! ai-2048-minimax: alpha-beta move recommendations for 2048
//!
//! This crate provides:
//! - The [`grid::GameBoard`] trait, the board interface the search runs against
//! - A compact packed `Board` implementing it (`engine` module)
//! - An alpha-beta minimax searcher over player and spawn plies (`minimax` module),
//!   single-threaded and rayon-parallel
//! - A fallback policy so a game loop always gets a playable move (`policy` module)
//!
//! Quick start:
//! ```
//! use ai_2048_minimax::engine::Board;
//! use ai_2048_minimax::minimax::Minimax;
//! use ai_2048_minimax::policy;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut search = Minimax::new();
//! let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let mut moves = 0u32;
//!
//! // Keep doctests fast: a handful of moves is enough to show the flow.
//! while moves < 4 {
//!     match policy::next_move(&mut search, &b, &mut rng) {
//!         Some(dir) => b = b.make_move(dir, &mut rng),
//!         None => break,
//!     }
//!     moves += 1;
//! }
//! assert_eq!(moves, 4);
//! ```
//!
pub mod engine;
pub mod grid;
pub mod minimax;
pub mod policy;
