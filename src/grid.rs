//! The board interface the search is written against.
//!
//! The search never looks inside a board: it clones it, asks it to move,
//! drops tiles into its vacant cells and reads values back. Anything that
//! can do that for a 4x4 grid can be searched. [`crate::engine::Board`] is
//! the packed implementation shipped with this crate.

use crate::engine::Move;

/// Side length of the grid.
pub const SIZE: usize = 4;

/// A cell coordinate. `x` is the row (top to bottom), `y` the column
/// (left to right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self { Point { x, y } }

    /// Point for a row-major index in `0..16`.
    #[inline]
    pub const fn from_index(idx: usize) -> Self { Point { x: idx / SIZE, y: idx % SIZE } }

    /// Row-major index in `0..16`.
    #[inline]
    pub const fn index(self) -> usize { self.x * SIZE + self.y }

    /// Orthogonal neighbours that lie on the grid.
    pub fn neighbours(self) -> impl Iterator<Item = Point> {
        const OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = self.x.checked_add_signed(dx)?;
            let y = self.y.checked_add_signed(dy)?;
            (x < SIZE && y < SIZE).then_some(Point { x, y })
        })
    }
}

/// Grid state plus the move and query primitives the search consumes.
///
/// `Clone` must produce an independent copy: the search explores every
/// branch on its own clone and never touches the board it was handed.
pub trait GameBoard: Clone {
    /// Slide and merge tiles towards `dir` in place. Returns whether the
    /// board changed.
    fn apply_move(&mut self, dir: Move) -> bool;

    /// Every empty cell. Order is not part of the contract, but a stable
    /// order keeps tie-breaks reproducible.
    fn vacant_points(&self) -> Vec<Point>;

    /// Tile value at `p`, 0 when empty.
    fn cell(&self, p: Point) -> u32;

    /// Overwrite the tile at `p`.
    fn set_cell(&mut self, p: Point, value: u32);

    /// Locality score of dropping `value` at `p`. Zero means the cell has no
    /// occupied neighbour, which the search takes as a cue to skip it.
    fn smoothness(&self, p: Point, value: u32) -> u32;

    /// Largest tile on the board, 0 for an empty board.
    fn max_tile(&self) -> u32;
}
