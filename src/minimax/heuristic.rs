use crate::grid::{GameBoard, Point, SIZE};

/// Snake-shaped weight templates. Each rewards a different arrangement of
/// decreasing tiles winding away from the top-left corner.
pub const TEMPLATES: [[[u64; SIZE]; SIZE]; 3] = [
    [[16, 15, 14, 13], [9, 10, 11, 12], [8, 7, 6, 5], [1, 2, 3, 4]],
    [[16, 15, 12, 4], [14, 13, 11, 3], [10, 9, 8, 2], [7, 6, 5, 1]],
    [[16, 15, 14, 4], [13, 12, 11, 3], [10, 9, 8, 2], [7, 6, 5, 1]],
];

/// Values a spawn may insert and how often the game inserts them.
///
/// The search takes a plain minimum over spawns, so the weights are not part
/// of its arithmetic.
pub const SPAWN_DISTRIBUTION: [(u32, f64); 2] = [(2, 0.9), (4, 0.1)];

/// Number of candidate scores: every template under every square symmetry.
pub const CANDIDATES: usize = TEMPLATES.len() * 8;

/// Template cells that `(x, y)` maps onto under the 8 symmetries of the square.
#[inline]
fn symmetric_cells(x: usize, y: usize) -> [(usize, usize); 8] {
    let (rx, ry) = (SIZE - 1 - x, SIZE - 1 - y);
    [(x, y), (x, ry), (y, x), (ry, x), (rx, ry), (rx, y), (y, rx), (ry, rx)]
}

/// Weighted tile sum for each (template, symmetry) pair, template-major.
pub fn template_scores<B: GameBoard>(board: &B) -> [u64; CANDIDATES] {
    let mut scores = [0u64; CANDIDATES];
    for x in 0..SIZE {
        for y in 0..SIZE {
            let value = u64::from(board.cell(Point::new(x, y)));
            if value == 0 {
                continue;
            }
            let cells = symmetric_cells(x, y);
            for (t, template) in TEMPLATES.iter().enumerate() {
                for (s, &(tx, ty)) in cells.iter().enumerate() {
                    scores[t * 8 + s] += value * template[tx][ty];
                }
            }
        }
    }
    scores
}

/// Static score of a board: the best of its template scores, so a board is
/// judged by whichever orientation and template it resembles most.
#[inline]
pub fn evaluate<B: GameBoard>(board: &B) -> u64 {
    template_scores(board).into_iter().max().unwrap_or(0)
}
