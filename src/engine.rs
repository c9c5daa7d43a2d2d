use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::grid::{GameBoard, Point};

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All directions in search order. Earlier entries win ties.
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];
}

/// Largest tile a nibble can hold (2^15).
pub const MAX_TILE: u32 = 1 << 15;

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

struct Tables {
    slide_left: Box<[u16]>,
    slide_right: Box<[u16]>,
    score: Box<[u64]>,
}

type BoardRaw = u64;

/// Packed 4x4 2048 board: 16 4-bit exponents in a `u64`, row-major with
/// cell 0 in the top nibble. Exponent 0 is an empty cell, `k` is the tile `2^k`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Build a board from tile values, top row first.
    ///
    /// Values must be 0 or a power of two in `2..=32768`; use [`str::parse`]
    /// for checked construction.
    ///
    /// ```
    /// use ai_2048_minimax::engine::Board;
    /// let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]);
    /// assert_eq!(b.highest_tile(), 1024);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn from_rows(rows: [[u32; 4]; 4]) -> Self {
        let mut board = Board::EMPTY;
        for (x, row) in rows.iter().enumerate() {
            for (y, &value) in row.iter().enumerate() {
                board.set_cell(Point::new(x, y), value);
            }
        }
        board
    }

    /// Tile values, top row first.
    pub fn to_rows(self) -> [[u32; 4]; 4] {
        let mut rows = [[0; 4]; 4];
        for (idx, value) in (0..16).map(|idx| (idx, self.tile_value(idx))) {
            rows[idx / 4][idx % 4] = value;
        }
        rows
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use ai_2048_minimax::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(b.shift(Move::Left).to_rows()[0], [4, 4, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        let t = tables();
        let raw = match dir {
            Move::Left => shift_rows(self.0, &t.slide_left),
            Move::Right => shift_rows(self.0, &t.slide_right),
            Move::Up => transpose(shift_rows(transpose(self.0), &t.slide_left)),
            Move::Down => transpose(shift_rows(transpose(self.0), &t.slide_right)),
        };
        Board(raw)
    }

    /// Insert a 2 (90%) or 4 (10%) into a random empty cell. A full board is
    /// returned unchanged.
    ///
    /// ```
    /// use ai_2048_minimax::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let vacant = self.vacant_points();
        if vacant.is_empty() {
            return self;
        }
        let p = vacant[rng.gen_range(0..vacant.len())];
        let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        let mut next = self;
        next.set_cell(p, value);
        next
    }

    /// Perform a move then insert a random tile if the move changed the board.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, dir: Move, rng: &mut R) -> Self {
        let moved = self.shift(dir);
        if moved != self { moved.with_random_tile(rng) } else { self }
    }

    /// Game score implied by the tiles on the board (sum of all merges that built them).
    #[inline]
    pub fn score(self) -> u64 {
        let table = &tables().score;
        (0..4).map(|row| table[extract_line(self.0, row) as usize]).sum()
    }

    /// Return true if no direction changes the board.
    ///
    /// ```
    /// use ai_2048_minimax::engine::Board;
    /// assert!(Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool { Move::ALL.iter().all(|&dir| self.shift(dir) == self) }

    /// Highest tile value on the board, 0 when empty.
    #[inline]
    pub fn highest_tile(self) -> u32 {
        (0..16).map(|idx| self.tile_value(idx)).max().unwrap_or(0)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> u32 { 16 - count_non_empty(self.0) }

    /// Tile value at a row-major index in `0..16`, 0 when empty.
    #[inline]
    pub fn tile_value(self, idx: usize) -> u32 {
        match exponent(self.0, idx) {
            0 => 0,
            e => 1u32 << e,
        }
    }
}

impl GameBoard for Board {
    #[inline]
    fn apply_move(&mut self, dir: Move) -> bool {
        let moved = self.shift(dir);
        let changed = moved != *self;
        *self = moved;
        changed
    }

    fn vacant_points(&self) -> Vec<Point> {
        (0..16).filter(|&idx| exponent(self.0, idx) == 0).map(Point::from_index).collect()
    }

    #[inline]
    fn cell(&self, p: Point) -> u32 { self.tile_value(p.index()) }

    #[inline]
    fn set_cell(&mut self, p: Point, value: u32) {
        let shift = nibble_shift(p.index());
        self.0 = (self.0 & !(0xfu64 << shift)) | (exponent_of(value) << shift);
    }

    /// Occupied neighbours count 1 each, 2 when they match `value`.
    fn smoothness(&self, p: Point, value: u32) -> u32 {
        p.neighbours()
            .map(|n| match self.cell(n) {
                0 => 0,
                v if v == value => 2,
                _ => 1,
            })
            .sum()
    }

    #[inline]
    fn max_tile(&self) -> u32 { self.highest_tile() }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (x, row) in self.to_rows().iter().enumerate() {
            if x > 0 {
                writeln!(f, "{}", "-".repeat(31))?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("expected 16 cells, found {0}")]
    CellCount(usize),
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("{0} is not a valid tile (tiles are powers of two from 2)")]
    InvalidTile(u32),
    #[error("tile {0} exceeds the largest supported tile 32768")]
    TooLarge(u32),
}

/// Parses 16 decimal values in row-major order separated by whitespace,
/// `,` or `/`. 0 is an empty cell.
///
/// ```
/// use ai_2048_minimax::engine::Board;
/// let b: Board = "2 0 0 0 / 0 0 0 0 / 0 0 4 0 / 0 0 0 0".parse().unwrap();
/// assert_eq!(b.to_rows()[2], [0, 0, 4, 0]);
/// assert!("2 2 2".parse::<Board>().is_err());
/// ```
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() != 16 {
            return Err(BoardParseError::CellCount(tokens.len()));
        }
        let mut board = Board::EMPTY;
        for (idx, token) in tokens.into_iter().enumerate() {
            let value: u32 = token.parse().map_err(|_| BoardParseError::NotANumber(token.to_string()))?;
            if value > MAX_TILE {
                return Err(BoardParseError::TooLarge(value));
            }
            if value == 1 || (value != 0 && !value.is_power_of_two()) {
                return Err(BoardParseError::InvalidTile(value));
            }
            board.set_cell(Point::from_index(idx), value);
        }
        Ok(board)
    }
}

/// Build the line tables now rather than on the first move. Safe to call multiple times.
pub fn new() {
    tables();
}

static TABLES: OnceLock<Tables> = OnceLock::new();

#[inline(always)]
fn tables() -> &'static Tables { TABLES.get_or_init(create_tables) }

fn create_tables() -> Tables {
    // Allocate on the heap to avoid large stack frames
    let mut slide_left = vec![0u16; LINE_TABLE_SIZE];
    let mut slide_right = vec![0u16; LINE_TABLE_SIZE];
    let mut score = vec![0u64; LINE_TABLE_SIZE];
    for line in 0..LINE_TABLE_SIZE {
        let line16 = line as u16;
        slide_left[line] = slide_line_left(line16);
        slide_right[line] = reverse_line(slide_line_left(reverse_line(line16)));
        score[line] = line_score(line16);
    }
    Tables {
        slide_left: slide_left.into_boxed_slice(),
        slide_right: slide_right.into_boxed_slice(),
        score: score.into_boxed_slice(),
    }
}

fn unpack_line(line: u16) -> [u8; 4] {
    [(line >> 12) as u8 & 0xf, (line >> 8) as u8 & 0xf, (line >> 4) as u8 & 0xf, line as u8 & 0xf]
}

fn pack_line(tiles: [u8; 4]) -> u16 {
    tiles.iter().fold(0, |acc, &t| (acc << 4) | u16::from(t))
}

fn reverse_line(line: u16) -> u16 {
    let mut tiles = unpack_line(line);
    tiles.reverse();
    pack_line(tiles)
}

/// Slide a line towards index 0. Each tile merges at most once per move and
/// two 32768s stay apart since their sum does not fit a nibble.
fn slide_line_left(line: u16) -> u16 {
    let mut out = [0u8; 4];
    let mut len = 0;
    let mut merged = false;
    for t in unpack_line(line).into_iter().filter(|&t| t != 0) {
        if len > 0 && !merged && out[len - 1] == t && t < 15 {
            out[len - 1] += 1;
            merged = true;
        } else {
            out[len] = t;
            len += 1;
            merged = false;
        }
    }
    pack_line(out)
}

// Credit to Nneonneo
fn line_score(line: u16) -> u64 {
    unpack_line(line)
        .iter()
        .filter(|&&e| e >= 2)
        .map(|&e| u64::from(e - 1) << e)
        .sum()
}

fn shift_rows(raw: BoardRaw, table: &[u16]) -> BoardRaw {
    (0..4).fold(0, |acc, row| {
        let line = extract_line(raw, row);
        acc | (u64::from(table[line as usize]) << (48 - 16 * row))
    })
}

// Credit to Nneonneo
fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

#[inline]
fn extract_line(raw: BoardRaw, row: u64) -> u16 { ((raw >> (48 - 16 * row)) & 0xffff) as u16 }

#[inline]
fn nibble_shift(idx: usize) -> u64 { 60 - 4 * idx as u64 }

#[inline]
fn exponent(raw: BoardRaw, idx: usize) -> u64 { (raw >> nibble_shift(idx)) & 0xf }

fn exponent_of(value: u32) -> u64 {
    debug_assert!(
        value == 0 || (value >= 2 && value <= MAX_TILE && value.is_power_of_two()),
        "unsupported tile value {value}"
    );
    if value == 0 { 0 } else { u64::from(value.trailing_zeros()) }
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
fn count_non_empty(raw: BoardRaw) -> u32 {
    let mut x = raw;
    x |= x >> 1;
    x |= x >> 2;
    x &= 0x1111111111111111;
    x.count_ones()
}

fn format_val(value: u32) -> String {
    match value {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}
