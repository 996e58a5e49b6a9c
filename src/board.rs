use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{PuzzleError, Result};

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Every slide, in the order neighbors are generated: the tile below
    /// the blank first, then right of it, above it, left of it.
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Offset applied to the blank position, as (row, col).
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An immutable n×n sliding puzzle configuration.
///
/// Tiles are stored row-major; `0` is the blank. Both heuristic distances
/// are computed once when the board is built. Tile values are not checked
/// for uniqueness, so a caller handing in a malformed permutation gets a
/// board the solver may never finish on.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    tiles: Vec<u32>,
    blank: Option<usize>,
    hamming: usize,
    manhattan: usize,
}

impl Board {
    /// Builds a board from its rows, where `rows[r][c]` is the tile at (r, c).
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        if size < 2 {
            return Err(PuzzleError::TooSmall { dimension: size });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(PuzzleError::NotSquare {
                rows: size,
                row,
                len: r.len(),
            });
        }

        Ok(Self::from_parts(size, rows.into_iter().flatten().collect()))
    }

    /// Builds a board of dimension `size` from tiles listed in row-major order.
    pub fn from_flat(size: usize, tiles: Vec<u32>) -> Result<Self> {
        let cells = cell_count(size)?;
        if tiles.len() != cells {
            return Err(PuzzleError::WrongTileCount {
                expected: cells,
                actual: tiles.len(),
            });
        }

        Ok(Self::from_parts(size, tiles))
    }

    /// The solved board: tiles `1..n²` in order, blank in the last cell.
    pub fn goal(size: usize) -> Result<Self> {
        let last = u32::try_from(cell_count(size)? - 1)
            .map_err(|_| PuzzleError::TooLarge { dimension: size })?;
        let tiles = (1..=last).chain(std::iter::once(0)).collect();
        Self::from_flat(size, tiles)
    }

    /// A uniformly shuffled board. Roughly half of these are unsolvable.
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        let mut tiles = Self::goal(size)?.tiles;
        tiles.shuffle(rng);
        Ok(Self::from_parts(size, tiles))
    }

    /// A board reached from the goal by `steps` random slides, never undoing
    /// the previous one. Always solvable in at most `steps` moves.
    pub fn scrambled<R: Rng + ?Sized>(size: usize, steps: usize, rng: &mut R) -> Result<Self> {
        let mut board = Self::goal(size)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let next = Move::ALL
                .iter()
                .filter(|&&dir| last.map_or(true, |prev| dir != prev.opposite()))
                .filter_map(|&dir| board.slide(dir).map(|b| (dir, b)))
                .choose(rng);

            match next {
                Some((dir, b)) => {
                    board = b;
                    last = Some(dir);
                }
                None => break,
            }
        }

        Ok(board)
    }

    fn from_parts(size: usize, tiles: Vec<u32>) -> Self {
        let blank = tiles.iter().position(|&t| t == 0);
        let hamming = hamming_distance(&tiles);
        let manhattan = manhattan_distance(&tiles, size);

        Self {
            size,
            tiles,
            blank,
            hamming,
            manhattan,
        }
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    /// Number of tiles out of place, blank excluded.
    pub fn hamming(&self) -> usize {
        self.hamming
    }

    /// Sum of row and column offsets of every tile from its goal cell.
    pub fn manhattan(&self) -> usize {
        self.manhattan
    }

    pub fn is_goal(&self) -> bool {
        self.hamming == 0
    }

    /// Tile at (row, col). Panics if either index is out of range.
    pub fn tile(&self, row: usize, col: usize) -> u32 {
        assert!(row < self.size && col < self.size, "cell out of range");
        self.tiles[row * self.size + col]
    }

    /// Position of the blank as (row, col), if the board has one.
    pub fn blank(&self) -> Option<(usize, usize)> {
        self.blank.map(|idx| (idx / self.size, idx % self.size))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.tiles.chunks(self.size)
    }

    /// The board left after sliding a tile in direction `dir`, or `None`
    /// when no tile sits on that side of the blank.
    pub fn slide(&self, dir: Move) -> Option<Board> {
        let (row, col) = self.blank()?;
        let (dr, dc) = dir.as_offset();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let size = self.size as isize;
        if new_row < 0 || new_row >= size || new_col < 0 || new_col >= size {
            return None;
        }

        let mut tiles = self.tiles.clone();
        tiles.swap(
            row * self.size + col,
            new_row as usize * self.size + new_col as usize,
        );
        Some(Self::from_parts(self.size, tiles))
    }

    /// The slide that turns this board into `other`, if the two are neighbors.
    pub fn move_to(&self, other: &Board) -> Option<Move> {
        if self.size != other.size {
            return None;
        }
        let (row, col) = self.blank()?;
        let (other_row, other_col) = other.blank()?;
        let delta = (
            other_row as isize - row as isize,
            other_col as isize - col as isize,
        );

        let dir = Move::ALL.into_iter().find(|dir| dir.as_offset() == delta)?;
        (self.slide(dir).as_ref() == Some(other)).then_some(dir)
    }

    /// Every board one slide away from this one.
    pub fn neighbors(&self) -> Neighbors<'_> {
        Neighbors {
            board: self,
            moves: Move::ALL.into_iter(),
        }
    }

    /// This board with two adjacent tiles of one row exchanged: row 0 unless
    /// the blank is among its first two cells, in which case row 1.
    pub fn twin(&self) -> Board {
        let row = if self.tiles[0] == 0 || self.tiles[1] == 0 {
            1
        } else {
            0
        };

        let mut tiles = self.tiles.clone();
        tiles.swap(row * self.size, row * self.size + 1);
        Self::from_parts(self.size, tiles)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in self.rows() {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Lazy sequence of a board's neighbors, see [`Board::neighbors`].
pub struct Neighbors<'a> {
    board: &'a Board,
    moves: std::array::IntoIter<Move, 4>,
}

impl Iterator for Neighbors<'_> {
    type Item = Board;

    fn next(&mut self) -> Option<Board> {
        let board = self.board;
        self.moves.by_ref().find_map(|dir| board.slide(dir))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.moves.len()))
    }
}

impl std::iter::FusedIterator for Neighbors<'_> {}

/// Number of cells of a `size`×`size` board.
fn cell_count(size: usize) -> Result<usize> {
    if size < 2 {
        return Err(PuzzleError::TooSmall { dimension: size });
    }
    size.checked_mul(size).ok_or(PuzzleError::TooLarge { dimension: size })
}

fn hamming_distance(tiles: &[u32]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(i, &val)| val != 0 && val as usize != i + 1)
        .count()
}

fn manhattan_distance(tiles: &[u32], size: usize) -> usize {
    let mut distance = 0;
    for (i, &value) in tiles.iter().enumerate() {
        if value == 0 {
            continue;
        }
        let (row, col) = (i / size, i % size);
        let target_row = (value as usize - 1) / size;
        let target_col = (value as usize - 1) % size;
        distance += row.abs_diff(target_row) + col.abs_diff(target_col);
    }
    distance
}
