use std::{fmt, ops::Range};

use crate::GameEndedError;

use super::{
    block::Block,
    piece::{OccupancyMatrix, PieceKind},
};

/// A Tetris board that pieces are dropped into.
///
/// The board keeps the grid of cells plus statistics about the game so far:
/// pieces dropped, lines cleared, whether the game is over, and the height
/// and buried-hole count of every column. The column statistics are
/// maintained incrementally by [`Board::drop_piece`] and always match the
/// grid.
///
/// # Coordinate System
///
/// - Cells are indexed `(row, col)` from the top-left corner
/// - Row 0 is the top row, row `height() - 1` rests on the floor
/// - Column 0 is the leftmost column
///
/// # Cloning
///
/// `Clone` produces a fully independent board (grid and statistics are owned
/// vectors), which is what the search uses to simulate hypothetical moves.
///
/// # Example
///
/// ```
/// use tetrai_engine::{Block, Board, PieceKind};
///
/// let mut board = Board::new();
/// board.drop_piece(PieceKind::J, 1, 0).unwrap();
/// board.drop_piece(PieceKind::J, 1, 3).unwrap();
/// board.drop_piece(PieceKind::O, 0, 6).unwrap();
/// let cleared = board.drop_piece(PieceKind::L, 0, 8).unwrap();
///
/// assert_eq!(cleared, 1);
/// assert_eq!(board.cleared_lines(), 1);
/// assert_eq!(board.cell_at(19, 0), Block::Piece(PieceKind::J));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Block>,
    game_over: bool,
    cleared_lines: usize,
    dropped_pieces: usize,
    column_heights: Vec<usize>,
    column_holes: Vec<usize>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;
    /// Smallest allowed dimension; every rotation of every piece fits in it.
    pub const MIN_DIMENSION: usize = 4;

    /// Creates an empty 10×20 board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }

    /// Creates an empty board of the given size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is smaller than [`Board::MIN_DIMENSION`].
    #[must_use]
    pub fn with_size(width: usize, height: usize) -> Self {
        assert!(
            width >= Self::MIN_DIMENSION && height >= Self::MIN_DIMENSION,
            "board size {width}x{height} is too small"
        );
        Self {
            width,
            height,
            cells: vec![Block::Empty; width * height],
            game_over: false,
            cleared_lines: 0,
            dropped_pieces: 0,
            column_heights: vec![0; width],
            column_holes: vec![0; width],
        }
    }

    /// Creates a board from ASCII art.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `J`, `L`, `O`, `S`, `T`, `Z`)
    /// is a cell filled by that piece. Blank lines and surrounding whitespace
    /// are ignored; the remaining lines give the rows from top to bottom and
    /// define the board size. Counters start at zero.
    ///
    /// # Panics
    ///
    /// Panics on unknown characters, ragged rows, or a board smaller than
    /// [`Board::MIN_DIMENSION`].
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut board = Self::with_size(width, height);

        for (row, line) in lines.iter().enumerate() {
            assert_eq!(
                line.chars().count(),
                width,
                "each row must have exactly {width} cells, got {line:?} at row {row}"
            );
            for (col, ch) in line.chars().enumerate() {
                let block = Block::from_char(ch)
                    .unwrap_or_else(|| panic!("invalid cell {ch:?} at ({row}, {col})"));
                board.cells[row * width + col] = block;
            }
        }
        board.refresh_column_stats(0..width);
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is out of bounds.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Block {
        self.get(row, col).unwrap_or_else(|| {
            panic!(
                "cell ({row}, {col}) is out of bounds for a {}x{} board",
                self.width, self.height
            )
        })
    }

    /// Returns the cell at the given position, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Block> {
        (row < self.height && col < self.width).then(|| self.cells[row * self.width + col])
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn dropped_pieces(&self) -> usize {
        self.dropped_pieces
    }

    /// Height of every column: rows from the top-most occupied cell down to the floor.
    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        &self.column_heights
    }

    /// Number of empty cells below the top-most occupied cell of every column.
    #[must_use]
    pub fn column_holes(&self) -> &[usize] {
        &self.column_holes
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        self.column_heights.iter().sum()
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn total_holes(&self) -> usize {
        self.column_holes.iter().sum()
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        self.column_heights
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]))
            .sum()
    }

    /// Returns the range of leftmost columns at which the rotation can be dropped.
    #[must_use]
    pub fn drop_columns(&self, kind: PieceKind, rotation: usize) -> Range<usize> {
        0..self.width - kind.occupancy(rotation).width() + 1
    }

    /// Drops a piece in the given rotation with its leftmost cell in column `left`.
    ///
    /// The piece falls straight down from the top row until the next row would
    /// collide with the stack or the floor, then it is locked, full rows are
    /// cleared, and the column statistics are refreshed.
    ///
    /// Returns the number of rows cleared by this drop.
    ///
    /// Every call that does not panic counts as a dropped piece, including
    /// the one that ends the game.
    ///
    /// # Errors
    ///
    /// Returns [`GameEndedError`] if the piece overlaps the stack already at
    /// the top row. The board is then game over and the piece is stamped into
    /// the top rows so the final state shows the failed placement.
    ///
    /// # Panics
    ///
    /// Panics if the rotation is invalid for `kind`, if the piece would stick
    /// out of the right edge, or if the game is already over.
    pub fn drop_piece(
        &mut self,
        kind: PieceKind,
        rotation: usize,
        left: usize,
    ) -> Result<usize, GameEndedError> {
        let matrix = kind.occupancy(rotation);
        assert!(
            left + matrix.width() <= self.width,
            "invalid column {left} for piece {kind} rotation {rotation} on a board of width {}",
            self.width
        );
        assert!(!self.game_over, "cannot drop piece {kind}: the game is over");

        let columns = left..left + matrix.width();
        self.dropped_pieces += 1;

        if !self.can_put(matrix, 0, left) {
            self.game_over = true;
            self.stamp(kind, matrix, 0, left);
            self.refresh_column_stats(columns);
            return Err(GameEndedError);
        }

        let mut top = 0;
        while self.can_put(matrix, top + 1, left) {
            top += 1;
        }
        self.stamp(kind, matrix, top, left);

        let cleared_lines = self.clear_lines();
        self.cleared_lines += cleared_lines;
        if cleared_lines > 0 {
            self.refresh_column_stats(0..self.width);
        } else {
            self.refresh_column_stats(columns);
        }

        Ok(cleared_lines)
    }

    /// Checks whether the matrix can be put with its top-left cell at `(top, left)`.
    ///
    /// Returns `false` if any occupied cell of the matrix sticks out of the
    /// board or overlaps an occupied cell.
    fn can_put(&self, matrix: &OccupancyMatrix, top: usize, left: usize) -> bool {
        matrix.occupied_cells().into_iter().all(|(dr, dc)| {
            self.get(top + dr, left + dc)
                .is_some_and(|block| block.is_empty())
        })
    }

    fn stamp(&mut self, kind: PieceKind, matrix: &OccupancyMatrix, top: usize, left: usize) {
        for (dr, dc) in matrix.occupied_cells() {
            self.cells[(top + dr) * self.width + left + dc] = Block::Piece(kind);
        }
    }

    fn is_row_filled(&self, row: usize) -> bool {
        self.cells[row * self.width..][..self.width]
            .iter()
            .all(|block| block.is_piece())
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// All filled rows are removed at once; rows above shift down and the
    /// vacated rows at the top become empty.
    fn clear_lines(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for row in (0..self.height).rev() {
            if self.is_row_filled(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(row * width..(row + 1) * width, (row + count) * width);
            }
        }
        self.cells[..count * width].fill(Block::Empty);
        count
    }

    fn refresh_column_stats(&mut self, columns: Range<usize>) {
        for col in columns {
            let mut column = (0..self.height).map(|row| self.cells[row * self.width + col]);
            let top = column.position(|block| block.is_piece());
            let (height, holes) = match top {
                Some(top) => (self.height - top, column.filter(|b| b.is_empty()).count()),
                None => (0, 0),
            };
            self.column_heights[col] = height;
            self.column_holes[col] = holes;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|block| block.as_char()).collect();
            writeln!(f, "{line}")?;
        }
        let footer: String = "0123456789".chars().cycle().take(self.width).collect();
        write!(f, "{footer}")
    }
}
