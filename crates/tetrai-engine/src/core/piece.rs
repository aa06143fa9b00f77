use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// The declaration order is the enumeration order used by [`PieceKind::ALL`],
/// which keeps search enumeration deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in a stable order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the number of distinct rotations of this piece kind.
    ///
    /// ```
    /// use tetrai_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.rotation_count(), 1);
    /// assert_eq!(PieceKind::S.rotation_count(), 2);
    /// assert_eq!(PieceKind::T.rotation_count(), 4);
    /// ```
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::J | PieceKind::L | PieceKind::T => 4,
        }
    }

    /// Returns the occupancy matrix of the given rotation.
    ///
    /// # Panics
    ///
    /// Panics if `rotation >= self.rotation_count()`.
    #[must_use]
    pub fn occupancy(self, rotation: usize) -> &'static OccupancyMatrix {
        let rotations = PIECE_ROTATIONS[self as usize];
        assert!(
            rotation < rotations.len(),
            "invalid rotation {rotation} for piece {self} ({} rotations)",
            rotations.len()
        );
        &rotations[rotation]
    }

    /// Returns an iterator over the occupancy matrices of every rotation.
    pub fn rotations(self) -> impl Iterator<Item = (usize, &'static OccupancyMatrix)> {
        PIECE_ROTATIONS[self as usize].iter().enumerate()
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// ```
    /// use tetrai_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Minimally bounded boolean grid of one rotation of one piece kind.
///
/// Row 0 is the top row of the piece. The matrix never has a fully empty
/// leading or trailing row or column, so `width()` is exactly the number of
/// board columns the rotation spans.
///
/// Each row is stored as a bitmask where bit `c` is column `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyMatrix {
    width: u8,
    height: u8,
    rows: [u8; 4],
}

impl OccupancyMatrix {
    /// Number of cells occupied by every tetromino rotation.
    pub const CELL_COUNT: usize = 4;

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Checks whether the cell at rotation-local `(row, col)` is occupied.
    ///
    /// Coordinates outside the matrix are reported as unoccupied.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && (self.rows[row] & (1 << col)) != 0
    }

    /// Returns the `(row, col)` offsets of the occupied cells, top to bottom, left to right.
    #[must_use]
    pub fn occupied_cells(&self) -> ArrayVec<(usize, usize), { Self::CELL_COUNT }> {
        let mut cells = ArrayVec::new();
        for row in 0..self.height() {
            for col in 0..self.width() {
                if self.is_occupied(row, col) {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Iterates over rows as vectors of occupancy flags.
    pub fn rows(&self) -> impl Iterator<Item = ArrayVec<bool, 4>> + '_ {
        (0..self.height()).map(move |row| {
            (0..self.width())
                .map(|col| self.is_occupied(row, col))
                .collect()
        })
    }
}

/// Builds an occupancy matrix from `#` (occupied) and `.` (empty) rows.
#[expect(clippy::cast_possible_truncation)]
const fn shape(art: &[&str]) -> OccupancyMatrix {
    assert!(!art.is_empty() && art.len() <= 4);
    let width = art[0].len();
    assert!(width > 0 && width <= 4);

    let mut rows = [0u8; 4];
    let mut columns = 0u8;
    let mut cell_count = 0;
    let mut r = 0;
    while r < art.len() {
        let line = art[r].as_bytes();
        assert!(line.len() == width, "ragged piece shape");
        let mut c = 0;
        while c < width {
            match line[c] {
                b'#' => {
                    rows[r] |= 1 << c;
                    cell_count += 1;
                }
                b'.' => {}
                _ => panic!("piece shape cells must be '#' or '.'"),
            }
            c += 1;
        }
        assert!(rows[r] != 0, "piece shape has an empty row");
        columns |= rows[r];
        r += 1;
    }
    assert!(
        columns == (1 << width) - 1,
        "piece shape has an empty column"
    );
    assert!(cell_count == OccupancyMatrix::CELL_COUNT);

    OccupancyMatrix {
        width: width as u8,
        height: art.len() as u8,
        rows,
    }
}

/// Occupancy matrices of every rotation, indexed by `PieceKind as usize`.
static PIECE_ROTATIONS: [&[OccupancyMatrix]; PieceKind::LEN] = [
    // I-piece
    &[
        shape(&["#", "#", "#", "#"]),
        shape(&["####"]),
    ],
    // J-piece
    &[
        shape(&[".#", ".#", "##"]),
        shape(&["#..", "###"]),
        shape(&["##", "#.", "#."]),
        shape(&["###", "..#"]),
    ],
    // L-piece
    &[
        shape(&["#.", "#.", "##"]),
        shape(&["###", "#.."]),
        shape(&["##", ".#", ".#"]),
        shape(&["..#", "###"]),
    ],
    // O-piece
    &[shape(&["##", "##"])],
    // S-piece
    &[
        shape(&[".##", "##."]),
        shape(&["#.", "##", ".#"]),
    ],
    // T-piece
    &[
        shape(&["###", ".#."]),
        shape(&[".#", "##", ".#"]),
        shape(&[".#.", "###"]),
        shape(&["#.", "##", "#."]),
    ],
    // Z-piece
    &[
        shape(&["##.", ".##"]),
        shape(&[".#", "##", "#."]),
    ],
];
