use serde::{Deserialize, Serialize};

use super::piece::PieceKind;

/// A single cell of a [`Board`](super::board::Board).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, derive_more::IsVariant,
)]
pub enum Block {
    /// Unoccupied cell.
    #[default]
    Empty,
    /// Cell filled by a locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn piece_kind(self) -> Option<PieceKind> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind),
        }
    }

    /// Returns `.` for an empty cell and the piece letter otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }

    /// Parses the representation produced by [`Block::as_char`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Block::Empty);
        }
        match PieceKind::from_char(c) {
            Some(kind) => Some(Block::Piece(kind)),
            None => None,
        }
    }
}

impl From<PieceKind> for Block {
    fn from(kind: PieceKind) -> Self {
        Block::Piece(kind)
    }
}
