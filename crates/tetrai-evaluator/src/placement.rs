use serde::{Deserialize, Serialize};
use tetrai_engine::{Board, GameEndedError, PieceKind};

/// A rotation and leftmost column for one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub rotation: usize,
    pub column: usize,
}

impl Placement {
    /// Enumerates every placement of `kind` on `board`.
    ///
    /// Rotations are visited in ascending order and, within a rotation,
    /// columns from left to right.
    pub fn all(board: &Board, kind: PieceKind) -> impl Iterator<Item = Placement> + '_ {
        kind.rotations().flat_map(move |(rotation, _)| {
            board
                .drop_columns(kind, rotation)
                .map(move |column| Placement {
                    kind,
                    rotation,
                    column,
                })
        })
    }

    /// Drops the piece onto `board`, returning the number of cleared lines.
    pub fn apply(&self, board: &mut Board) -> Result<usize, GameEndedError> {
        board.drop_piece(self.kind, self.rotation, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_counts_on_default_board() {
        let board = Board::new();
        let count = |kind| Placement::all(&board, kind).count();
        // I: 10 vertical + 7 horizontal
        assert_eq!(count(PieceKind::I), 17);
        assert_eq!(count(PieceKind::O), 9);
        // S: 8 flat + 9 upright
        assert_eq!(count(PieceKind::S), 17);
        // T: 8 + 9 + 8 + 9
        assert_eq!(count(PieceKind::T), 34);
    }

    #[test]
    fn test_placements_are_ordered() {
        let board = Board::new();
        let first: Vec<_> = Placement::all(&board, PieceKind::J).take(2).collect();
        assert_eq!(
            first,
            [
                Placement { kind: PieceKind::J, rotation: 0, column: 0 },
                Placement { kind: PieceKind::J, rotation: 0, column: 1 },
            ]
        );
    }

    #[test]
    fn test_apply_drops_piece() {
        let mut board = Board::new();
        let placement = Placement { kind: PieceKind::O, rotation: 0, column: 8 };
        assert_eq!(placement.apply(&mut board), Ok(0));
        assert_eq!(board.cell_at(19, 9).piece_kind(), Some(PieceKind::O));
        assert_eq!(board.dropped_pieces(), 1);
    }
}
