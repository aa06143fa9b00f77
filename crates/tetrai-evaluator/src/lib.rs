//! Move selection for the Tetris board simulated by `tetrai-engine`.
//!
//! This crate decides where each piece goes. It is layered the same way a
//! turn is decided:
//!
//! 1. **Board Evaluation** ([`board_evaluator`]) - Scores a single board state with a
//!    weighted heuristic over its column statistics.
//!
//! 2. **Search** ([`search`]) - Minimax with alpha-beta pruning. Plies alternate between
//!    choosing a placement for a known piece (maximizing) and an adversary choosing the
//!    worst of the seven possible unknown pieces (minimizing).
//!
//! 3. **Player** ([`player`]) - Owns the live board and the pending piece, runs the search
//!    for every turn, and commits the chosen placement.
//!
//! 4. **Session** ([`session`]) - Drives a player with a piece generator for a whole game.
//!
//! # Architecture
//!
//! ```text
//! Session (whole game)
//!     ↓ uses
//! Player (one committed placement per turn)
//!     ↓ uses
//! Searcher (minimax over cloned boards)
//!     ↓ uses
//! BoardEvaluator (score of a leaf board)
//! ```
//!
//! # Example
//!
//! ```
//! use tetrai_engine::PieceKind;
//! use tetrai_evaluator::player::Player;
//!
//! let mut player = Player::with_seed(Default::default(), 7);
//! player.set_pending(PieceKind::L);
//! for next in [PieceKind::Z, PieceKind::T, PieceKind::J, PieceKind::O] {
//!     player.commit_and_advance(next).unwrap();
//! }
//! assert_eq!(player.board().dropped_pieces(), 4);
//! ```

use tetrai_engine::PieceKind;

pub mod board_evaluator;
pub mod placement;
pub mod player;
pub mod search;
pub mod session;

/// Returned when every placement of a piece would end the game.
///
/// Nothing is committed to the board when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("every placement of piece {kind} ends the game")]
pub struct NoLegalMoveError {
    kind: PieceKind,
}

impl NoLegalMoveError {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self { kind }
    }

    /// The piece that could not be placed.
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }
}
