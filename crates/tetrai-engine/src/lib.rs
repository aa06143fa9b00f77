pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned by [`Board::drop_piece`] when the dropped piece could not enter
/// the board and the game has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece overlaps the stack at the top row, the game has ended")]
pub struct GameEndedError;
