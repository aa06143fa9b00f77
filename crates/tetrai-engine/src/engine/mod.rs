//! Sources of pieces for driving a game.
//!
//! The board itself is deterministic; everything random lives here:
//!
//! - [`PieceGenerator`] - Uniform, optionally seeded, supply of [`PieceKind`](crate::PieceKind)s

pub use self::piece_generator::*;

mod piece_generator;
