use serde::Serialize;
use tetrai_engine::{Board, PieceGenerator};

use crate::{NoLegalMoveError, placement::Placement, player::Player, search::SearchStats};

/// Summary of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub dropped_pieces: usize,
    pub cleared_lines: usize,
    /// Whether the game ended because a piece had no legal placement.
    pub game_over: bool,
    /// Highest column height reached at any point of the game.
    pub max_height: usize,
    pub search: SearchStats,
}

/// Drives a [`Player`] with pieces drawn from a [`PieceGenerator`].
#[derive(Debug)]
pub struct Session {
    player: Player,
    generator: PieceGenerator,
    lookahead: bool,
    game_over: bool,
    max_height: usize,
}

impl Session {
    /// Creates a session that reveals the next piece to the player.
    #[must_use]
    pub fn new(player: Player, generator: PieceGenerator) -> Self {
        let max_height = player.board().max_height();
        Self {
            player,
            generator,
            lookahead: true,
            game_over: false,
            max_height,
        }
    }

    /// Chooses between lookahead and reduced mode.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.player.board()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Plays one piece.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over.
    pub fn step(&mut self) -> Result<Placement, NoLegalMoveError> {
        assert!(!self.game_over, "the session is already over");
        let result = if self.lookahead {
            if self.player.pending().is_none() {
                self.player.set_pending(self.generator.next_kind());
            }
            self.player.commit_and_advance(self.generator.next_kind())
        } else {
            self.player.drop_piece(self.generator.next_kind())
        };
        match result {
            Ok(_) => self.max_height = self.max_height.max(self.board().max_height()),
            Err(_) => self.game_over = true,
        }
        result
    }

    /// Plays until the game ends or `turn_limit` pieces have been tried.
    pub fn play(&mut self, turn_limit: usize) -> SessionReport {
        for _ in 0..turn_limit {
            if self.step().is_err() {
                break;
            }
        }
        let report = self.report();
        tracing::info!(
            dropped_pieces = report.dropped_pieces,
            cleared_lines = report.cleared_lines,
            game_over = report.game_over,
            max_height = report.max_height,
            nodes = report.search.nodes,
            "session finished"
        );
        report
    }

    #[must_use]
    pub fn report(&self) -> SessionReport {
        let board = self.board();
        SessionReport {
            dropped_pieces: board.dropped_pieces(),
            cleared_lines: board.cleared_lines(),
            game_over: self.game_over,
            max_height: self.max_height,
            search: *self.player.stats(),
        }
    }
}
