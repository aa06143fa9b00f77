use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use tetrai_engine::{Board, PieceKind};

use crate::{
    NoLegalMoveError,
    placement::Placement,
    search::{SearchStats, Searcher},
};

/// An AI player owning the live board.
///
/// Each turn the player searches cloned boards, then commits one of the
/// best placements to the live board. Ties are broken uniformly at random.
///
/// A player is used either in lookahead mode, where the piece after the
/// current one is known ([`Player::set_pending`] then
/// [`Player::commit_and_advance`]), or in reduced mode where only the
/// current piece is known ([`Player::drop_piece`]).
#[derive(Debug)]
pub struct Player {
    board: Board,
    pending: Option<PieceKind>,
    searcher: Searcher,
    rng: Pcg64Mcg,
    stats: SearchStats,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Searcher::default())
    }
}

impl Player {
    /// Creates a player on an empty default-sized board.
    ///
    /// The tie-breaking random source is seeded from the OS.
    #[must_use]
    pub fn new(searcher: Searcher) -> Self {
        Self::with_rng(searcher, Pcg64Mcg::from_os_rng())
    }

    /// Creates a player whose tie-breaking is reproducible.
    #[must_use]
    pub fn with_seed(searcher: Searcher, seed: u64) -> Self {
        Self::with_rng(searcher, Pcg64Mcg::seed_from_u64(seed))
    }

    fn with_rng(searcher: Searcher, rng: Pcg64Mcg) -> Self {
        Self {
            board: Board::new(),
            pending: None,
            searcher,
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Replaces the live board.
    #[must_use]
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn pending(&self) -> Option<PieceKind> {
        self.pending
    }

    pub fn set_pending(&mut self, kind: PieceKind) {
        self.pending = Some(kind);
    }

    #[must_use]
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Search counters accumulated over every decision so far.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Places the pending piece knowing that `next` follows it, then makes
    /// `next` the pending piece.
    ///
    /// On error nothing changes, including the pending piece.
    ///
    /// # Panics
    ///
    /// Panics if no piece is pending or the live board is game over.
    pub fn commit_and_advance(&mut self, next: PieceKind) -> Result<Placement, NoLegalMoveError> {
        let Some(current) = self.pending else {
            panic!("no pending piece; call set_pending first");
        };
        let placement = self.decide_and_commit(current, Some(next))?;
        self.pending = Some(next);
        Ok(placement)
    }

    /// Places `kind` without knowledge of the following piece.
    ///
    /// The pending piece is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the live board is game over.
    pub fn drop_piece(&mut self, kind: PieceKind) -> Result<Placement, NoLegalMoveError> {
        self.decide_and_commit(kind, None)
    }

    fn decide_and_commit(
        &mut self,
        current: PieceKind,
        next: Option<PieceKind>,
    ) -> Result<Placement, NoLegalMoveError> {
        assert!(
            !self.board.is_game_over(),
            "cannot place piece {current}: the game is over"
        );
        let outcome = self
            .searcher
            .search(&self.board, current, next)
            .ok_or(NoLegalMoveError::new(current))?;
        self.stats.accumulate(outcome.stats());

        let score = outcome.score();
        let candidates = outcome.placements().count();
        let stats = *outcome.stats();
        let (placement, board) = outcome.choose(&mut self.rng);
        self.board = board;

        tracing::debug!(
            piece = %current,
            next = ?next,
            rotation = placement.rotation,
            column = placement.column,
            score,
            candidates,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            budget_exhausted = stats.budget_exhausted,
            "committed placement"
        );
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board_evaluator::LinearBoardEvaluator,
        search::SearchConfig,
    };

    #[test]
    fn test_lookahead_drops_one_piece_per_call() {
        let mut player = Player::with_seed(Searcher::default(), 1);
        player.set_pending(PieceKind::L);
        for (turn, next) in [PieceKind::Z, PieceKind::T, PieceKind::J, PieceKind::O]
            .into_iter()
            .enumerate()
        {
            let placement = player.commit_and_advance(next).unwrap();
            assert_eq!(player.board().dropped_pieces(), turn + 1);
            assert_eq!(player.pending(), Some(next));
            assert!(placement.column + placement.kind.occupancy(placement.rotation).width() <= 10);
        }
        assert!(!player.board().is_game_over());
    }

    #[test]
    fn test_committed_placement_matches_board() {
        let mut player = Player::with_seed(Searcher::default(), 5);
        player.set_pending(PieceKind::O);
        let before = player.board().clone();
        let placement = player.commit_and_advance(PieceKind::I).unwrap();

        let mut expected = before;
        placement.apply(&mut expected).unwrap();
        assert_eq!(player.board(), &expected);
        assert_eq!(placement.kind, PieceKind::O);
    }

    #[test]
    fn test_seeded_players_agree() {
        let play = || {
            let mut player = Player::with_seed(Searcher::default(), 11);
            player.set_pending(PieceKind::T);
            [PieceKind::S, PieceKind::Z, PieceKind::I, PieceKind::O, PieceKind::L]
                .into_iter()
                .map(|next| player.commit_and_advance(next).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_no_legal_move_leaves_board_untouched() {
        // Columns 1 and 3 are filled up to the second row, so no O fits and
        // every I placement keeps it that way.
        let mut board = Board::with_size(4, 5);
        board.drop_piece(PieceKind::I, 0, 1).unwrap();
        board.drop_piece(PieceKind::I, 0, 3).unwrap();

        let mut player = Player::with_seed(Searcher::default(), 0).with_board(board);
        player.set_pending(PieceKind::I);
        player.commit_and_advance(PieceKind::O).unwrap();
        assert_eq!(player.board().dropped_pieces(), 3);

        let before = player.board().clone();
        let err = player.commit_and_advance(PieceKind::I).unwrap_err();
        assert_eq!(err.kind(), PieceKind::O);
        assert_eq!(player.board(), &before);
        assert_eq!(player.board().dropped_pieces(), 3);
        assert_eq!(player.pending(), Some(PieceKind::O));
    }

    #[test]
    fn test_reduced_mode_drop() {
        let mut player = Player::with_seed(Searcher::default(), 2);
        let placement = player.drop_piece(PieceKind::I).unwrap();
        assert_eq!(placement.kind, PieceKind::I);
        assert_eq!(player.board().dropped_pieces(), 1);
        assert_eq!(player.pending(), None);
        // Flat placements keep the surface smooth on an empty board.
        assert_eq!(placement.rotation, 1);
    }

    #[test]
    fn test_player_avoids_holes() {
        let board = Board::from_ascii(
            "
            ......
            ......
            ......
            ......
            ......
            OO....
            ",
        );
        let searcher = Searcher::new(
            Box::new(LinearBoardEvaluator::default()),
            SearchConfig { depth: 0, node_budget: None },
        );
        let mut player = Player::with_seed(searcher, 4).with_board(board);
        player.drop_piece(PieceKind::O).unwrap();
        assert_eq!(player.board().total_holes(), 0);
    }

    #[test]
    #[should_panic(expected = "no pending piece")]
    fn test_commit_without_pending_panics() {
        let mut player = Player::with_seed(Searcher::default(), 0);
        let _ = player.commit_and_advance(PieceKind::I);
    }

    #[test]
    fn test_long_game_with_lookahead() {
        let mut generator = tetrai_engine::PieceGenerator::from_seed(8);
        let mut player =
            Player::with_seed(Searcher::default(), 8).with_board(Board::with_size(6, 12));
        player.set_pending(generator.next_kind());
        for _ in 0..40 {
            if player.commit_and_advance(generator.next_kind()).is_err() {
                break;
            }
        }
        // `from_ascii` recomputes every column from the grid.
        let board = player.board();
        let art: String = board
            .rows()
            .flat_map(|row| row.iter().map(|block| block.as_char()).chain(['\n']))
            .collect();
        let rebuilt = Board::from_ascii(&art);
        assert_eq!(board.column_heights(), rebuilt.column_heights());
        assert_eq!(board.column_holes(), rebuilt.column_holes());
        assert!(player.board().cleared_lines() > 0);
    }
}
