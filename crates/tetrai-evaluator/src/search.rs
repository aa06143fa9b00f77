//! Minimax search with alpha-beta pruning.
//!
//! The tree alternates between two kinds of plies:
//!
//! - **max**: the player picks a placement for a known piece.
//! - **min**: the adversary picks which of the seven kinds comes next.
//!
//! `depth` counts min plies. A min node at depth zero, or on a game-over
//! board, is a leaf scored by the [`BoardEvaluator`].
//!
//! Values are fail-soft: a returned value at or below the caller's `alpha`
//! is an upper bound, anything above is exact.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tetrai_engine::{Board, PieceKind};

use crate::{
    board_evaluator::{BoardEvaluator, LinearBoardEvaluator},
    placement::Placement,
};

/// Tunable limits of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of unknown-piece plies explored below each candidate.
    pub depth: usize,
    /// Maximum number of boards simulated per decision.
    ///
    /// Once reached, the node being searched is scored as a leaf and the
    /// remaining first placements are skipped. The first surviving placement
    /// is always scored, so a decision may exceed the budget only by the
    /// game-ending placements tried before it.
    pub node_budget: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            node_budget: None,
        }
    }
}

/// Counters collected while searching for one decision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Boards simulated.
    pub nodes: u64,
    /// Alpha-beta cutoffs taken.
    pub cutoffs: u64,
    pub budget_exhausted: bool,
}

impl SearchStats {
    pub fn accumulate(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
        self.budget_exhausted |= other.budget_exhausted;
    }
}

/// Result of a root search: every placement tied for the best score.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    score: f32,
    candidates: Vec<(Placement, Board)>,
    stats: SearchStats,
}

impl SearchOutcome {
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.candidates.iter().map(|(placement, _)| *placement)
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Picks one of the tied placements uniformly at random, together with
    /// the board it produces.
    pub fn choose<R>(mut self, rng: &mut R) -> (Placement, Board)
    where
        R: Rng + ?Sized,
    {
        let index = rng.random_range(0..self.candidates.len());
        self.candidates.swap_remove(index)
    }
}

#[derive(Debug)]
pub struct Searcher {
    evaluator: Box<dyn BoardEvaluator>,
    config: SearchConfig,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(Box::new(LinearBoardEvaluator::default()), SearchConfig::default())
    }
}

impl Searcher {
    #[must_use]
    pub fn new(evaluator: Box<dyn BoardEvaluator>, config: SearchConfig) -> Self {
        Self { evaluator, config }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn evaluator(&self) -> &dyn BoardEvaluator {
        self.evaluator.as_ref()
    }

    /// Finds the best placements of `current` on `board`.
    ///
    /// With `next` known, the first ply below each candidate is a max ply for
    /// `next`; otherwise the adversary picks immediately. Placements that end
    /// the game are never candidates. Returns `None` when every placement of
    /// `current` ends the game.
    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn search(
        &self,
        board: &Board,
        current: PieceKind,
        next: Option<PieceKind>,
    ) -> Option<SearchOutcome> {
        let mut stats = SearchStats::default();
        let mut best = f32::NEG_INFINITY;
        let mut candidates = Vec::new();

        for placement in Placement::all(board, current) {
            if !candidates.is_empty() && !self.has_budget(&stats) {
                stats.budget_exhausted = true;
                break;
            }
            let mut after = board.clone();
            stats.nodes += 1;
            if placement.apply(&mut after).is_err() {
                continue;
            }

            let mut value = self.root_value(&after, next, best, &mut stats);
            if value == best {
                // Only a bound; resolve it to decide the tie.
                value = self.root_value(&after, next, f32::NEG_INFINITY, &mut stats);
            }

            if value > best {
                best = value;
                candidates.clear();
                candidates.push((placement, after));
            } else if value == best {
                candidates.push((placement, after));
            }
        }

        if candidates.is_empty() {
            return None;
        }
        Some(SearchOutcome {
            score: best,
            candidates,
            stats,
        })
    }

    fn root_value(
        &self,
        board: &Board,
        next: Option<PieceKind>,
        alpha: f32,
        stats: &mut SearchStats,
    ) -> f32 {
        match next {
            Some(next) => {
                self.max_value(board, next, self.config.depth, alpha, f32::INFINITY, stats)
            }
            None => self.min_value(board, self.config.depth, alpha, f32::INFINITY, stats),
        }
    }

    fn has_budget(&self, stats: &SearchStats) -> bool {
        self.config
            .node_budget
            .is_none_or(|budget| stats.nodes < budget)
    }

    fn min_value(
        &self,
        board: &Board,
        depth: usize,
        alpha: f32,
        mut beta: f32,
        stats: &mut SearchStats,
    ) -> f32 {
        if depth == 0 || board.is_game_over() {
            return self.evaluator.evaluate_board(board);
        }
        if !self.has_budget(stats) {
            stats.budget_exhausted = true;
            return self.evaluator.evaluate_board(board);
        }

        let mut value = f32::INFINITY;
        for kind in PieceKind::ALL {
            value = value.min(self.max_value(board, kind, depth - 1, alpha, beta, stats));
            beta = beta.min(value);
            if alpha >= beta {
                stats.cutoffs += 1;
                break;
            }
        }
        value
    }

    #[expect(clippy::float_cmp)]
    fn max_value(
        &self,
        board: &Board,
        kind: PieceKind,
        depth: usize,
        mut alpha: f32,
        beta: f32,
        stats: &mut SearchStats,
    ) -> f32 {
        let mut value = f32::NEG_INFINITY;
        for placement in Placement::all(board, kind) {
            if !self.has_budget(stats) {
                stats.budget_exhausted = true;
                if value == f32::NEG_INFINITY {
                    return self.evaluator.evaluate_board(board);
                }
                break;
            }
            let mut child = board.clone();
            stats.nodes += 1;
            // A game-ending drop leaves a game-over board, scored as a loss.
            let _ = placement.apply(&mut child);
            value = value.max(self.min_value(&child, depth, alpha, beta, stats));
            alpha = alpha.max(value);
            if alpha >= beta {
                stats.cutoffs += 1;
                break;
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_evaluator::MIN_UTILITY;

    /// Exhaustive minimax without pruning, for comparison.
    fn plain_min(searcher: &Searcher, board: &Board, depth: usize) -> f32 {
        if depth == 0 || board.is_game_over() {
            return searcher.evaluator().evaluate_board(board);
        }
        PieceKind::ALL
            .into_iter()
            .map(|kind| plain_max(searcher, board, kind, depth - 1))
            .fold(f32::INFINITY, f32::min)
    }

    fn plain_max(searcher: &Searcher, board: &Board, kind: PieceKind, depth: usize) -> f32 {
        Placement::all(board, kind)
            .map(|placement| {
                let mut child = board.clone();
                let _ = placement.apply(&mut child);
                plain_min(searcher, &child, depth)
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    fn small_board() -> Board {
        Board::from_ascii(
            "
            ......
            ......
            ......
            ......
            T.....
            TT..OO
            T...OO
            ",
        )
    }

    #[test]
    fn test_pruned_search_matches_plain_minimax() {
        let searcher = Searcher::new(
            Box::new(LinearBoardEvaluator::default()),
            SearchConfig { depth: 1, node_budget: None },
        );
        let board = small_board();
        let outcome = searcher.search(&board, PieceKind::L, Some(PieceKind::I)).unwrap();

        let expected = Placement::all(&board, PieceKind::L)
            .filter_map(|placement| {
                let mut after = board.clone();
                placement.apply(&mut after).ok()?;
                Some(plain_max(&searcher, &after, PieceKind::I, 1))
            })
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((outcome.score() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_ties_share_exact_score() {
        let searcher = Searcher::default();
        let board = Board::with_size(6, 8);
        let outcome = searcher.search(&board, PieceKind::O, None).unwrap();
        for placement in outcome.placements() {
            let mut after = board.clone();
            placement.apply(&mut after).unwrap();
            let value = plain_min(&searcher, &after, 1);
            assert!((value - outcome.score()).abs() < 1e-4, "{placement:?}");
        }
    }

    #[test]
    fn test_pruning_takes_cutoffs() {
        let searcher = Searcher::default();
        let outcome = searcher
            .search(&small_board(), PieceKind::T, Some(PieceKind::S))
            .unwrap();
        assert!(outcome.stats().cutoffs > 0);
        assert!(!outcome.stats().budget_exhausted);
    }

    #[test]
    fn test_no_candidate_when_every_placement_ends_game() {
        let board = Board::from_ascii(
            "
            .I.I
            .I.I
            .I.I
            .I.I
            ",
        );
        let searcher = Searcher::default();
        assert!(searcher.search(&board, PieceKind::O, None).is_none());
    }

    #[test]
    fn test_known_next_piece_is_searched() {
        let board = Board::with_size(4, 4);
        let searcher = Searcher::new(
            Box::new(LinearBoardEvaluator::default()),
            SearchConfig { depth: 0, node_budget: None },
        );
        let outcome = searcher.search(&board, PieceKind::I, Some(PieceKind::I)).unwrap();
        // Two horizontal I's on an empty board both clear a line.
        let expected = 2.0 * LinearBoardEvaluator::default().weights().cleared_lines;
        assert!((outcome.score() - expected).abs() < 1e-4);
        assert!(outcome.score() > MIN_UTILITY);
    }

    #[test]
    fn test_node_budget_limits_search() {
        let budget = 50;
        let searcher = Searcher::new(
            Box::new(LinearBoardEvaluator::default()),
            SearchConfig { depth: 2, node_budget: Some(budget) },
        );
        let outcome = searcher.search(&Board::new(), PieceKind::T, Some(PieceKind::Z)).unwrap();
        assert!(outcome.stats().budget_exhausted);
        assert!(outcome.stats().nodes <= budget, "{:?}", outcome.stats());
        assert!(outcome.placements().count() >= 1);
    }

    #[test]
    fn test_zero_budget_still_scores_one_placement() {
        let searcher = Searcher::new(
            Box::new(LinearBoardEvaluator::default()),
            SearchConfig { depth: 1, node_budget: Some(0) },
        );
        let board = Board::new();
        let outcome = searcher.search(&board, PieceKind::O, Some(PieceKind::I)).unwrap();
        assert_eq!(outcome.stats().nodes, 1);
        assert!(outcome.stats().budget_exhausted);

        // The only simulated board is scored as a leaf.
        let placements: Vec<_> = outcome.placements().collect();
        assert_eq!(placements, [Placement { kind: PieceKind::O, rotation: 0, column: 0 }]);
        let mut after = board.clone();
        placements[0].apply(&mut after).unwrap();
        let leaf = searcher.evaluator().evaluate_board(&after);
        assert!((outcome.score() - leaf).abs() < f32::EPSILON);
    }

    #[test]
    fn test_choose_returns_a_candidate() {
        use rand::SeedableRng as _;

        let board = Board::new();
        let outcome = Searcher::default().search(&board, PieceKind::O, None).unwrap();
        let candidates: Vec<_> = outcome.placements().collect();
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(3);
        let (placement, after) = outcome.choose(&mut rng);
        assert!(candidates.contains(&placement));
        assert_eq!(after.dropped_pieces(), 1);
    }
}
