//! Static scoring of a single board state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tetrai_engine::Board;

/// Lowest score a board can receive. Assigned to every game-over board.
pub const MIN_UTILITY: f32 = -1.0e5;

/// Highest score a board can receive.
pub const MAX_UTILITY: f32 = 1.0e5;

/// Scores a board from the point of view of the player placing pieces.
///
/// Higher is better. Implementations must return [`MIN_UTILITY`] for a
/// game-over board and keep every other score within
/// `MIN_UTILITY..=MAX_UTILITY`.
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_board(&self, board: &Board) -> f32;
}

/// Coefficients of the linear board heuristic.
///
/// Every coefficient is non-negative; the sign of each term is fixed by
/// [`LinearBoardEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Penalty per unit of summed column height.
    pub aggregate_height: f32,
    /// Reward per line cleared so far.
    pub cleared_lines: f32,
    /// Penalty per hole.
    pub holes: f32,
    /// Penalty per unit of height difference between adjacent columns.
    pub bumpiness: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            aggregate_height: 0.510_066,
            cleared_lines: 0.760_666,
            holes: 0.356_63,
            bumpiness: 0.184_483,
        }
    }
}

/// `-a*aggregate_height + b*cleared_lines - c*holes - d*bumpiness`.
#[derive(Debug, Clone, Default)]
pub struct LinearBoardEvaluator {
    weights: HeuristicWeights,
}

impl LinearBoardEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }
}

impl BoardEvaluator for LinearBoardEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_board(&self, board: &Board) -> f32 {
        if board.is_game_over() {
            return MIN_UTILITY;
        }
        let w = &self.weights;
        let score = -w.aggregate_height * board.aggregate_height() as f32
            + w.cleared_lines * board.cleared_lines() as f32
            - w.holes * board.total_holes() as f32
            - w.bumpiness * board.bumpiness() as f32;
        assert!(
            (MIN_UTILITY..=MAX_UTILITY).contains(&score),
            "board score {score} is outside the utility range"
        );
        score
    }
}
