use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tetrai_engine::PieceGenerator;
use tetrai_evaluator::{
    board_evaluator::HeuristicWeights,
    player::Player,
    search::SearchConfig,
    session::{Session, SessionReport},
};

use super::SearchArg;
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Number of games to play
    #[clap(long, default_value_t = 10)]
    games: usize,
    /// Maximum number of pieces per game
    #[clap(long, default_value_t = 1000)]
    turn_limit: usize,
    /// Seed of the first game; game `i` uses `seed + i`
    #[clap(long)]
    seed: Option<u64>,
    /// Hide the next piece from the AI
    #[clap(long, default_value_t = false)]
    no_lookahead: bool,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    search: SearchArg,
}

#[derive(Debug, Clone, Serialize)]
struct BenchReport {
    played_at: DateTime<Utc>,
    seed: u64,
    lookahead: bool,
    turn_limit: usize,
    config: SearchConfig,
    weights: HeuristicWeights,
    mean_dropped_pieces: f64,
    mean_cleared_lines: f64,
    games: Vec<SessionReport>,
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let BenchArg {
        games,
        turn_limit,
        seed,
        no_lookahead,
        output,
        search,
    } = arg;

    let seed = seed.unwrap_or_else(rand::random);
    let weights = search.weights()?;

    let mut reports = Vec::with_capacity(*games);
    for game in 0..*games {
        let game_seed = seed.wrapping_add(u64::try_from(game)?);
        let player = Player::with_seed(search.searcher_with(weights), game_seed);
        let mut session = Session::new(player, PieceGenerator::from_seed(game_seed))
            .with_lookahead(!no_lookahead);
        let report = session.play(*turn_limit);
        eprintln!(
            "Game {}/{}: {} pieces, {} lines",
            game + 1,
            games,
            report.dropped_pieces,
            report.cleared_lines
        );
        reports.push(report);
    }

    let report = BenchReport {
        played_at: Utc::now(),
        seed,
        lookahead: !no_lookahead,
        turn_limit: *turn_limit,
        config: search.config(),
        weights,
        mean_dropped_pieces: mean(reports.iter().map(|r| r.dropped_pieces)),
        mean_cleared_lines: mean(reports.iter().map(|r| r.cleared_lines)),
        games: reports,
    };
    util::save_json(&report, output.as_deref())?;
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<usize>() as f64 / len as f64
}
