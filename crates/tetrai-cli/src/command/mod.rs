use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tetrai_evaluator::{
    board_evaluator::{HeuristicWeights, LinearBoardEvaluator},
    search::{SearchConfig, Searcher},
};

use crate::util;

use self::{bench::BenchArg, play::PlayArg};

mod bench;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Watch the AI play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Play many games without rendering and report the results as JSON
    Bench(#[clap(flatten)] BenchArg),
}

/// Options shared by every mode that builds a searcher.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Number of unknown-piece plies searched below each candidate
    #[clap(long, default_value_t = 1)]
    depth: usize,
    /// Maximum number of boards simulated per decision
    #[clap(long)]
    node_budget: Option<u64>,
    /// Path to heuristic weights (JSON format)
    #[clap(long)]
    weights: Option<PathBuf>,
}

impl Default for SearchArg {
    fn default() -> Self {
        let config = SearchConfig::default();
        Self {
            depth: config.depth,
            node_budget: config.node_budget,
            weights: None,
        }
    }
}

impl SearchArg {
    pub(crate) fn weights(&self) -> anyhow::Result<HeuristicWeights> {
        match &self.weights {
            Some(path) => util::read_weights_file(path),
            None => Ok(HeuristicWeights::default()),
        }
    }

    pub(crate) fn config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            node_budget: self.node_budget,
        }
    }

    pub(crate) fn build_searcher(&self) -> anyhow::Result<Searcher> {
        Ok(self.searcher_with(self.weights()?))
    }

    pub(crate) fn searcher_with(&self, weights: HeuristicWeights) -> Searcher {
        Searcher::new(Box::new(LinearBoardEvaluator::new(weights)), self.config())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
    }
    Ok(())
}
