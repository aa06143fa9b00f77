use std::{
    io::{self, Write as _},
    thread,
    time::Duration,
};

use tetrai_engine::PieceGenerator;
use tetrai_evaluator::{player::Player, session::Session};

use super::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Delay between pieces in milliseconds
    #[clap(long, default_value_t = 500)]
    interval_ms: u64,
    /// Seed for the piece sequence and tie-breaking
    #[clap(long)]
    seed: Option<u64>,
    /// Hide the next piece from the AI
    #[clap(long, default_value_t = false)]
    no_lookahead: bool,
    /// Stop after this many pieces
    #[clap(long)]
    turn_limit: Option<usize>,
    #[clap(flatten)]
    search: SearchArg,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            seed: None,
            no_lookahead: false,
            turn_limit: None,
            search: SearchArg::default(),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        interval_ms,
        seed,
        no_lookahead,
        turn_limit,
        search,
    } = arg;

    let searcher = search.build_searcher()?;
    let (player, generator) = match seed {
        Some(seed) => (
            Player::with_seed(searcher, *seed),
            PieceGenerator::from_seed(*seed),
        ),
        None => (Player::new(searcher), PieceGenerator::new()),
    };
    let mut session = Session::new(player, generator).with_lookahead(!no_lookahead);

    let interval = Duration::from_millis(*interval_ms);
    let mut stdout = io::stdout().lock();
    let mut turn = 0;
    while turn_limit.is_none_or(|limit| turn < limit) {
        let result = session.step();
        turn += 1;

        let board = session.board();
        // Clear the screen and move the cursor home.
        write!(stdout, "\x1b[2J\x1b[H")?;
        writeln!(stdout, "{board}")?;
        writeln!(
            stdout,
            "pieces: {}  lines: {}  height: {}",
            board.dropped_pieces(),
            board.cleared_lines(),
            board.max_height()
        )?;
        if let Some(next) = session.player().pending() {
            writeln!(stdout, "next: {next}")?;
        }
        stdout.flush()?;

        if let Err(err) = result {
            writeln!(stdout, "game over: {err}")?;
            break;
        }
        thread::sleep(interval);
    }

    let report = session.report();
    tracing::info!(?report, "play finished");
    Ok(())
}
