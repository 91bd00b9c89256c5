use std::io::{BufRead, Write};

use pentago::{Board, Move, Okay, Request, Side};
use tracing::debug;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// A trait to simplify writing bots.
pub trait Bot {
    fn new_game(&mut self, side: Side);

    /// Must return a move whose cell is empty on `board`.
    fn play_turn(&mut self, side: Side, board: Board) -> Move;

    /// Answers requests from the judge on stdin until it says goodbye.
    fn run(&mut self) -> anyhow::Result<()> {
        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        serve(self, stdin, stdout)
    }
}

/// The request loop behind [`Bot::run()`], over arbitrary streams.
///
/// Requests and responses are one JSON document per line.
pub fn serve<B, R, W>(bot: &mut B, mut input: R, mut output: W) -> anyhow::Result<()>
where
    B: Bot + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut buf = String::new();
    loop {
        buf.clear(); // because read_line() appends to the buffer
        if input.read_line(&mut buf)? == 0 {
            // EOF - the judge has exited.
            break Ok(());
        }

        let req = serde_json::from_str::<Request>(buf.trim_end())?;
        match req {
            Request::NewGame { side } => {
                debug!(%side, "New game");
                bot.new_game(side);
                serde_json::to_writer(&mut output, &Okay())?;
            }
            Request::PlayTurn { side, board } => {
                serde_json::to_writer(&mut output, &bot.play_turn(side, board))?
            }
            Request::Bye => break Ok(()),
        }
        writeln!(output)?;
        output.flush()?;
    }
}

/// Sets up logging to stderr, since stdout belongs to the protocol.
pub fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(Targets::new().with_default(level))
        .init();
}
