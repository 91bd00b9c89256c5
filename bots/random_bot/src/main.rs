use clap::Parser;
use pentago::{candidate_moves, Board, Move, Side};
use pentago_bot_utils::{initialize_logging, Bot};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    RandomBot { rng }.run()
}

struct RandomBot {
    rng: StdRng,
}

impl Bot for RandomBot {
    fn new_game(&mut self, _side: Side) {}

    fn play_turn(&mut self, _side: Side, board: Board) -> Move {
        // The judge never asks for a move on a full board
        candidate_moves(&board)
            .choose(&mut self.rng)
            .expect("No empty cell left")
    }
}
