use std::path::PathBuf;

use clap::Parser;
use pentago::{choose_move, visualize_board, Board, Move, SearchConfig, Side};
use pentago_bot_utils::{initialize_logging, Bot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
struct Args {
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with search settings; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many of the best-scoring moves to keep
    #[arg(long)]
    top_k: Option<usize>,

    /// Pick uniformly among this many of the kept moves
    #[arg(long)]
    pick_among: Option<usize>,

    /// How many opponent replies to check after each move (0 disables)
    #[arg(long)]
    reply_sample_cap: Option<usize>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

impl Args {
    fn search_config(&self) -> anyhow::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)?,
            None => SearchConfig::default(),
        };
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(pick_among) = self.pick_among {
            config.pick_among = pick_among;
        }
        if let Some(cap) = self.reply_sample_cap {
            config.reply_sample_cap = cap;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let config = args.search_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, ?config);
    let rng = StdRng::seed_from_u64(seed);

    GreedyBot { rng, config }.run()
}

struct GreedyBot {
    rng: StdRng,
    config: SearchConfig,
}

impl Bot for GreedyBot {
    fn new_game(&mut self, _side: Side) {}

    fn play_turn(&mut self, side: Side, board: Board) -> Move {
        debug!("Thinking about\n{}", visualize_board(&board));
        // The judge never asks for a move on a full board
        choose_move(&board, side, &self.config, &mut self.rng).expect("No empty cell left")
    }
}
