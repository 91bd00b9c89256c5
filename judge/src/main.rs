use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use judge::{play_game, GameResult, MatchScore, Player, PlayerConfig, PlayerTotals, Recorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Paths to the JSON configs of the players; every pair plays a match
    #[clap(num_args(2..), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many games to play per pairing
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed for side assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a pairing as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record each game as a JSON file in this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// Log level of the judge itself
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Log level of the game engine, which logs every rejected action
    #[arg(long, default_value = "warn")]
    engine_log_level: LevelFilter,
}

fn play_matchup(
    players: [&mut Player; 2],
    num_games: usize,
    rng: &mut StdRng,
    stop_on_illegal_move: bool,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<MatchScore> {
    let [player_1, player_2] = players;
    let names = [player_1.name.clone(), player_2.name.clone()];
    let mut score = MatchScore::default();

    for game_idx in 0..num_games {
        let result = play_game(rng, player_1, player_2, recorder)?;
        match &result {
            GameResult::WonByPlayer { player_idx, side, num_moves } => {
                debug!(winner = names[*player_idx], %side, num_moves, game_idx);
            }
            GameResult::Draw { kind } => debug!(game_idx, %kind, "Draw"),
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                warn!(player = names[*player_idx], game_idx, "Illegal move: {}", err);
                if stop_on_illegal_move {
                    break;
                }
            }
        }
        score.record(&result);
    }

    eprintln!("{}", score.summary([names[0].as_str(), names[1].as_str()]));
    Ok(score)
}

fn print_standings(player_configs: &[PlayerConfig], totals: &[PlayerTotals]) {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].points().total_cmp(&totals[a].points()));

    println!("\nStandings:\n");
    println!(
        " {:19} | {:>6} | {:>6} | {:>5} | {:>5} | {:>7} | {:>6} | {:>5}",
        "player", "points", "games", "dark", "light", "forfeit", "losses", "draws"
    );
    println!("{}", "-".repeat(86));
    for idx in order {
        let t = &totals[idx];
        println!(
            " {:19} | {:6.1} | {:6} | {:5} | {:5} | {:7} | {:6} | {:5}",
            player_configs[idx].nick,
            t.points(),
            t.games,
            t.wins_as_dark,
            t.wins_as_light,
            t.wins_by_forfeit,
            t.losses,
            t.draws
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level, args.engine_log_level);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = match args.record_games_to_directory {
        Some(dir_path) => Some(Recorder::new(dir_path)?),
        None => None,
    };

    let player_configs = args
        .player_configs
        .iter()
        .map(|path| PlayerConfig::load(path))
        .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?;

    let mut totals = vec![PlayerTotals::default(); player_configs.len()];
    for (i1, i2) in (0..player_configs.len()).tuple_combinations() {
        let mut player_1 = Player::from_config(&player_configs[i1])?;
        let mut player_2 = Player::from_config(&player_configs[i2])?;

        let score = play_matchup(
            [&mut player_1, &mut player_2],
            args.num_games,
            &mut rng,
            args.stop_on_illegal_move,
            &mut recorder,
        )?;
        totals[i1].add(&score, 0);
        totals[i2].add(&score, 1);
    }

    if player_configs.len() > 2 {
        print_standings(&player_configs, &totals);
    }

    Ok(())
}

/// Logs to stderr with event targets, so engine messages can be told apart
/// from the judge's own and filtered separately.
fn initialize_logging(level: LevelFilter, engine_level: LevelFilter) {
    let format = tracing_subscriber::fmt::format().with_target(true).compact();

    let filter = Targets::new()
        .with_default(level)
        .with_target("pentago", engine_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
