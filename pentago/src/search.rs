use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    find_winning_cells, score, Board, Cell, Direction, Move, Outcome, Quadrant, Side,
};

/// Score given to a candidate that hands the win to the opponent.
const LOSING_SCORE: i32 = -1_000_000;

/// Tuning knobs for [`choose_move()`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How many of the best-scoring candidates are kept.
    pub top_k: usize,
    /// The move is picked uniformly among this many of the kept candidates.
    pub pick_among: usize,
    /// At most this many opponent replies are checked for an immediate win.
    /// `0` disables the lookahead.
    pub reply_sample_cap: usize,
    /// Subtracted from a candidate's score if a sampled reply wins for the opponent.
    pub reply_penalty: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            pick_among: 3,
            reply_sample_cap: 48,
            reply_penalty: 50_000,
        }
    }
}

impl SearchConfig {
    /// Always plays the single best candidate.
    pub fn deterministic() -> Self {
        Self {
            top_k: 1,
            pick_among: 1,
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

/// Every full move on this board: each empty cell, combined with each
/// quadrant and direction. That's at most 36 * 4 * 2 = 288 moves.
pub fn candidate_moves(board: &Board) -> impl Iterator<Item = Move> + '_ {
    board.empty_cells().flat_map(|cell| {
        Quadrant::ALL.into_iter().flat_map(move |quadrant| {
            Direction::ALL
                .into_iter()
                .map(move |direction| Move::new(cell, quadrant, direction))
        })
    })
}

/// The board after `side` plays `mv`. The input board is not modified.
pub fn apply_move(board: &Board, side: Side, mv: Move) -> Board {
    debug_assert!(board[mv.cell].is_empty());
    let mut board = *board;
    board.set(mv.cell, Cell::from(side));
    board.rotate(mv.quadrant, mv.direction);
    board
}

/// Does the opponent have a winning reply among a random sample of their moves?
fn opponent_can_win<R: Rng + ?Sized>(
    board: &Board,
    opponent: Side,
    config: &SearchConfig,
    rng: &mut R,
) -> bool {
    if config.reply_sample_cap == 0 {
        return false;
    }
    let replies: Vec<Move> = candidate_moves(board).collect();
    replies
        .choose_multiple(rng, config.reply_sample_cap)
        .any(|&reply| {
            find_winning_cells(&apply_move(board, opponent, reply)).outcome()
                == Some(Outcome::Won(opponent))
        })
}

/// Picks a move for `side`, or `None` if the board is full.
///
/// A move that wins on the spot is returned immediately. Otherwise every
/// candidate is scored with [`score()`], penalised if the opponent can win
/// right after it, and the move is drawn uniformly from the best few, so the
/// opponent doesn't always play the same game.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    config: &SearchConfig,
    rng: &mut R,
) -> Option<Move> {
    let mut scored: Vec<(i32, Move)> = Vec::new();
    for mv in candidate_moves(board) {
        let after = apply_move(board, side, mv);
        let value = match find_winning_cells(&after).outcome() {
            Some(Outcome::Won(winner)) if winner == side => {
                debug!(%mv, "Found winning move");
                return Some(mv);
            }
            Some(Outcome::Won(_)) => LOSING_SCORE,
            Some(Outcome::Draw) => 0,
            None => {
                let mut value = score(&after, side);
                if opponent_can_win(&after, side.opponent(), config, rng) {
                    value -= config.reply_penalty;
                }
                value
            }
        };
        trace!(%mv, value, "Scored candidate");
        scored.push((value, mv));
    }

    // Stable, so equal scores stay in enumeration order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(config.top_k.max(1));
    let pick_among = config.pick_among.max(1).min(scored.len());
    let (value, mv) = *scored[..pick_among].choose(rng)?;
    debug!(%mv, value, best = scored[0].0, "Chose move");
    Some(mv)
}
