use pentago::{visualize_snapshot, GameSession, Outcome, Side, NUM_CELLS};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::error::IllegalMove;
use crate::player::Participant;
use crate::recording::Recorder;

/// How a drawn game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    /// One move completed a run for both sides.
    BothRuns,
    /// The last empty cell was filled without any run.
    BoardFull,
}

impl std::fmt::Display for DrawKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawKind::BothRuns => write!(f, "both sides completed a run"),
            DrawKind::BoardFull => write!(f, "board full"),
        }
    }
}

#[derive(Debug)]
pub enum GameResult {
    WonByPlayer {
        player_idx: usize,
        side: Side,
        num_moves: usize,
    },
    Draw {
        kind: DrawKind,
    },
    IllegalMoveByPlayer {
        player_idx: usize,
        err: IllegalMove,
    },
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::WonByPlayer {
                player_idx,
                side,
                num_moves,
            } => write!(
                f,
                "Won by player {} as {} after {} moves",
                player_idx + 1,
                side,
                num_moves
            ),
            GameResult::Draw { kind } => write!(f, "Draw ({})", kind),
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                write!(f, "Illegal move by player {}: {}", player_idx + 1, err)
            }
        }
    }
}

/// Referees one game between two participants.
///
/// Returns an error only on communication failure, not when an
/// illegal move is played.
pub fn play_game<'a, R: Rng + ?Sized>(
    rng: &mut R,
    player_1: &'a mut dyn Participant,
    player_2: &'a mut dyn Participant,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    // Assign the sides randomly; dark moves first
    let sides = {
        let mut arr = [Side::Dark, Side::Light];
        arr.shuffle(rng);
        arr
    };
    let mut players = [player_1, player_2];

    // Inform the players about the new game, so that they can reset their state
    for (player, &side) in players.iter_mut().zip(&sides) {
        player.new_game(recorder, side)?;
    }

    let mut session = GameSession::new();
    let mut num_moves = 0;
    let game_result = loop {
        let side = session.active_side();
        let player_idx = if sides[0] == side { 0 } else { 1 };
        let mv = players[player_idx].play_turn(recorder, side, *session.board())?;
        trace!(player = players[player_idx].name(), %mv, "Received move");

        if mv.cell >= NUM_CELLS {
            break GameResult::IllegalMoveByPlayer {
                player_idx,
                err: IllegalMove::CellOutOfRange { cell: mv.cell },
            };
        }
        if let Err(err) = session.play(mv) {
            break GameResult::IllegalMoveByPlayer {
                player_idx,
                err: IllegalMove::Refused { mv, err },
            };
        }
        num_moves += 1;

        match session.outcome() {
            None => {}
            Some(Outcome::Draw) => {
                // A draw with highlighted cells means both sides completed a run
                let kind = if session.win().is_empty() {
                    DrawKind::BoardFull
                } else {
                    DrawKind::BothRuns
                };
                break GameResult::Draw { kind };
            }
            Some(Outcome::Won(winner)) => {
                let player_idx = if sides[0] == winner { 0 } else { 1 };
                break GameResult::WonByPlayer {
                    player_idx,
                    side: winner,
                    num_moves,
                };
            }
        }
    };
    debug!("Final position:\n{}", visualize_snapshot(&session.snapshot()));

    if let Some(rec) = recorder {
        rec.write_game_recording(*session.board(), &game_result.to_string())?;
    }

    Ok(game_result)
}

#[cfg(test)]
mod tests {
    use pentago::{choose_move, Board, Direction, Move, Quadrant, RuleViolation, SearchConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct Searcher {
        rng: StdRng,
    }

    impl Participant for Searcher {
        fn name(&self) -> &str {
            "searcher"
        }

        fn new_game(&mut self, _recorder: &mut Option<Recorder>, _side: Side) -> anyhow::Result<()> {
            Ok(())
        }

        fn play_turn(
            &mut self,
            _recorder: &mut Option<Recorder>,
            side: Side,
            board: Board,
        ) -> anyhow::Result<Move> {
            let config = SearchConfig {
                reply_sample_cap: 8,
                ..SearchConfig::default()
            };
            choose_move(&board, side, &config, &mut self.rng)
                .ok_or_else(|| anyhow::anyhow!("Asked to move on a full board"))
        }
    }

    /// Always plays the same move.
    struct Stubborn(Move);

    impl Participant for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn new_game(&mut self, _recorder: &mut Option<Recorder>, _side: Side) -> anyhow::Result<()> {
            Ok(())
        }

        fn play_turn(
            &mut self,
            _recorder: &mut Option<Recorder>,
            _side: Side,
            _board: Board,
        ) -> anyhow::Result<Move> {
            Ok(self.0)
        }
    }

    #[test]
    fn searchers_finish_their_games() {
        let mut rng = StdRng::seed_from_u64(11);
        for seed in 0..3 {
            let mut a = Searcher {
                rng: StdRng::seed_from_u64(seed),
            };
            let mut b = Searcher {
                rng: StdRng::seed_from_u64(seed + 100),
            };
            let result = play_game(&mut rng, &mut a, &mut b, &mut None).unwrap();
            match result {
                // The winner placed at least five stones
                GameResult::WonByPlayer { side, num_moves, .. } => {
                    let min_moves = if side == Side::Dark { 9 } else { 10 };
                    assert!(num_moves >= min_moves, "{}", result);
                }
                GameResult::Draw { .. } => {}
                GameResult::IllegalMoveByPlayer { .. } => panic!("{}", result),
            }
        }
    }

    #[test]
    fn repeating_a_move_is_illegal() {
        // The center of the top-left quadrant stays put when the bottom-right one turns
        let mut stubborn = Stubborn(Move::new(7, Quadrant::BottomRight, Direction::Clockwise));
        let mut searcher = Searcher {
            rng: StdRng::seed_from_u64(5),
        };
        let mut rng = StdRng::seed_from_u64(2);
        match play_game(&mut rng, &mut stubborn, &mut searcher, &mut None).unwrap() {
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                assert_eq!(player_idx, 0);
                assert!(matches!(
                    err,
                    IllegalMove::Refused {
                        err: RuleViolation::CellLocked { cell: 7 },
                        ..
                    } | IllegalMove::Refused {
                        err: RuleViolation::CellOccupied { cell: 7 },
                        ..
                    }
                ));
            }
            other => panic!("unexpected result {}", other),
        }
    }

    #[test]
    fn off_board_cell_is_illegal() {
        let mut stubborn = Stubborn(Move::new(36, Quadrant::TopLeft, Direction::Clockwise));
        let mut other = Stubborn(Move::new(36, Quadrant::TopLeft, Direction::Clockwise));
        let mut rng = StdRng::seed_from_u64(0);
        let result = play_game(&mut rng, &mut stubborn, &mut other, &mut None).unwrap();
        assert!(matches!(
            result,
            GameResult::IllegalMoveByPlayer {
                err: IllegalMove::CellOutOfRange { cell: 36 },
                ..
            }
        ));
    }

    #[test]
    fn draw_kinds_are_named() {
        assert_eq!(
            GameResult::Draw {
                kind: DrawKind::BothRuns
            }
            .to_string(),
            "Draw (both sides completed a run)"
        );
        assert_eq!(
            GameResult::Draw {
                kind: DrawKind::BoardFull
            }
            .to_string(),
            "Draw (board full)"
        );
    }

    #[test]
    fn recording_is_written() {
        let dir = std::env::temp_dir().join(format!("pentago_judge_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut recorder = Some(Recorder::new(dir.clone()).unwrap());
        let mut a = Searcher {
            rng: StdRng::seed_from_u64(1),
        };
        let mut b = Searcher {
            rng: StdRng::seed_from_u64(2),
        };
        let mut rng = StdRng::seed_from_u64(3);
        play_game(&mut rng, &mut a, &mut b, &mut recorder).unwrap();
        let text = std::fs::read_to_string(dir.join("game_000001.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["final_board"].as_array().unwrap().len(), NUM_CELLS);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
