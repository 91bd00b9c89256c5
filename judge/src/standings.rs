use pentago::Side;

use crate::game::{DrawKind, GameResult};

/// The results of all games between two players.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub wins_as_dark: [usize; 2],
    pub wins_as_light: [usize; 2],
    /// Wins because the opponent played an illegal move.
    pub wins_by_forfeit: [usize; 2],
    pub draws_both_runs: usize,
    pub draws_board_full: usize,
    /// Summed length of all games that ended with a completed run.
    pub moves_in_won_games: usize,
}

impl MatchScore {
    pub fn record(&mut self, result: &GameResult) {
        match *result {
            GameResult::WonByPlayer {
                player_idx,
                side,
                num_moves,
            } => {
                match side {
                    Side::Dark => self.wins_as_dark[player_idx] += 1,
                    Side::Light => self.wins_as_light[player_idx] += 1,
                }
                self.moves_in_won_games += num_moves;
            }
            GameResult::Draw {
                kind: DrawKind::BothRuns,
            } => self.draws_both_runs += 1,
            GameResult::Draw {
                kind: DrawKind::BoardFull,
            } => self.draws_board_full += 1,
            GameResult::IllegalMoveByPlayer { player_idx, .. } => {
                self.wins_by_forfeit[1 - player_idx] += 1;
            }
        }
    }

    pub fn wins(&self, player_idx: usize) -> usize {
        self.wins_as_dark[player_idx]
            + self.wins_as_light[player_idx]
            + self.wins_by_forfeit[player_idx]
    }

    pub fn draws(&self) -> usize {
        self.draws_both_runs + self.draws_board_full
    }

    pub fn num_games(&self) -> usize {
        self.wins(0) + self.wins(1) + self.draws()
    }

    pub fn percentage(&self, count: usize) -> f32 {
        match self.num_games() {
            0 => 0.0,
            n => count as f32 / n as f32 * 100.0,
        }
    }

    /// Average number of moves in games won on the board.
    pub fn average_winning_length(&self) -> Option<f32> {
        let won = self.wins_as_dark[0] + self.wins_as_dark[1] + self.wins_as_light[0] + self.wins_as_light[1];
        (won > 0).then(|| self.moves_in_won_games as f32 / won as f32)
    }

    pub fn summary(&self, names: [&str; 2]) -> String {
        let mut text = String::from("End result:\n");
        for (idx, name) in names.iter().enumerate() {
            text += &format!(
                "- {} wins by {} ({} as dark, {} as light",
                self.wins(idx),
                name,
                self.wins_as_dark[idx],
                self.wins_as_light[idx]
            );
            if self.wins_by_forfeit[idx] > 0 {
                text += &format!(", {} through illegal moves", self.wins_by_forfeit[idx]);
            }
            text += ")\n";
        }
        text += &format!(
            "- {} draws ({} with both runs, {} on a full board)",
            self.draws(),
            self.draws_both_runs,
            self.draws_board_full
        );
        if let Some(avg) = self.average_winning_length() {
            text += &format!("\n- won games took {:.1} moves on average", avg);
        }
        text
    }
}

/// One player's results summed over all of their pairings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub games: usize,
    pub wins_as_dark: usize,
    pub wins_as_light: usize,
    pub wins_by_forfeit: usize,
    pub losses: usize,
    pub draws: usize,
}

impl PlayerTotals {
    /// Adds a pairing in which this player was `player_idx`.
    pub fn add(&mut self, score: &MatchScore, player_idx: usize) {
        self.games += score.num_games();
        self.wins_as_dark += score.wins_as_dark[player_idx];
        self.wins_as_light += score.wins_as_light[player_idx];
        self.wins_by_forfeit += score.wins_by_forfeit[player_idx];
        self.losses += score.wins(1 - player_idx);
        self.draws += score.draws();
    }

    pub fn wins(&self) -> usize {
        self.wins_as_dark + self.wins_as_light + self.wins_by_forfeit
    }

    /// A win counts one point, a draw half a point.
    pub fn points(&self) -> f32 {
        self.wins() as f32 + self.draws as f32 / 2.0
    }
}
