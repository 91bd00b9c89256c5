use serde::{Deserialize, Serialize};

use crate::{Board, Direction, Quadrant, Side};

/// Request for a bot to do something.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Request to reset the bot's state for a new game.
    ///
    /// The response should be an [`Okay`].
    NewGame { side: Side },
    /// Request to play the next turn.
    ///
    /// The response should be a [`Move`] whose cell is empty on `board`.
    PlayTurn {
        /// The side the bot plays in this game.
        side: Side,
        /// The 36 cells in row-major order, `0` empty, `1` dark, `2` light.
        board: Board,
    },
    /// The bot should shut down.
    Bye,
}

/// Dummy struct for use in bot communication.
///
/// Used to signal an acknowledgement without data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Okay();

/// A complete turn: where to place the marker, then which quadrant to turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub cell: usize,
    pub quadrant: Quadrant,
    pub direction: Direction,
}

impl Move {
    pub fn new(cell: usize, quadrant: Quadrant, direction: Direction) -> Self {
        Self {
            cell,
            quadrant,
            direction,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} {}", self.cell, self.quadrant, self.direction)
    }
}
