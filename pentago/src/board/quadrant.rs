use serde::{Deserialize, Serialize};

use super::BOARD_SIZE;
use crate::InvalidValue;

/// One of the four 3x3 sub-grids that can be rotated.
///
/// On the wire, quadrants are their ids `0` to `3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

/// Which way a quadrant is turned.
///
/// On the wire, `1` is clockwise and `-1` counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Panics if `id` is not in `0..4`. Use [`Quadrant::try_from()`] for untrusted input.
    pub fn from_id(id: u8) -> Quadrant {
        match Quadrant::try_from(id) {
            Ok(quadrant) => quadrant,
            Err(_) => panic!("quadrant id {} is out of range (0..4)", id),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// The quadrant a cell belongs to.
    pub fn of_cell(index: usize) -> Quadrant {
        let (row, col) = (index / BOARD_SIZE, index % BOARD_SIZE);
        assert!(row < BOARD_SIZE, "cell index {} is out of range", index);
        match (row < 3, col < 3) {
            (true, true) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (false, false) => Quadrant::BottomRight,
        }
    }

    fn origin(self) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, 3),
            Quadrant::BottomLeft => (3, 0),
            Quadrant::BottomRight => (3, 3),
        }
    }

    /// The board indices of this quadrant's cells, row-major in the quadrant's frame.
    pub fn cells(self) -> [usize; 9] {
        let (row0, col0) = self.origin();
        std::array::from_fn(|local| (row0 + local / 3) * BOARD_SIZE + col0 + local % 3)
    }

    pub fn contains(self, index: usize) -> bool {
        let (row0, col0) = self.origin();
        let (row, col) = (index / BOARD_SIZE, index % BOARD_SIZE);
        (row0..row0 + 3).contains(&row) && (col0..col0 + 3).contains(&col)
    }
}

impl From<Quadrant> for u8 {
    fn from(quadrant: Quadrant) -> u8 {
        quadrant.id()
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = InvalidValue;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Quadrant::TopLeft),
            1 => Ok(Quadrant::TopRight),
            2 => Ok(Quadrant::BottomLeft),
            3 => Ok(Quadrant::BottomRight),
            _ => Err(InvalidValue::Quadrant(id)),
        }
    }
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Clockwise, Direction::CounterClockwise];

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Where the cell at a local (row-major) position ends up after rotating.
    ///
    /// Clockwise sends `(r, c)` to `(c, 2 - r)`, counter-clockwise to `(2 - c, r)`.
    pub fn destination(self, local: usize) -> usize {
        debug_assert!(local < 9);
        let (r, c) = (local / 3, local % 3);
        match self {
            Direction::Clockwise => c * 3 + (2 - r),
            Direction::CounterClockwise => (2 - c) * 3 + r,
        }
    }

    /// Rotates 9 values given in local row-major order.
    ///
    /// Reads only from `values` and writes only into a fresh array.
    pub fn rotate_local<T: Copy + Default>(self, values: [T; 9]) -> [T; 9] {
        let mut rotated = [T::default(); 9];
        for (from, value) in values.into_iter().enumerate() {
            rotated[self.destination(from)] = value;
        }
        rotated
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> i8 {
        match direction {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = InvalidValue;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Clockwise),
            -1 => Ok(Direction::CounterClockwise),
            _ => Err(InvalidValue::Direction(value)),
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        };
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "clockwise"),
            Direction::CounterClockwise => write!(f, "counter-clockwise"),
        }
    }
}
