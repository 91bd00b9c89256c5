mod lines;
mod quadrant;

use std::ops::Index;

pub use lines::*;
pub use quadrant::*;

use serde::{Deserialize, Serialize};

use crate::InvalidValue;

/// Number of rows (and columns) of the board.
pub const BOARD_SIZE: usize = 6;

/// Number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Moves first.
    Dark,
    Light,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Dark => Side::Light,
            Side::Light => Side::Dark,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Dark => write!(f, "Dark"),
            Side::Light => write!(f, "Light"),
        }
    }
}

/// The content of a single cell.
///
/// On the wire, cells are the numbers `0` (empty), `1` (dark) and `2` (light).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Dark = 1,
    Light = 2,
}

impl Cell {
    /// The side owning the marker in this cell, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Dark => Some(Side::Dark),
            Cell::Light => Some(Side::Light),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Cell {
        match side {
            Side::Dark => Cell::Dark,
            Side::Light => Cell::Light,
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell as u8
    }
}

impl TryFrom<u8> for Cell {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Dark),
            2 => Ok(Cell::Light),
            _ => Err(InvalidValue::Cell(value)),
        }
    }
}

/// The 6x6 playing board, stored as 36 cells in row-major order.
///
/// Cell `i` is at row `i / 6`, column `i % 6`. The board is [`Copy`], so search
/// code can freely simulate moves on a copy without touching the live game.
///
/// Indices must be below [`NUM_CELLS`]; anything else is a bug in the caller
/// and panics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Cell>", try_from = "Vec<Cell>")]
pub struct Board {
    cells: [Cell; NUM_CELLS],
}

// Arrays longer than 32 don't implement `Default`
impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [Cell::Empty; NUM_CELLS],
        }
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; NUM_CELLS]) -> Self {
        Self { cells }
    }

    /// The index of the cell at the given row and column.
    pub fn index_of(row: usize, col: usize) -> usize {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "coordinates ({}, {}) are outside the board",
            row,
            col
        );
        row * BOARD_SIZE + col
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells[checked(index)]
    }

    /// Overwrites a single cell, without any game rules applied.
    pub fn set(&mut self, index: usize, value: Cell) {
        self.cells[checked(index)] = value;
    }

    pub fn cells(&self) -> &[Cell; NUM_CELLS] {
        &self.cells
    }

    /// Reads the 9 cells of a quadrant, in row-major order of the quadrant's own frame.
    pub fn extract_quadrant(&self, quadrant: Quadrant) -> [Cell; 9] {
        quadrant.cells().map(|idx| self.cells[idx])
    }

    /// Inverse of [`Self::extract_quadrant()`]. Only the quadrant's cells are written.
    pub fn write_quadrant(&mut self, quadrant: Quadrant, values: [Cell; 9]) {
        for (idx, value) in quadrant.cells().into_iter().zip(values) {
            self.cells[idx] = value;
        }
    }

    /// Rotates one quadrant in place.
    pub fn rotate(&mut self, quadrant: Quadrant, direction: Direction) {
        let rotated = direction.rotate_local(self.extract_quadrant(quadrant));
        self.write_quadrant(quadrant, rotated);
    }

    /// Returns a copy of this board with one quadrant rotated.
    #[must_use]
    pub fn rotated(&self, quadrant: Quadrant, direction: Direction) -> Board {
        let mut board = *self;
        board.rotate(quadrant, direction);
        board
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Indices of all empty cells, ascending.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(idx, _)| idx)
    }
}

fn checked(index: usize) -> usize {
    assert!(
        index < NUM_CELLS,
        "cell index {} is out of range (0..{})",
        index,
        NUM_CELLS
    );
    index
}

impl Index<usize> for Board {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[checked(index)]
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Vec<Cell> {
        board.cells.to_vec()
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = InvalidValue;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        let len = cells.len();
        let cells: [Cell; NUM_CELLS] = cells
            .try_into()
            .map_err(|_| InvalidValue::BoardLength(len))?;
        Ok(Self { cells })
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity(NUM_CELLS * 2);
        for (idx, cell) in self.cells.iter().enumerate() {
            s.push(match cell {
                Cell::Empty => '.',
                Cell::Dark => 'X',
                Cell::Light => 'O',
            });
            s.push(if idx % BOARD_SIZE == BOARD_SIZE - 1 {
                '\n'
            } else {
                ' '
            });
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
pub(crate) fn board_from_str(s: &str) -> Board {
    let cells: Vec<Cell> = s
        .chars()
        .filter_map(|c| match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::Dark),
            'O' => Some(Cell::Light),
            _ => None,
        })
        .collect();
    Board::try_from(cells).unwrap()
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn four_rotations_are_identity(board: Board, quadrant: Quadrant, direction: Direction) -> bool {
            let mut rotated = board;
            for _ in 0..4 {
                rotated.rotate(quadrant, direction);
            }
            rotated == board
        }

        fn opposite_rotation_undoes(board: Board, quadrant: Quadrant, direction: Direction) -> bool {
            board.rotated(quadrant, direction).rotated(quadrant, direction.reversed()) == board
        }

        fn rotation_only_touches_its_quadrant(board: Board, quadrant: Quadrant, direction: Direction) -> bool {
            let rotated = board.rotated(quadrant, direction);
            (0..NUM_CELLS)
                .filter(|&idx| !quadrant.contains(idx))
                .all(|idx| rotated[idx] == board[idx])
        }

        fn rotation_keeps_marker_counts(board: Board, quadrant: Quadrant, direction: Direction) -> bool {
            let rotated = board.rotated(quadrant, direction);
            [Cell::Empty, Cell::Dark, Cell::Light]
                .into_iter()
                .all(|cell| rotated.count(cell) == board.count(cell))
        }

        fn extract_write_roundtrip(board: Board, quadrant: Quadrant) -> bool {
            let mut copy = Board::new();
            for q in Quadrant::ALL {
                copy.write_quadrant(q, board.extract_quadrant(q));
            }
            copy == board && copy.extract_quadrant(quadrant) == board.extract_quadrant(quadrant)
        }
    }

    #[test]
    fn clockwise_moves_bottom_right_corner_to_bottom_left() {
        let mut board = Board::new();
        board.set(14, Cell::Dark);
        board.rotate(Quadrant::TopLeft, Direction::Clockwise);
        assert_eq!(board[12], Cell::Dark);
        assert_eq!(board[14], Cell::Empty);
        assert_eq!(board.count(Cell::Dark), 1);
    }

    #[test]
    fn counter_clockwise_rotation_of_bottom_right_quadrant() {
        // Top row of the bottom-right quadrant: cells 21, 22, 23
        let mut board = Board::new();
        board.set(21, Cell::Dark);
        board.set(23, Cell::Light);
        board.rotate(Quadrant::BottomRight, Direction::CounterClockwise);
        // Local (0, 0) -> (2, 0) and local (0, 2) -> (0, 0)
        assert_eq!(board[Board::index_of(5, 3)], Cell::Dark);
        assert_eq!(board[Board::index_of(3, 3)], Cell::Light);
        assert_eq!(board.count(Cell::Empty), NUM_CELLS - 2);
    }

    #[test]
    fn extract_is_row_major_in_local_frame() {
        let mut board = Board::new();
        board.set(Board::index_of(0, 3), Cell::Dark);
        board.set(Board::index_of(2, 5), Cell::Light);
        let q = board.extract_quadrant(Quadrant::TopRight);
        assert_eq!(q[0], Cell::Dark);
        assert_eq!(q[8], Cell::Light);
    }

    #[test]
    fn default_board_is_empty() {
        assert_eq!(Board::default().count(Cell::Empty), NUM_CELLS);
        assert_eq!(Board::default(), Board::from_cells([Cell::Empty; NUM_CELLS]));
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        Board::new().get(NUM_CELLS);
    }

    #[test]
    fn board_wire_format() {
        let mut board = Board::new();
        board.set(0, Cell::Dark);
        board.set(35, Cell::Light);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with("[1,0,"));
        assert!(json.ends_with(",0,2]"));
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
        assert!(serde_json::from_str::<Board>("[0,1,2]").is_err());
        assert!(serde_json::from_str::<Board>(&json.replace("[1,", "[3,")).is_err());
    }

    #[test]
    fn empty_cells_and_fullness() {
        let mut board = board_from_str(&"XO".repeat(18));
        assert!(board.is_full());
        assert_eq!(board.empty_cells().count(), 0);
        board.set(7, Cell::Empty);
        assert!(!board.is_full());
        assert_eq!(board.empty_cells().collect::<Vec<_>>(), vec![7]);
    }
}
