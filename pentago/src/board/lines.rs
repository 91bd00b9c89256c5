use super::BOARD_SIZE;

/// Length of a winning run.
pub const RUN_LENGTH: usize = 5;

/// A straight line of cells across the board, at least [`RUN_LENGTH`] long.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    cells: [usize; BOARD_SIZE],
    len: usize,
}

impl Line {
    const fn walk(row: isize, col: isize, d_row: isize, d_col: isize) -> Line {
        let mut cells = [0; BOARD_SIZE];
        let mut len = 0;
        let (mut r, mut c) = (row, col);
        let size = BOARD_SIZE as isize;
        while r >= 0 && r < size && c >= 0 && c < size {
            cells[len] = r as usize * BOARD_SIZE + c as usize;
            len += 1;
            r += d_row;
            c += d_col;
        }
        Line { cells, len }
    }

    /// The board indices along this line, in walking order.
    pub fn cells(&self) -> &[usize] {
        &self.cells[..self.len]
    }
}

/// Every row, column and diagonal long enough to hold a run of five.
///
/// On a 6x6 board that is 6 rows, 6 columns, and three diagonals in each
/// direction: the main one plus the two length-5 diagonals next to it.
pub const LINES: [Line; 18] = [
    // Rows
    Line::walk(0, 0, 0, 1),
    Line::walk(1, 0, 0, 1),
    Line::walk(2, 0, 0, 1),
    Line::walk(3, 0, 0, 1),
    Line::walk(4, 0, 0, 1),
    Line::walk(5, 0, 0, 1),
    // Columns
    Line::walk(0, 0, 1, 0),
    Line::walk(0, 1, 1, 0),
    Line::walk(0, 2, 1, 0),
    Line::walk(0, 3, 1, 0),
    Line::walk(0, 4, 1, 0),
    Line::walk(0, 5, 1, 0),
    // Diagonals going down and right
    Line::walk(0, 0, 1, 1),
    Line::walk(0, 1, 1, 1),
    Line::walk(1, 0, 1, 1),
    // Diagonals going down and left
    Line::walk(0, 5, 1, -1),
    Line::walk(0, 4, 1, -1),
    Line::walk(1, 5, 1, -1),
];

/// Number of distinct five-cell windows on the board.
pub const NUM_WINDOWS: usize = 32;

/// Every run of five consecutive cells that could become a winning line.
pub const WINDOWS: [[usize; RUN_LENGTH]; NUM_WINDOWS] = windows();

const fn windows() -> [[usize; RUN_LENGTH]; NUM_WINDOWS] {
    let mut windows = [[0; RUN_LENGTH]; NUM_WINDOWS];
    let mut n = 0;
    let mut line_idx = 0;
    while line_idx < LINES.len() {
        let line = &LINES[line_idx];
        let mut start = 0;
        while start + RUN_LENGTH <= line.len {
            let mut k = 0;
            while k < RUN_LENGTH {
                windows[n][k] = line.cells[start + k];
                k += 1;
            }
            n += 1;
            start += 1;
        }
        line_idx += 1;
    }
    assert!(n == NUM_WINDOWS);
    windows
}
