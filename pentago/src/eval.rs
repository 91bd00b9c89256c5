use crate::{Board, Cell, Side, RUN_LENGTH, WINDOWS};

/// Value of a five-cell window holding `n` markers of one side and none of the other.
///
/// A full window is a completed run, so it dwarfs everything else.
pub const WINDOW_WEIGHTS: [i32; RUN_LENGTH + 1] = [0, 1, 3, 7, 18, 10_000];

/// The four cells around the middle of the board.
pub const CENTER_CELLS: [usize; 4] = [14, 15, 20, 21];

pub const CENTER_BONUS: i32 = 2;

/// Heuristic value of a board from the point of view of `side`.
///
/// Positive values favour `side`. Each five-cell window that contains only one
/// side's markers adds (or subtracts) [`WINDOW_WEIGHTS`] for its occupancy;
/// windows containing both colors are dead and add nothing. Holding a center
/// cell adds [`CENTER_BONUS`].
pub fn score(board: &Board, side: Side) -> i32 {
    let own = Cell::from(side);
    let other = Cell::from(side.opponent());

    let mut total = 0;
    for window in WINDOWS.iter() {
        let (mut mine, mut theirs) = (0, 0);
        for &idx in window {
            let cell = board[idx];
            if cell == own {
                mine += 1;
            } else if cell == other {
                theirs += 1;
            }
        }
        match (mine, theirs) {
            (0, 0) => {}
            (n, 0) => total += WINDOW_WEIGHTS[n],
            (0, n) => total -= WINDOW_WEIGHTS[n],
            _ => {}
        }
    }
    for idx in CENTER_CELLS {
        if board[idx] == own {
            total += CENTER_BONUS;
        } else if board[idx] == other {
            total -= CENTER_BONUS;
        }
    }
    total
}

/// Simple marker count: dark markers minus light markers, including a
/// marker that is placed but not yet committed.
pub fn material_balance(board: &Board, pending: Option<(usize, Side)>) -> i32 {
    let mut balance = board.count(Cell::Dark) as i32 - board.count(Cell::Light) as i32;
    if let Some((cell, side)) = pending {
        if board[cell].is_empty() {
            balance += match side {
                Side::Dark => 1,
                Side::Light => -1,
            };
        }
    }
    balance
}
