use crate::{Board, Cell, CellSet, Side, Snapshot, BOARD_SIZE};

fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Dark => 'X',
        Cell::Light => 'O',
    }
}

fn draw(board: &Board, pending: Option<(usize, Side)>, highlighted: CellSet) -> String {
    let mut result = String::from("    0 1 2   3 4 5\n  ╭───────┬───────╮\n");
    for row in 0..BOARD_SIZE {
        if row == 3 {
            result += "  ├───────┼───────┤\n";
        }
        result += &format!("{} │", row);
        for col in 0..BOARD_SIZE {
            let idx = Board::index_of(row, col);
            result.push(if highlighted.contains(idx) { '*' } else { ' ' });
            result.push(match pending {
                Some((cell, side)) if cell == idx => {
                    symbol(Cell::from(side)).to_ascii_lowercase()
                }
                _ => symbol(board[idx]),
            });
            if col == 2 || col == 5 {
                result += " │";
            }
        }
        result.push('\n');
    }
    result += "  ╰───────┴───────╯";
    result
}

/// Draws the board with its quadrants. Dark is `X`, light is `O`.
pub fn visualize_board(board: &Board) -> String {
    draw(board, None, CellSet::new())
}

/// Like [`visualize_board()`], but also shows the pending marker in lowercase
/// and puts a `*` before every cell of a completed run.
pub fn visualize_snapshot(snapshot: &Snapshot) -> String {
    let pending = snapshot.turn.pending_cell.zip(snapshot.turn.pending_side);
    draw(&snapshot.board, pending, snapshot.win.cells())
}
