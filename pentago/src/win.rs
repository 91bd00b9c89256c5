use crate::{Board, Cell, CellSet, Side, LINES, RUN_LENGTH};

/// The cells that form runs of five or more, per side.
///
/// An empty result means nobody has won. Runs longer than five contribute all
/// of their cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WinResult {
    dark: CellSet,
    light: CellSet,
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won(Side),
    /// Both sides completed a run in the same turn, or the board filled up
    /// without any run.
    Draw,
}

impl WinResult {
    pub fn is_empty(self) -> bool {
        self.dark.is_empty() && self.light.is_empty()
    }

    /// All winning cells, of both sides.
    pub fn cells(self) -> CellSet {
        self.dark | self.light
    }

    pub fn cells_of(self, side: Side) -> CellSet {
        match side {
            Side::Dark => self.dark,
            Side::Light => self.light,
        }
    }

    /// The outcome implied by these runs, or `None` if there are none.
    ///
    /// Runs for both sides at once count as a draw.
    pub fn outcome(self) -> Option<Outcome> {
        match (self.dark.is_empty(), self.light.is_empty()) {
            (true, true) => None,
            (false, true) => Some(Outcome::Won(Side::Dark)),
            (true, false) => Some(Outcome::Won(Side::Light)),
            (false, false) => Some(Outcome::Draw),
        }
    }

    fn add_run(&mut self, color: Cell, run: CellSet) {
        if run.len() < RUN_LENGTH as u32 {
            return;
        }
        match color.side() {
            Some(Side::Dark) => self.dark |= run,
            Some(Side::Light) => self.light |= run,
            None => {}
        }
    }
}

/// Scans every row, column and diagonal for runs of at least five markers of
/// the same color.
pub fn find_winning_cells(board: &Board) -> WinResult {
    let mut result = WinResult::default();
    for line in LINES.iter() {
        let mut run_color = Cell::Empty;
        let mut run = CellSet::new();
        for &idx in line.cells() {
            let cell = board[idx];
            if cell == run_color {
                run = run.insert(idx);
            } else {
                result.add_run(run_color, run);
                run_color = cell;
                run = CellSet::new().insert(idx);
            }
        }
        result.add_run(run_color, run);
    }
    result
}
