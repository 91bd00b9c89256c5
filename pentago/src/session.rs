use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    find_winning_cells, material_balance, score, Board, Cell, CellSet, Direction, Move, Outcome,
    Quadrant, RecordError, RuleViolation, Seat, Side, StateRecord, WinResult, NUM_CELLS,
};

/// How many commits can be undone.
pub const HISTORY_CAP: usize = 50;

/// Where the current turn is in its placement/rotation protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the active side to pick a cell.
    #[serde(rename = "place")]
    Placing,
    /// A cell has been picked; waiting for the rotation and commit.
    #[serde(rename = "rotate")]
    RotationPending,
    #[serde(rename = "finished")]
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Placing => write!(f, "place"),
            Phase::RotationPending => write!(f, "rotate"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// A quadrant together with the direction to turn it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation {
    pub quadrant: Quadrant,
    pub direction: Direction,
}

/// Transient per-turn state.
///
/// `pending_cell` and `pending_side` are set exactly when `phase` is
/// [`Phase::RotationPending`]. The pending marker is only a preview, it is not
/// on the board until the commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub active_side: Side,
    pub phase: Phase,
    pub pending_cell: Option<usize>,
    pub pending_side: Option<Side>,
    pub rotation: Option<Rotation>,
}

impl Turn {
    fn initial() -> Self {
        Self {
            active_side: Side::Dark,
            phase: Phase::Placing,
            pending_cell: None,
            pending_side: None,
            rotation: None,
        }
    }

    fn clear_pending(&mut self) {
        self.pending_cell = None;
        self.pending_side = None;
    }
}

/// Who this session may act for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// This process writes for both sides, e.g. two players on one screen, or
    /// a player against the built-in opponent.
    Hotseat,
    /// Networked play: only the seat's side may act, and undo is disabled.
    Remote(Seat),
}

/// The state before one commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    board: Board,
    locked: CellSet,
    turn: Turn,
    win: WinResult,
}

/// A read-only view of the game after a mutation, for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub locked: CellSet,
    pub turn: Turn,
    pub win: WinResult,
    pub outcome: Option<Outcome>,
    /// [`score()`] of the previewed board for the active side.
    pub score: i32,
    /// [`material_balance()`] including the pending marker.
    pub material: i32,
}

impl Snapshot {
    /// The board with the pending marker drawn in.
    pub fn preview(&self) -> Board {
        let mut board = self.board;
        if let (Some(cell), Some(side)) = (self.turn.pending_cell, self.turn.pending_side) {
            board.set(cell, Cell::from(side));
        }
        board
    }
}

/// One game: the board, whose turn it is, and the undo history.
///
/// All mutations go through [`select_cell()`](Self::select_cell),
/// [`select_rotation()`](Self::select_rotation), [`commit()`](Self::commit),
/// [`undo()`](Self::undo), [`reset()`](Self::reset) and
/// [`apply_record()`](Self::apply_record).
///
/// Actions that break the rules return a [`RuleViolation`] and leave the
/// session exactly as it was. Cell indices outside the board are a caller bug
/// and panic.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    /// Cells holding committed markers. Locks rotate together with the markers.
    locked: CellSet,
    turn: Turn,
    win: WinResult,
    history: VecDeque<HistoryEntry>,
    control: Control,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A fresh game under [`Control::Hotseat`].
    pub fn new() -> Self {
        Self::with_control(Control::Hotseat)
    }

    pub fn with_control(control: Control) -> Self {
        Self {
            board: Board::new(),
            locked: CellSet::new(),
            turn: Turn::initial(),
            win: WinResult::default(),
            history: VecDeque::new(),
            control,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn active_side(&self) -> Side {
        self.turn.active_side
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn win(&self) -> WinResult {
        self.win
    }

    pub fn locked(&self) -> CellSet {
        self.locked
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `None` while the game is running.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.turn.phase {
            Phase::Finished => Some(self.win.outcome().unwrap_or(Outcome::Draw)),
            _ => None,
        }
    }

    /// Whether this session may act for the side whose turn it is.
    pub fn can_act(&self) -> bool {
        match self.control {
            Control::Hotseat => true,
            Control::Remote(seat) => seat.side() == Some(self.turn.active_side),
        }
    }

    fn check_may_act(&self) -> Result<(), RuleViolation> {
        if self.turn.phase == Phase::Finished {
            Err(RuleViolation::GameFinished)
        } else if !self.can_act() {
            Err(RuleViolation::NotYourTurn)
        } else {
            Ok(())
        }
    }

    /// Tentatively places the active side's marker.
    ///
    /// Picking another cell before committing replaces the pending cell and
    /// keeps the selected rotation.
    pub fn select_cell(&mut self, cell: usize) -> Result<(), RuleViolation> {
        assert!(cell < NUM_CELLS, "cell index {} is out of range", cell);
        self.check_may_act()?;
        if self.locked.contains(cell) {
            return Err(RuleViolation::CellLocked { cell });
        }
        if !self.board[cell].is_empty() {
            return Err(RuleViolation::CellOccupied { cell });
        }
        self.turn.pending_cell = Some(cell);
        self.turn.pending_side = Some(self.turn.active_side);
        self.turn.phase = Phase::RotationPending;
        trace!(cell, side = %self.turn.active_side, "Selected cell");
        Ok(())
    }

    /// Chooses the rotation to apply on commit. Does not touch the board.
    pub fn select_rotation(
        &mut self,
        quadrant: Quadrant,
        direction: Direction,
    ) -> Result<(), RuleViolation> {
        self.check_may_act()?;
        self.turn.rotation = Some(Rotation {
            quadrant,
            direction,
        });
        Ok(())
    }

    /// Places the pending marker, rotates, and checks for a winner.
    ///
    /// Without a winner (and with room left on the board), the other side
    /// gets the turn. Otherwise the game is finished and the active side
    /// stays on the side that just moved.
    pub fn commit(&mut self) -> Result<(), RuleViolation> {
        self.check_may_act()?;
        let (cell, side) = match (self.turn.pending_cell, self.turn.pending_side) {
            (Some(cell), Some(side)) => (cell, side),
            _ => return Err(RuleViolation::NoPendingCell),
        };
        let Rotation {
            quadrant,
            direction,
        } = self.turn.rotation.ok_or(RuleViolation::NoRotationSelected)?;

        self.push_history();

        self.board.set(cell, Cell::from(side));
        self.locked = self.locked.insert(cell);
        self.board.rotate(quadrant, direction);
        self.locked = self.locked.rotated(quadrant, direction);
        self.win = find_winning_cells(&self.board);

        self.turn.clear_pending();
        self.turn.rotation = None;
        if !self.win.is_empty() || self.board.is_full() {
            self.turn.phase = Phase::Finished;
            debug!(cell, %quadrant, %direction, %side, outcome = ?self.outcome(), "Game finished");
        } else {
            self.turn.phase = Phase::Placing;
            self.turn.active_side = side.opponent();
            debug!(cell, %quadrant, %direction, %side, "Committed move");
        }
        Ok(())
    }

    /// Plays a whole turn at once.
    ///
    /// If any step is refused, the session is left as it was before the call.
    pub fn play(&mut self, mv: Move) -> Result<(), RuleViolation> {
        let before = self.turn;
        let result = self
            .select_cell(mv.cell)
            .and_then(|_| self.select_rotation(mv.quadrant, mv.direction))
            .and_then(|_| self.commit());
        if result.is_err() {
            // A refused commit has not touched the board yet
            self.turn = before;
        }
        result
    }

    fn push_history(&mut self) {
        self.history.push_back(HistoryEntry {
            board: self.board,
            locked: self.locked,
            turn: self.turn,
            win: self.win,
        });
        if self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Restores the state from before the last commit.
    ///
    /// Only available under [`Control::Hotseat`], since a remote opponent
    /// would not see the rollback.
    pub fn undo(&mut self) -> Result<(), RuleViolation> {
        if self.control != Control::Hotseat {
            return Err(RuleViolation::UndoUnavailable);
        }
        let entry = self.history.pop_back().ok_or(RuleViolation::NothingToUndo)?;
        self.board = entry.board;
        self.locked = entry.locked;
        self.turn = entry.turn;
        self.win = entry.win;
        debug!(remaining = self.history.len(), "Undid commit");
        Ok(())
    }

    /// Starts over with an empty board. The control mode is kept.
    ///
    /// In a remote room either seated player may reset, at any point of the
    /// game; spectators may not.
    pub fn reset(&mut self) -> Result<(), RuleViolation> {
        if self.control == Control::Remote(Seat::Spectator) {
            return Err(RuleViolation::SpectatorsCannotReset);
        }
        self.board = Board::new();
        self.locked = CellSet::new();
        self.turn = Turn::initial();
        self.win = WinResult::default();
        self.history.clear();
        debug!("Reset game");
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let pending = self.turn.pending_cell.zip(self.turn.pending_side);
        let mut snapshot = Snapshot {
            board: self.board,
            locked: self.locked,
            turn: self.turn,
            win: self.win,
            outcome: self.outcome(),
            score: 0,
            material: material_balance(&self.board, pending),
        };
        snapshot.score = score(&snapshot.preview(), self.turn.active_side);
        snapshot
    }

    /// The whole mutable state as a flat record, stamped with `ts`.
    pub fn to_record(&self, ts: u64) -> StateRecord {
        StateRecord {
            ts,
            board: self.board,
            locked: Some(self.locked.into()),
            active_side: self.turn.active_side,
            phase: self.turn.phase,
            pending_cell: self.turn.pending_cell,
            pending_side: self.turn.pending_side,
            selected_quadrant: self.turn.rotation.map(|r| r.quadrant),
            selected_direction: self.turn.rotation.map(|r| r.direction),
        }
    }

    /// Replaces board and turn state wholesale with a record.
    ///
    /// The winning cells are recomputed from the board and the undo history
    /// is dropped, since it belongs to whatever game was shown before. An
    /// invalid record is rejected without changing anything.
    pub fn apply_record(&mut self, record: &StateRecord) -> Result<(), RecordError> {
        let board = record.board;
        let locked = match &record.locked {
            Some(flags) if flags.len() != NUM_CELLS => {
                return Err(RecordError::LockedLength(flags.len()))
            }
            Some(flags) => flags
                .iter()
                .enumerate()
                .filter(|(_, &flag)| flag)
                .map(|(idx, _)| idx)
                .collect(),
            // Every marker on the board got there through a commit
            None => (0..NUM_CELLS).filter(|&idx| !board[idx].is_empty()).collect(),
        };
        match (record.phase, record.pending_cell, record.pending_side) {
            (Phase::RotationPending, Some(cell), Some(_)) => {
                if cell >= NUM_CELLS {
                    return Err(RecordError::PendingCellOutOfRange { cell });
                }
                if !board[cell].is_empty() {
                    return Err(RecordError::PendingCellOccupied { cell });
                }
            }
            (Phase::Placing | Phase::Finished, None, None) => {}
            (phase, _, _) => return Err(RecordError::InconsistentPending { phase }),
        }
        let win = find_winning_cells(&board);
        let decided = !win.is_empty() || board.is_full();
        if decided != (record.phase == Phase::Finished) {
            return Err(RecordError::PhaseMismatch {
                phase: record.phase,
            });
        }

        self.board = board;
        self.locked = locked;
        self.turn = Turn {
            active_side: record.active_side,
            phase: record.phase,
            pending_cell: record.pending_cell,
            pending_side: record.pending_side,
            rotation: record
                .selected_quadrant
                .zip(record.selected_direction)
                .map(|(quadrant, direction)| Rotation {
                    quadrant,
                    direction,
                }),
        };
        self.win = win;
        self.history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_str;

    fn commit_move(session: &mut GameSession, cell: usize, quadrant: Quadrant, direction: Direction) {
        session.select_cell(cell).unwrap();
        session.select_rotation(quadrant, direction).unwrap();
        session.commit().unwrap();
    }

    #[test]
    fn basic_commit() {
        let mut session = GameSession::new();
        commit_move(&mut session, 14, Quadrant::TopLeft, Direction::Clockwise);
        assert_eq!(session.board()[12], Cell::Dark);
        assert_eq!(session.board()[14], Cell::Empty);
        assert_eq!(session.active_side(), Side::Light);
        assert_eq!(session.phase(), Phase::Placing);
        assert_eq!(session.turn().pending_cell, None);
        assert!(session.locked().contains(12));
        assert!(!session.locked().contains(14));
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn pending_marker_is_only_a_preview() {
        let mut session = GameSession::new();
        session.select_cell(3).unwrap();
        assert_eq!(session.phase(), Phase::RotationPending);
        assert_eq!(session.board()[3], Cell::Empty);
        assert_eq!(session.snapshot().preview()[3], Cell::Dark);
        assert_eq!(session.snapshot().material, 1);
    }

    #[test]
    fn reselecting_replaces_pending_cell_and_keeps_rotation() {
        let mut session = GameSession::new();
        session.select_cell(3).unwrap();
        session
            .select_rotation(Quadrant::BottomRight, Direction::CounterClockwise)
            .unwrap();
        session.select_cell(4).unwrap();
        assert_eq!(session.turn().pending_cell, Some(4));
        assert_eq!(
            session.turn().rotation,
            Some(Rotation {
                quadrant: Quadrant::BottomRight,
                direction: Direction::CounterClockwise
            })
        );
        assert_eq!(session.history_len(), 0);
        session.commit().unwrap();
        assert_eq!(session.board()[4], Cell::Dark);
        assert_eq!(session.board()[3], Cell::Empty);
        assert_eq!(session.turn().rotation, None);
    }

    #[test]
    fn undo_round_trip() {
        let mut session = GameSession::new();
        session.select_cell(14).unwrap();
        session
            .select_rotation(Quadrant::TopLeft, Direction::Clockwise)
            .unwrap();
        let board_before = *session.board();
        let turn_before = session.turn();
        session.commit().unwrap();
        session.undo().unwrap();
        assert_eq!(*session.board(), board_before);
        assert_eq!(session.active_side(), turn_before.active_side);
        assert_eq!(session.phase(), turn_before.phase);
        assert_eq!(session.turn(), turn_before);
        assert_eq!(session.history_len(), 0);
        assert!(session.locked().is_empty());
        assert_eq!(session.undo(), Err(RuleViolation::NothingToUndo));
    }

    #[test]
    fn commit_without_pending_cell_changes_nothing() {
        let mut session = GameSession::new();
        commit_move(&mut session, 0, Quadrant::BottomLeft, Direction::Clockwise);
        session
            .select_rotation(Quadrant::TopLeft, Direction::Clockwise)
            .unwrap();
        let board = *session.board();
        let turn = session.turn();
        assert_eq!(session.commit(), Err(RuleViolation::NoPendingCell));
        assert_eq!(*session.board(), board);
        assert_eq!(session.turn(), turn);
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn commit_without_rotation_is_refused() {
        let mut session = GameSession::new();
        session.select_cell(0).unwrap();
        assert_eq!(session.commit(), Err(RuleViolation::NoRotationSelected));
        assert_eq!(session.phase(), Phase::RotationPending);
        assert_eq!(session.board().count(Cell::Empty), NUM_CELLS);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn occupied_cells_are_refused() {
        let mut session = GameSession::new();
        // Center of the top-left quadrant never moves
        commit_move(&mut session, 7, Quadrant::TopLeft, Direction::Clockwise);
        assert_eq!(
            session.select_cell(7),
            Err(RuleViolation::CellLocked { cell: 7 })
        );
        assert_eq!(session.phase(), Phase::Placing);
    }

    #[test]
    #[should_panic]
    fn out_of_range_cell_panics() {
        let _ = GameSession::new().select_cell(36);
    }

    #[test]
    fn sides_alternate_until_win() {
        let mut session = GameSession::new();
        // Dark builds column 1 in the bottom-left quadrant's center column,
        // Light plays elsewhere. Rotating the top-right quadrant keeps column 1
        // intact.
        let dark = [1, 7, 13, 19, 25];
        let light = [3, 5, 17, 35];
        for k in 0..4 {
            assert_eq!(session.active_side(), Side::Dark);
            session.play(Move::new(dark[k], Quadrant::TopRight, Direction::Clockwise)).unwrap();
            assert_eq!(session.active_side(), Side::Light);
            session.play(Move::new(light[k], Quadrant::TopRight, Direction::CounterClockwise)).unwrap();
        }
        session.play(Move::new(dark[4], Quadrant::TopRight, Direction::Clockwise)).unwrap();
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.outcome(), Some(Outcome::Won(Side::Dark)));
        // Winner keeps the turn
        assert_eq!(session.active_side(), Side::Dark);
        assert_eq!(session.win().cells(), CellSet::from_iter(dark));
        assert_eq!(session.select_cell(0), Err(RuleViolation::GameFinished));
    }

    #[test]
    fn simultaneous_completion_is_a_draw() {
        // Rotating the top-right quadrant clockwise moves the markers at 15
        // and 9 into row 0 and the one at 16 into row 1, completing a dark
        // and a light run at once.
        let board = board_from_str(
            "X X X . . .
             O O O X O .
             . . . . O .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let mut session = GameSession::new();
        session
            .apply_record(&StateRecord {
                board,
                ..GameSession::new().to_record(1)
            })
            .unwrap();
        session.play(Move::new(15, Quadrant::TopRight, Direction::Clockwise)).unwrap();
        assert_eq!(session.outcome(), Some(Outcome::Draw));
        assert_eq!(session.win().cells_of(Side::Dark).len(), 5);
        assert_eq!(session.win().cells_of(Side::Light).len(), 5);
    }

    #[test]
    fn remote_seat_gates_actions() {
        let mut session = GameSession::with_control(Control::Remote(Seat::Light));
        assert!(!session.can_act());
        assert_eq!(session.select_cell(0), Err(RuleViolation::NotYourTurn));
        session.set_control(Control::Remote(Seat::Dark));
        commit_move(&mut session, 0, Quadrant::TopLeft, Direction::Clockwise);
        assert_eq!(session.undo(), Err(RuleViolation::UndoUnavailable));
        assert_eq!(session.history_len(), 1);

        let spectator = GameSession::with_control(Control::Remote(Seat::Spectator));
        assert!(!spectator.can_act());
    }

    #[test]
    fn reset_clears_everything_but_control() {
        let mut session = GameSession::with_control(Control::Remote(Seat::Dark));
        commit_move(&mut session, 0, Quadrant::TopLeft, Direction::Clockwise);
        session.reset().unwrap();
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.turn(), Turn::initial());
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.control(), Control::Remote(Seat::Dark));
    }

    #[test]
    fn only_seated_players_reset() {
        let mut spectator = GameSession::with_control(Control::Remote(Seat::Spectator));
        let mut host = GameSession::new();
        commit_move(&mut host, 14, Quadrant::TopLeft, Direction::Clockwise);
        spectator.apply_record(&host.to_record(1)).unwrap();
        assert_eq!(spectator.reset(), Err(RuleViolation::SpectatorsCannotReset));
        assert_eq!(spectator.board(), host.board());

        // The seat that is not on turn may still start over
        let mut dark = GameSession::with_control(Control::Remote(Seat::Dark));
        dark.apply_record(&host.to_record(2)).unwrap();
        assert!(!dark.can_act());
        dark.reset().unwrap();
        assert_eq!(*dark.board(), Board::new());
    }

    #[test]
    fn applying_a_record_drops_undo_history() {
        let mut session = GameSession::new();
        commit_move(&mut session, 0, Quadrant::BottomRight, Direction::Clockwise);
        assert_eq!(session.history_len(), 1);

        let mut other = GameSession::new();
        commit_move(&mut other, 35, Quadrant::TopLeft, Direction::Clockwise);
        session.apply_record(&other.to_record(5)).unwrap();
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.undo(), Err(RuleViolation::NothingToUndo));
        assert_eq!(session.board()[35], Cell::Dark);
        assert_eq!(session.board()[0], Cell::Empty);
    }

    #[test]
    fn record_phase_must_match_board() {
        let mut session = GameSession::new();
        let finished_early = StateRecord {
            phase: Phase::Finished,
            ..GameSession::new().to_record(1)
        };
        assert_eq!(
            session.apply_record(&finished_early),
            Err(RecordError::PhaseMismatch {
                phase: Phase::Finished
            })
        );

        let decided = board_from_str(
            "X X X X X .
             O O O O . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let still_running = StateRecord {
            board: decided,
            ..GameSession::new().to_record(2)
        };
        assert_eq!(
            session.apply_record(&still_running),
            Err(RecordError::PhaseMismatch {
                phase: Phase::Placing
            })
        );
        assert_eq!(*session.board(), Board::new());

        session
            .apply_record(&StateRecord {
                phase: Phase::Finished,
                ..still_running
            })
            .unwrap();
        assert_eq!(session.outcome(), Some(Outcome::Won(Side::Dark)));
    }

    #[test]
    fn history_is_bounded() {
        let mut session = GameSession::new();
        for _ in 0..HISTORY_CAP + 5 {
            commit_move(&mut session, 7, Quadrant::TopLeft, Direction::Clockwise);
            session.undo().unwrap();
            session.push_history();
        }
        assert_eq!(session.history_len(), HISTORY_CAP);
    }

    #[test]
    fn full_board_without_run_is_a_draw() {
        // Every row alternates in pairs, so no five in a row anywhere; one
        // empty cell left in the top-left quadrant's center.
        let board = board_from_str(
            "X X O O X X
             O . X X O O
             X X O O X X
             O O X X O O
             X X O O X X
             O O X X O O",
        );
        let mut session = GameSession::new();
        session
            .apply_record(&StateRecord {
                board,
                active_side: Side::Light,
                ..GameSession::new().to_record(1)
            })
            .unwrap();
        assert!(session.win().is_empty());
        session.play(Move::new(7, Quadrant::BottomRight, Direction::Clockwise)).unwrap();
        assert!(session.board().is_full());
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn record_round_trip() {
        let mut session = GameSession::new();
        commit_move(&mut session, 14, Quadrant::TopLeft, Direction::Clockwise);
        session.select_cell(20).unwrap();
        session
            .select_rotation(Quadrant::BottomLeft, Direction::CounterClockwise)
            .unwrap();
        let record = session.to_record(42);

        let mut other = GameSession::new();
        other.apply_record(&record).unwrap();
        assert_eq!(other.snapshot(), session.snapshot());
        assert_eq!(other.to_record(42), record);
    }

    #[test]
    fn inconsistent_record_is_rejected() {
        let mut session = GameSession::new();
        let mut record = session.to_record(1);
        record.pending_cell = Some(3);
        assert_eq!(
            session.apply_record(&record),
            Err(RecordError::InconsistentPending {
                phase: Phase::Placing
            })
        );
        record.phase = Phase::RotationPending;
        record.pending_side = Some(Side::Dark);
        record.pending_cell = Some(40);
        assert_eq!(
            session.apply_record(&record),
            Err(RecordError::PendingCellOutOfRange { cell: 40 })
        );
        assert_eq!(session.phase(), Phase::Placing);
    }
}
