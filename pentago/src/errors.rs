use crate::{Phase, NUM_CELLS};

/// A number that does not encode any cell, quadrant, direction or board.
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidValue {
    Cell(u8),
    Quadrant(u8),
    Direction(i8),
    BoardLength(usize),
}

impl std::error::Error for InvalidValue {}

impl std::fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidValue::Cell(v) => write!(f, "{} is not a cell value (expected 0, 1 or 2)", v),
            InvalidValue::Quadrant(v) => write!(f, "{} is not a quadrant id (expected 0 to 3)", v),
            InvalidValue::Direction(v) => write!(f, "{} is not a direction (expected 1 or -1)", v),
            InvalidValue::BoardLength(len) => {
                write!(f, "A board has {} cells, but {} were given", NUM_CELLS, len)
            }
        }
    }
}

/// Why the game refused an action.
///
/// Refusals never change any state, so they can simply be shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    GameFinished,
    NotYourTurn,
    CellOccupied { cell: usize },
    CellLocked { cell: usize },
    NoPendingCell,
    NoRotationSelected,
    NothingToUndo,
    UndoUnavailable,
    SpectatorsCannotReset,
}

impl std::error::Error for RuleViolation {}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleViolation::GameFinished => write!(f, "The game is already over"),
            RuleViolation::NotYourTurn => write!(f, "It is not your turn"),
            RuleViolation::CellOccupied { cell } => write!(f, "Cell {} is already occupied", cell),
            RuleViolation::CellLocked { cell } => write!(f, "Cell {} is locked", cell),
            RuleViolation::NoPendingCell => write!(f, "Select a cell before committing"),
            RuleViolation::NoRotationSelected => {
                write!(f, "Select a quadrant and a direction before committing")
            }
            RuleViolation::NothingToUndo => write!(f, "There is nothing to undo"),
            RuleViolation::UndoUnavailable => {
                write!(f, "Undo is not available while playing with a remote opponent")
            }
            RuleViolation::SpectatorsCannotReset => {
                write!(f, "Only a seated player can start a new game")
            }
        }
    }
}

/// The error type for [`GameSession::apply_record()`](crate::GameSession::apply_record).
#[derive(Debug, PartialEq, Eq)]
pub enum RecordError {
    PendingCellOutOfRange { cell: usize },
    PendingCellOccupied { cell: usize },
    /// The pending fields don't match the phase.
    InconsistentPending { phase: Phase },
    /// The phase says the game is over but the board doesn't, or vice versa.
    PhaseMismatch { phase: Phase },
    LockedLength(usize),
}

impl std::error::Error for RecordError {}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::PendingCellOutOfRange { cell } => {
                write!(f, "The record's pending cell {} is out of range", cell)
            }
            RecordError::PendingCellOccupied { cell } => {
                write!(f, "The record's pending cell {} is not empty", cell)
            }
            RecordError::InconsistentPending { phase } => write!(
                f,
                "The record's pending cell and side don't match its phase '{}'",
                phase
            ),
            RecordError::PhaseMismatch { phase } => write!(
                f,
                "The record's phase '{}' doesn't match whether its board is decided",
                phase
            ),
            RecordError::LockedLength(len) => write!(
                f,
                "The record's lock list has {} entries instead of {}",
                len, NUM_CELLS
            ),
        }
    }
}
