use pentago::{Move, RuleViolation};

#[derive(Debug)]
/// Error type for one turn.
pub enum IllegalMove {
    CellOutOfRange { cell: usize },
    Refused { mv: Move, err: RuleViolation },
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::Refused { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::CellOutOfRange { cell } => {
                write!(f, "Tried to place a marker on cell {}, which is off the board", cell)
            }
            IllegalMove::Refused { mv, err: _ } => write!(f, "The move {} was refused", mv),
        }
    }
}
