pub use board::*;
pub use cell_set::*;
pub use errors::*;
pub use eval::*;
pub use protocol::*;
pub use search::*;
pub use seats::*;
pub use session::*;
pub use sync::*;
pub use visualization::*;
pub use win::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod cell_set;
mod errors;
mod eval;
mod protocol;
mod search;
mod seats;
mod session;
mod sync;
mod visualization;
mod win;
