mod error;
mod game;
mod player;
mod recording;
mod standings;
pub use error::*;
pub use game::*;
pub use player::*;
pub use recording::*;
pub use standings::*;
