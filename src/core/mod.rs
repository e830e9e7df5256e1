pub mod board;
pub mod geometry;
pub mod rules;
pub mod types;
pub mod zobrist;

pub use board::*;
pub use geometry::{neighbor, parse_square, square_name, Direction};
pub use rules::*;
pub use types::*;
pub use zobrist::*;
