pub mod perft;
pub mod tt;

pub use perft::{perft, perft_cached, perft_divide};
pub use tt::{Bound, TTEntry, TranspositionTable};
