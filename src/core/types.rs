// Fundamental value types shared by the board, the move generator and the search.

use std::fmt;
use std::str::FromStr;

use crate::core::geometry::{square_name, Direction};
use crate::error::FenError;
use crate::intrinsics::{popcount, trailing_zeros};

/// One bit per playable (dark) square. Bit 0 = a1, bit 31 = h8.
/// Being 32 bits wide, no value can carry a square outside the board.
pub type Bitboard = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::White, Side::Black];

    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// Diagonal directions a man of this side may step in.
    #[inline(always)]
    pub const fn forward_directions(self) -> [Direction; 2] {
        match self {
            Side::White => [Direction::NorthWest, Direction::NorthEast],
            Side::Black => [Direction::SouthWest, Direction::SouthEast],
        }
    }

    /// Far rank where this side's men are crowned.
    #[inline(always)]
    pub const fn promotion_rank(self) -> Bitboard {
        match self {
            Side::White => 0xF000_0000,
            Side::Black => 0x0000_000F,
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Side {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            other => Err(FenError::InvalidSide(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Man,
    King,
}

impl PieceKind {
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Man => 0,
            PieceKind::King => 1,
        }
    }
}

/// One complete turn: the moving piece goes from `from` to `to`, removing every
/// opponent piece in `captured` (the whole chain for multi-jumps).
///
/// `from` and `to` are single-bit masks; they are equal when a king's capture
/// chain ends on its starting square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Bitboard,
    pub to: Bitboard,
    pub captured: Bitboard,
    pub promotes: bool,
}

impl Move {
    pub fn step(from: u8, to: u8, promotes: bool) -> Self {
        Move {
            from: 1 << from,
            to: 1 << to,
            captured: 0,
            promotes,
        }
    }

    #[inline(always)]
    pub fn from_square(&self) -> u8 {
        trailing_zeros(self.from) as u8
    }

    #[inline(always)]
    pub fn to_square(&self) -> u8 {
        trailing_zeros(self.to) as u8
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.captured != 0
    }

    #[inline(always)]
    pub fn capture_count(&self) -> u32 {
        popcount(self.captured)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_capture() { ':' } else { '-' };
        write!(
            f,
            "{}{}{}",
            square_name(self.from_square()),
            separator,
            square_name(self.to_square())
        )?;
        if self.promotes {
            write!(f, "=K")?;
        }
        Ok(())
    }
}
