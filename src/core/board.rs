// The position: three bitboards over the 32 playable squares.
// Board is Copy and never mutated in place by the engine; apply() returns the successor.

use std::fmt;

use super::geometry::{parse_square, square_at, square_name, NUM_SQUARES};
use super::types::*;
use crate::error::{BoardError, FenError};
use crate::intrinsics::{popcount, square_bb, BitboardOps};

pub const START_WHITE: Bitboard = 0x0000_0FFF;
pub const START_BLACK: Bitboard = 0xFFF0_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// Every piece of each side (kings included), indexed by `Side::index()`.
    pub men: [Bitboard; 2],
    /// Crowned pieces of both sides.
    pub kings: Bitboard,
}

impl Board {
    pub const fn empty() -> Self {
        Board { men: [0, 0], kings: 0 }
    }

    /// Twelve men each on the first three rows of both sides.
    pub const fn new() -> Self {
        Board {
            men: [START_WHITE, START_BLACK],
            kings: 0,
        }
    }

    /// Builds a board from raw masks, checking the invariants.
    pub fn from_masks(white: Bitboard, black: Bitboard, kings: Bitboard) -> Result<Self, BoardError> {
        let overlap = white & black;
        if overlap != 0 {
            return Err(BoardError::Overlap { overlap });
        }
        let orphans = kings & !(white | black);
        if orphans != 0 {
            return Err(BoardError::OrphanKings { orphans });
        }
        Ok(Board {
            men: [white, black],
            kings,
        })
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn with_piece(mut self, side: Side, kind: PieceKind, square: u8) -> Self {
        let bb = square_bb(square);
        self.men[0] &= !bb;
        self.men[1] &= !bb;
        self.kings &= !bb;
        self.men[side.index()] |= bb;
        if kind == PieceKind::King {
            self.kings |= bb;
        }
        self
    }

    #[inline(always)]
    pub fn pieces(&self, side: Side) -> Bitboard {
        self.men[side.index()]
    }

    /// Uncrowned pieces of `side`.
    #[inline(always)]
    pub fn men_of(&self, side: Side) -> Bitboard {
        self.men[side.index()] & !self.kings
    }

    #[inline(always)]
    pub fn kings_of(&self, side: Side) -> Bitboard {
        self.men[side.index()] & self.kings
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.men[0] | self.men[1]
    }

    #[inline(always)]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    #[inline(always)]
    pub fn piece_count(&self, side: Side) -> u32 {
        popcount(self.pieces(side))
    }

    pub fn piece_at(&self, square: u8) -> Option<(Side, PieceKind)> {
        let bb = square_bb(square);
        let side = Side::BOTH.into_iter().find(|&s| self.pieces(s) & bb != 0)?;
        let kind = if self.kings & bb != 0 {
            PieceKind::King
        } else {
            PieceKind::Man
        };
        Some((side, kind))
    }

    /// True when both sides are disjoint and every king sits on a piece.
    pub fn is_consistent(&self) -> bool {
        self.men[0] & self.men[1] == 0 && self.kings & !self.occupied() == 0
    }

    /// Successor position after `side` plays `mv`.
    ///
    /// `mv` must come from the move generator for this exact board and side;
    /// anything else yields an unspecified (but still in-universe) board.
    pub fn apply(&self, mv: &Move, side: Side) -> Board {
        let mut next = *self;
        let own = side.index();
        let opp = (!side).index();
        let was_king = self.kings & mv.from != 0;

        // from and to may coincide when a king's chain loops back to its square
        next.men[own] &= !mv.from;
        next.kings &= !mv.from;
        next.men[own] |= mv.to;
        if was_king || mv.promotes {
            next.kings |= mv.to;
        }

        if mv.captured != 0 {
            next.men[opp] &= !mv.captured;
            next.kings &= !mv.captured;
        }

        next
    }

    /// Parses `W:Wa1,c3,Kd4:Bf6,Kh8` (side to move, then the pieces of each
    /// colour; `K` marks a king). Returns the board and the side to move.
    pub fn from_fen(text: &str) -> Result<(Board, Side), FenError> {
        let mut sections = text.trim().trim_end_matches('.').split(':');
        let side: Side = sections
            .next()
            .filter(|s| !s.trim().is_empty())
            .ok_or(FenError::MissingSection("side to move"))?
            .parse()?;

        let mut masks = [0 as Bitboard; 2];
        let mut kings: Bitboard = 0;
        let mut seen = [false; 2];

        for section in sections {
            let section = section.trim();
            let mut chars = section.chars();
            let owner = match chars.next() {
                Some('W') | Some('w') => Side::White,
                Some('B') | Some('b') => Side::Black,
                _ => return Err(FenError::InvalidSide(section.to_string())),
            };
            seen[owner.index()] = true;

            for token in chars.as_str().split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let (is_king, name) = match token.strip_prefix(['K', 'k']) {
                    Some(rest) => (true, rest),
                    None => (false, token),
                };
                let square = parse_square(name).ok_or_else(|| FenError::InvalidSquare(token.to_string()))?;
                let bb = square_bb(square);
                if (masks[0] | masks[1]) & bb != 0 {
                    return Err(FenError::DuplicateSquare(name.to_string()));
                }
                masks[owner.index()] |= bb;
                if is_king {
                    kings |= bb;
                }
            }
        }

        if !seen[Side::White.index()] {
            return Err(FenError::MissingSection("white pieces"));
        }
        if !seen[Side::Black.index()] {
            return Err(FenError::MissingSection("black pieces"));
        }

        let board = Board::from_masks(masks[0], masks[1], kings)?;
        Ok((board, side))
    }

    pub fn to_fen(&self, side: Side) -> String {
        let section = |s: Side| -> String {
            self.pieces(s)
                .iter_squares()
                .map(|sq| {
                    if self.kings & square_bb(sq) != 0 {
                        format!("K{}", square_name(sq))
                    } else {
                        square_name(sq)
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        };
        let to_move = match side {
            Side::White => 'W',
            Side::Black => 'B',
        };
        format!("{}:W{}:B{}", to_move, section(Side::White), section(Side::Black))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8i8).rev() {
            write!(f, "{} ", row + 1)?;
            for file in 0..8i8 {
                let cell = match square_at(row, file) {
                    None => ' ',
                    Some(sq) => match self.piece_at(sq) {
                        None => '.',
                        Some((Side::White, PieceKind::Man)) => 'w',
                        Some((Side::White, PieceKind::King)) => 'W',
                        Some((Side::Black, PieceKind::Man)) => 'b',
                        Some((Side::Black, PieceKind::King)) => 'B',
                    },
                };
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

// Every square index is addressable by the 32-bit masks.
const _: () = assert!(NUM_SQUARES == Bitboard::BITS as usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> u8 {
        parse_square(name).expect("valid square")
    }

    #[test]
    fn test_start_position() {
        let board = Board::new();
        assert_eq!(board.pieces(Side::White), 0x0000_0FFF);
        assert_eq!(board.pieces(Side::Black), 0xFFF0_0000);
        assert_eq!(board.piece_count(Side::White), 12);
        assert_eq!(board.piece_count(Side::Black), 12);
        assert_eq!(board.kings, 0);
        assert!(board.is_consistent());
        assert_eq!(board.piece_at(sq("a1")), Some((Side::White, PieceKind::Man)));
        assert_eq!(board.piece_at(sq("h8")), Some((Side::Black, PieceKind::Man)));
        assert_eq!(board.piece_at(sq("d4")), None);
    }

    #[test]
    fn test_from_masks_rejects_broken_invariants() {
        assert_eq!(
            Board::from_masks(0b11, 0b10, 0),
            Err(BoardError::Overlap { overlap: 0b10 })
        );
        assert_eq!(
            Board::from_masks(0b01, 0b10, 0b100),
            Err(BoardError::OrphanKings { orphans: 0b100 })
        );
        assert!(Board::from_masks(START_WHITE, START_BLACK, 0b1).is_ok());
    }

    #[test]
    fn test_apply_quiet_move() {
        let board = Board::new();
        let mv = Move::step(sq("c3"), sq("d4"), false);
        let next = board.apply(&mv, Side::White);

        assert_eq!(board, Board::new(), "input must be untouched");
        assert_eq!(next.piece_at(sq("c3")), None);
        assert_eq!(next.piece_at(sq("d4")), Some((Side::White, PieceKind::Man)));
        assert_eq!(next.piece_count(Side::White), 12);
        assert!(next.is_consistent());
    }

    #[test]
    fn test_apply_capture_removes_kings_too() {
        let board = Board::empty()
            .with_piece(Side::White, PieceKind::Man, sq("c3"))
            .with_piece(Side::Black, PieceKind::King, sq("d4"));
        let mv = Move {
            from: square_bb(sq("c3")),
            to: square_bb(sq("e5")),
            captured: square_bb(sq("d4")),
            promotes: false,
        };
        let next = board.apply(&mv, Side::White);

        assert_eq!(next.pieces(Side::Black), 0);
        assert_eq!(next.kings, 0);
        assert_eq!(next.piece_at(sq("e5")), Some((Side::White, PieceKind::Man)));
    }

    #[test]
    fn test_apply_promotion_and_king_move() {
        let board = Board::empty().with_piece(Side::Black, PieceKind::Man, sq("b2"));
        let crowned = board.apply(&Move::step(sq("b2"), sq("a1"), true), Side::Black);
        assert_eq!(crowned.piece_at(sq("a1")), Some((Side::Black, PieceKind::King)));

        let moved = crowned.apply(&Move::step(sq("a1"), sq("h8"), false), Side::Black);
        assert_eq!(moved.piece_at(sq("h8")), Some((Side::Black, PieceKind::King)));
        assert_eq!(moved.kings, square_bb(sq("h8")));
    }

    #[test]
    fn test_apply_chain_back_to_start_square() {
        let board = Board::empty()
            .with_piece(Side::White, PieceKind::King, sq("a3"))
            .with_piece(Side::Black, PieceKind::Man, sq("b4"))
            .with_piece(Side::Black, PieceKind::Man, sq("b2"));
        let mv = Move {
            from: square_bb(sq("a3")),
            to: square_bb(sq("a3")),
            captured: square_bb(sq("b4")) | square_bb(sq("b2")),
            promotes: false,
        };
        let next = board.apply(&mv, Side::White);

        assert_eq!(next.piece_at(sq("a3")), Some((Side::White, PieceKind::King)));
        assert_eq!(next.pieces(Side::Black), 0);
    }

    #[test]
    fn test_fen_roundtrip() {
        let fen = Board::new().to_fen(Side::White);
        assert!(fen.starts_with("W:Wa1,c1,e1,g1"));
        assert_eq!(Board::from_fen(&fen), Ok((Board::new(), Side::White)));

        let (board, side) = Board::from_fen("B:WKd4,c3:Bh8,Ka7").expect("valid position");
        assert_eq!(side, Side::Black);
        assert_eq!(board.piece_at(sq("d4")), Some((Side::White, PieceKind::King)));
        assert_eq!(board.piece_at(sq("a7")), Some((Side::Black, PieceKind::King)));
        assert_eq!(board.to_fen(side), "B:Wc3,Kd4:BKa7,h8");
    }

    #[test]
    fn test_fen_errors() {
        assert_eq!(Board::from_fen(""), Err(FenError::MissingSection("side to move")));
        assert_eq!(Board::from_fen("X:W:B"), Err(FenError::InvalidSide("x".to_string())));
        assert_eq!(Board::from_fen("W:Wa2:B"), Err(FenError::InvalidSquare("a2".to_string())));
        assert_eq!(Board::from_fen("W:Wa1:Ba1"), Err(FenError::DuplicateSquare("a1".to_string())));
        assert_eq!(Board::from_fen("W:Wa1"), Err(FenError::MissingSection("black pieces")));
    }

    #[test]
    fn test_display_diagram() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8    b   b   b   b");
        assert_eq!(lines[7], "1  w   w   w   w  ");
        assert!(lines[4].contains('.'));
    }
}
