// Geometry of the 32 playable squares.
//
// Square s lives on row s / 4 (row 0 = White's back rank) and on file
// 2 * (s % 4) + (row & 1), so a1 is square 0 and h8 is square 31.
//
//      a  b  c  d  e  f  g  h
//   8     28    29    30    31
//   7  24    25    26    27
//   6     20    21    22    23
//   5  16    17    18    19
//   4     12    13    14    15
//   3  8     9     10    11
//   2     4     5     6     7
//   1  0     1     2     3

pub const NUM_SQUARES: usize = 32;

const NO_SQUARE: u8 = 0xFF;

/// Diagonal directions. North points towards row 7 (Black's back rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Direction::NorthWest => 0,
            Direction::NorthEast => 1,
            Direction::SouthWest => 2,
            Direction::SouthEast => 3,
        }
    }

    #[inline(always)]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::NorthWest => (1, -1),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
            Direction::SouthEast => (-1, 1),
        }
    }
}

#[inline(always)]
pub const fn row_of(square: u8) -> u8 {
    square / 4
}

#[inline(always)]
pub const fn file_of(square: u8) -> u8 {
    2 * (square % 4) + (row_of(square) & 1)
}

/// Square index at (row, file), or None for off-board and light squares.
pub const fn square_at(row: i8, file: i8) -> Option<u8> {
    if row < 0 || row > 7 || file < 0 || file > 7 {
        return None;
    }
    if (row & 1) != (file & 1) {
        return None;
    }
    Some((row * 4 + (file - (row & 1)) / 2) as u8)
}

/// Diagonal neighbour table, NO_SQUARE when the step leaves the board.
const fn generate_neighbor_table() -> [[u8; 4]; NUM_SQUARES] {
    let mut table = [[NO_SQUARE; 4]; NUM_SQUARES];
    let mut square = 0;

    while square < NUM_SQUARES {
        let row = row_of(square as u8) as i8;
        let file = file_of(square as u8) as i8;
        let mut d = 0;
        while d < 4 {
            let (dr, df) = Direction::ALL[d].delta();
            if let Some(target) = square_at(row + dr, file + df) {
                table[square][d] = target;
            }
            d += 1;
        }
        square += 1;
    }

    table
}

static NEIGHBORS: [[u8; 4]; NUM_SQUARES] = generate_neighbor_table();

/// The adjacent square in `dir`, if it exists.
#[inline(always)]
pub fn neighbor(square: u8, dir: Direction) -> Option<u8> {
    match NEIGHBORS[square as usize][dir.index()] {
        NO_SQUARE => None,
        target => Some(target),
    }
}

/// Algebraic name ("c3") of a square.
pub fn square_name(square: u8) -> String {
    let file = (file_of(square) + b'a') as char;
    let rank = (row_of(square) + b'1') as char;
    format!("{}{}", file, rank)
}

/// Parses an algebraic square name; light squares are rejected.
pub fn parse_square(name: &str) -> Option<u8> {
    let bytes = name.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase().checked_sub(b'a')? as i8;
    let row = bytes[1].checked_sub(b'1')? as i8;
    square_at(row, file)
}
