// Bitboard primitives for the 32-square universe.
// Hot path of move generation: keep everything #[inline(always)].

use crate::core::types::Bitboard;

// ============================================================================
// POPCOUNT / BITSCAN
// ============================================================================

/// Number of set bits. Uses POPCNT when the CPU has it.
#[inline(always)]
pub fn popcount(bb: Bitboard) -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("popcnt") {
            unsafe { std::arch::x86_64::_popcnt32(bb as i32) as u32 }
        } else {
            bb.count_ones()
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        bb.count_ones()
    }
}

/// Index of the least significant set bit (32 for an empty board).
#[inline(always)]
pub fn trailing_zeros(bb: Bitboard) -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("bmi1") {
            unsafe { std::arch::x86_64::_tzcnt_u32(bb) }
        } else {
            bb.trailing_zeros()
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        bb.trailing_zeros()
    }
}

/// Removes the LSB and returns its index.
#[inline(always)]
pub fn pop_lsb(bb: &mut Bitboard) -> u8 {
    let square = trailing_zeros(*bb) as u8;
    *bb &= *bb - 1;
    square
}

#[inline(always)]
pub fn is_single_bit(bb: Bitboard) -> bool {
    bb != 0 && (bb & (bb - 1)) == 0
}

/// Single-bit mask for a square index.
#[inline(always)]
pub const fn square_bb(square: u8) -> Bitboard {
    1 << square
}

// ============================================================================
// ITERATION
// ============================================================================

/// Iterates over the square indices of the set bits, LSB first.
pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    #[inline(always)]
    pub fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.bb))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = popcount(self.bb) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIterator {}

pub trait BitboardOps {
    fn iter_squares(self) -> BitboardIterator;
}

impl BitboardOps for Bitboard {
    #[inline(always)]
    fn iter_squares(self) -> BitboardIterator {
        BitboardIterator::new(self)
    }
}
