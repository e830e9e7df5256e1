// Zobrist hashing of (board, side to move, rule set) for the transposition table.
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::board::Board;
use super::geometry::NUM_SQUARES;
use super::rules::{PromotionPolicy, Rules};
use super::types::*;
use crate::intrinsics::BitboardOps;

const ZOBRIST_SEED: u64 = 0x6976_6561_7761_7921;

pub struct ZobristKeys {
    pub pieces: [[[u64; NUM_SQUARES]; 2]; 2], // [side][kind][square]
    pub side_to_move: u64,
    pub flying_kings: u64,
    pub men_capture_backward: u64,
    pub promotion_at_end: u64,
}

impl ZobristKeys {
    pub fn new() -> Self {
        // Fixed seed: hashes are reproducible between runs
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut keys = ZobristKeys {
            pieces: [[[0; NUM_SQUARES]; 2]; 2],
            side_to_move: 0,
            flying_kings: 0,
            men_capture_backward: 0,
            promotion_at_end: 0,
        };

        for side in 0..2 {
            for kind in 0..2 {
                for square in 0..NUM_SQUARES {
                    keys.pieces[side][kind][square] = rng.gen();
                }
            }
        }

        keys.side_to_move = rng.gen();
        keys.flying_kings = rng.gen();
        keys.men_capture_backward = rng.gen();
        keys.promotion_at_end = rng.gen();
        keys
    }

    /// Key component identifying a rule set, so entries never leak across variants.
    pub fn rules_key(&self, rules: &Rules) -> u64 {
        let mut key = 0;
        if rules.flying_kings {
            key ^= self.flying_kings;
        }
        if rules.men_capture_backward {
            key ^= self.men_capture_backward;
        }
        if rules.promotion == PromotionPolicy::EndOfMove {
            key ^= self.promotion_at_end;
        }
        key
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    pub static ref ZOBRIST_KEYS: ZobristKeys = ZobristKeys::new();
}

impl Board {
    /// Hash of the position with `side` to move under `rules`.
    pub fn hash(&self, side: Side, rules: &Rules) -> u64 {
        let keys = &*ZOBRIST_KEYS;
        let mut hash = keys.rules_key(rules);

        for s in Side::BOTH {
            for square in self.men_of(s).iter_squares() {
                hash ^= keys.pieces[s.index()][PieceKind::Man.index()][square as usize];
            }
            for square in self.kings_of(s).iter_squares() {
                hash ^= keys.pieces[s.index()][PieceKind::King.index()][square as usize];
            }
        }

        if side == Side::Black {
            hash ^= keys.side_to_move;
        }
        hash
    }
}
