// Transposition table lock-free partilhada entre as threads da raiz.
//
// Each slot is two AtomicU64: the packed data word and `hash ^ data`. A reader
// accepts the slot only if the two words still agree with the probed hash, so a
// torn write from a racing thread is just a miss.

use crate::search::evaluation::MATE_THRESHOLD;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact, // Score exato
    Lower, // Score >= beta (fail-high)
    Upper, // Score <= alpha (fail-low)
}

impl Bound {
    const fn code(self) -> u64 {
        match self {
            Bound::Exact => 1,
            Bound::Lower => 2,
            Bound::Upper => 3,
        }
    }

    const fn from_code(code: u64) -> Option<Bound> {
        match code {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }
}

/// Decoded table entry. The best move is kept as (from, to) squares, enough
/// to pick it out of a freshly generated move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
    pub best_move: Option<(u8, u8)>,
    pub generation: u8,
}

// Layout of the data word
const SCORE_BITS: u64 = 0xFFFF;
const DEPTH_SHIFT: u32 = 16;
const BOUND_SHIFT: u32 = 24;
const HAS_MOVE_SHIFT: u32 = 26;
const FROM_SHIFT: u32 = 27;
const TO_SHIFT: u32 = 32;
const GENERATION_SHIFT: u32 = 37;

impl TTEntry {
    fn pack(&self) -> u64 {
        let score = self.score.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16 as u64;
        let mut data = score
            | (self.depth as u64) << DEPTH_SHIFT
            | self.bound.code() << BOUND_SHIFT
            | (self.generation as u64) << GENERATION_SHIFT;
        if let Some((from, to)) = self.best_move {
            data |= 1 << HAS_MOVE_SHIFT
                | ((from & 0x1F) as u64) << FROM_SHIFT
                | ((to & 0x1F) as u64) << TO_SHIFT;
        }
        data
    }

    fn unpack(data: u64) -> Option<TTEntry> {
        let bound = Bound::from_code((data >> BOUND_SHIFT) & 0b11)?;
        let best_move = if (data >> HAS_MOVE_SHIFT) & 1 != 0 {
            Some((((data >> FROM_SHIFT) & 0x1F) as u8, ((data >> TO_SHIFT) & 0x1F) as u8))
        } else {
            None
        };
        Some(TTEntry {
            score: (data & SCORE_BITS) as u16 as i16 as i32,
            depth: (data >> DEPTH_SHIFT) as u8,
            bound,
            best_move,
            generation: (data >> GENERATION_SHIFT) as u8,
        })
    }
}

struct Slot {
    key: AtomicU64, // hash ^ data
    data: AtomicU64,
}

pub struct TranspositionTable {
    slots: Vec<Slot>,
    mask: usize,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranspositionTable {
    /// Cria nova TT com tamanho em MB (arredondado para potência de dois).
    pub fn new(size_mb: usize) -> Self {
        let slot_size = std::mem::size_of::<Slot>();
        let num_slots = (size_mb.max(1) * 1024 * 1024) / slot_size;
        let size = num_slots.next_power_of_two();

        TranspositionTable {
            slots: (0..size)
                .map(|_| Slot {
                    key: AtomicU64::new(0),
                    data: AtomicU64::new(0),
                })
                .collect(),
            mask: size - 1,
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    fn slot(&self, hash: u64) -> &Slot {
        &self.slots[(hash as usize) & self.mask]
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let slot = self.slot(hash);
        let data = slot.data.load(Ordering::Relaxed);
        let key = slot.key.load(Ordering::Relaxed);

        let entry = if key ^ data == hash { TTEntry::unpack(data) } else { None };
        match entry {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        entry
    }

    /// Armazena com substituição: slot vazio, outra posição, geração antiga
    /// ou profundidade maior ou igual.
    pub fn store(&self, hash: u64, depth: u8, score: i32, bound: Bound, best_move: Option<(u8, u8)>) {
        let slot = self.slot(hash);
        let generation = self.generation();

        let old_data = slot.data.load(Ordering::Relaxed);
        let old_key = slot.key.load(Ordering::Relaxed);
        if old_key ^ old_data == hash {
            if let Some(existing) = TTEntry::unpack(old_data) {
                if existing.generation == generation && depth < existing.depth {
                    return;
                }
            }
        }

        let data = TTEntry {
            score,
            depth,
            bound,
            best_move,
            generation,
        }
        .pack();
        slot.data.store(data, Ordering::Relaxed);
        slot.key.store(hash ^ data, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for slot in &self.slots {
            slot.key.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Incrementa a geração; entradas de buscas anteriores passam a ser substituíveis.
    pub fn new_search(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed) as u8
    }

    /// (hits, misses)
    pub fn get_stats(&self) -> (u64, u64) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.get_stats();
        if hits + misses > 0 {
            hits as f64 / (hits + misses) as f64
        } else {
            0.0
        }
    }

    /// Percentage of a sample of slots holding an entry.
    pub fn usage(&self) -> f64 {
        let sample_size = 1000.min(self.slots.len());
        let used = (0..sample_size)
            .map(|i| &self.slots[i * self.slots.len() / sample_size])
            .filter(|slot| slot.data.load(Ordering::Relaxed) != 0)
            .count();
        (used as f64 / sample_size as f64) * 100.0
    }
}

/// Ajusta score de mate para armazenar na TT (distância a partir do nó).
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Ajusta score de mate recuperado da TT para o ply atual.
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}
