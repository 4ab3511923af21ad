//! Fixed-capacity move buffers.
//!
//! `MoveList` is reused across nodes so generation never allocates. Root
//! entries additionally carry the principal variation found below them.

use crate::game_state::chess_rules::{MAX_MOVES, MAX_PLY};
use crate::game_state::chess_types::PieceKind;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEntry {
    pub mv: Move,
    pub value: i32,
}

impl MoveEntry {
    const EMPTY: MoveEntry = MoveEntry {
        mv: Move::NONE,
        value: 0,
    };
}

#[derive(Clone)]
pub struct MoveList {
    entries: [MoveEntry; MAX_MOVES],
    size: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            entries: [MoveEntry::EMPTY; MAX_MOVES],
            size: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.size = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.size < MAX_MOVES, "move list overflow");
        self.entries[self.size] = MoveEntry { mv, value: 0 };
        self.size += 1;
    }

    #[inline]
    pub fn get(&self, index: usize) -> Move {
        self.entries()[index].mv
    }

    #[inline]
    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries[..self.size]
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries().iter().map(|entry| entry.mv)
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|candidate| candidate == mv)
    }

    /// Keep entries matching `keep`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut kept = 0;
        for index in 0..self.size {
            let entry = self.entries[index];
            if keep(entry.mv) {
                self.entries[kept] = entry;
                kept += 1;
            }
        }
        self.size = kept;
    }

    /// Most valuable victim first, least valuable attacker breaking ties.
    pub fn rate_by_mvv_lva(&mut self) {
        for entry in &mut self.entries[..self.size] {
            entry.value = mvv_lva(entry.mv);
        }
    }

    /// Stable sort, highest value first.
    pub fn sort(&mut self) {
        sort_by_value_descending(&mut self.entries[..self.size], |entry| entry.value);
    }
}

#[inline]
fn mvv_lva(mv: Move) -> i32 {
    let mut value = PieceKind::King.value() / mv.origin_piece().kind.value();
    if let Some(victim) = mv.target_piece() {
        value += 10 * victim.kind.value();
    }
    value
}

/// Stable insertion sort in descending `value` order.
pub fn sort_by_value_descending<T>(entries: &mut [T], value: impl Fn(&T) -> i32) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && value(&entries[j - 1]) < value(&entries[j]) {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// A line of play, first move first.
#[derive(Clone)]
pub struct MoveVariation {
    moves: [Move; MAX_PLY],
    size: usize,
}

impl Default for MoveVariation {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveVariation {
    pub fn new() -> Self {
        Self {
            moves: [Move::NONE; MAX_PLY],
            size: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.size = 0;
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.size]
    }

    /// Replace this line with `head` followed by `tail`.
    pub fn set(&mut self, head: Move, tail: &MoveVariation) {
        let tail_len = tail.size.min(MAX_PLY - 1);
        self.moves[0] = head;
        self.moves[1..=tail_len].copy_from_slice(&tail.moves[..tail_len]);
        self.size = tail_len + 1;
    }
}

/// A root move with its latest score and principal variation.
#[derive(Clone)]
pub struct RootEntry {
    pub mv: Move,
    pub value: i32,
    pub pv: MoveVariation,
}

impl RootEntry {
    pub fn new(mv: Move, value: i32) -> Self {
        Self {
            mv,
            value,
            pv: MoveVariation::new(),
        }
    }

    /// First reply in the principal variation, if searched that deep.
    pub fn ponder_move(&self) -> Option<Move> {
        self.pv.moves().get(1).copied()
    }
}
