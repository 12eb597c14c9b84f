//! Domain store: the candidate word set for every slot.
//!
//! Domains only shrink while the consistency engine runs. The search engine
//! clones the whole store before each tentative assignment and restores the
//! clone on backtrack, so pruning done inside a failed branch never leaks
//! into sibling branches.

use rustc_hash::FxHashSet;

use crate::puzzle::{Puzzle, SlotId, WordId};

/// Candidate word sets, indexed by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    sets: Vec<FxHashSet<WordId>>,
}

impl Domains {
    /// Seeds every slot with the full vocabulary.
    ///
    /// Length filtering happens later, in node consistency.
    pub fn seed(puzzle: &Puzzle) -> Self {
        let all: FxHashSet<WordId> = (0..puzzle.words().len()).collect();
        Self {
            sets: vec![all; puzzle.slot_count()],
        }
    }

    pub fn candidates(&self, slot: SlotId) -> &FxHashSet<WordId> {
        &self.sets[slot]
    }

    pub fn size(&self, slot: SlotId) -> usize {
        self.sets[slot].len()
    }

    pub fn is_empty(&self, slot: SlotId) -> bool {
        self.sets[slot].is_empty()
    }

    /// Drops every candidate of `slot` the predicate rejects.
    ///
    /// Touches no other slot's set. Returns whether anything was removed.
    pub fn restrict(&mut self, slot: SlotId, mut keep: impl FnMut(WordId) -> bool) -> bool {
        let before = self.sets[slot].len();
        self.sets[slot].retain(|&word| keep(word));
        self.sets[slot].len() != before
    }

    /// Narrows `slot` to a single tentatively assigned word.
    pub fn assign(&mut self, slot: SlotId, word: WordId) {
        let set = &mut self.sets[slot];
        set.clear();
        set.insert(word);
    }
}
