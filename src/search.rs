//! Backtracking search with forward checking.
//!
//! The search is iterative: an explicit stack of frames, one per tentatively
//! assigned slot. Each frame owns the domain snapshot taken before its slot
//! was bound, so undoing a branch is a restore plus an unbind rather than a
//! convention the recursion has to uphold.

use std::cmp::Reverse;

use log::debug;
use rustc_hash::FxHashSet;

use crate::consistency::{ac3, enforce_node_consistency};
use crate::domains::Domains;
use crate::puzzle::{Puzzle, SlotId, WordId};

/// A complete assignment: the chosen word for every slot, indexed by slot.
pub type Solution = Vec<WordId>;

/// One level of the search: a slot, its candidates in least-constraining
/// order, a resume cursor, and the domain store as it was before any
/// candidate of this frame was tried.
struct Frame {
    slot: SlotId,
    candidates: Vec<WordId>,
    next: usize,
    saved: Domains,
}

impl Frame {
    fn open(
        puzzle: &Puzzle,
        domains: &Domains,
        assignment: &[Option<WordId>],
        slot: SlotId,
    ) -> Self {
        Self {
            slot,
            candidates: order_domain_values(puzzle, domains, assignment, slot),
            next: 0,
            saved: domains.clone(),
        }
    }

    fn next_candidate(&mut self) -> Option<WordId> {
        let word = self.candidates.get(self.next).copied();
        if word.is_some() {
            self.next += 1;
        }
        word
    }
}

/// Solves the puzzle: node consistency, a full AC-3 pass, then backtracking.
///
/// Returns the first complete consistent assignment found, depth-first, or
/// `None` when no assignment exists. `None` is the definitive no-solution
/// outcome, not an error.
pub fn solve(puzzle: &Puzzle) -> Option<Solution> {
    let mut domains = Domains::seed(puzzle);

    enforce_node_consistency(puzzle, &mut domains);
    if (0..puzzle.slot_count()).any(|slot| domains.is_empty(slot)) {
        debug!("a slot has no candidate of its length, skipping search");
        return None;
    }
    if !ac3(puzzle, &mut domains, None) {
        return None;
    }

    backtrack(puzzle, domains)
}

fn backtrack(puzzle: &Puzzle, mut domains: Domains) -> Option<Solution> {
    let slot_count = puzzle.slot_count();
    let mut assignment: Vec<Option<WordId>> = vec![None; slot_count];
    let mut assigned = 0usize;

    if slot_count == 0 {
        return Some(Solution::new());
    }

    let first = select_unassigned(puzzle, &domains, &assignment);
    let mut stack = vec![Frame::open(puzzle, &domains, &assignment, first)];

    while let Some(depth) = stack.len().checked_sub(1) {
        let slot = stack[depth].slot;

        // a failed descent leaves this frame's slot bound; clear it before
        // trying the next candidate
        if assignment[slot].take().is_some() {
            assigned -= 1;
        }

        let mut descended = false;
        while let Some(word) = stack[depth].next_candidate() {
            domains.clone_from(&stack[depth].saved);
            if !binding_consistent(puzzle, &assignment, slot, word) {
                continue;
            }

            debug!("slot {slot}: trying {}", puzzle.word(word));
            assignment[slot] = Some(word);
            assigned += 1;
            domains.assign(slot, word);

            let arcs: Vec<(SlotId, SlotId)> =
                puzzle.neighbors(slot).iter().map(|&z| (z, slot)).collect();
            if ac3(puzzle, &mut domains, Some(arcs)) {
                descended = true;
                break;
            }

            debug!(
                "slot {slot}: {} wiped out a neighbor, retracting",
                puzzle.word(word)
            );
            assignment[slot] = None;
            assigned -= 1;
        }

        if !descended {
            debug!("slot {slot}: out of candidates, backtracking");
            domains.clone_from(&stack[depth].saved);
            stack.pop();
            continue;
        }

        if assigned == slot_count {
            debug_assert!(is_consistent(puzzle, &assignment));
            return assignment.into_iter().collect();
        }

        let next = select_unassigned(puzzle, &domains, &assignment);
        let frame = Frame::open(puzzle, &domains, &assignment, next);
        stack.push(frame);
    }

    None
}

/// Whether a partial assignment satisfies every constraint among its
/// assigned slots: pairwise-distinct words, exact lengths, and agreement at
/// every overlap.
pub fn is_consistent(puzzle: &Puzzle, assignment: &[Option<WordId>]) -> bool {
    let mut seen = FxHashSet::default();
    for (slot, &word) in assignment.iter().enumerate() {
        let Some(word) = word else {
            continue;
        };
        if !seen.insert(word) {
            return false;
        }
        if puzzle.word(word).len() != puzzle.slot(slot).length {
            return false;
        }
        for &z in puzzle.neighbors(slot) {
            let Some(other) = assignment[z] else {
                continue;
            };
            let Some((i, j)) = puzzle.overlap(slot, z) else {
                continue;
            };
            if puzzle.word(word).as_bytes()[i] != puzzle.word(other).as_bytes()[j] {
                return false;
            }
        }
    }
    true
}

/// Incremental form of [`is_consistent`]: checks only the constraints a new
/// binding introduces, assuming the existing assignment is consistent.
fn binding_consistent(
    puzzle: &Puzzle,
    assignment: &[Option<WordId>],
    slot: SlotId,
    word: WordId,
) -> bool {
    if puzzle.word(word).len() != puzzle.slot(slot).length {
        return false;
    }
    // words must be distinct across the whole puzzle, not just neighbors
    if assignment.iter().flatten().any(|&other| other == word) {
        return false;
    }
    for &z in puzzle.neighbors(slot) {
        let Some(other) = assignment[z] else {
            continue;
        };
        let Some((i, j)) = puzzle.overlap(slot, z) else {
            continue;
        };
        if puzzle.word(word).as_bytes()[i] != puzzle.word(other).as_bytes()[j] {
            return false;
        }
    }
    true
}

/// Minimum-remaining-values slot choice: fewest candidates left, ties broken
/// by highest degree, further ties by lowest slot index (the index rule is
/// incidental, not a guaranteed ordering).
fn select_unassigned(
    puzzle: &Puzzle,
    domains: &Domains,
    assignment: &[Option<WordId>],
) -> SlotId {
    (0..puzzle.slot_count())
        .filter(|&slot| assignment[slot].is_none())
        .min_by_key(|&slot| (domains.size(slot), Reverse(puzzle.neighbors(slot).len())))
        .expect("some slot is unassigned")
}

/// Least-constraining-value order: candidates ascending by how many options
/// they would remove from unassigned neighbors. A candidate also rules out
/// its own duplicate in a neighbor's domain, since the final assignment must
/// use pairwise-distinct words. Ties resolve to the lower word index
/// (incidental, not a guaranteed ordering).
fn order_domain_values(
    puzzle: &Puzzle,
    domains: &Domains,
    assignment: &[Option<WordId>],
    slot: SlotId,
) -> Vec<WordId> {
    let mut scored: Vec<(usize, WordId)> = domains
        .candidates(slot)
        .iter()
        .map(|&word| (eliminated_by(puzzle, domains, assignment, slot, word), word))
        .collect();
    scored.sort_unstable_by_key(|&(eliminated, word)| (eliminated, word));
    scored.into_iter().map(|(_, word)| word).collect()
}

/// How many candidate words binding `slot = word` would eliminate across the
/// domains of `slot`'s unassigned neighbors.
fn eliminated_by(
    puzzle: &Puzzle,
    domains: &Domains,
    assignment: &[Option<WordId>],
    slot: SlotId,
    word: WordId,
) -> usize {
    let letters = puzzle.word(word).as_bytes();
    let mut eliminated = 0;
    for &z in puzzle.neighbors(slot) {
        if assignment[z].is_some() {
            continue;
        }
        let Some((i, j)) = puzzle.overlap(slot, z) else {
            continue;
        };
        for &other in domains.candidates(z) {
            if other == word || puzzle.word(other).as_bytes()[j] != letters[i] {
                eliminated += 1;
            }
        }
    }
    eliminated
}
