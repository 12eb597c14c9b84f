//! Constraint propagation: node consistency and the AC-3 fixpoint.

use std::collections::VecDeque;

use log::debug;
use rustc_hash::FxHashSet;

use crate::domains::Domains;
use crate::puzzle::{Puzzle, SlotId};

/// Removes every candidate whose length differs from its slot's length.
///
/// Idempotent; runs once before search.
pub fn enforce_node_consistency(puzzle: &Puzzle, domains: &mut Domains) {
    for slot in 0..puzzle.slot_count() {
        let length = puzzle.slot(slot).length;
        domains.restrict(slot, |word| puzzle.word(word).len() == length);
    }
}

/// Makes `x` arc consistent with `y`: drops every word in `x`'s domain with
/// no supporting word in `y`'s domain at the overlap offsets.
///
/// Returns whether `x`'s domain changed. A pair without an overlap is left
/// untouched.
pub fn revise(puzzle: &Puzzle, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let Some((i, j)) = puzzle.overlap(x, y) else {
        return false;
    };

    // letters y can still put into the shared cell
    let support: FxHashSet<u8> = domains
        .candidates(y)
        .iter()
        .filter_map(|&word| puzzle.word(word).as_bytes().get(j).copied())
        .collect();

    domains.restrict(x, |word| {
        puzzle
            .word(word)
            .as_bytes()
            .get(i)
            .is_some_and(|letter| support.contains(letter))
    })
}

/// Runs the AC-3 worklist to fixpoint.
///
/// `arcs` seeds the queue; `None` seeds every ordered pair of overlapping
/// slots. Whenever a revision shrinks the domain of `x`, every arc `(z, x)`
/// for a neighbor `z` other than the revision source is re-enqueued, since
/// a smaller domain for `x` can only break arcs pointing into `x`.
///
/// Returns `false` as soon as a revision empties a domain (the puzzle is
/// unsatisfiable from this state, and remaining arcs are skipped), `true`
/// once the queue drains.
pub fn ac3(puzzle: &Puzzle, domains: &mut Domains, arcs: Option<Vec<(SlotId, SlotId)>>) -> bool {
    let mut queue: VecDeque<(SlotId, SlotId)> = match arcs {
        Some(arcs) => arcs.into(),
        None => puzzle.arcs().into(),
    };

    while let Some((x, y)) = queue.pop_front() {
        if !revise(puzzle, domains, x, y) {
            continue;
        }
        if domains.is_empty(x) {
            debug!("arc consistency emptied the domain of slot {x}");
            return false;
        }
        for &z in puzzle.neighbors(x) {
            if z != y {
                queue.push_back((z, x));
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::WordId;

    fn word_id(puzzle: &Puzzle, word: &str) -> WordId {
        puzzle.words().iter().position(|w| w == word).unwrap()
    }

    fn domain_words(puzzle: &Puzzle, domains: &Domains, slot: SlotId) -> Vec<String> {
        let mut words: Vec<String> = domains
            .candidates(slot)
            .iter()
            .map(|&w| puzzle.word(w).to_string())
            .collect();
        words.sort();
        words
    }

    /// One across slot crossing one down slot at the across word's last
    /// character and the down word's first.
    fn corner_puzzle(words: &str) -> Puzzle {
        Puzzle::parse("___\n**_\n**_", words).unwrap()
    }

    #[test]
    fn test_node_consistency_filters_by_length() {
        let puzzle = Puzzle::parse("___", "cat\ndog\nhorse\nat").unwrap();
        let mut domains = Domains::seed(&puzzle);

        enforce_node_consistency(&puzzle, &mut domains);

        assert_eq!(domain_words(&puzzle, &domains, 0), ["CAT", "DOG"]);
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let puzzle = Puzzle::parse("___", "cat\nhorse").unwrap();
        let mut domains = Domains::seed(&puzzle);

        enforce_node_consistency(&puzzle, &mut domains);
        let once = domains.clone();
        enforce_node_consistency(&puzzle, &mut domains);

        assert_eq!(domains, once);
    }

    #[test]
    fn test_node_consistency_can_empty_a_domain() {
        let puzzle = Puzzle::parse("____", "cat\ndog").unwrap();
        let mut domains = Domains::seed(&puzzle);

        enforce_node_consistency(&puzzle, &mut domains);

        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_revise_drops_unsupported_words() {
        let puzzle = corner_puzzle("cat\ncar\nrat");
        let mut domains = Domains::seed(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        // across words must end with a letter some down word starts with
        assert!(revise(&puzzle, &mut domains, 0, 1));
        assert_eq!(domain_words(&puzzle, &domains, 0), ["CAR"]);
        // the down domain is untouched by revising the across slot
        assert_eq!(domain_words(&puzzle, &domains, 1), ["CAR", "CAT", "RAT"]);
    }

    #[test]
    fn test_revise_without_overlap_is_a_no_op() {
        let puzzle = Puzzle::parse("___*___", "cat\ndog").unwrap();
        let mut domains = Domains::seed(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        assert!(!revise(&puzzle, &mut domains, 0, 1));
        assert_eq!(domains.size(0), 2);
    }

    #[test]
    fn test_ac3_reaches_a_sound_fixpoint() {
        let puzzle = corner_puzzle("cat\ncar\nrat");
        let mut domains = Domains::seed(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        assert!(ac3(&puzzle, &mut domains, None));
        assert_eq!(domain_words(&puzzle, &domains, 0), ["CAR"]);
        assert_eq!(domain_words(&puzzle, &domains, 1), ["RAT"]);

        // every remaining word has a support in every overlapping neighbor
        for x in 0..puzzle.slot_count() {
            for &y in puzzle.neighbors(x) {
                let (i, j) = puzzle.overlap(x, y).unwrap();
                for &word in domains.candidates(x) {
                    let letter = puzzle.word(word).as_bytes()[i];
                    assert!(domains
                        .candidates(y)
                        .iter()
                        .any(|&other| puzzle.word(other).as_bytes()[j] == letter));
                }
            }
        }
    }

    #[test]
    fn test_ac3_reports_failure_on_emptied_domain() {
        let puzzle = corner_puzzle("cat\ndog");
        let mut domains = Domains::seed(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        // no down word starts with T or G, so the across domain empties
        assert!(!ac3(&puzzle, &mut domains, None));
    }

    #[test]
    fn test_ac3_cascades_through_neighbors() {
        // two across slots tied together by the middle down slot
        let structure = "
___
*_*
___
";
        let puzzle = Puzzle::parse(structure, "cat\nace\ntea\ntot").unwrap();
        let top = 0;
        let bottom = 1;
        let middle = 2;
        assert_eq!(puzzle.overlap(middle, top), Some((0, 1)));
        assert_eq!(puzzle.overlap(bottom, middle), Some((1, 2)));

        let mut domains = Domains::seed(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);
        domains.assign(top, word_id(&puzzle, "CAT"));

        // seeding only the arc into the middle slot must still reach the
        // bottom slot transitively
        assert!(ac3(&puzzle, &mut domains, Some(vec![(middle, top)])));
        assert_eq!(domain_words(&puzzle, &domains, middle), ["ACE"]);
        assert_eq!(domain_words(&puzzle, &domains, bottom), ["TEA"]);
    }
}
