//! Puzzle model: grid geometry, word slots, overlaps, and vocabulary.
//!
//! Built once from the structure text and word list, then read-only for the
//! lifetime of a solve. The rest of the crate refers to slots and words by
//! their index into the puzzle's `slots` and `words` tables.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// Index of a slot in [`Puzzle::slots`].
pub type SlotId = usize;

/// Index of a word in [`Puzzle::words`].
pub type WordId = usize;

/// Orientation of a word slot in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

/// One word position in the grid: starting cell, orientation, and length.
///
/// Two slots are equal iff all four fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// Grid cell holding character `offset` of this slot's word.
    pub fn cell(&self, offset: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.row, self.col + offset),
            Direction::Down => (self.row + offset, self.col),
        }
    }

    /// All cells covered by this slot, in word order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |offset| self.cell(offset))
    }
}

/// Errors from building a puzzle out of structure text and a word list.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("structure contains no rows")]
    EmptyStructure,
    #[error("word {0:?} is not ASCII")]
    NonAsciiWord(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Immutable description of one fill-in crossword instance.
///
/// Holds the grid, the extracted slots, the interned vocabulary, and the
/// precomputed overlap and neighbor relations the solver queries.
pub struct Puzzle {
    width: usize,
    height: usize,
    fillable: Vec<bool>,
    slots: Vec<Slot>,
    words: Vec<String>,
    overlaps: FxHashMap<(SlotId, SlotId), (usize, usize)>,
    neighbors: Vec<Vec<SlotId>>,
}

impl Puzzle {
    /// Builds a puzzle from structure text and a word list.
    ///
    /// In the structure, `_` marks a fillable cell and any other character a
    /// blocked one. Leading and trailing blank lines are ignored; shorter
    /// lines are padded with blocked cells. The word list holds one
    /// candidate per line; words are uppercased and deduplicated, and may be
    /// of any length (the solver filters by slot length itself).
    pub fn parse(structure: &str, word_list: &str) -> Result<Self, PuzzleError> {
        let (width, height, fillable) = parse_structure(structure)?;
        let words = parse_words(word_list)?;
        let slots = scan_slots(width, height, &fillable);
        let overlaps = compute_overlaps(&slots);
        let neighbors = compute_neighbors(slots.len(), &overlaps);

        Ok(Self {
            width,
            height,
            fillable,
            slots,
            words,
            overlaps,
            neighbors,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_fillable(&self, row: usize, col: usize) -> bool {
        self.fillable[row * self.width + col]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Slot {
        self.slots[id]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, id: WordId) -> &str {
        &self.words[id]
    }

    /// Character offsets `(i, j)` of the cell shared by `x` and `y`, if any.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// Slots whose cells intersect `x`'s, excluding `x` itself.
    pub fn neighbors(&self, x: SlotId) -> &[SlotId] {
        &self.neighbors[x]
    }

    /// Every ordered pair of overlapping slots, in slot-index order.
    pub fn arcs(&self) -> Vec<(SlotId, SlotId)> {
        let mut arcs = Vec::new();
        for x in 0..self.slots.len() {
            for &y in &self.neighbors[x] {
                arcs.push((x, y));
            }
        }
        arcs
    }
}

fn parse_structure(text: &str) -> Result<(usize, usize, Vec<bool>), PuzzleError> {
    let lines: Vec<&str> = text.lines().collect();
    let nonblank = |line: &&str| !line.trim().is_empty();
    let first = match lines.iter().position(nonblank) {
        Some(first) => first,
        None => return Err(PuzzleError::EmptyStructure),
    };
    let last = lines.iter().rposition(nonblank).unwrap_or(first);
    let lines = &lines[first..=last];

    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let mut fillable = Vec::with_capacity(lines.len() * width);
    for line in lines {
        let bytes = line.as_bytes();
        for col in 0..width {
            fillable.push(bytes.get(col) == Some(&b'_'));
        }
    }

    Ok((width, lines.len(), fillable))
}

fn parse_words(word_list: &str) -> Result<Vec<String>, PuzzleError> {
    let mut words = Vec::new();
    let mut seen = FxHashSet::default();
    for line in word_list.lines() {
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        if !word.is_ascii() {
            return Err(PuzzleError::NonAsciiWord(word.to_string()));
        }
        let word = word.to_ascii_uppercase();
        if seen.insert(word.clone()) {
            words.push(word);
        }
    }
    Ok(words)
}

/// Extracts word slots: maximal runs of at least two fillable cells,
/// across slots first in row-major order, then down slots column-major.
///
/// An isolated fillable cell belongs to no slot and stays unfilled.
fn scan_slots(width: usize, height: usize, fillable: &[bool]) -> Vec<Slot> {
    let at = |row: usize, col: usize| fillable[row * width + col];
    let mut slots = Vec::new();

    for row in 0..height {
        let mut col = 0;
        while col < width {
            if !at(row, col) {
                col += 1;
                continue;
            }
            let start = col;
            while col < width && at(row, col) {
                col += 1;
            }
            let length = col - start;
            if length >= 2 {
                slots.push(Slot {
                    row,
                    col: start,
                    direction: Direction::Across,
                    length,
                });
            }
        }
    }

    for col in 0..width {
        let mut row = 0;
        while row < height {
            if !at(row, col) {
                row += 1;
                continue;
            }
            let start = row;
            while row < height && at(row, col) {
                row += 1;
            }
            let length = row - start;
            if length >= 2 {
                slots.push(Slot {
                    row: start,
                    col,
                    direction: Direction::Down,
                    length,
                });
            }
        }
    }

    slots
}

fn compute_overlaps(slots: &[Slot]) -> FxHashMap<(SlotId, SlotId), (usize, usize)> {
    let mut overlaps = FxHashMap::default();
    for x in 0..slots.len() {
        for y in (x + 1)..slots.len() {
            if let Some((i, j)) = crossing(&slots[x], &slots[y]) {
                overlaps.insert((x, y), (i, j));
                overlaps.insert((y, x), (j, i));
            }
        }
    }
    overlaps
}

/// Character offsets of the cell two slots share, if their cells intersect.
///
/// Slots extracted from a grid cross in at most one cell, so the first
/// match is the only one.
fn crossing(a: &Slot, b: &Slot) -> Option<(usize, usize)> {
    for (i, cell) in a.cells().enumerate() {
        for (j, other) in b.cells().enumerate() {
            if cell == other {
                return Some((i, j));
            }
        }
    }
    None
}

fn compute_neighbors(
    slot_count: usize,
    overlaps: &FxHashMap<(SlotId, SlotId), (usize, usize)>,
) -> Vec<Vec<SlotId>> {
    let mut neighbors = vec![Vec::new(); slot_count];
    for x in 0..slot_count {
        for y in 0..slot_count {
            if x != y && overlaps.contains_key(&(x, y)) {
                neighbors[x].push(y);
            }
        }
    }
    neighbors
}
