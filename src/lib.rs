//! Fill-in Crossword Solver Library
//!
//! Models a fill-in crossword as a constraint satisfaction problem: every
//! across/down word slot is a variable, its domain is the vocabulary filtered
//! to the slot's length, and crossing slots constrain each other at the
//! shared cell. Solving runs node consistency, an AC-3 fixpoint, and an
//! iterative backtracking search with forward checking.

pub mod consistency;
pub mod domains;
pub mod puzzle;
pub mod render;
pub mod search;

pub use domains::Domains;
pub use puzzle::{Direction, Puzzle, PuzzleError, Slot, SlotId, WordId};
pub use search::{solve, Solution};
