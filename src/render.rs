//! Formatting a solved grid for the terminal and for text-file export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::puzzle::{Puzzle, PuzzleError};
use crate::search::Solution;

const BLOCKED: char = '█';

/// Lays the solution's words out on the grid.
///
/// `None` marks a blocked cell. A fillable cell no slot covers stays
/// `Some(' ')`.
pub fn letter_grid(puzzle: &Puzzle, solution: &Solution) -> Vec<Vec<Option<char>>> {
    let mut grid: Vec<Vec<Option<char>>> = (0..puzzle.height())
        .map(|row| {
            (0..puzzle.width())
                .map(|col| puzzle.is_fillable(row, col).then_some(' '))
                .collect()
        })
        .collect();

    for (slot_id, &word) in solution.iter().enumerate() {
        let slot = puzzle.slot(slot_id);
        for (offset, letter) in puzzle.word(word).chars().enumerate() {
            let (row, col) = slot.cell(offset);
            grid[row][col] = Some(letter);
        }
    }

    grid
}

/// Renders the solved grid, one row per line, blocked cells as `█`.
pub fn format_solution(puzzle: &Puzzle, solution: &Solution) -> String {
    let mut output = String::new();
    for row in letter_grid(puzzle, solution) {
        for cell in row {
            output.push(cell.unwrap_or(BLOCKED));
        }
        output.push('\n');
    }
    output
}

/// Writes the rendered grid to `path`.
pub fn save_text(puzzle: &Puzzle, solution: &Solution, path: &Path) -> Result<(), PuzzleError> {
    let mut file = File::create(path)?;
    file.write_all(format_solution(puzzle, solution).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::solve;

    #[test]
    fn test_letter_grid_places_words_along_slots() {
        let puzzle = Puzzle::parse("____\n_***\n_***", "cars\ncar\nrat").unwrap();
        let solution = solve(&puzzle).unwrap();
        let grid = letter_grid(&puzzle, &solution);

        assert_eq!(grid[0], [Some('C'), Some('A'), Some('R'), Some('S')]);
        assert_eq!(grid[1], [Some('A'), None, None, None]);
        assert_eq!(grid[2], [Some('R'), None, None, None]);
    }

    #[test]
    fn test_format_marks_blocked_cells() {
        let puzzle = Puzzle::parse("____\n_***\n_***", "cars\ncar\nrat").unwrap();
        let solution = solve(&puzzle).unwrap();

        assert_eq!(
            format_solution(&puzzle, &solution),
            "CARS\nA███\nR███\n"
        );
    }

    #[test]
    fn test_uncovered_fillable_cell_renders_as_space() {
        let puzzle = Puzzle::parse("_*_\n***", "cat").unwrap();
        let solution = solve(&puzzle).unwrap();

        assert_eq!(format_solution(&puzzle, &solution), " █ \n███\n");
    }

    #[test]
    fn test_save_text_writes_the_rendered_grid() {
        let puzzle = Puzzle::parse("____\n_***\n_***", "cars\ncar\nrat").unwrap();
        let solution = solve(&puzzle).unwrap();

        let path = std::env::temp_dir().join(format!("crossfill-{}.txt", std::process::id()));
        save_text(&puzzle, &solution, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, format_solution(&puzzle, &solution));
    }
}
