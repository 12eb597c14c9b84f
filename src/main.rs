//! Fill-in Crossword Solver
//!
//! Reads a grid structure file and a word list, solves the crossword as a
//! constraint satisfaction problem, and prints the filled grid. Underscores
//! in the structure mark fillable cells; every other character is blocked.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossfill::{render, search, Puzzle, PuzzleError};

/// Solves a fill-in crossword from a structure file and a word list.
#[derive(Parser)]
#[command(name = "crossfill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: '_' is a fillable cell, anything else is blocked.
    structure: PathBuf,
    /// Word list file, one candidate word per line.
    words: PathBuf,
    /// Also write the solved grid to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log solver progress.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            println!("No solution.");
            ExitCode::from(2)
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();
}

/// Parses, solves, and prints. `Ok(false)` means the puzzle has no solution.
fn run(cli: &Cli) -> Result<bool, PuzzleError> {
    let structure = fs::read_to_string(&cli.structure)?;
    let words = fs::read_to_string(&cli.words)?;
    let puzzle = Puzzle::parse(&structure, &words)?;

    match search::solve(&puzzle) {
        Some(solution) => {
            print!("{}", render::format_solution(&puzzle, &solution));
            if let Some(path) = &cli.output {
                render::save_text(&puzzle, &solution, path)?;
            }
            Ok(true)
        }
        None => Ok(false),
    }
}
