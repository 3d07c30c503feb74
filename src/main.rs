use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;

use rush_hour_solver::Solver;

// Descriptor format, one vehicle per line:
//   label,row,column,size,axis
// where axis is 0 for horizontal and 1 for vertical, e.g.
//   X,2,1,2,0
// The vehicle labelled X has to reach the exit on the right of row 2.

/// Solve a Rush Hour puzzle with breadth-first search.
#[derive(Parser)]
#[command(name = "rush-hour-solver", version)]
struct Cli {
    /// Puzzle descriptor file
    puzzle: PathBuf,

    /// Don't print the initial board
    #[arg(long, short)]
    quiet: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let descriptor = fs::read_to_string(&cli.puzzle)
        .with_context(|| format!("reading {}", cli.puzzle.display()))?;
    let solver = Solver::load(&descriptor)
        .with_context(|| format!("loading {}", cli.puzzle.display()))?;

    if !cli.quiet {
        println!("Initial state:");
        println!("{}", solver.initial());
    }

    let (stats, path) = solver.solve_with_stats();
    match path {
        Some(path) => {
            println!("Solved in {} moves:", path.len());
            for (ix, movement) in path.iter().enumerate() {
                println!("{:>3}. {}", ix + 1, movement);
            }
        }
        None => println!("No solution found"),
    }

    println!(
        "Expanded {} board positions (generated {} total).",
        stats.expanded, stats.generated
    );

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
