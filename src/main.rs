use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::style::{style, Stylize};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slider_solver::{Board, Dedup, PuzzleError, Solver, SolverConfig};
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "slider-solver",
    version,
    about = "Find a minimum-move solution to an n×n sliding puzzle"
)]
struct Cli {
    /// Puzzle file: n followed by n² tiles in row-major order, 0 for the blank
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
    /// Dimension of a generated board when no file is given
    #[arg(short = 'n', long, default_value_t = 3)]
    size: usize,
    /// Random slides applied to the goal when generating a board
    #[arg(long, default_value_t = 20, conflicts_with = "shuffle")]
    scramble: usize,
    /// Generate a uniformly shuffled board instead (may be unsolvable)
    #[arg(long)]
    shuffle: bool,
    /// Seed for board generation
    #[arg(long)]
    seed: Option<u64>,
    /// Never expand the same board twice
    #[arg(long)]
    visited: bool,
    /// Print the slide taken before each board
    #[arg(long)]
    directions: bool,
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid integer {token:?}")]
    Parse {
        token: String,
        source: std::num::ParseIntError,
    },
    #[error("puzzle file is empty")]
    Empty,
    #[error(transparent)]
    Board(#[from] PuzzleError),
}

/// Reads `n` followed by n² whitespace-separated tiles.
fn load_board(path: &Path) -> Result<Board, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = text.split_whitespace().map(|token| {
        token.parse::<u32>().map_err(|source| LoadError::Parse {
            token: token.to_string(),
            source,
        })
    });

    let size = values.next().ok_or(LoadError::Empty)?? as usize;
    let tiles = values.collect::<Result<Vec<u32>, _>>()?;
    Ok(Board::from_flat(size, tiles)?)
}

/// Formats a board like its `Display` form, highlighting the tile at `moved`.
fn render(board: &Board, moved: Option<(usize, usize)>) -> String {
    let mut out = format!("{}\n", board.dimension());
    for (r, row) in board.rows().enumerate() {
        for (c, &val) in row.iter().enumerate() {
            let cell = format!("{:2}", val);
            let cell = if moved == Some((r, c)) {
                style(cell).bold().yellow().to_string()
            } else if val == 0 {
                style(cell).dim().to_string()
            } else {
                cell
            };
            out.push_str(&cell);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let initial = match &cli.input {
        Some(path) => load_board(path)?,
        None => {
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            if cli.shuffle {
                Board::shuffled(cli.size, &mut rng)?
            } else {
                Board::scrambled(cli.size, cli.scramble, &mut rng)?
            }
        }
    };

    tracing::info!(
        dimension = initial.dimension(),
        manhattan = initial.manhattan(),
        hamming = initial.hamming(),
        "Loaded board"
    );

    let config = SolverConfig {
        dedup: if cli.visited {
            Dedup::Visited
        } else {
            Dedup::Parent
        },
    };
    let solver = Solver::with_config(initial, config);

    let stats = solver.stats();
    tracing::info!(
        main_expanded = stats.main_expanded,
        twin_expanded = stats.twin_expanded,
        enqueued = stats.main_enqueued + stats.twin_enqueued,
        "Search complete"
    );

    if !solver.is_solvable() {
        println!("No solution possible");
        return Ok(());
    }

    println!("Minimum number of moves = {}", solver.moves()?);
    let directions = solver.directions()?;
    let mut previous: Option<&Board> = None;
    for (step, board) in solver.solution()?.enumerate() {
        // The tile that moved now sits where the blank was.
        let moved = previous.and_then(Board::blank);
        if cli.directions && step > 0 {
            println!("{}", directions[step - 1]);
        }
        println!("{}", render(board, moved));
        previous = Some(board);
    }

    Ok(())
}
