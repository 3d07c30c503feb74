//! Breadth-first solver for Rush Hour style sliding-block puzzles.
//!
//! A puzzle is described as one `label,row,column,size,axisCode` record per
//! line (axis code 0 is horizontal, 1 is vertical) on a fixed 6x6 board. The
//! solver looks for the fewest single-step slides that bring the goal
//! vehicle `X` to the exit.
//!
//! ```
//! use rush_hour_solver::Solver;
//!
//! let solver = Solver::load("A,1,1,2,0\nX,2,1,2,0\nB,0,4,3,1\nC,5,4,2,0").unwrap();
//! let path = solver.solve().unwrap();
//! assert_eq!(path.len(), 3);
//! assert_eq!(path[2].to_string(), "X -> (2, 4)");
//! ```

mod board;
mod error;
mod solver;
mod vehicle;

pub use board::{Board, Identity, Move, Variant, BOARD_SIZE};
pub use error::{BoardError, VehicleError};
pub use solver::{SearchStats, Solver, EXIT};
pub use vehicle::{Axis, Position, Vehicle, GOAL_LABEL};
