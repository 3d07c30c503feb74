use std::collections::{HashMap, HashSet, VecDeque};

use log::{info, trace};

use crate::board::{Board, Identity, Move};
use crate::error::BoardError;
use crate::vehicle::{Position, GOAL_LABEL};

/// Top-left position of the goal vehicle once it has reached the exit.
///
/// Fixed for a 6x6 board with a horizontal goal vehicle of size 2.
pub const EXIT: Position = (2, 4);

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards taken off the frontier and expanded.
    pub expanded: usize,
    /// Variants produced by those expansions, duplicates included.
    pub generated: usize,
}

// how a discovered board was first reached; the initial board has none
struct Step {
    parent: Identity,
    movement: Move,
}

/// Breadth-first search from an initial board to one with the goal
/// vehicle at [`EXIT`].
#[derive(Debug, Clone)]
pub struct Solver {
    initial: Board,
}

impl Solver {
    pub fn new(initial: Board) -> Solver {
        Solver { initial }
    }

    pub fn load(descriptor: &str) -> Result<Solver, BoardError> {
        Ok(Solver::new(Board::parse(descriptor)?))
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    pub fn is_solved(board: &Board) -> bool {
        board
            .vehicle(GOAL_LABEL)
            .is_some_and(|v| v.position() == EXIT)
    }

    /// Shortest sequence of moves that solves the puzzle, or `None` if no
    /// sequence exists. An already-solved board gives an empty sequence.
    pub fn solve(&self) -> Option<Vec<Move>> {
        self.solve_with_stats().1
    }

    pub fn solve_with_stats(&self) -> (SearchStats, Option<Vec<Move>>) {
        let mut stats = SearchStats::default();

        let root = self.initial.identity();
        let mut discovered = HashSet::from([root]);
        let mut settled = HashSet::new();
        let mut predecessor: HashMap<Identity, Option<Step>> = HashMap::from([(root, None)]);
        let mut frontier = VecDeque::from([self.initial.clone()]);

        while let Some(board) = frontier.pop_front() {
            let id = board.identity();
            if settled.contains(&id) {
                continue;
            }

            if Solver::is_solved(&board) {
                let path = backtrack(&predecessor, id);
                info!(
                    "solved in {} moves ({} expanded, {} generated)",
                    path.len(),
                    stats.expanded,
                    stats.generated
                );
                return (stats, Some(path));
            }

            settled.insert(id);
            stats.expanded += 1;

            let variants = board.variants();
            stats.generated += variants.len();
            trace!("expanding {} into {} variants", id, variants.len());

            for variant in variants {
                let vid = variant.board.identity();
                if discovered.contains(&vid) || settled.contains(&vid) {
                    continue;
                }

                predecessor.insert(
                    vid,
                    Some(Step {
                        parent: id,
                        movement: variant.movement,
                    }),
                );
                discovered.insert(vid);
                frontier.push_back(variant.board);
            }
        }

        info!(
            "no solution ({} expanded, {} generated)",
            stats.expanded, stats.generated
        );
        (stats, None)
    }
}

fn backtrack(predecessor: &HashMap<Identity, Option<Step>>, mut id: Identity) -> Vec<Move> {
    let mut path = Vec::new();
    while let Some(Some(step)) = predecessor.get(&id) {
        path.push(step.movement.clone());
        id = step.parent;
    }

    path.reverse();
    path
}
