use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    ops::{Index, IndexMut},
};

use itertools::Itertools;
use log::debug;
use smallvec::SmallVec;

use crate::error::BoardError;
use crate::vehicle::{footprint_at, Axis, Position, Vehicle};

/// Side length of the square grid.
pub const BOARD_SIZE: usize = 6;

const EMPTY: u8 = u8::MAX;

// cells hold the index of the occupying vehicle in `Board::vehicles`, or EMPTY.
// at most 18 vehicles fit on 36 cells, so an index never collides with EMPTY
#[derive(Debug, Clone)]
struct Grid([u8; BOARD_SIZE * BOARD_SIZE]);

impl Index<Position> for Grid {
    type Output = u8;
    fn index(&self, index: Position) -> &Self::Output {
        &self.0[index.0 * BOARD_SIZE + index.1]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.0[index.0 * BOARD_SIZE + index.1]
    }
}

fn in_bounds((row, column): Position) -> bool {
    row < BOARD_SIZE && column < BOARD_SIZE
}

/// Canonical identity of a board: a BLAKE3 digest over the grid cells, each
/// encoded as its occupant's length-prefixed label (length 0 when empty).
///
/// Two boards are treated as the same configuration iff their identities
/// match. A 256-bit digest makes accidental collisions negligible, so no
/// structural comparison backs it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(blake3::Hash);

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// A single slide: the vehicle `label` ends up with its top-left at `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub label: String,
    pub to: Position,
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.label, self.to.0, self.to.1)
    }
}

/// A board reachable in one move, together with the move that produced it.
#[derive(Debug, Clone)]
pub struct Variant {
    pub board: Board,
    pub movement: Move,
}

/// A validated arrangement of vehicles on the grid.
///
/// Every vehicle's footprint is in bounds, no two footprints overlap and the
/// grid marks exactly the union of the footprints. Boards are values:
/// moving a vehicle always yields a new board.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    vehicles: Vec<Vehicle>,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            grid: Grid([EMPTY; BOARD_SIZE * BOARD_SIZE]),
            vehicles: Vec::new(),
        }
    }
}

impl Board {
    /// Parses a descriptor of `label,row,column,size,axisCode` records, one
    /// per line. Blank lines are skipped and an empty descriptor gives an
    /// empty board.
    pub fn parse(descriptor: &str) -> Result<Board, BoardError> {
        let mut board = Board::default();
        if descriptor.trim().is_empty() {
            return Ok(board);
        }

        for (ix, line) in descriptor.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            board.place(parse_record(ix + 1, line)?)?;
        }

        if !board.vehicles.iter().any(Vehicle::is_goal) {
            return Err(BoardError::MissingGoalVehicle);
        }

        debug!("loaded board with {} vehicles", board.len());
        Ok(board)
    }

    /// Vehicles in the order they were placed.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, label: &str) -> Option<&Vehicle> {
        self.slot_of(label).map(|slot| &self.vehicles[slot])
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Label of the vehicle covering `position`, if any.
    pub fn cell(&self, position: Position) -> Option<&str> {
        if !in_bounds(position) {
            return None;
        }

        match self.grid[position] {
            EMPTY => None,
            slot => Some(self.vehicles[slot as usize].label()),
        }
    }

    pub fn identity(&self) -> Identity {
        let mut hasher = blake3::Hasher::new();
        for &slot in &self.grid.0 {
            let label = match slot {
                EMPTY => "",
                slot => self.vehicles[slot as usize].label(),
            };
            hasher.update(&(label.len() as u32).to_le_bytes());
            hasher.update(label.as_bytes());
        }

        Identity(hasher.finalize())
    }

    /// Every board reachable with one slide of one vehicle.
    ///
    /// Each intermediate stop is its own move: a vehicle with three free
    /// cells ahead yields three variants, not one.
    pub fn variants(&self) -> Vec<Variant> {
        let mut out = Vec::new();
        for (slot, vehicle) in self.vehicles.iter().enumerate() {
            for to in self.stops(vehicle) {
                let mut board = self.clone();
                board.commit(slot, to);
                out.push(Variant {
                    board,
                    movement: Move {
                        label: vehicle.label().to_owned(),
                        to,
                    },
                });
            }
        }

        out
    }

    /// Applies a single move, returning the resulting board.
    ///
    /// The destination must be one of the stops `variants` would produce.
    pub fn apply(&self, movement: &Move) -> Result<Board, BoardError> {
        let slot = self
            .slot_of(&movement.label)
            .ok_or_else(|| BoardError::NotFound(movement.label.clone()))?;

        let vehicle = &self.vehicles[slot];
        if !self.stops(vehicle).contains(&movement.to) {
            return Err(BoardError::Placement {
                vehicle: format!("{} -> ({}, {})", vehicle, movement.to.0, movement.to.1),
            });
        }

        let mut board = self.clone();
        board.commit(slot, movement.to);
        Ok(board)
    }

    fn slot_of(&self, label: &str) -> Option<usize> {
        self.vehicles.iter().position(|v| v.label() == label)
    }

    fn is_free(&self, position: Position) -> bool {
        in_bounds(position) && self.grid[position] == EMPTY
    }

    fn place(&mut self, vehicle: Vehicle) -> Result<(), BoardError> {
        if self.slot_of(vehicle.label()).is_some() {
            return Err(BoardError::DuplicateLabel(vehicle.label().to_owned()));
        }

        if !vehicle.footprint().all(|p| self.is_free(p)) {
            return Err(BoardError::Placement {
                vehicle: vehicle.to_string(),
            });
        }

        let slot = self.vehicles.len() as u8;
        for p in vehicle.footprint() {
            self.grid[p] = slot;
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    // reachable top-left positions along the vehicle's axis, nearest first,
    // backward direction before forward
    fn stops(&self, vehicle: &Vehicle) -> SmallVec<[Position; 4]> {
        let (row, column) = vehicle.position();
        let (fixed, lead) = match vehicle.axis() {
            Axis::Horizontal => (row, column),
            Axis::Vertical => (column, row),
        };
        let at = |k: usize| match vehicle.axis() {
            Axis::Horizontal => (fixed, k),
            Axis::Vertical => (k, fixed),
        };
        let trail = vehicle.size() - 1;

        let mut out = SmallVec::new();
        for k in (0..lead).rev() {
            if !self.is_free(at(k)) {
                break;
            }
            out.push(at(k));
        }

        // moving the head to k needs the cell under the new trailing edge
        for k in lead + 1.. {
            if !self.is_free(at(k + trail)) {
                break;
            }
            out.push(at(k));
        }

        out
    }

    // caller guarantees `to` is a legal stop for the vehicle
    fn commit(&mut self, slot: usize, to: Position) {
        let vehicle = &mut self.vehicles[slot];
        for p in vehicle.footprint() {
            self.grid[p] = EMPTY;
        }

        vehicle.reposition(to);
        for p in footprint_at(to, vehicle.size(), vehicle.axis()) {
            self.grid[p] = slot as u8;
        }
    }
}

fn parse_record(line: usize, record: &str) -> Result<Vehicle, BoardError> {
    let fields: SmallVec<[&str; 5]> = record.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(BoardError::Parse {
            line,
            reason: format!("expected 5 fields, found {}", fields.len()),
        });
    }

    if fields[0].is_empty() {
        return Err(BoardError::Parse {
            line,
            reason: "empty label".to_owned(),
        });
    }

    let number = |ix: usize| {
        fields[ix].parse::<i64>().map_err(|e| BoardError::Parse {
            line,
            reason: format!("field {} ({:?}): {}", ix + 1, fields[ix], e),
        })
    };

    let vehicle = Vehicle::new(fields[0], (number(1)?, number(2)?), number(3)?, number(4)?)?;
    Ok(vehicle)
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "     {}", (0..BOARD_SIZE).join("   "))?;
        for row in 0..BOARD_SIZE {
            let cells = (0..BOARD_SIZE)
                .map(|column| self.cell((row, column)).unwrap_or("."))
                .join(" | ");
            writeln!(f, "{}: | {} |", row, cells)?;
        }

        Ok(())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::VehicleError;

    pub(crate) const EXAMPLE: &str = "A,1,1,2,0\nX,2,1,2,0\nB,0,4,3,1\nC,5,4,2,0";

    // grid marks must be exactly the union of the footprints
    fn assert_consistent(board: &Board) {
        let mut expected = [None; BOARD_SIZE * BOARD_SIZE];
        for vehicle in board.vehicles() {
            for (r, c) in vehicle.footprint() {
                assert!(in_bounds((r, c)), "{} out of bounds", vehicle);
                let cell = &mut expected[r * BOARD_SIZE + c];
                assert!(cell.is_none(), "{} overlaps", vehicle);
                *cell = Some(vehicle.label());
            }
        }

        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                assert_eq!(board.cell((r, c)), expected[r * BOARD_SIZE + c]);
            }
        }
    }

    #[test]
    fn vehicles_are_loaded() {
        let board = Board::parse(EXAMPLE).unwrap();
        let labels: Vec<_> = board.vehicles().iter().map(|v| v.label()).collect();
        assert_eq!(labels, ["A", "X", "B", "C"]);
        assert_eq!(board.vehicle("X").unwrap().position(), (2, 1));
        assert_eq!(board.vehicle("B").unwrap().position(), (0, 4));
        assert!(!board.vehicle("B").unwrap().is_horizontal());
        assert_consistent(&board);
    }

    #[test]
    fn cells_mirror_footprints() {
        let board = Board::parse(EXAMPLE).unwrap();
        assert_eq!(board.cell((0, 4)), Some("B"));
        assert_eq!(board.cell((2, 4)), Some("B"));
        assert_eq!(board.cell((3, 4)), None);
        assert_eq!(board.cell((5, 5)), Some("C"));
        assert_eq!(board.cell((6, 0)), None);
    }

    #[test]
    fn blank_lines_and_crlf_are_accepted() {
        let board = Board::parse("\nA,1,1,2,0\r\n\r\nX,2,1,2,0\r\n").unwrap();
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn missing_goal_vehicle() {
        assert_eq!(
            Board::parse("A,0,0,2,0").unwrap_err(),
            BoardError::MissingGoalVehicle
        );
    }

    #[test]
    fn overlapping_vehicles() {
        let err = Board::parse("X,2,1,2,0\nA,2,2,2,0").unwrap_err();
        assert!(matches!(err, BoardError::Placement { ref vehicle } if vehicle.starts_with("A ")));
    }

    #[test]
    fn out_of_bounds_vehicle() {
        assert!(matches!(
            Board::parse("X,2,1,2,0\nA,0,4,3,0"),
            Err(BoardError::Placement { .. })
        ));
        assert!(matches!(
            Board::parse("X,2,1,2,0\nB,4,0,3,1"),
            Err(BoardError::Placement { .. })
        ));
    }

    #[test]
    fn duplicate_label() {
        assert_eq!(
            Board::parse("X,2,1,2,0\nA,0,0,2,0\nA,4,0,2,0").unwrap_err(),
            BoardError::DuplicateLabel("A".to_owned())
        );
    }

    #[test]
    fn malformed_records() {
        assert!(matches!(
            Board::parse("X,2,1,2"),
            Err(BoardError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            Board::parse("X,2,1,2,0,7"),
            Err(BoardError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            Board::parse("X,2,1,2,0\nA,one,0,2,0"),
            Err(BoardError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Board::parse(",2,1,2,0"),
            Err(BoardError::Parse { .. })
        ));
    }

    #[test]
    fn vehicle_errors_propagate() {
        assert_eq!(
            Board::parse("X,2,1,2,3").unwrap_err(),
            BoardError::Vehicle(VehicleError::InvalidAxis(3))
        );
        assert_eq!(
            Board::parse("X,-1,1,2,0").unwrap_err(),
            BoardError::Vehicle(VehicleError::NegativePosition { row: -1, column: 1 })
        );
    }

    #[test]
    fn empty_descriptor_gives_empty_board() {
        let board = Board::parse("").unwrap();
        assert!(board.is_empty());
        assert!(board.variants().is_empty());
        assert!(Board::parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn identity_is_stable() {
        let a = Board::parse(EXAMPLE).unwrap();
        let b = Board::parse(EXAMPLE).unwrap();
        assert_eq!(a.identity(), b.identity());
        assert_eq!(a, b);
        assert_eq!(a.identity().to_string().len(), 64);
    }

    #[test]
    fn identity_discriminates() {
        let a = Board::parse(EXAMPLE).unwrap();
        let b = Board::parse("X,2,0,2,0\nB,0,4,3,1").unwrap();
        assert_ne!(a.identity(), b.identity());
        assert_ne!(a, b);
    }

    #[test]
    fn identity_sees_labels_that_look_like_empty_cells() {
        let a = Board::parse("X,2,1,2,0\n.,0,0,2,0").unwrap();
        let b = Board::parse("X,2,1,2,0\n.,0,3,2,0").unwrap();
        assert_eq!(a.to_string().lines().nth(1), b.to_string().lines().nth(1));
        assert_ne!(a.identity(), b.identity());
        assert_ne!(a, b);
    }

    #[test]
    fn identity_ignores_record_order() {
        let a = Board::parse(EXAMPLE).unwrap();
        let b = Board::parse("C,5,4,2,0\nB,0,4,3,1\nX,2,1,2,0\nA,1,1,2,0").unwrap();
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn enumerates_every_intermediate_stop() {
        let board = Board::parse(EXAMPLE).unwrap();
        let moves: Vec<_> = board
            .variants()
            .into_iter()
            .map(|v| v.movement.to_string())
            .collect();

        assert_eq!(
            moves,
            [
                "A -> (1, 0)",
                "A -> (1, 2)",
                "X -> (2, 0)",
                "X -> (2, 2)",
                "B -> (1, 4)",
                "B -> (2, 4)",
                "C -> (5, 3)",
                "C -> (5, 2)",
                "C -> (5, 1)",
                "C -> (5, 0)",
            ]
        );
    }

    #[test]
    fn variants_are_distinct_and_consistent() {
        let board = Board::parse(EXAMPLE).unwrap();
        let variants = board.variants();
        assert!(!variants.is_empty());

        for variant in &variants {
            assert_ne!(variant.board.identity(), board.identity());
            assert_eq!(variant.board.len(), board.len());
            assert_consistent(&variant.board);
            assert_eq!(
                variant.board.vehicle(&variant.movement.label).unwrap().position(),
                variant.movement.to
            );
        }

        // the parent is left untouched
        assert_eq!(board, Board::parse(EXAMPLE).unwrap());
    }

    #[test]
    fn apply_matches_enumeration() {
        let board = Board::parse(EXAMPLE).unwrap();
        for variant in board.variants() {
            assert_eq!(board.apply(&variant.movement).unwrap(), variant.board);
        }
    }

    #[test]
    fn apply_rejects_unknown_vehicle() {
        let board = Board::parse(EXAMPLE).unwrap();
        let movement = Move {
            label: "Z".to_owned(),
            to: (0, 0),
        };
        assert_eq!(
            board.apply(&movement).unwrap_err(),
            BoardError::NotFound("Z".to_owned())
        );
    }

    #[test]
    fn apply_rejects_illegal_slides() {
        let board = Board::parse(EXAMPLE).unwrap();
        for to in [(2, 4), (3, 1), (2, 1)] {
            let movement = Move {
                label: "X".to_owned(),
                to,
            };
            assert!(matches!(
                board.apply(&movement),
                Err(BoardError::Placement { .. })
            ));
        }
    }

    #[test]
    fn display_renders_grid() {
        let board = Board::parse("X,2,1,2,0\nB,0,4,3,1").unwrap();
        let text = board.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_SIZE + 1);
        assert_eq!(lines[0], "     0   1   2   3   4   5");
        assert_eq!(lines[2], "1: | . | . | . | . | B | . |");
        assert_eq!(lines[3], "2: | . | X | X | . | B | . |");
    }
}
