use std::fmt::Display;

use crate::error::VehicleError;

/// Grid coordinate as `(row, column)`, with `(0, 0)` at the top-left.
pub type Position = (usize, usize);

/// Label of the vehicle that has to reach the exit.
pub const GOAL_LABEL: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Decodes the descriptor's axis code: 0 is horizontal, 1 is vertical.
    pub fn from_code(code: i64) -> Result<Axis, VehicleError> {
        match code {
            0 => Ok(Axis::Horizontal),
            1 => Ok(Axis::Vertical),
            _ => Err(VehicleError::InvalidAxis(code)),
        }
    }
}

/// A single piece on the board.
///
/// Label, size and axis are fixed at construction; only the position
/// changes, and only through the board committing a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    label: String,
    position: Position,
    size: usize,
    axis: Axis,
}

impl Vehicle {
    pub fn new(
        label: impl Into<String>,
        position: (i64, i64),
        size: i64,
        axis_code: i64,
    ) -> Result<Vehicle, VehicleError> {
        let (row, column) = position;
        if row < 0 || column < 0 {
            return Err(VehicleError::NegativePosition { row, column });
        }

        let axis = Axis::from_code(axis_code)?;

        if size != 2 && size != 3 {
            return Err(VehicleError::InvalidSize(size));
        }

        Ok(Vehicle {
            label: label.into(),
            position: (row as usize, column as usize),
            size: size as usize,
            axis,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_horizontal(&self) -> bool {
        self.axis == Axis::Horizontal
    }

    pub fn is_goal(&self) -> bool {
        self.label == GOAL_LABEL
    }

    /// Cells covered by the vehicle, starting at its top-left.
    /// May run past the grid; bounds are the board's concern.
    pub fn footprint(&self) -> impl Iterator<Item = Position> {
        footprint_at(self.position, self.size, self.axis)
    }

    // no validation here: the board checks the destination first
    pub(crate) fn reposition(&mut self, position: Position) {
        self.position = position;
    }
}

#[auto_enums::auto_enum(Iterator)]
pub(crate) fn footprint_at(
    (row, column): Position,
    size: usize,
    axis: Axis,
) -> impl Iterator<Item = Position> {
    match axis {
        Axis::Horizontal => (column..column + size).map(move |c| (row, c)),
        Axis::Vertical => (row..row + size).map(move |r| (r, column)),
    }
}

impl Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at ({}, {}), size {}, {}",
            self.label,
            self.position.0,
            self.position.1,
            self.size,
            if self.is_horizontal() { 'H' } else { 'V' }
        )
    }
}
