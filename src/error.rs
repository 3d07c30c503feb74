/// Errors raised while constructing a [`Vehicle`](crate::Vehicle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleError {
    #[error("position ({row}, {column}) has a negative coordinate")]
    NegativePosition { row: i64, column: i64 },

    #[error("axis code {0} is not permitted, use 0 (horizontal) or 1 (vertical)")]
    InvalidAxis(i64),

    #[error("size {0} is not permitted, use 2 or 3")]
    InvalidSize(i64),
}

/// Errors raised while building or transforming a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("malformed record on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid vehicle: {0}")]
    Vehicle(#[from] VehicleError),

    #[error("vehicle cannot be placed on the board: {vehicle}")]
    Placement { vehicle: String },

    #[error("vehicle label {0:?} appears more than once")]
    DuplicateLabel(String),

    #[error("goal vehicle {:?} not present in descriptor", crate::GOAL_LABEL)]
    MissingGoalVehicle,

    #[error("vehicle {0:?} is not on the board")]
    NotFound(String),
}
