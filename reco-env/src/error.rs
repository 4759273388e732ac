//! Errors of the environment.
use thiserror::Error;

/// Errors of the environment and its data.
///
/// None of them is recoverable: a lookup failure means the tables given to the
/// environment are inconsistent.
#[derive(Error, Debug, PartialEq)]
pub enum RecoError {
    /// A rating row refers to a user missing from the user table.
    #[error("Unknown user: {0}")]
    UnknownUser(u32),

    /// An occupation missing from the occupation vocabulary.
    #[error("Unknown occupation: {0}")]
    UnknownOccupation(String),

    /// An action outside `0..5`.
    #[error("Invalid action: {0}, expected a value in 0..{1}")]
    InvalidAction(u8, u8),

    /// A rating outside `1..=5` in the rating table.
    #[error("Invalid rating {rating} in row {row}")]
    InvalidRating {
        /// Zero-based row in the rating table.
        row: usize,
        /// The offending value.
        rating: u8,
    },

    /// The rating table has too few rows to make an episode.
    #[error("The rating table has {0} rows, at least 3 are required")]
    DatasetTooSmall(usize),

    /// A row of a data file does not have the expected number of columns.
    #[error("{file}: row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        /// Name of the file.
        file: String,
        /// Zero-based row.
        row: usize,
        /// Number of columns found.
        found: usize,
        /// Number of columns expected.
        expected: usize,
    },

    /// A field of a data file could not be parsed.
    #[error("{file}: row {row}, column {column}: cannot parse {value:?}")]
    Parse {
        /// Name of the file.
        file: String,
        /// Zero-based row.
        row: usize,
        /// Column name.
        column: String,
        /// The raw field.
        value: String,
    },

    /// A cursor outside of the rating table.
    #[error("Cursor {0} is out of the rating table")]
    CursorOutOfRange(usize),

    /// Unknown name of a reward function.
    #[error("Unknown reward function: {0}, expected `linear` or `logarithmic`")]
    UnknownRewardKind(String),

    /// Unknown name of a render mode.
    #[error("Unknown render mode: {0}, expected `human` or `logger`")]
    UnknownRenderMode(String),
}
