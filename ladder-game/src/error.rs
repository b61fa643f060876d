//! Error types for round construction.
use thiserror::Error;

/// Errors raised when a ladder or roster violates its construction invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LadderError {
    #[error("a ladder needs at least 2 columns (got {columns})")]
    DegenerateLadder { columns: usize },
    #[error("a ladder needs between {min} and {max} rows (got {rows})")]
    RowCount { rows: u16, min: u16, max: u16 },
    #[error("participant count must be between {min} and {max} (got {count})")]
    ParticipantCount {
        count: usize,
        min: usize,
        max: usize,
    },
    #[error("participants ({participants}) and outcomes ({outcomes}) must have the same length")]
    LengthMismatch {
        participants: usize,
        outcomes: usize,
    },
    #[error("column {col} is outside a ladder with {columns} columns")]
    ColumnOutOfRange { col: usize, columns: usize },
    #[error("rung at row {row} column {from_col} is outside the {rows}x{columns} board")]
    RungOutOfBounds {
        row: u16,
        from_col: usize,
        rows: u16,
        columns: usize,
    },
    #[error("rungs at row {row} columns {left} and {right} overlap")]
    RungConflict { row: u16, left: usize, right: usize },
    #[error("layout has {columns} columns but the roster has {participants} participants")]
    LayoutMismatch {
        columns: usize,
        participants: usize,
    },
}
