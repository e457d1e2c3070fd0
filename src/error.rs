use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the toolkit can surface. Nothing is retried internally;
/// errors propagate to the immediate caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Two operands disagree on shape for `op`.
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid row range {start}..{end} for matrix with {rows} rows")]
    InvalidSlice { start: usize, end: usize, rows: usize },

    /// Nested input rows were not rectangular.
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("backward called before any forward pass")]
    BackwardBeforeForward,

    /// The layer sequence no longer matches what an optimizer was built for.
    #[error("layer topology changed: {0}")]
    TopologyChanged(String),

    /// Malformed line in a model or data file (1-based line number).
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
