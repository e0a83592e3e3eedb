//! Error types for the blm-analysis crate.
use thiserror::Error;

/// Error type for the crate.
///
/// Arithmetic on valid data never produces an error here; a zero heat flux, for example, yields an
/// infinite Obukhov length rather than a failure.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A column that is required for this analysis is missing.
    #[error("Missing column required for the analysis: {0}")]
    MissingColumn(String),
    /// Not enough data available for analysis
    #[error("Not enough data available for analysis.")]
    NotEnoughData,
    /// Bad or invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A data row has the wrong number of fields.
    #[error("Line {line}: expected {expected} fields, found {found}.")]
    RowLength {
        /// One based line number in the source file.
        line: usize,
        /// Number of fields named by the header.
        expected: usize,
        /// Number of fields on the line.
        found: usize,
    },
    /// The date columns of a row do not form a valid timestamp.
    #[error("Row {row}: invalid timestamp.")]
    InvalidTimestamp {
        /// Zero based row index in the table.
        row: usize,
    },
    /// The file has no header line.
    #[error("Empty input, no header line found.")]
    EmptyInput,
    /// Failure reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure decoding a configuration file.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
    /// Failure drawing a chart.
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

/// Map any displayable drawing backend error into an `AnalysisError`.
pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::Render(err.to_string())
}
