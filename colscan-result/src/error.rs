use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all colscan operations.
///
/// Fatal conditions (a missing source, a bad operator, a misconfigured column)
/// surface through this enum. Conditions the engine treats as data rather than
/// failure, such as an empty filter result, never become an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the source dataset or writing a report.
    ///
    /// A missing data file surfaces here with `io::ErrorKind::NotFound`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error raised while encoding report batches as CSV.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter.
    ///
    /// Raised for unknown comparison operators, date bounds that do not parse,
    /// and identifiers that cannot be turned into a query. These indicate a
    /// programming or configuration mistake rather than bad data.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A column named by configuration or by a predicate is not in the header.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// The source had no header line.
    #[error("empty source: {0}")]
    EmptySource(String),

    /// Lookup of a storage key failed.
    #[error("Storage key not found")]
    NotFound,

    /// Internal error indicating a bug or unexpected state.
    ///
    /// The message describes which invariant was violated, for example a
    /// partition key registered twice on the same disk.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid-argument error from any displayable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use colscan_result::Error;
    ///
    /// fn parse_threshold(input: &str) -> Result<f64, Error> {
    ///     input.parse::<f64>().map_err(Error::invalid_argument)
    /// }
    ///
    /// assert_eq!(parse_threshold("80").unwrap(), 80.0);
    /// assert!(matches!(parse_threshold("eighty"), Err(Error::InvalidArgumentError(_))));
    /// ```
    #[inline]
    pub fn invalid_argument<E: fmt::Display>(err: E) -> Self {
        Error::InvalidArgumentError(err.to_string())
    }

    #[inline]
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Error::ColumnNotFound(column.into())
    }
}
