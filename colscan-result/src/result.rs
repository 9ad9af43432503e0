use crate::error::Error;

/// Result type alias used throughout colscan.
pub type Result<T> = std::result::Result<T, Error>;
