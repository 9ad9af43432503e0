//! Delimited-text input and CSV report output.
//!
//! Ingestion reads the source record by record through [`CsvReader`], a thin
//! layer over the `csv` crate, rather than arrow's batch reader: rows whose
//! field count disagrees with the header, or that are not UTF-8, are data the
//! column store counts and drops, not a parse failure. Reports go out through
//! arrow's CSV writer via [`CsvWriter`].

pub mod reader;
pub mod writer;

pub use reader::{CsvReadOptions, CsvReadSession, CsvReader, CsvRecord};
pub use writer::{CsvWriteOptions, CsvWriter};
