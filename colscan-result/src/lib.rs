//! Error types and result definitions for colscan.
//!
//! Every colscan crate returns [`Result<T>`], whose error variant is the single
//! [`Error`] enum defined here. Errors propagate across crate boundaries with
//! the `?` operator and are only rendered into messages at the binary edge.
//!
//! # Error Categories
//!
//! - **I/O errors** ([`Error::Io`]): missing or unreadable data files, report output
//! - **Data format errors** ([`Error::Arrow`]): CSV report encoding
//! - **Ingestion failures** ([`Error::EmptySource`], [`Error::ColumnNotFound`]): a
//!   source without a header, or a configured column the header does not name
//! - **User input errors** ([`Error::InvalidArgumentError`]): unknown predicate
//!   operators, unparsable date bounds, malformed query identifiers
//! - **Internal errors** ([`Error::Internal`]): violated storage invariants
//!
//! Malformed rows and unparsable cell values are *not* errors; ingestion drops
//! or keeps them as text, and predicates treat them as non-matching.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
