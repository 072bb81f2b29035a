//! Dataset loading for loanscape
//!
//! Reads the loan application CSV into a [`loanscape_core::Dataset`],
//! either asynchronously through [`load`] or on the current thread through
//! [`LoanCsvReader::read_dataset`].

pub mod error;
pub mod loader;
pub mod loan_csv;

pub use error::*;
pub use loader::{load, DEFAULT_DATA_PATH};
pub use loan_csv::{coerce_number, parse_records, ColumnType, LoanCsvReader, LoanCsvSchema};
