//! Asynchronous dataset loading

use crate::error::LoadError;
use crate::loan_csv::LoanCsvReader;
use loanscape_core::Dataset;
use std::path::Path;

/// Default location of the dataset, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/Loan_approval_data_2025.csv";

/// Read and parse the loan CSV at `path`.
///
/// Suspends until the whole file has been read; there is no timeout.
pub async fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    log::debug!("Loading dataset from {}", path.display());

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
    let dataset = LoanCsvReader::parse_str(&content)?;

    log::info!(
        "Loaded {} records from {} ({} approved)",
        dataset.len(),
        path.display(),
        dataset.approved_count()
    );
    Ok(dataset)
}
