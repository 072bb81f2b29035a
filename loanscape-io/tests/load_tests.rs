//! Integration tests for loading the loan CSV from disk

use loanscape_core::LoanStatus;
use loanscape_io::{load, LoadError, LoanCsvReader};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const SAMPLE: &str = "\
customer_id,age,annual_income,credit_score,debt_to_income_ratio,loan_status
C001,41,85000,720,0.35,1
C002,29,42000,610,0.52,0
C003,37,120000,790,0.12,1
";

#[tokio::test]
async fn test_async_load_preserves_rows() {
    let file = write_csv(SAMPLE);
    let dataset = load(file.path()).await.unwrap();

    assert_eq!(dataset.len(), 3);
    let ids: Vec<&str> = dataset.iter().map(|r| r.customer_id.as_str()).collect();
    assert_eq!(ids, vec!["C001", "C002", "C003"]);
    assert_eq!(dataset.approved_count(), 2);
    assert_eq!(dataset[2].annual_income, 120000.0);
}

#[tokio::test]
async fn test_async_load_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("Loan_approval_data_2025.csv");

    let err = load(&path).await.unwrap_err();
    match &err {
        LoadError::NotFound { path: reported } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Loan_approval_data_2025.csv"));
}

#[tokio::test]
async fn test_async_load_rejects_missing_columns() {
    let file = write_csv("customer_id,annual_income\nC1,1000\n");
    let err = load(file.path()).await.unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column: "credit_score" }));
}

#[test]
fn test_blocking_read_matches_async() {
    let file = write_csv(SAMPLE);
    let blocking = LoanCsvReader::read_dataset(file.path()).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let asynchronous = runtime.block_on(load(file.path())).unwrap();
    assert_eq!(blocking, asynchronous);
    assert_eq!(blocking[1].loan_status, LoanStatus::Rejected);
}

#[test]
fn test_load_error_converts_to_core_error() {
    let err: loanscape_core::Error = LoadError::MissingHeader.into();
    assert!(matches!(err, loanscape_core::Error::InvalidData(_)));
}
