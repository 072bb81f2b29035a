//! Loan application CSV parsing
//!
//! The file is comma separated with a header row naming at least
//! `customer_id`, `annual_income`, `credit_score`, `debt_to_income_ratio`
//! and `loan_status`. Columns may appear in any order and extra columns are
//! ignored. Numeric cells are coerced leniently: malformed values become
//! NaN instead of failing the load.

use crate::error::LoadError;
use loanscape_core::{Dataset, LoanStatus, Record};
use std::path::Path;

/// Columns the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    CustomerId,
    AnnualIncome,
    CreditScore,
    DebtToIncomeRatio,
    LoanStatus,
    Unknown,
}

impl ColumnType {
    /// Parse column type from header name
    pub fn from_header(header: &str) -> Self {
        match header.trim() {
            "customer_id" => ColumnType::CustomerId,
            "annual_income" => ColumnType::AnnualIncome,
            "credit_score" => ColumnType::CreditScore,
            "debt_to_income_ratio" => ColumnType::DebtToIncomeRatio,
            "loan_status" => ColumnType::LoanStatus,
            _ => ColumnType::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::CustomerId => "customer_id",
            ColumnType::AnnualIncome => "annual_income",
            ColumnType::CreditScore => "credit_score",
            ColumnType::DebtToIncomeRatio => "debt_to_income_ratio",
            ColumnType::LoanStatus => "loan_status",
            ColumnType::Unknown => "unknown",
        }
    }
}

/// Position of every required column within a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanCsvSchema {
    customer_id: usize,
    annual_income: usize,
    credit_score: usize,
    debt_to_income_ratio: usize,
    loan_status: usize,
}

impl LoanCsvSchema {
    /// Resolve column positions from the header record. When a name repeats,
    /// the last occurrence wins.
    pub fn from_header(header: &[String]) -> Result<Self, LoadError> {
        let columns: Vec<ColumnType> = header
            .iter()
            .map(|h| ColumnType::from_header(h))
            .collect();

        let find = |wanted: ColumnType| {
            columns
                .iter()
                .rposition(|c| *c == wanted)
                .ok_or(LoadError::MissingColumn { column: wanted.name() })
        };

        Ok(Self {
            customer_id: find(ColumnType::CustomerId)?,
            annual_income: find(ColumnType::AnnualIncome)?,
            credit_score: find(ColumnType::CreditScore)?,
            debt_to_income_ratio: find(ColumnType::DebtToIncomeRatio)?,
            loan_status: find(ColumnType::LoanStatus)?,
        })
    }

    /// Build a record from one data row. Cells past the end of a short row
    /// read as missing.
    pub fn parse_row(&self, fields: &[String]) -> Record {
        let number = |i: usize| fields.get(i).map_or(f64::NAN, |s| coerce_number(s));

        Record {
            customer_id: fields.get(self.customer_id).cloned().unwrap_or_default(),
            annual_income: number(self.annual_income),
            credit_score: number(self.credit_score),
            debt_to_income_ratio: number(self.debt_to_income_ratio),
            loan_status: LoanStatus::from_code(number(self.loan_status)),
        }
    }
}

/// Lenient numeric coercion: surrounding whitespace is ignored, an empty
/// cell is zero and anything unparseable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Split a CSV document into records of fields.
///
/// Double-quoted fields may contain commas, doubled quotes and line breaks.
/// Records end at `\n`, `\r\n` or `\r` outside quotes. Blank lines produce
/// no record.
pub fn parse_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c != '"' {
                field.push(c);
            } else if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                in_quotes = false;
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                quoted = false;
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if quoted || !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = matches!(record.as_slice(), [only] if only.trim().is_empty());
    if !blank {
        records.push(record);
    }
}

/// Loan CSV reader implementation
pub struct LoanCsvReader;

impl LoanCsvReader {
    /// Parse a whole CSV document
    pub fn parse_str(content: &str) -> Result<Dataset, LoadError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut records = parse_records(content).into_iter();

        let header = records.next().ok_or(LoadError::MissingHeader)?;
        let schema = LoanCsvSchema::from_header(&header)?;

        Ok(records.map(|fields| schema.parse_row(&fields)).collect())
    }

    /// Read and parse a CSV file, blocking the current thread
    pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
        Self::parse_str(&content)
    }
}
