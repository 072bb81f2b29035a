//! Loan application records and the dataset that holds them

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Outcome of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

impl LoanStatus {
    /// Classify a coerced numeric status. Only an exact `1` counts as approved;
    /// everything else, NaN included, is rejected.
    pub fn from_code(code: f64) -> Self {
        if code == 1.0 {
            LoanStatus::Approved
        } else {
            LoanStatus::Rejected
        }
    }

    pub fn is_approved(self) -> bool {
        self == LoanStatus::Approved
    }

    /// Human readable label used in the tooltip
    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        }
    }
}

/// One parsed loan-application row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub customer_id: String,
    pub annual_income: f64,
    pub credit_score: f64,
    pub debt_to_income_ratio: f64,
    pub loan_status: LoanStatus,
}

impl Record {
    pub fn new(
        customer_id: impl Into<String>,
        annual_income: f64,
        credit_score: f64,
        debt_to_income_ratio: f64,
        loan_status: LoanStatus,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            annual_income,
            credit_score,
            debt_to_income_ratio,
            loan_status,
        }
    }

    /// Read one of the numeric fields that can be mapped onto an axis
    pub fn field(&self, field: Field) -> f64 {
        match field {
            Field::AnnualIncome => self.annual_income,
            Field::CreditScore => self.credit_score,
            Field::DebtToIncomeRatio => self.debt_to_income_ratio,
        }
    }
}

/// Numeric record fields that can drive a spatial axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    AnnualIncome,
    CreditScore,
    DebtToIncomeRatio,
}

impl Field {
    /// CSV header name of the field
    pub fn column_name(self) -> &'static str {
        match self {
            Field::AnnualIncome => "annual_income",
            Field::CreditScore => "credit_score",
            Field::DebtToIncomeRatio => "debt_to_income_ratio",
        }
    }
}

/// Ordered collection of records in source row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Create a dataset from records, keeping their order
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of approved applications
    pub fn approved_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.loan_status.is_approved())
            .count()
    }
}

impl Index<usize> for Dataset {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: Vec::from_iter(iter),
        }
    }
}
