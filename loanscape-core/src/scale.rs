//! Linear scales mapping record fields onto scene axes
//!
//! Domains are taken from the observed extent of a field over the whole
//! dataset, once, at load time. NaN values are skipped when computing the
//! extent so a few malformed rows do not poison an entire axis.

use crate::record::{Dataset, Field};
use serde::{Deserialize, Serialize};

/// Output range of the income axis (x)
pub const X_RANGE: (f64, f64) = (-150.0, 150.0);
/// Output range of the credit score axis (y)
pub const Y_RANGE: (f64, f64) = (-100.0, 100.0);
/// Output range of the debt-to-income axis (z)
pub const Z_RANGE: (f64, f64) = (-100.0, 100.0);

/// Minimum and maximum of the non-NaN values, or `None` if there are none
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// A linear mapping from a data domain onto an output range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a value from the domain onto the range.
    ///
    /// Out-of-domain input extrapolates linearly. A degenerate domain
    /// (`min == max`) maps everything to the middle of the range, and a
    /// NaN domain maps everything to NaN.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;

        let t = if span.is_nan() {
            f64::NAN
        } else if span == 0.0 {
            0.5
        } else {
            (value - d0) / span
        };

        r0 + (r1 - r0) * t
    }

    /// True when every input maps to the range midpoint
    pub fn is_degenerate(&self) -> bool {
        self.domain.0 == self.domain.1
    }
}

/// Build a scale for one field over the full dataset
pub fn compute_scale(dataset: &Dataset, field: Field, range: (f64, f64)) -> LinearScale {
    let domain = extent(dataset.iter().map(|r| r.field(field)))
        .unwrap_or((f64::NAN, f64::NAN));
    LinearScale::new(domain, range)
}

/// The three axis scales of the scatter plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScales {
    /// annual income → x
    pub x: LinearScale,
    /// credit score → y
    pub y: LinearScale,
    /// debt-to-income ratio → z
    pub z: LinearScale,
}

impl AxisScales {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            x: compute_scale(dataset, Field::AnnualIncome, X_RANGE),
            y: compute_scale(dataset, Field::CreditScore, Y_RANGE),
            z: compute_scale(dataset, Field::DebtToIncomeRatio, Z_RANGE),
        }
    }
}
