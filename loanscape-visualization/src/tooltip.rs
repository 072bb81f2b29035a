//! Record tooltip shown while hovering a point

use loanscape_core::Record;
use nalgebra::{Point2, Vector2};

/// Text shown for one hovered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub id: String,
    pub income: String,
    pub credit_score: String,
    pub debt_to_income: String,
    pub status: &'static str,
}

impl TooltipContent {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.customer_id.clone(),
            income: format!("${}", format_grouped(record.annual_income)),
            credit_score: format_number(record.credit_score),
            debt_to_income: format_fixed2(record.debt_to_income_ratio),
            status: record.loan_status.label(),
        }
    }

    /// Label and value pairs in display order
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("ID", self.id.as_str()),
            ("Income", self.income.as_str()),
            ("Credit Score", self.credit_score.as_str()),
            ("Debt-to-Income", self.debt_to_income.as_str()),
            ("Status", self.status),
        ]
    }
}

/// Tooltip visibility, placement and content. Positions are logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    offset: Vector2<f32>,
    position: Point2<f32>,
    content: Option<TooltipContent>,
    record_index: Option<usize>,
}

impl Tooltip {
    pub fn new(offset: Vector2<f32>) -> Self {
        Self {
            offset,
            position: Point2::origin(),
            content: None,
            record_index: None,
        }
    }

    /// Show `record` next to the cursor
    pub fn show(&mut self, index: usize, record: &Record, cursor: Point2<f32>) {
        self.position = cursor + self.offset;
        if self.record_index != Some(index) {
            self.content = Some(TooltipContent::from_record(record));
            self.record_index = Some(index);
        }
    }

    pub fn hide(&mut self) {
        self.content = None;
        self.record_index = None;
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    /// Top-left corner of the tooltip
    pub fn position(&self) -> Point2<f32> {
        self.position
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    /// Dataset row currently shown
    pub fn record_index(&self) -> Option<usize> {
        self.record_index
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new(Vector2::new(15.0, 15.0))
    }
}

const MINUS: char = '\u{2212}';

/// Twelve significant digits, insignificant zeros trimmed, thousands
/// separated by commas. Negative values use the unicode minus sign.
pub fn format_grouped(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { MINUS.to_string() } else { String::new() };
        return format!("{sign}Infinity");
    }

    let body = trim_insignificant_zeros(&to_precision(value.abs(), 12));
    let (integer, rest) = match body.find(|c: char| c == '.' || c == 'e') {
        Some(split) => body.split_at(split),
        None => (body.as_str(), ""),
    };

    let mut grouped = String::with_capacity(body.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(rest);

    if value < 0.0 && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("{MINUS}{grouped}")
    } else {
        grouped
    }
}

/// `value` with `precision` significant digits, switching to exponent
/// notation when the exponent is below -6 or at least `precision`
fn to_precision(value: f64, precision: usize) -> String {
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -6 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{}", exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.decimals$}")
    }
}

fn trim_insignificant_zeros(formatted: &str) -> String {
    let (number, exponent) = match formatted.find('e') {
        Some(split) => formatted.split_at(split),
        None => (formatted, ""),
    };
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    format!("{number}{exponent}")
}

/// Shortest round-trip form, the way a scripting runtime prints numbers
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{value:e}");
    let exponent: i32 = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if (-6..21).contains(&exponent) {
        format!("{value}")
    } else if exponent >= 0 {
        scientific.replacen('e', "e+", 1)
    } else {
        scientific
    }
}

/// Two decimal places. Exact halves round away from zero.
pub fn format_fixed2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.abs() >= 1e21 {
        return format_number(value);
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    let eighths = value * 8.0;
    let is_tie = eighths.fract() == 0.0 && (eighths as i64) % 2 != 0;
    let magnitude = if is_tie { value.abs() + 0.001 } else { value.abs() };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{magnitude:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanscape_core::LoanStatus;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(85000.0), "85,000");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-4200.0), "\u{2212}4,200");
        assert_eq!(format_grouped(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_grouped_rounds_to_twelve_digits() {
        assert_eq!(format_grouped(0.1 + 0.2), "0.3");
        assert_eq!(format_grouped(123456.7890123456), "123,456.789012");
        assert_eq!(format_grouped(1e12), "1e+12");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(720.0), "720");
        assert_eq!(format_number(715.5), "715.5");
        assert_eq!(format_number(0.35), "0.35");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn test_format_fixed2() {
        assert_eq!(format_fixed2(0.35), "0.35");
        assert_eq!(format_fixed2(0.4), "0.40");
        assert_eq!(format_fixed2(0.125), "0.13");
        assert_eq!(format_fixed2(0.375), "0.38");
        assert_eq!(format_fixed2(-0.125), "-0.13");
        assert_eq!(format_fixed2(12.0), "12.00");
        assert_eq!(format_fixed2(-0.0), "0.00");
        assert_eq!(format_fixed2(f64::NAN), "NaN");
    }

    #[test]
    fn test_content_from_record() {
        let record = Record::new("C042", 85000.0, 720.0, 0.35, LoanStatus::Approved);
        let content = TooltipContent::from_record(&record);

        assert_eq!(
            content.rows(),
            [
                ("ID", "C042"),
                ("Income", "$85,000"),
                ("Credit Score", "720"),
                ("Debt-to-Income", "0.35"),
                ("Status", "Approved"),
            ]
        );
    }

    #[test]
    fn test_show_and_hide() {
        let record = Record::new("C1", 1.0, 2.0, 3.0, LoanStatus::Rejected);
        let mut tooltip = Tooltip::default();
        assert!(!tooltip.is_visible());

        tooltip.show(4, &record, Point2::new(100.0, 40.0));
        assert!(tooltip.is_visible());
        assert_eq!(tooltip.position(), Point2::new(115.0, 55.0));
        assert_eq!(tooltip.record_index(), Some(4));
        assert_eq!(tooltip.content().map(|c| c.status), Some("Rejected"));

        tooltip.hide();
        assert!(!tooltip.is_visible());
        assert_eq!(tooltip.record_index(), None);
    }
}
