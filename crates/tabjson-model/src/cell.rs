//! Typed cell values and their conversions.
//!
//! Sources hand rows of heterogeneous cells to the transform layer. A cell is
//! a scalar (text, integer, float, boolean), a list of strings (array-valued
//! query columns), or missing.

use serde::{Deserialize, Serialize};

/// One cell of a source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl CellValue {
    /// Returns true for `Null` and whitespace-only text.
    ///
    /// A list is never blank, even when it has no elements: an empty member
    /// collection is a value, not a missing cell.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Scalar text rendering, `None` for `Null` and lists.
    ///
    /// Floats are printed without trailing zeros so a spreadsheet score stored
    /// as `120.0` reads back as `"120"`.
    ///
    /// ```
    /// use tabjson_model::CellValue;
    ///
    /// assert_eq!(CellValue::Float(120.0).to_text().as_deref(), Some("120"));
    /// assert_eq!(CellValue::Integer(7).to_text().as_deref(), Some("7"));
    /// assert_eq!(CellValue::Null.to_text(), None);
    /// ```
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::List(_) => None,
            Self::Text(text) => Some(text.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(format_numeric(*value)),
            Self::Bool(value) => Some(value.to_string()),
        }
    }

    /// Numeric view of the cell, parsing text when needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => parse_f64(text),
            _ => None,
        }
    }

    /// Integer view of the cell. Floats and numeric text qualify only when integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => integral(*value),
            Self::Text(text) => parse_i64(text).or_else(|| parse_f64(text).and_then(integral)),
            _ => None,
        }
    }

    /// Elements of a member collection.
    ///
    /// Lists yield their elements, scalars yield themselves as a single member,
    /// and `Null` yields nothing.
    pub fn members(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            other => other.to_text().into_iter().collect(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// ```
/// use tabjson_model::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
