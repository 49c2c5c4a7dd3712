//! Bounds checking of fields read back from persisted records.
//!
//! Every scalar read from disk goes through [`validate_int`] or
//! [`validate_double`]. A missing field silently takes its default; a field
//! outside its bounds also takes its default, but the violation is recorded
//! in a [`ValidationReport`] so the caller can decide whether to show it.
//! Validation never fails.

use serde_json::{Map, Value};

/// The value carried by a [`FieldViolation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// An integer field.
    Int(i64),
    /// A real-valued field.
    Real(f64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v:.2}"),
        }
    }
}

/// A persisted field that was outside its bounds and got replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// The field name in the record.
    pub field: String,
    /// The value found on disk.
    pub observed: FieldValue,
    /// Lower bound (inclusive).
    pub min: FieldValue,
    /// Upper bound (inclusive).
    pub max: FieldValue,
    /// The default that replaced the observed value.
    pub corrected: FieldValue,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "value for {} ({}) is out of range [{}, {}], reset to {}",
            self.field, self.observed, self.min, self.max, self.corrected
        )
    }
}

/// All violations found while validating one or more records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// All recorded violations, in the order they were found.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Find the violation recorded for a field, if any.
    pub fn violation(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    /// Whether every field was within bounds.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Append the violations of another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Read an integer field, falling back to `default` if it is missing or
/// outside `[min, max]`.
///
/// Reals are truncated and booleans read as 0/1, the way older files wrote
/// their flags.
pub fn validate_int(
    record: &Map<String, Value>,
    field: &str,
    min: i64,
    max: i64,
    default: i64,
    report: &mut ValidationReport,
) -> i64 {
    let Some(value) = record.get(field).and_then(read_int) else {
        tracing::debug!(field, default, "no usable value in record, using default");
        return default;
    };

    if value < min || value > max {
        tracing::warn!(field, value, min, max, default, "value out of range, resetting");
        report.push(FieldViolation {
            field: field.to_string(),
            observed: FieldValue::Int(value),
            min: FieldValue::Int(min),
            max: FieldValue::Int(max),
            corrected: FieldValue::Int(default),
        });
        return default;
    }

    value
}

/// Read a real-valued field, falling back to `default` if it is missing or
/// outside `[min, max]`.
pub fn validate_double(
    record: &Map<String, Value>,
    field: &str,
    min: f64,
    max: f64,
    default: f64,
    report: &mut ValidationReport,
) -> f64 {
    let Some(value) = record.get(field).and_then(Value::as_f64) else {
        tracing::debug!(field, default, "no usable value in record, using default");
        return default;
    };

    if !(min..=max).contains(&value) {
        tracing::warn!(field, value, min, max, default, "value out of range, resetting");
        report.push(FieldViolation {
            field: field.to_string(),
            observed: FieldValue::Real(value),
            min: FieldValue::Real(min),
            max: FieldValue::Real(max),
            corrected: FieldValue::Real(default),
        });
        return default;
    }

    value
}

fn read_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
