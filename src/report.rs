//! # Validation Report
//!
//! The outcome of a validation pass that ran to completion.
//!
//! A report is an ordered list of rule failures. An empty report means
//! the value satisfied every rule. Reports are data, not errors: a
//! failing value still yields `Ok(report)` from the engine, while
//! `Err(ConfigError)` is reserved for misconfiguration.

use serde::Serialize;
use std::fmt;

/// A single rule failure at one location in the validated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    path: String,
    rule: String,
    param: Option<String>,
}

impl FieldError {
    pub(crate) fn new(path: &str, rule: &str, param: Option<String>) -> Self {
        Self {
            path: path.to_string(),
            rule: rule.to_string(),
            param,
        }
    }

    /// Path to the failing location: `""` for a root value, otherwise
    /// dotted field names with `[i]` / `[key]` segments for elements.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the rule that failed. Failures produced through an
    /// alias report the underlying rule name, not the alias.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Parameter the rule was compiled with, if it takes one.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.path.is_empty() {
            "$root"
        } else {
            &self.path
        };
        match &self.param {
            Some(p) => write!(f, "'{}' failed rule '{}' (param '{}')", shown, self.rule, p),
            None => write!(f, "'{}' failed rule '{}'", shown, self.rule),
        }
    }
}

/// Ordered collection of rule failures from one validation pass.
///
/// Order is deterministic: failures appear in declaration order for
/// fields, index order for sequence elements, and sorted key order for
/// mapping entries. Validating the same value twice yields identical
/// reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    errors: Vec<FieldError>,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// True when no rule failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of rule failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All failures, in traversal order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterates over failures in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no rule failures");
        }
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl IntoIterator for Report {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_param_when_present() {
        let err = FieldError::new("Hobbies[2]", "min", Some("3".into()));
        assert_eq!(err.to_string(), "'Hobbies[2]' failed rule 'min' (param '3')");

        let err = FieldError::new("Name", "required", None);
        assert_eq!(err.to_string(), "'Name' failed rule 'required'");
    }

    #[test]
    fn test_root_path_displays_as_root_marker() {
        let err = FieldError::new("", "required", None);
        assert_eq!(err.to_string(), "'$root' failed rule 'required'");
        assert_eq!(err.path(), "");
    }

    #[test]
    fn test_empty_report_displays_as_clean() {
        let report = Report::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "no rule failures");
    }

    #[test]
    fn test_report_lists_failures_in_push_order() {
        let mut report = Report::new();
        report.push(FieldError::new("Id", "required", None));
        report.push(FieldError::new("Name", "min", Some("3".into())));

        assert_eq!(report.len(), 2);
        assert_eq!(report.errors()[0].path(), "Id");
        assert_eq!(report.errors()[1].rule(), "min");
        assert!(report.to_string().contains('\n'));
    }

    #[test]
    fn test_report_serializes_failures() {
        let mut report = Report::new();
        report.push(FieldError::new("Pin", "pin", Some("6".into())));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["path"], "Pin");
        assert_eq!(json["errors"][0]["rule"], "pin");
        assert_eq!(json["errors"][0]["param"], "6");
    }
}
