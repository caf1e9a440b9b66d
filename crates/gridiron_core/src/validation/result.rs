//! Structured validation results.
//!
//! Validators never fail and never mutate state: every problem becomes a
//! categorized issue with a stable rule reference code, and the caller
//! decides what to do with it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    FieldBounds,
    DownDistance,
    ClockConstraints,
    NflRules,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::FieldBounds => "FIELD_BOUNDS",
            IssueCategory::DownDistance => "DOWN_DISTANCE",
            IssueCategory::ClockConstraints => "CLOCK_CONSTRAINTS",
            IssueCategory::NflRules => "NFL_RULES",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    /// Stable code, e.g. `NFL.FIELD.003`
    pub rule_reference: String,
}

impl ValidationIssue {
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        rule_reference: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            field: None,
            current_value: None,
            expected_value: None,
            rule_reference: rule_reference.to_string(),
        }
    }

    pub fn with_field(mut self, name: &str) -> Self {
        self.field(name);
        self
    }

    pub fn with_current(mut self, value: impl fmt::Display) -> Self {
        self.current(value);
        self
    }

    pub fn with_expected(mut self, value: impl fmt::Display) -> Self {
        self.expected(value);
        self
    }

    /// In-place setters, used when chaining on `ValidationResult::error` and friends
    pub fn field(&mut self, name: &str) -> &mut Self {
        self.field = Some(name.to_string());
        self
    }

    pub fn current(&mut self, value: impl fmt::Display) -> &mut Self {
        self.current_value = Some(value.to_string());
        self
    }

    pub fn expected(&mut self, value: impl fmt::Display) -> &mut Self {
        self.expected_value = Some(value.to_string());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {} {}", self.rule_reference, self.severity.as_str(), self.message)?;
        if let Some(field) = &self.field {
            write!(f, " ({}", field)?;
            if let Some(current) = &self.current_value {
                write!(f, "={}", current)?;
            }
            if let Some(expected) = &self.expected_value {
                write!(f, ", expected {}", expected)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Ordered collection of issues. Valid iff no issue has `Severity::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error(&mut self, category: IssueCategory, rule: &str, message: impl Into<String>) -> &mut ValidationIssue {
        self.push_with(category, Severity::Error, rule, message)
    }

    pub fn warning(&mut self, category: IssueCategory, rule: &str, message: impl Into<String>) -> &mut ValidationIssue {
        self.push_with(category, Severity::Warning, rule, message)
    }

    pub fn info(&mut self, category: IssueCategory, rule: &str, message: impl Into<String>) -> &mut ValidationIssue {
        self.push_with(category, Severity::Info, rule, message)
    }

    fn push_with(
        &mut self,
        category: IssueCategory,
        severity: Severity,
        rule: &str,
        message: impl Into<String>,
    ) -> &mut ValidationIssue {
        self.issues.push(ValidationIssue::new(category, severity, rule, message));
        let last = self.issues.len() - 1;
        &mut self.issues[last]
    }

    /// Append every issue of `other`, preserving order
    pub fn merge(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }

    pub fn merged(mut self, other: ValidationResult) -> Self {
        self.merge(other);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Info)
    }

    pub fn has_errors(&self) -> bool {
        !self.is_valid()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn has_rule(&self, rule_reference: &str) -> bool {
        self.find_rule(rule_reference).is_some()
    }

    pub fn find_rule(&self, rule_reference: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.rule_reference == rule_reference)
    }

    /// Highest severity present, `None` when there are no issues
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "valid (no issues)");
        }
        let verdict = if self.is_valid() { "valid" } else { "INVALID" };
        writeln!(f, "{} ({} issues)", verdict, self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_valid() {
        let r = ValidationResult::new();
        assert!(r.is_valid());
        assert!(r.is_empty());
        assert_eq!(r.max_severity(), None);
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut r = ValidationResult::new();
        r.warning(IssueCategory::FieldBounds, "NFL.FIELD.002", "ball on the goal line");
        r.info(IssueCategory::NflRules, "NFL.RULES.001", "note");
        assert!(r.is_valid());
        assert!(r.has_warnings());
        assert_eq!(r.max_severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_any_error_invalidates() {
        let mut r = ValidationResult::new();
        r.info(IssueCategory::NflRules, "NFL.RULES.001", "note");
        r.error(IssueCategory::DownDistance, "NFL.DOWN.001", "down out of range")
            .field("down")
            .current(7)
            .expected("1-4");
        assert!(!r.is_valid());
        assert_eq!(r.errors().count(), 1);
        let issue = r.find_rule("NFL.DOWN.001").unwrap();
        assert_eq!(issue.current_value.as_deref(), Some("7"));
        assert_eq!(issue.expected_value.as_deref(), Some("1-4"));
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut a = ValidationResult::new();
        a.info(IssueCategory::NflRules, "A", "first");
        let mut b = ValidationResult::new();
        b.error(IssueCategory::NflRules, "B", "second");
        let merged = a.merged(b);
        let rules: Vec<_> = merged.issues().iter().map(|i| i.rule_reference.as_str()).collect();
        assert_eq!(rules, vec!["A", "B"]);
        assert!(!merged.is_valid());
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::new(IssueCategory::FieldBounds, Severity::Error, "NFL.FIELD.001", "out of bounds")
            .with_field("field_position")
            .with_current(104)
            .with_expected("0-100");
        assert_eq!(
            issue.to_string(),
            "[NFL.FIELD.001] ERROR out of bounds (field_position=104, expected 0-100)"
        );
    }

    #[test]
    fn test_issue_json_shape() {
        let issue = ValidationIssue::new(
            IssueCategory::DownDistance,
            Severity::Info,
            "NFL.DOWN.005",
            "turnover on downs expected",
        )
        .with_field("down")
        .with_current(4);
        insta::assert_json_snapshot!(issue, @r###"
        {
          "category": "DOWN_DISTANCE",
          "severity": "INFO",
          "message": "turnover on downs expected",
          "field": "down",
          "current_value": "4",
          "rule_reference": "NFL.DOWN.005"
        }
        "###);
    }
}
