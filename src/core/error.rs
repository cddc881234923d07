use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opening delimiter of every diagnostic message.
pub const MESSAGE_START: &str = "#####START_VALUE_ERROR_MESSAGE#####";
/// Closing delimiter of every diagnostic message.
pub const MESSAGE_END: &str = "#####END_VALUE_ERROR_MESSAGE#####";

/// A single failed rule, with a machine-readable id and the field it concerns.
///
/// The rendered [`message`](Self::message) uses the delimiter framing the
/// upstream retry prompt builder parses, so it must not change shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// Machine-readable rule id (e.g. "incorrect_iban").
    pub id: String,
    /// Dot-separated path to the offending field (e.g. "details_supplier.iban").
    pub field: String,
    /// Human-readable explanation, may span several lines.
    pub detail: String,
    /// What the generator should do differently next time.
    pub remedy: Option<String>,
}

impl ValueError {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            detail: detail.into(),
            remedy: None,
        }
    }

    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remedy = Some(remedy.into());
        self
    }

    /// Framed message consumed by the retry prompt builder.
    pub fn message(&self) -> String {
        format!(
            "{MESSAGE_START}\nvalue_error_id: '{}'\n{}\n{MESSAGE_END}",
            self.id,
            self.detail.trim_end()
        )
    }

    /// Short analysis naming the field and the remediation.
    pub fn analysis(&self) -> String {
        let remedy = self
            .remedy
            .as_deref()
            .unwrap_or("Re-read the source document and extract this field again.");
        format!("Rule '{}' failed on '{}'. {}", self.id, self.field, remedy)
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValueError {}

/// One entry in [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Unique identifier for the failed rule.
    pub id: String,
    /// The entire, exact framed message.
    pub message: String,
    /// Analysis of what went wrong and how to improve.
    pub analysis: String,
}

impl From<&ValueError> for Finding {
    fn from(err: &ValueError) -> Self {
        Self {
            id: err.id.clone(),
            message: err.message(),
            analysis: err.analysis(),
        }
    }
}

impl From<ValueError> for Finding {
    fn from(err: ValueError) -> Self {
        Finding::from(&err)
    }
}

/// Ordered list of findings plus the `has_errors` flag.
///
/// Serializes as `{ "has_errors": .., "errors": [..] }`, the `error_handling`
/// object of the candidate schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Set as soon as the first finding is appended.
    #[serde(default)]
    pub has_errors: bool,
    /// Findings in the order they were raised.
    #[serde(default, rename = "errors")]
    pub findings: Vec<Finding>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding and raise the error flag.
    pub fn push(&mut self, finding: impl Into<Finding>) {
        self.has_errors = true;
        self.findings.push(finding.into());
    }

    /// `has_errors` is true exactly when there is at least one finding.
    pub fn is_consistent(&self) -> bool {
        self.has_errors != self.findings.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Rule ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().map(|f| f.id.as_str())
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            f.write_str(&finding.message)?;
        }
        Ok(())
    }
}

impl From<ValueError> for Diagnostics {
    fn from(err: ValueError) -> Self {
        let mut diagnostics = Self::new();
        diagnostics.push(err);
        diagnostics
    }
}

/// Hard failure: the candidate must not be trusted and the caller has to
/// supply a corrected one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("candidate rejected:\n{diagnostics}")]
pub struct Rejection {
    /// Always holds at least one finding.
    pub diagnostics: Diagnostics,
}

impl Rejection {
    /// Id of the rule that stopped the pipeline.
    pub fn id(&self) -> &str {
        self.diagnostics
            .findings
            .first()
            .map_or("", |f| f.id.as_str())
    }

    /// Corrective context to fold into the next generation request.
    pub fn feedback(&self) -> String {
        self.diagnostics.to_string()
    }
}

impl From<ValueError> for Rejection {
    fn from(err: ValueError) -> Self {
        Self {
            diagnostics: Diagnostics::from(err),
        }
    }
}

/// Errors surfaced by the retry driver and the JSON entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The candidate failed a hard rule.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The candidate generator itself failed.
    #[error("candidate source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Every attempt in the retry budget was rejected.
    #[error("no candidate accepted after {attempts} attempt(s), last rejection ({})", .last.id())]
    Exhausted {
        /// Number of candidates validated.
        attempts: u32,
        /// Rejection of the final candidate.
        last: Rejection,
    },

    /// The request or record could not be (de)serialized.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_framed() {
        let err = ValueError::new("incorrect_iban", "details_supplier.iban", "bad iban\n");
        let msg = err.message();
        assert!(msg.starts_with(MESSAGE_START));
        assert!(msg.ends_with(MESSAGE_END));
        assert!(msg.contains("value_error_id: 'incorrect_iban'\nbad iban\n"));
    }

    #[test]
    fn push_sets_flag() {
        let mut d = Diagnostics::new();
        assert!(d.is_consistent());
        d.push(ValueError::new("x", "f", "d"));
        assert!(d.has_errors);
        assert!(d.is_consistent());
        assert_eq!(d.ids().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn flag_without_findings_is_inconsistent() {
        let d = Diagnostics {
            has_errors: true,
            findings: Vec::new(),
        };
        assert!(!d.is_consistent());
    }

    #[test]
    fn rejection_exposes_first_id() {
        let err = ValueError::new("amount_reconciliation_failed", "amount_payable", "d");
        let r = Rejection::from(err);
        assert_eq!(r.id(), "amount_reconciliation_failed");
        assert!(r.feedback().contains("amount_reconciliation_failed"));
    }

    #[test]
    fn analysis_uses_remedy() {
        let err = ValueError::new("a", "b", "c").with_remedy("Do it again.");
        assert_eq!(err.analysis(), "Rule 'a' failed on 'b'. Do it again.");
    }
}
