//! Findings: the atomic unit of evaluation.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Verdict of a single rule about one aspect of the page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// The page meets the rule
    Pass,
    /// The page deviates from the recommendation
    Warn,
    /// The page fails the rule
    Fail,
    /// Informational; neither a pass nor a defect
    Info,
}

/// Optional payload attached to a Finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Details {
    /// Free-text detail
    Text(String),
    /// List of offending or observed values
    List(Vec<String>),
    /// Arbitrary structured detail
    Data(serde_json::Value),
}

/// One rule's verdict (status + message + optional details).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the rule that produced this finding
    pub rule: String,
    /// Verdict
    pub status: Status,
    /// Short human-readable message
    pub message: String,
    /// Optional structured or free-text details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl Finding {
    /// Creates a finding without details.
    pub fn new(rule: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a `pass` finding.
    pub fn pass(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, Status::Pass, message)
    }

    /// Creates a `warn` finding.
    pub fn warn(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, Status::Warn, message)
    }

    /// Creates a `fail` finding.
    pub fn fail(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, Status::Fail, message)
    }

    /// Creates an `info` finding.
    pub fn info(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, Status::Info, message)
    }

    /// Attaches a free-text detail.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.details = Some(Details::Text(text.into()));
        self
    }

    /// Attaches a list of values.
    pub fn with_list<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = Some(Details::List(items.into_iter().map(Into::into).collect()));
        self
    }

    /// Attaches structured data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.details = Some(Details::Data(data));
        self
    }
}
