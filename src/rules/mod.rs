//! Rule Library.
//!
//! Each rule is a pure function over a `RuleContext`. The `check_*` functions take
//! only the slice of data they judge and are the unit-tested core; the registered
//! `*_rule` adapters pick that slice out of the context.
//!
//! Rules never return an error for normal absence of data (no title, no
//! robots.txt): absence is itself a finding. `RuleError` is reserved for input a
//! rule cannot interpret, and `evaluate_rule` turns it (or a panic) into one
//! `fail` finding.

pub mod content;
pub mod crawlability;
pub mod links;
pub mod mobile;
pub mod performance;
mod registry;
pub mod security;
pub mod structured_data;
pub mod technical;

use crate::error_handling::RuleError;
use crate::model::{AuxData, CategoryId, Finding, PageSnapshot, Plan};
use crate::parse::PageDocument;

pub use registry::{evaluate_rule, evaluate_rules, RULES};

/// Everything a rule may look at for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Facts extracted from the rendered HTML
    pub document: &'a PageDocument,
    pub snapshot: &'a PageSnapshot,
    pub aux: &'a AuxData,
    /// URL the analysis was requested for
    pub target_url: &'a str,
    pub plan: Plan,
    /// Agent name used for robots.txt evaluation
    pub robots_agent: &'a str,
}

/// Signature shared by every registered rule.
pub type RuleFn = fn(&RuleContext<'_>) -> Result<Vec<Finding>, RuleError>;

/// A registered rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: CategoryId,
    pub check: RuleFn,
}

impl Rule {
    pub const fn new(name: &'static str, category: CategoryId, check: RuleFn) -> Self {
        Self {
            name,
            category,
            check,
        }
    }
}
