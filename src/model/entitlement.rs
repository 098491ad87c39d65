//! Caller entitlements.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Subscription tier of the caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn allows_link_validation(self) -> bool {
        !matches!(self, Plan::Free)
    }

    pub fn allows_screenshot(self) -> bool {
        !matches!(self, Plan::Free)
    }
}

/// What the caller is allowed to request for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entitlement {
    pub plan: Plan,
}

impl Entitlement {
    pub fn new(plan: Plan) -> Self {
        Self { plan }
    }
}

impl From<Plan> for Entitlement {
    fn from(plan: Plan) -> Self {
        Self { plan }
    }
}
