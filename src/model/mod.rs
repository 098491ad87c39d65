//! Report Model.
//!
//! The data structures exchanged between the orchestrator, the rules and the
//! consumers of a report. Everything here is plain data with serde derives.

mod aux_data;
mod category;
mod entitlement;
mod finding;
mod report;
mod snapshot;

pub use aux_data::{
    AuxData, Availability, LinkCheck, LinkSkipReason, LinkValidation, RobotsInfo, SitemapInfo,
};
pub use category::{Category, CategoryId};
pub use entitlement::{Entitlement, Plan};
pub use finding::{Details, Finding, Status};
pub use report::{FindingSummary, Report, REPORT_SCHEMA_VERSION};
pub use snapshot::{NetworkResource, PageLink, PageSnapshot};
