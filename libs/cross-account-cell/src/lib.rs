// =====================================================================================
// CROSS-ACCOUNT CELL - METRIC SHARING TRUST & LINKS
// =====================================================================================
//
// Two cooperating entities:
// - LinkTarget: the monitoring account's durable receiving endpoint (sink) and the
//   append-only trust policy naming which accounts / organizations may attach
// - LinkSource: a source account's link to exactly one target, with metric and
//   log-group filters that only ever grow
//
// Only the policy/link description is built here; the data plane is external.
//
// =====================================================================================

pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use error::CrossAccountError;
pub use models::{
    AccountStatement, Effect, LinkAction, MatchCondition, MatchOperator, OrganizationStatement,
    PolicyStatement, ResourceType, TrustScope,
};
pub use services::{
    InMemoryTrustLinkSink, LinkConfiguration, LinkHandle, LinkSource, LinkSourceProps, RecordedLink,
    LinkTarget, LinkTargetProps, LogGroupFilter, MetricFilter, TargetHandle, TrustLinkSink,
};
