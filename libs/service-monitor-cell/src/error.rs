use thiserror::Error;

use crate::models::{ResourceHandle, ResourceKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceMonitorError {
    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(ResourceKind),

    #[error("Unresolvable resource {handle}: {reason}")]
    UnresolvableResource { handle: ResourceHandle, reason: String },

    #[error("Resource kind already registered: {0}")]
    KindAlreadyRegistered(ResourceKind),

    #[error("Custom resource kind reuses a built-in tag: {0}")]
    ReservedKindTag(String),
}
