// =====================================================================================
// RESOURCE NAME RESOLUTION
// =====================================================================================

use std::collections::HashMap;

use crate::error::ServiceMonitorError;
use crate::models::ResourceHandle;

/// Turns an opaque resource handle into the provider's identifying name.
pub trait ResourceNameResolver: Send + Sync {
    fn resolve(&self, handle: &ResourceHandle) -> Result<String, ServiceMonitorError>;
}

/// Treats the handle itself as the resource name. Blank handles are unresolvable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl ResourceNameResolver for PassthroughResolver {
    fn resolve(&self, handle: &ResourceHandle) -> Result<String, ServiceMonitorError> {
        let name = handle.as_str().trim();
        if name.is_empty() {
            return Err(ServiceMonitorError::UnresolvableResource {
                handle: handle.clone(),
                reason: "empty resource reference".to_string(),
            });
        }
        Ok(name.to_string())
    }
}

/// Fixed handle-to-name table, typically filled from provisioning outputs.
#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    names: HashMap<ResourceHandle, String>,
}

impl StaticNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, handle: impl Into<ResourceHandle>, name: impl Into<String>) -> Self {
        self.insert(handle, name);
        self
    }

    pub fn insert(&mut self, handle: impl Into<ResourceHandle>, name: impl Into<String>) {
        self.names.insert(handle.into(), name.into());
    }
}

impl ResourceNameResolver for StaticNameResolver {
    fn resolve(&self, handle: &ResourceHandle) -> Result<String, ServiceMonitorError> {
        self.names
            .get(handle)
            .cloned()
            .ok_or_else(|| ServiceMonitorError::UnresolvableResource {
                handle: handle.clone(),
                reason: "no name registered for handle".to_string(),
            })
    }
}
