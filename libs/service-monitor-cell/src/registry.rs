// =====================================================================================
// SERVICE MONITOR REGISTRY
// =====================================================================================

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::ServiceMonitorError;
use crate::models::{MonitorConfig, ResourceKind};
use crate::services::{
    AlbMonitor, DynamoDbMonitor, Ec2Monitor, EcsClusterMonitor, EcsServiceMonitor, LambdaMonitor,
    NlbMonitor, RdsMonitor, S3Monitor, ServiceMonitor,
};

pub type MonitorConstructor =
    Arc<dyn Fn(MonitorConfig) -> Box<dyn ServiceMonitor> + Send + Sync>;

/// Lookup table from declared kind to strategy constructor. Registration only
/// ever adds entries; an existing kind cannot be replaced.
#[derive(Clone)]
pub struct ServiceMonitorRegistry {
    constructors: HashMap<ResourceKind, MonitorConstructor>,
}

impl ServiceMonitorRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry preloaded with every built-in kind.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::empty();
        registry.insert_builtin(ResourceKind::EcsService, |config| Box::new(EcsServiceMonitor::new(config)));
        registry.insert_builtin(ResourceKind::EcsCluster, |config| Box::new(EcsClusterMonitor::new(config)));
        registry.insert_builtin(ResourceKind::Lambda, |config| Box::new(LambdaMonitor::new(config)));
        registry.insert_builtin(ResourceKind::Rds, |config| Box::new(RdsMonitor::new(config)));
        registry.insert_builtin(ResourceKind::DynamoDb, |config| Box::new(DynamoDbMonitor::new(config)));
        registry.insert_builtin(ResourceKind::Alb, |config| Box::new(AlbMonitor::new(config)));
        registry.insert_builtin(ResourceKind::Nlb, |config| Box::new(NlbMonitor::new(config)));
        registry.insert_builtin(ResourceKind::Ec2, |config| Box::new(Ec2Monitor::new(config)));
        registry.insert_builtin(ResourceKind::S3, |config| Box::new(S3Monitor::new(config)));
        registry
    }

    fn insert_builtin<F>(&mut self, kind: ResourceKind, constructor: F)
    where
        F: Fn(MonitorConfig) -> Box<dyn ServiceMonitor> + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Arc::new(constructor));
    }

    /// Adds a kind. Fails if the kind already has a constructor, or if a custom
    /// kind reuses a built-in tag.
    pub fn register<F>(&mut self, kind: ResourceKind, constructor: F) -> Result<(), ServiceMonitorError>
    where
        F: Fn(MonitorConfig) -> Box<dyn ServiceMonitor> + Send + Sync + 'static,
    {
        if self.constructors.contains_key(&kind) {
            return Err(ServiceMonitorError::KindAlreadyRegistered(kind));
        }
        if let ResourceKind::Custom(tag) = &kind {
            if ResourceKind::BUILTIN.iter().any(|builtin| builtin.tag() == tag) {
                return Err(ServiceMonitorError::ReservedKindTag(tag.clone()));
            }
        }
        debug!(kind = %kind, "registering service monitor");
        self.constructors.insert(kind, Arc::new(constructor));
        Ok(())
    }

    pub fn resolve(&self, kind: &ResourceKind) -> Result<MonitorConstructor, ServiceMonitorError> {
        self.constructors
            .get(kind)
            .cloned()
            .ok_or_else(|| ServiceMonitorError::UnknownResourceKind(kind.clone()))
    }

    #[instrument(skip(self, config), fields(resource = %config.resource_name))]
    pub fn instantiate(
        &self,
        kind: &ResourceKind,
        config: MonitorConfig,
    ) -> Result<Box<dyn ServiceMonitor>, ServiceMonitorError> {
        let constructor = self.resolve(kind)?;
        Ok(constructor(config))
    }

    pub fn contains(&self, kind: &ResourceKind) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds ordered by tag.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<ResourceKind> = self.constructors.keys().cloned().collect();
        kinds.sort_by(|a, b| a.tag().cmp(b.tag()));
        kinds
    }
}

impl Default for ServiceMonitorRegistry {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

impl std::fmt::Debug for ServiceMonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceMonitorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
