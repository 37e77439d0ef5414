// =====================================================================================
// SERVICE MONITOR CELL MODELS
// =====================================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use shared_config::{DEFAULT_METRIC_PERIOD_SECONDS, DETAILED_METRIC_PERIOD_SECONDS};
use shared_models::MetricDescriptor;

use crate::catalog;

/// Declared monitoring kind of a resource. The same underlying object may be
/// monitored as two different kinds, so the caller always states it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "ecs-service")]
    EcsService,
    #[serde(rename = "ecs-cluster")]
    EcsCluster,
    #[serde(rename = "lambda")]
    Lambda,
    #[serde(rename = "rds")]
    Rds,
    #[serde(rename = "dynamodb")]
    DynamoDb,
    #[serde(rename = "alb")]
    Alb,
    #[serde(rename = "nlb")]
    Nlb,
    #[serde(rename = "ec2")]
    Ec2,
    #[serde(rename = "s3")]
    S3,
    /// Kinds added by callers through `ServiceMonitorRegistry::register`.
    #[serde(rename = "custom")]
    Custom(String),
}

impl ResourceKind {
    pub const BUILTIN: [ResourceKind; 9] = [
        ResourceKind::EcsService,
        ResourceKind::EcsCluster,
        ResourceKind::Lambda,
        ResourceKind::Rds,
        ResourceKind::DynamoDb,
        ResourceKind::Alb,
        ResourceKind::Nlb,
        ResourceKind::Ec2,
        ResourceKind::S3,
    ];

    pub fn tag(&self) -> &str {
        match self {
            ResourceKind::EcsService => "ecs-service",
            ResourceKind::EcsCluster => "ecs-cluster",
            ResourceKind::Lambda => "lambda",
            ResourceKind::Rds => "rds",
            ResourceKind::DynamoDb => "dynamodb",
            ResourceKind::Alb => "alb",
            ResourceKind::Nlb => "nlb",
            ResourceKind::Ec2 => "ec2",
            ResourceKind::S3 => "s3",
            ResourceKind::Custom(tag) => tag,
        }
    }

    /// Primary namespace of the kind's standard metrics.
    pub fn namespace(&self) -> Option<&'static str> {
        match self {
            ResourceKind::EcsService | ResourceKind::EcsCluster => Some(catalog::NS_ECS),
            ResourceKind::Lambda => Some(catalog::NS_LAMBDA),
            ResourceKind::Rds => Some(catalog::NS_RDS),
            ResourceKind::DynamoDb => Some(catalog::NS_DYNAMODB),
            ResourceKind::Alb => Some(catalog::NS_ALB),
            ResourceKind::Nlb => Some(catalog::NS_NLB),
            ResourceKind::Ec2 => Some(catalog::NS_EC2),
            ResourceKind::S3 => Some(catalog::NS_S3),
            ResourceKind::Custom(_) => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Opaque caller reference to a resource, turned into a provider name by a
/// `ResourceNameResolver`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceHandle {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// Provider-side toggles a strategy turns on when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderFeature {
    ContainerInsights,
    EnhancedMonitoring,
    DetailedMonitoring,
    RequestMetrics,
    ContributorInsights,
    ActiveTracing,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    pub resource_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub custom_metrics: Vec<MetricDescriptor>,
    #[serde(default)]
    pub detailed_monitoring: bool,
}

impl MonitorConfig {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_custom_metrics(mut self, metrics: Vec<MetricDescriptor>) -> Self {
        self.custom_metrics = metrics;
        self
    }

    pub fn detailed(mut self, detailed_monitoring: bool) -> Self {
        self.detailed_monitoring = detailed_monitoring;
        self
    }

    /// Title prefix used by every widget the strategy renders.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.resource_name)
    }

    pub fn period_seconds(&self) -> u32 {
        if self.detailed_monitoring {
            DETAILED_METRIC_PERIOD_SECONDS
        } else {
            DEFAULT_METRIC_PERIOD_SECONDS
        }
    }
}
