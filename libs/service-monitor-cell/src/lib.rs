// =====================================================================================
// SERVICE MONITOR CELL - PER-RESOURCE MONITORING STRATEGIES
// =====================================================================================
//
// This cell turns one concrete cloud resource into a uniform monitoring contract:
// - A curated list of standard metrics for the resource kind
// - Ready-made dashboard widgets
// - Default alarm rules
// - Provider-side feature toggles (enhanced telemetry) recorded on `enable`
//
// Strategies are leaves: they know nothing about dashboards, alarms sinks or
// cross-account links. The registry maps a declared kind to its strategy.
//
// =====================================================================================

pub mod catalog;
pub mod error;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod services;

// Re-export commonly used types
pub use error::ServiceMonitorError;
pub use models::{MonitorConfig, ProviderFeature, ResourceHandle, ResourceKind};
pub use registry::{MonitorConstructor, ServiceMonitorRegistry};
pub use resolver::{PassthroughResolver, ResourceNameResolver, StaticNameResolver};
pub use services::ServiceMonitor;
