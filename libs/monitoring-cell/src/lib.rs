// =====================================================================================
// MONITORING CELL - OBSERVABILITY COMPOSITION ORCHESTRATOR
// =====================================================================================
//
// This cell drives a whole composition run for one application:
// - Resolves each declared resource to its service monitor strategy
// - Aggregates the emitted metrics across resources
// - Materializes default alarms through the alarm sink
// - Groups custom metrics into widgets and renders the dashboard
// - Creates or extends the cross-account metric link
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

// Re-export commonly used types
pub use models::{
    AlarmHandle, CompositionResult, DashboardHandle, MonitoredResourceEntry, MonitoringError,
    MonitoringRequest, OrchestrationState, ResourceSkipped,
};

pub use services::{
    custom_metric_widgets, AlarmSink, CompositionSinks, DashboardDefinition, DashboardSink,
    InMemoryAlarmSink, InMemoryDashboardSink, MonitoringOrchestrator,
};

pub use handlers::MonitoringHandlers;
pub use router::create_monitoring_router;
