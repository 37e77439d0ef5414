pub mod dashboard;
pub mod orchestrator;
pub mod sinks;

pub use dashboard::{custom_metric_widgets, default_custom_title, DashboardDefinition, Placement};
pub use orchestrator::{CompositionSinks, MonitoringOrchestrator};
pub use sinks::{
    AlarmDefinition, AlarmSink, DashboardSink, InMemoryAlarmSink, InMemoryDashboardSink, StoredDashboard,
};
