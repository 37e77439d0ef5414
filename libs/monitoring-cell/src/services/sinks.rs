// =====================================================================================
// ALARM & DASHBOARD SINKS
// =====================================================================================

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use shared_models::AlarmRule;
use shared_utils::naming::dashboard_url;

use crate::models::{AlarmHandle, DashboardHandle};
use crate::services::dashboard::DashboardDefinition;

/// One alarm ready to be materialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDefinition {
    pub alarm_name: String,
    pub identity: String,
    pub rule: AlarmRule,
    pub notification_target: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
pub trait AlarmSink: Send {
    fn put_alarm(&mut self, alarm: &AlarmDefinition) -> AlarmHandle;
}

#[cfg_attr(test, mockall::automock)]
pub trait DashboardSink: Send {
    fn put_dashboard(&mut self, dashboard: &DashboardDefinition) -> DashboardHandle;
}

// =====================================================================================
// IN-MEMORY ADAPTERS
// =====================================================================================

#[derive(Debug, Default)]
pub struct InMemoryAlarmSink {
    alarms: Vec<AlarmDefinition>,
}

impl InMemoryAlarmSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alarms(&self) -> &[AlarmDefinition] {
        &self.alarms
    }
}

impl AlarmSink for InMemoryAlarmSink {
    fn put_alarm(&mut self, alarm: &AlarmDefinition) -> AlarmHandle {
        // Same name replaces, as the provider's put semantics do.
        self.alarms.retain(|existing| existing.alarm_name != alarm.alarm_name);
        self.alarms.push(alarm.clone());
        AlarmHandle {
            alarm_name: alarm.alarm_name.clone(),
            identity: alarm.identity.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDashboard {
    pub name: String,
    pub refresh_seconds: u32,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct InMemoryDashboardSink {
    dashboards: Vec<StoredDashboard>,
}

impl InMemoryDashboardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dashboard(&self, name: &str) -> Option<&StoredDashboard> {
        self.dashboards.iter().find(|stored| stored.name == name)
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}

impl DashboardSink for InMemoryDashboardSink {
    fn put_dashboard(&mut self, dashboard: &DashboardDefinition) -> DashboardHandle {
        let stored = StoredDashboard {
            name: dashboard.name.clone(),
            refresh_seconds: dashboard.refresh_seconds,
            body: dashboard.render_body(),
        };
        self.dashboards.retain(|existing| existing.name != stored.name);
        self.dashboards.push(stored);

        info!(dashboard = %dashboard.name, widgets = dashboard.widgets.len(), "Dashboard stored");
        DashboardHandle {
            name: dashboard.name.clone(),
            url: dashboard_url(&dashboard.region, &dashboard.name),
        }
    }
}
