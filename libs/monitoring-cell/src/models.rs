// =====================================================================================
// MONITORING CELL MODELS
// =====================================================================================

use serde::{Deserialize, Serialize};

use cross_account_cell::{CrossAccountError, LinkConfiguration, LinkHandle};
use service_monitor_cell::{ProviderFeature, ResourceHandle, ResourceKind, ServiceMonitorError};
use shared_config::ComposerConfig;
use shared_models::{AppError, CustomMetric, MetricDescriptor, WidgetSpec};

// =====================================================================================
// CALLER INPUT
// =====================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredResourceEntry {
    pub resource: ResourceHandle,
    pub kind: ResourceKind,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub custom_metrics: Vec<CustomMetric>,
    #[serde(default)]
    pub detailed_monitoring: bool,
}

impl MonitoredResourceEntry {
    pub fn new(resource: impl Into<ResourceHandle>, kind: ResourceKind) -> Self {
        Self {
            resource: resource.into(),
            kind,
            display_name: None,
            custom_metrics: Vec::new(),
            detailed_monitoring: false,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_custom_metric(mut self, metric: CustomMetric) -> Self {
        self.custom_metrics.push(metric);
        self
    }

    pub fn detailed(mut self) -> Self {
        self.detailed_monitoring = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub notification_target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub refresh_seconds: Option<u32>,
    #[serde(default)]
    pub time_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossAccountOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub sink_arn: Option<String>,
    #[serde(default)]
    pub label_template: Option<String>,
}

/// Everything one composition run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringRequest {
    pub app_name: String,
    pub environment: String,
    #[serde(default)]
    pub resources: Vec<MonitoredResourceEntry>,
    #[serde(default)]
    pub alarms: AlarmOptions,
    #[serde(default)]
    pub dashboard: DashboardOptions,
    #[serde(default)]
    pub cross_account: CrossAccountOptions,
    /// Extra log groups to share besides the ones strategies own.
    #[serde(default)]
    pub log_groups: Vec<String>,
}

impl MonitoringRequest {
    pub fn new(app_name: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            environment: environment.into(),
            resources: Vec::new(),
            alarms: AlarmOptions::default(),
            dashboard: DashboardOptions::default(),
            cross_account: CrossAccountOptions::default(),
            log_groups: Vec::new(),
        }
    }

    /// Request seeded with the deployment's configured names and targets.
    /// Feature flags stay off.
    pub fn from_config(config: &ComposerConfig) -> Self {
        Self::new(config.app_name.clone(), config.environment.clone()).with_config_defaults(config)
    }

    /// Fills unset targets and dashboard display options from configuration.
    pub fn with_config_defaults(mut self, config: &ComposerConfig) -> Self {
        if self.alarms.notification_target.is_none() {
            self.alarms.notification_target = config.alarm_topic_arn.clone();
        }
        if self.cross_account.sink_arn.is_none() {
            self.cross_account.sink_arn = config.sink_arn.clone();
        }
        if self.dashboard.refresh_seconds.is_none() {
            self.dashboard.refresh_seconds = Some(config.dashboard_refresh_seconds);
        }
        if self.dashboard.time_range.is_none() {
            self.dashboard.time_range = Some(config.dashboard_time_range.clone());
        }
        self
    }

    pub fn with_resource(mut self, entry: MonitoredResourceEntry) -> Self {
        self.resources.push(entry);
        self
    }

    pub fn with_alarms(mut self, notification_target: Option<&str>) -> Self {
        self.alarms = AlarmOptions {
            enabled: true,
            notification_target: notification_target.map(str::to_string),
        };
        self
    }

    pub fn with_dashboard(mut self) -> Self {
        self.dashboard.enabled = true;
        self
    }

    pub fn with_cross_account(mut self, sink_arn: Option<&str>) -> Self {
        self.cross_account.enabled = true;
        self.cross_account.sink_arn = sink_arn.map(str::to_string);
        self
    }

    pub fn resource_prefix(&self) -> String {
        format!("{}-{}", self.app_name, self.environment)
    }
}

// =====================================================================================
// ORCHESTRATION STATE & RESULT
// =====================================================================================

/// `ResourcesResolved` and `MetricsAggregated` always happen; the last three
/// are independent optional branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrchestrationState {
    Initialized,
    ResourcesResolved,
    MetricsAggregated,
    AlarmsCreated,
    DashboardBuilt,
    LinkEstablished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSkipped {
    pub handle: ResourceHandle,
    pub kind: ResourceKind,
    pub reason: String,
    #[serde(skip)]
    pub error: ServiceMonitorError,
}

impl ResourceSkipped {
    pub fn new(handle: ResourceHandle, kind: ResourceKind, error: ServiceMonitorError) -> Self {
        Self {
            handle,
            kind,
            reason: error.to_string(),
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedResource {
    pub handle: ResourceHandle,
    pub kind: ResourceKind,
    pub resource_name: String,
    pub enabled_features: Vec<ProviderFeature>,
    pub metric_count: usize,
    pub widget_count: usize,
    pub alarm_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmHandle {
    pub alarm_name: String,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHandle {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub handle: DashboardHandle,
    pub widgets: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub handle: LinkHandle,
    pub configuration: LinkConfiguration,
    /// False when an existing link was extended instead.
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionResult {
    pub app_name: String,
    pub environment: String,
    pub states: Vec<OrchestrationState>,
    pub resources: Vec<ComposedResource>,
    pub skipped: Vec<ResourceSkipped>,
    pub metrics: Vec<MetricDescriptor>,
    pub alarms: Vec<AlarmHandle>,
    pub dashboard: Option<DashboardSummary>,
    pub link: Option<LinkSummary>,
}

impl CompositionResult {
    pub fn reached(&self, state: OrchestrationState) -> bool {
        self.states.contains(&state)
    }
}

// =====================================================================================
// ERRORS
// =====================================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitoringError {
    #[error("Alarm creation requested without a notification target")]
    MissingAlarmTarget,
    #[error("sinkArn is required")]
    MissingLinkTarget,
    #[error("Invalid monitoring request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    ServiceMonitor(#[from] ServiceMonitorError),
    #[error(transparent)]
    CrossAccount(#[from] CrossAccountError),
}

impl From<MonitoringError> for AppError {
    fn from(error: MonitoringError) -> Self {
        match error {
            MonitoringError::MissingAlarmTarget | MonitoringError::MissingLinkTarget => {
                AppError::Configuration(error.to_string())
            }
            MonitoringError::CrossAccount(CrossAccountError::MissingLinkTarget) => {
                AppError::Configuration(error.to_string())
            }
            MonitoringError::InvalidRequest(_) => AppError::ValidationError(error.to_string()),
            MonitoringError::ServiceMonitor(_) | MonitoringError::CrossAccount(_) => {
                AppError::BadRequest(error.to_string())
            }
        }
    }
}
