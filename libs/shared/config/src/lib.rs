use std::env;
use serde::{Deserialize, Serialize};
use tracing::warn;

// =====================================================================================
// NAMED DEFAULTS
// =====================================================================================

pub const DEFAULT_APP_NAME: &str = "app";
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Dashboard auto-refresh interval.
pub const DEFAULT_DASHBOARD_REFRESH_SECONDS: u32 = 300;
/// ISO-8601 relative range the dashboard opens with.
pub const DEFAULT_DASHBOARD_TIME_RANGE: &str = "-PT3H";

/// Label applied to a source account when its metrics appear in the monitoring account.
pub const DEFAULT_LINK_LABEL_TEMPLATE: &str = "$AccountName";

pub const DEFAULT_METRIC_PERIOD_SECONDS: u32 = 300;
pub const DETAILED_METRIC_PERIOD_SECONDS: u32 = 60;

pub const DEFAULT_CUSTOM_WIDGET_WIDTH: u8 = 12;
pub const DEFAULT_CUSTOM_WIDGET_HEIGHT: u8 = 6;

pub const DASHBOARD_GRID_COLUMNS: u8 = 24;
pub const MAX_WIDGET_HEIGHT: u8 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    pub app_name: String,
    pub environment: String,
    pub region: String,
    pub monitoring_account_id: Option<String>,
    pub alarm_topic_arn: Option<String>,
    pub sink_arn: Option<String>,
    pub dashboard_refresh_seconds: u32,
    pub dashboard_time_range: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            region: DEFAULT_REGION.to_string(),
            monitoring_account_id: None,
            alarm_topic_arn: None,
            sink_arn: None,
            dashboard_refresh_seconds: DEFAULT_DASHBOARD_REFRESH_SECONDS,
            dashboard_time_range: DEFAULT_DASHBOARD_TIME_RANGE.to_string(),
        }
    }
}

impl ComposerConfig {
    pub fn from_env() -> Self {
        let config = Self {
            app_name: env::var("APP_NAME")
                .unwrap_or_else(|_| {
                    warn!("APP_NAME not set, using default");
                    DEFAULT_APP_NAME.to_string()
                }),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| {
                    warn!("ENVIRONMENT not set, using default");
                    DEFAULT_ENVIRONMENT.to_string()
                }),
            region: env::var("AWS_REGION")
                .unwrap_or_else(|_| {
                    warn!("AWS_REGION not set, using default");
                    DEFAULT_REGION.to_string()
                }),
            monitoring_account_id: optional_var("MONITORING_ACCOUNT_ID"),
            alarm_topic_arn: optional_var("ALARM_TOPIC_ARN"),
            sink_arn: optional_var("OAM_SINK_ARN"),
            dashboard_refresh_seconds: env::var("DASHBOARD_REFRESH_SECONDS")
                .ok()
                .and_then(|raw| match raw.parse::<u32>() {
                    Ok(seconds) => Some(seconds),
                    Err(_) => {
                        warn!("DASHBOARD_REFRESH_SECONDS is not a number: {}", raw);
                        None
                    }
                })
                .unwrap_or(DEFAULT_DASHBOARD_REFRESH_SECONDS),
            dashboard_time_range: env::var("DASHBOARD_TIME_RANGE")
                .unwrap_or_else(|_| DEFAULT_DASHBOARD_TIME_RANGE.to_string()),
        };

        if !config.is_configured() {
            warn!("Composer not fully configured - alarm topic or sink ARN missing");
        }

        config
    }

    /// Both alarm delivery and cross-account sharing have a destination.
    pub fn is_configured(&self) -> bool {
        self.alarm_topic_arn.is_some() && self.is_cross_account_configured()
    }

    pub fn is_cross_account_configured(&self) -> bool {
        self.sink_arn.as_deref().is_some_and(|arn| !arn.is_empty())
    }

    pub fn resource_prefix(&self) -> String {
        format!("{}-{}", self.app_name, self.environment)
    }
}

fn optional_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            warn!("{} not set", key);
            None
        }
    }
}
