// =====================================================================================
// METRIC / ALARM / WIDGET DESCRIPTOR MODEL
// =====================================================================================
//
// Plain data consumed by every cell. Nothing here talks to a provider; strategies
// produce these values and the orchestrator hands them to the sinks.
//
// =====================================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use shared_config::{
    DASHBOARD_GRID_COLUMNS, DEFAULT_CUSTOM_WIDGET_HEIGHT, DEFAULT_CUSTOM_WIDGET_WIDTH,
    DEFAULT_METRIC_PERIOD_SECONDS, MAX_WIDGET_HEIGHT,
};

/// Ordered so that descriptor identity and rendering are deterministic.
pub type Dimensions = BTreeMap<String, String>;

// =====================================================================================
// METRICS
// =====================================================================================

/// Identity is the full (namespace, metric_name, dimensions) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default)]
    pub dimensions: Dimensions,
}

impl MetricDescriptor {
    pub fn new(namespace: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            dimensions: Dimensions::new(),
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: &Dimensions) -> Self {
        self.dimensions
            .extend(dimensions.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

impl fmt::Display for MetricDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.metric_name)?;
        for (name, value) in &self.dimensions {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statistic {
    Sum,
    Average,
    Maximum,
    Minimum,
}

impl Statistic {
    pub fn as_cloudwatch(&self) -> &'static str {
        match self {
            Statistic::Sum => "Sum",
            Statistic::Average => "Average",
            Statistic::Maximum => "Maximum",
            Statistic::Minimum => "Minimum",
        }
    }
}

impl Default for Statistic {
    fn default() -> Self {
        Statistic::Average
    }
}

// =====================================================================================
// ALARMS
// =====================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "GT")]
    GreaterThan,
    #[serde(rename = "GTE")]
    GreaterThanOrEqual,
    #[serde(rename = "LT")]
    LessThan,
    #[serde(rename = "LTE")]
    LessThanOrEqual,
}

/// Default alarm produced by a strategy. Never mutated after construction; the
/// orchestrator only materializes it through an alarm sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRule {
    pub metric_name: String,
    pub namespace: String,
    pub dimensions: Dimensions,
    pub threshold: f64,
    pub comparison: ComparisonOperator,
    pub evaluation_periods: u32,
    pub statistic: Statistic,
    pub period_seconds: u32,
    pub description: String,
}

impl AlarmRule {
    /// Single evaluation period over the default five minute window.
    pub fn on(
        metric: &MetricDescriptor,
        statistic: Statistic,
        comparison: ComparisonOperator,
        threshold: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            metric_name: metric.metric_name.clone(),
            namespace: metric.namespace.clone(),
            dimensions: metric.dimensions.clone(),
            threshold,
            comparison,
            evaluation_periods: 1,
            statistic,
            period_seconds: DEFAULT_METRIC_PERIOD_SECONDS,
            description: description.into(),
        }
    }

    /// Values below one are raised to one.
    pub fn evaluated_over(mut self, periods: u32) -> Self {
        self.evaluation_periods = periods.max(1);
        self
    }

    pub fn with_period(mut self, period_seconds: u32) -> Self {
        self.period_seconds = period_seconds;
        self
    }

    pub fn metric(&self) -> MetricDescriptor {
        MetricDescriptor {
            namespace: self.namespace.clone(),
            metric_name: self.metric_name.clone(),
            dimensions: self.dimensions.clone(),
        }
    }
}

// =====================================================================================
// WIDGETS
// =====================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetKind {
    Line,
    Number,
    Gauge,
    Text,
}

impl Default for WidgetKind {
    fn default() -> Self {
        WidgetKind::Line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingHints {
    pub statistic: Statistic,
    pub period_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RenderingHints {
    pub fn new(statistic: Statistic) -> Self {
        Self {
            statistic,
            period_seconds: DEFAULT_METRIC_PERIOD_SECONDS,
            label: None,
            color: None,
            unit: None,
        }
    }
}

impl Default for RenderingHints {
    fn default() -> Self {
        Self::new(Statistic::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSeries {
    pub metric: MetricDescriptor,
    pub hints: RenderingHints,
}

impl WidgetSeries {
    pub fn new(metric: MetricDescriptor, statistic: Statistic) -> Self {
        Self {
            metric,
            hints: RenderingHints::new(statistic),
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.hints.label = Some(label.into());
        self
    }

    pub fn with_period(mut self, period_seconds: u32) -> Self {
        self.hints.period_seconds = period_seconds;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// Percent scale used when a gauge is requested without bounds.
pub const DEFAULT_GAUGE_RANGE: AxisRange = AxisRange { min: 0.0, max: 100.0 };

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSpec {
    pub title: String,
    pub kind: WidgetKind,
    pub width: u8,
    pub height: u8,
    #[serde(default)]
    pub left_series: Vec<WidgetSeries>,
    #[serde(default)]
    pub right_series: Vec<WidgetSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<AxisRange>,
}

impl WidgetSpec {
    pub fn new(kind: WidgetKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            width: DEFAULT_CUSTOM_WIDGET_WIDTH,
            height: DEFAULT_CUSTOM_WIDGET_HEIGHT,
            left_series: Vec::new(),
            right_series: Vec::new(),
            markdown: None,
            range: None,
        }
    }

    pub fn line(title: impl Into<String>) -> Self {
        Self::new(WidgetKind::Line, title)
    }

    pub fn number(title: impl Into<String>) -> Self {
        Self::new(WidgetKind::Number, title)
    }

    pub fn gauge(title: impl Into<String>, min: f64, max: f64) -> Self {
        let mut widget = Self::new(WidgetKind::Gauge, title);
        widget.range = Some(AxisRange { min, max });
        widget
    }

    pub fn text(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        let mut widget = Self::new(WidgetKind::Text, title);
        widget.markdown = Some(markdown.into());
        widget
    }

    /// Dimensions are clamped into the 1..=24 grid range.
    pub fn sized(mut self, width: u8, height: u8) -> Self {
        self.width = clamp_width(width);
        self.height = clamp_height(height);
        self
    }

    pub fn left(mut self, series: WidgetSeries) -> Self {
        self.left_series.push(series);
        self
    }

    pub fn right(mut self, series: WidgetSeries) -> Self {
        self.right_series.push(series);
        self
    }

    pub fn series_count(&self) -> usize {
        self.left_series.len() + self.right_series.len()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.left_series
            .iter()
            .chain(self.right_series.iter())
            .map(|series| &series.metric)
    }
}

pub fn clamp_width(width: u8) -> u8 {
    width.clamp(1, DASHBOARD_GRID_COLUMNS)
}

pub fn clamp_height(height: u8) -> u8 {
    height.clamp(1, MAX_WIDGET_HEIGHT)
}

// =====================================================================================
// CUSTOM METRICS (caller supplied)
// =====================================================================================

/// Partial widget options attached to a caller-supplied metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetFragment {
    #[serde(default)]
    pub kind: Option<WidgetKind>,
    #[serde(default)]
    pub width: Option<u8>,
    #[serde(default)]
    pub height: Option<u8>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub right_y_axis: bool,
    #[serde(default)]
    pub statistic: Option<Statistic>,
    #[serde(default)]
    pub period_seconds: Option<u32>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl WidgetFragment {
    pub fn hints(&self) -> RenderingHints {
        RenderingHints {
            statistic: self.statistic.unwrap_or_default(),
            period_seconds: self.period_seconds.unwrap_or(DEFAULT_METRIC_PERIOD_SECONDS),
            label: self.label.clone(),
            color: self.color.clone(),
            unit: self.unit.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetric {
    pub metric: MetricDescriptor,
    #[serde(default)]
    pub widget: WidgetFragment,
}

impl CustomMetric {
    pub fn new(metric: MetricDescriptor) -> Self {
        Self {
            metric,
            widget: WidgetFragment::default(),
        }
    }

    pub fn with_widget(mut self, widget: WidgetFragment) -> Self {
        self.widget = widget;
        self
    }
}
