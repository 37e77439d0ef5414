// =====================================================================================
// DASHBOARD COMPOSITION & RENDERING
// =====================================================================================

use serde::Serialize;
use serde_json::{json, Map, Value};

use shared_config::{DASHBOARD_GRID_COLUMNS, DEFAULT_CUSTOM_WIDGET_HEIGHT, DEFAULT_CUSTOM_WIDGET_WIDTH};
use shared_models::{
    clamp_height, clamp_width, CustomMetric, MetricDescriptor, WidgetKind, WidgetSeries, WidgetSpec,
    DEFAULT_GAUGE_RANGE,
};
use shared_utils::naming::dashboard_url;

/// Grouping key for caller-supplied metrics within one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ShapeKey {
    kind: WidgetKind,
    width: u8,
    height: u8,
    title: String,
}

impl ShapeKey {
    fn of(custom: &CustomMetric) -> Self {
        let fragment = &custom.widget;
        let kind = match fragment.kind.unwrap_or_default() {
            // A text widget carries no series; metrics asking for one are charted.
            WidgetKind::Text => WidgetKind::Line,
            kind => kind,
        };
        Self {
            kind,
            width: clamp_width(fragment.width.unwrap_or(DEFAULT_CUSTOM_WIDGET_WIDTH)),
            height: clamp_height(fragment.height.unwrap_or(DEFAULT_CUSTOM_WIDGET_HEIGHT)),
            title: fragment
                .title
                .clone()
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| default_custom_title(&custom.metric.namespace)),
        }
    }

    fn widget(&self) -> WidgetSpec {
        WidgetSpec::new(self.kind, self.title.clone()).sized(self.width, self.height)
    }
}

pub fn default_custom_title(namespace: &str) -> String {
    format!("{} - Custom Metrics", namespace)
}

/// Groups custom metrics by namespace, then by shape key, both in first-seen
/// order. LINE groups collapse into one widget split across axes by the
/// secondary-axis flag; NUMBER and GAUGE get one widget per distinct metric.
pub fn custom_metric_widgets(custom_metrics: &[CustomMetric]) -> Vec<WidgetSpec> {
    let mut namespaces: Vec<(&str, Vec<(ShapeKey, Vec<&CustomMetric>)>)> = Vec::new();

    for custom in custom_metrics {
        let namespace = custom.metric.namespace.as_str();
        let position = match namespaces.iter().position(|(ns, _)| *ns == namespace) {
            Some(position) => position,
            None => {
                namespaces.push((namespace, Vec::new()));
                namespaces.len() - 1
            }
        };
        let shapes = &mut namespaces[position].1;

        let key = ShapeKey::of(custom);
        match shapes.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(custom),
            None => shapes.push((key, vec![custom])),
        }
    }

    let mut widgets = Vec::new();
    for (_, shapes) in namespaces {
        for (key, members) in shapes {
            match key.kind {
                WidgetKind::Number | WidgetKind::Gauge => {
                    let mut seen: Vec<&MetricDescriptor> = Vec::new();
                    for custom in members {
                        if seen.contains(&&custom.metric) {
                            continue;
                        }
                        seen.push(&custom.metric);
                        widgets.push(single_value_widget(&key, custom));
                    }
                }
                _ => widgets.push(line_widget(&key, &members)),
            }
        }
    }
    widgets
}

fn single_value_widget(key: &ShapeKey, custom: &CustomMetric) -> WidgetSpec {
    let mut widget = key.widget();
    if key.kind == WidgetKind::Gauge {
        widget.range = Some(DEFAULT_GAUGE_RANGE);
    }
    widget.left(series_for(custom))
}

fn line_widget(key: &ShapeKey, members: &[&CustomMetric]) -> WidgetSpec {
    let mut widget = key.widget();
    for custom in members {
        if widget.metrics().any(|metric| *metric == custom.metric) {
            continue;
        }
        // A metric flagged for the right axis by any duplicate goes there.
        let placed = members
            .iter()
            .find(|other| other.metric == custom.metric && other.widget.right_y_axis)
            .copied()
            .unwrap_or(*custom);
        widget = if placed.widget.right_y_axis {
            widget.right(series_for(placed))
        } else {
            widget.left(series_for(placed))
        };
    }
    widget
}

fn series_for(custom: &CustomMetric) -> WidgetSeries {
    WidgetSeries {
        metric: custom.metric.clone(),
        hints: custom.widget.hints(),
    }
}

// =====================================================================================
// DASHBOARD DEFINITION
// =====================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDefinition {
    pub name: String,
    pub region: String,
    pub refresh_seconds: u32,
    pub time_range: String,
    pub widgets: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u8,
    pub y: u32,
}

impl DashboardDefinition {
    pub fn url(&self) -> String {
        dashboard_url(&self.region, &self.name)
    }

    /// Flows widgets left to right, wrapping when the 24-column row is full.
    pub fn layout(&self) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(self.widgets.len());
        let (mut x, mut y, mut row_height) = (0u8, 0u32, 0u32);

        for widget in &self.widgets {
            if x > 0 && x + widget.width > DASHBOARD_GRID_COLUMNS {
                x = 0;
                y += row_height;
                row_height = 0;
            }
            placements.push(Placement { x, y });
            x += widget.width;
            row_height = row_height.max(u32::from(widget.height));
        }
        placements
    }

    /// CloudWatch dashboard body.
    pub fn render_body(&self) -> Value {
        let widgets: Vec<Value> = self
            .widgets
            .iter()
            .zip(self.layout())
            .map(|(widget, placement)| self.render_widget(widget, placement))
            .collect();

        json!({
            "start": self.time_range,
            "periodOverride": "inherit",
            "widgets": widgets,
        })
    }

    fn render_widget(&self, widget: &WidgetSpec, placement: Placement) -> Value {
        let mut rendered = json!({
            "x": placement.x,
            "y": placement.y,
            "width": widget.width,
            "height": widget.height,
        });

        if widget.kind == WidgetKind::Text {
            rendered["type"] = json!("text");
            rendered["properties"] = json!({
                "markdown": widget.markdown.clone().unwrap_or_else(|| format!("## {}", widget.title)),
            });
            return rendered;
        }

        let view = match widget.kind {
            WidgetKind::Number => "singleValue",
            WidgetKind::Gauge => "gauge",
            _ => "timeSeries",
        };

        let metrics: Vec<Value> = widget
            .left_series
            .iter()
            .map(|series| metric_array(series, false))
            .chain(widget.right_series.iter().map(|series| metric_array(series, true)))
            .collect();

        let mut properties = json!({
            "title": widget.title,
            "view": view,
            "region": self.region,
            "metrics": metrics,
        });
        if widget.kind == WidgetKind::Line {
            properties["stacked"] = json!(false);
        }
        if let Some(range) = widget.range {
            properties["yAxis"] = json!({ "left": { "min": range.min, "max": range.max } });
        }

        rendered["type"] = json!("metric");
        rendered["properties"] = properties;
        rendered
    }
}

/// `[namespace, name, dimName, dimValue, ..., {options}]`
fn metric_array(series: &WidgetSeries, right_axis: bool) -> Value {
    let metric = &series.metric;
    let mut entry = vec![json!(metric.namespace), json!(metric.metric_name)];
    for (name, value) in &metric.dimensions {
        entry.push(json!(name));
        entry.push(json!(value));
    }

    let hints = &series.hints;
    let mut options = Map::new();
    options.insert("stat".to_string(), json!(hints.statistic.as_cloudwatch()));
    options.insert("period".to_string(), json!(hints.period_seconds));
    if let Some(label) = &hints.label {
        options.insert("label".to_string(), json!(label));
    }
    if let Some(color) = &hints.color {
        options.insert("color".to_string(), json!(color));
    }
    if right_axis {
        options.insert("yAxis".to_string(), json!("right"));
    }
    entry.push(Value::Object(options));

    Value::Array(entry)
}
