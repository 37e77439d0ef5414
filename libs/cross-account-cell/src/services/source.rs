// =====================================================================================
// LINK SOURCE (SOURCE ACCOUNT LINK)
// =====================================================================================

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use shared_config::DEFAULT_LINK_LABEL_TEMPLATE;
use shared_models::MetricDescriptor;

use crate::error::CrossAccountError;
use crate::models::ResourceType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSourceProps {
    pub sink_arn: String,
    #[serde(default)]
    pub label_template: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricDescriptor>,
    #[serde(default)]
    pub log_groups: Vec<String>,
}

/// Metric side of the link. A filter created without metrics shares every
/// namespace and stays that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricFilter {
    pub share_all: bool,
    pub namespaces: BTreeSet<String>,
    pub metrics: Vec<MetricDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroupFilter {
    pub share_all: bool,
    pub names: BTreeSet<String>,
}

/// Rendered selection expressions; `None` shares everything of that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfiguration {
    pub metric_filter: Option<String>,
    pub log_group_filter: Option<String>,
}

/// Link from a source account to exactly one target. Filters only grow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSource {
    pub sink_arn: String,
    pub label_template: String,
    pub resource_types: Vec<ResourceType>,
    metric_filter: MetricFilter,
    log_group_filter: LogGroupFilter,
}

impl LinkSource {
    #[instrument(skip(props), fields(sink_arn = %props.sink_arn))]
    pub fn new(props: LinkSourceProps) -> Result<Self, CrossAccountError> {
        if props.sink_arn.trim().is_empty() {
            return Err(CrossAccountError::MissingLinkTarget);
        }

        let mut source = Self {
            sink_arn: props.sink_arn,
            label_template: props
                .label_template
                .unwrap_or_else(|| DEFAULT_LINK_LABEL_TEMPLATE.to_string()),
            resource_types: ResourceType::SHARED.to_vec(),
            metric_filter: MetricFilter {
                share_all: props.metrics.is_empty(),
                ..MetricFilter::default()
            },
            log_group_filter: LogGroupFilter {
                share_all: props.log_groups.is_empty(),
                ..LogGroupFilter::default()
            },
        };

        for metric in &props.metrics {
            source.add_metric(metric);
        }
        for log_group in &props.log_groups {
            source.add_log_group(log_group);
        }

        Ok(source)
    }

    /// Returns whether the filter grew.
    pub fn add_metric(&mut self, metric: &MetricDescriptor) -> bool {
        if self.metric_filter.metrics.contains(metric) {
            return false;
        }
        self.metric_filter.namespaces.insert(metric.namespace.clone());
        self.metric_filter.metrics.push(metric.clone());
        debug!(metric = %metric, "Metric added to link filter");
        true
    }

    /// Returns whether the filter grew.
    pub fn add_log_group(&mut self, name: &str) -> bool {
        let grew = self.log_group_filter.names.insert(name.to_string());
        if grew {
            debug!(log_group = name, "Log group added to link filter");
        }
        grew
    }

    pub fn metric_filter(&self) -> &MetricFilter {
        &self.metric_filter
    }

    pub fn log_group_filter(&self) -> &LogGroupFilter {
        &self.log_group_filter
    }

    pub fn link_configuration(&self) -> LinkConfiguration {
        LinkConfiguration {
            metric_filter: (!self.metric_filter.share_all)
                .then(|| in_expression("Namespace", &self.metric_filter.namespaces)),
            log_group_filter: (!self.log_group_filter.share_all)
                .then(|| in_expression("LogGroupName", &self.log_group_filter.names)),
        }
    }
}

fn in_expression(field: &str, values: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = values.iter().map(|value| format!("'{}'", value)).collect();
    format!("{} IN ({})", field, quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_expression_quotes_sorted_values() {
        let values: BTreeSet<String> = ["AWS/Lambda", "AWS/ECS"].iter().map(|s| s.to_string()).collect();
        assert_eq!(in_expression("Namespace", &values), "Namespace IN ('AWS/ECS', 'AWS/Lambda')");
    }
}
