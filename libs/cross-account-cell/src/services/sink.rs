// =====================================================================================
// TRUST LINK SINK
// =====================================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::services::source::{LinkConfiguration, LinkSource};
use crate::services::target::LinkTarget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetHandle {
    pub arn: String,
    pub policy_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkHandle {
    pub id: String,
    pub sink_arn: String,
    pub label_template: String,
}

/// Materializes targets and links with the provider.
pub trait TrustLinkSink: Send {
    /// Registers or re-publishes a target and its current policy.
    fn register_target(&mut self, target: &LinkTarget) -> TargetHandle;

    fn create_link(&mut self, source: &LinkSource) -> LinkHandle;

    fn update_link(&mut self, link: &LinkHandle, source: &LinkSource);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLink {
    pub handle: LinkHandle,
    pub configuration: LinkConfiguration,
    pub updates: u32,
}

/// Keeps everything in memory. Used by the HTTP surface and in tests.
#[derive(Debug, Default)]
pub struct InMemoryTrustLinkSink {
    policies: HashMap<String, Value>,
    links: Vec<RecordedLink>,
}

impl InMemoryTrustLinkSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(&self, arn: &str) -> Option<&Value> {
        self.policies.get(arn)
    }

    pub fn links(&self) -> &[RecordedLink] {
        &self.links
    }
}

impl TrustLinkSink for InMemoryTrustLinkSink {
    fn register_target(&mut self, target: &LinkTarget) -> TargetHandle {
        self.policies.insert(target.arn.clone(), target.policy_document());
        info!(arn = %target.arn, version = target.policy_version(), "Target policy published");
        TargetHandle {
            arn: target.arn.clone(),
            policy_version: target.policy_version(),
        }
    }

    fn create_link(&mut self, source: &LinkSource) -> LinkHandle {
        let handle = LinkHandle {
            id: Uuid::new_v4().to_string(),
            sink_arn: source.sink_arn.clone(),
            label_template: source.label_template.clone(),
        };
        self.links.push(RecordedLink {
            handle: handle.clone(),
            configuration: source.link_configuration(),
            updates: 0,
        });
        info!(link_id = %handle.id, sink_arn = %handle.sink_arn, "Link created");
        handle
    }

    fn update_link(&mut self, link: &LinkHandle, source: &LinkSource) {
        if let Some(recorded) = self.links.iter_mut().find(|recorded| recorded.handle.id == link.id) {
            recorded.configuration = source.link_configuration();
            recorded.updates += 1;
            info!(link_id = %link.id, updates = recorded.updates, "Link updated");
        }
    }
}
