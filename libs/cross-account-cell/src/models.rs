// =====================================================================================
// CROSS-ACCOUNT CELL MODELS
// =====================================================================================

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const ORG_ID_CONDITION_KEY: &str = "aws:PrincipalOrgID";
const ORG_PATHS_CONDITION_KEY: &str = "aws:PrincipalOrgPaths";
const RESOURCE_TYPES_CONDITION_KEY: &str = "oam:ResourceTypes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "AWS::CloudWatch::Metric")]
    Metric,
    #[serde(rename = "AWS::Logs::LogGroup")]
    LogGroup,
}

impl ResourceType {
    pub const SHARED: [ResourceType; 2] = [ResourceType::Metric, ResourceType::LogGroup];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Metric => "AWS::CloudWatch::Metric",
            ResourceType::LogGroup => "AWS::Logs::LogGroup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkAction {
    #[serde(rename = "oam:CreateLink")]
    CreateLink,
    #[serde(rename = "oam:UpdateLink")]
    UpdateLink,
}

impl LinkAction {
    pub const ALLOWED: [LinkAction; 2] = [LinkAction::CreateLink, LinkAction::UpdateLink];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkAction::CreateLink => "oam:CreateLink",
            LinkAction::UpdateLink => "oam:UpdateLink",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    Allow,
}

/// Exact match never expands wildcards, so a wildcard value needs the
/// wildcard-capable operator to match anything at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchOperator {
    Exact,
    Wildcard,
}

impl MatchOperator {
    /// Wildcard as soon as any value contains `*` or `?`.
    pub fn for_values<S: AsRef<str>>(values: &[S]) -> Self {
        if values.iter().any(|value| contains_wildcard(value.as_ref())) {
            MatchOperator::Wildcard
        } else {
            MatchOperator::Exact
        }
    }

    fn single_valued_key(&self) -> &'static str {
        match self {
            MatchOperator::Exact => "StringEquals",
            MatchOperator::Wildcard => "StringLike",
        }
    }

    fn multi_valued_key(&self) -> &'static str {
        match self {
            MatchOperator::Exact => "ForAnyValue:StringEquals",
            MatchOperator::Wildcard => "ForAnyValue:StringLike",
        }
    }
}

pub fn contains_wildcard(value: &str) -> bool {
    value.contains('*') || value.contains('?')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCondition {
    pub operator: MatchOperator,
    pub values: Vec<String>,
}

impl MatchCondition {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            operator: MatchOperator::for_values(&values),
            values,
        }
    }
}

/// Caller-declared trust boundary of a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScope {
    #[serde(default)]
    pub source_account_ids: Vec<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organizational_unit_ids: Vec<String>,
}

impl TrustScope {
    pub fn accounts<I, S>(account_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_account_ids: account_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: Some(organization_id.into()),
            ..Self::default()
        }
    }

    pub fn with_organizational_units<I, S>(mut self, ou_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organizational_unit_ids = ou_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_organization(&self) -> bool {
        self.organization_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

// =====================================================================================
// POLICY STATEMENTS
// =====================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatement {
    pub effect: Effect,
    pub principals: Vec<String>,
    pub actions: Vec<LinkAction>,
    pub resource_types: Vec<ResourceType>,
}

impl AccountStatement {
    pub fn new(principals: Vec<String>) -> Self {
        Self {
            effect: Effect::Allow,
            principals,
            actions: LinkAction::ALLOWED.to_vec(),
            resource_types: ResourceType::SHARED.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStatement {
    pub effect: Effect,
    pub organization: MatchCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_units: Option<MatchCondition>,
    pub actions: Vec<LinkAction>,
    pub resource_types: Vec<ResourceType>,
}

impl OrganizationStatement {
    pub fn new(organization_id: String, ou_ids: Vec<String>) -> Self {
        Self {
            effect: Effect::Allow,
            organization: MatchCondition::new(vec![organization_id]),
            organizational_units: if ou_ids.is_empty() {
                None
            } else {
                Some(MatchCondition::new(ou_ids))
            },
            actions: LinkAction::ALLOWED.to_vec(),
            resource_types: ResourceType::SHARED.to_vec(),
        }
    }
}

/// A statement is scoped either to account principals or to an organization,
/// never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum PolicyStatement {
    Account(AccountStatement),
    Organization(OrganizationStatement),
}

impl PolicyStatement {
    pub fn to_document(&self) -> Value {
        match self {
            PolicyStatement::Account(statement) => json!({
                "Effect": "Allow",
                "Principal": { "AWS": statement.principals },
                "Action": action_names(&statement.actions),
                "Resource": "*",
                "Condition": {
                    "ForAllValues:StringEquals": {
                        RESOURCE_TYPES_CONDITION_KEY: resource_type_names(&statement.resource_types)
                    }
                }
            }),
            PolicyStatement::Organization(statement) => {
                let mut conditions = Map::new();
                conditions.insert(
                    "ForAllValues:StringEquals".to_string(),
                    json!({ RESOURCE_TYPES_CONDITION_KEY: resource_type_names(&statement.resource_types) }),
                );
                conditions.insert(
                    statement.organization.operator.single_valued_key().to_string(),
                    json!({ ORG_ID_CONDITION_KEY: statement.organization.values }),
                );
                if let Some(units) = &statement.organizational_units {
                    conditions.insert(
                        units.operator.multi_valued_key().to_string(),
                        json!({ ORG_PATHS_CONDITION_KEY: units.values }),
                    );
                }

                json!({
                    "Effect": "Allow",
                    "Principal": "*",
                    "Action": action_names(&statement.actions),
                    "Resource": "*",
                    "Condition": Value::Object(conditions),
                })
            }
        }
    }
}

fn action_names(actions: &[LinkAction]) -> Vec<&'static str> {
    actions.iter().map(LinkAction::as_str).collect()
}

fn resource_type_names(types: &[ResourceType]) -> Vec<&'static str> {
    types.iter().map(ResourceType::as_str).collect()
}
