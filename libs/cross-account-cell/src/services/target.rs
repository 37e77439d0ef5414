// =====================================================================================
// LINK TARGET (MONITORING ACCOUNT SINK)
// =====================================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use shared_utils::naming::is_valid_account_id;

use crate::error::CrossAccountError;
use crate::models::{AccountStatement, OrganizationStatement, PolicyStatement, TrustScope};

const POLICY_LANGUAGE_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTargetProps {
    pub name: String,
    pub region: String,
    pub monitoring_account_id: String,
    #[serde(default)]
    pub scope: TrustScope,
}

/// Receiving endpoint in the monitoring account.
///
/// The trust policy is append-only: statements are never removed and an
/// account already trusted is never added twice. Every change bumps
/// `policy_version` so callers can tell when the policy must be re-published.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
    pub id: Uuid,
    pub name: String,
    pub arn: String,
    pub created_at: DateTime<Utc>,
    statements: Vec<PolicyStatement>,
    policy_version: u32,
}

impl LinkTarget {
    #[instrument(skip(props), fields(name = %props.name))]
    pub fn new(props: LinkTargetProps) -> Result<Self, CrossAccountError> {
        let scope = props.scope;

        if !is_valid_account_id(&props.monitoring_account_id) {
            return Err(CrossAccountError::InvalidAccountId(props.monitoring_account_id));
        }
        if !scope.organizational_unit_ids.is_empty() && !scope.has_organization() {
            return Err(CrossAccountError::OrganizationalUnitsWithoutOrganization);
        }
        if scope.source_account_ids.is_empty() && !scope.has_organization() {
            return Err(CrossAccountError::MissingTrustScope);
        }

        let mut account_ids: Vec<String> = Vec::with_capacity(scope.source_account_ids.len());
        for account_id in scope.source_account_ids {
            if !is_valid_account_id(&account_id) {
                return Err(CrossAccountError::InvalidAccountId(account_id));
            }
            if !account_ids.contains(&account_id) {
                account_ids.push(account_id);
            }
        }

        let mut statements = Vec::new();
        if !account_ids.is_empty() {
            statements.push(PolicyStatement::Account(AccountStatement::new(account_ids)));
        }
        if let Some(organization_id) = scope.organization_id.filter(|id| !id.is_empty()) {
            statements.push(PolicyStatement::Organization(OrganizationStatement::new(
                organization_id,
                scope.organizational_unit_ids,
            )));
        }

        let id = Uuid::new_v4();
        let arn = format!(
            "arn:aws:oam:{}:{}:sink/{}",
            props.region, props.monitoring_account_id, id
        );
        info!(arn = %arn, statements = statements.len(), "Link target created");

        Ok(Self {
            id,
            name: props.name,
            arn,
            created_at: Utc::now(),
            statements,
            policy_version: 1,
        })
    }

    /// Trusts one more source account. Returns whether the policy changed.
    pub fn add_source_account(&mut self, account_id: &str) -> Result<bool, CrossAccountError> {
        if !is_valid_account_id(account_id) {
            return Err(CrossAccountError::InvalidAccountId(account_id.to_string()));
        }
        if self.trusted_accounts().iter().any(|trusted| trusted == account_id) {
            return Ok(false);
        }

        let existing = self.statements.iter_mut().find_map(|statement| match statement {
            PolicyStatement::Account(account) => Some(account),
            PolicyStatement::Organization(_) => None,
        });
        match existing {
            Some(statement) => statement.principals.push(account_id.to_string()),
            None => self
                .statements
                .push(PolicyStatement::Account(AccountStatement::new(vec![account_id.to_string()]))),
        }

        self.policy_version += 1;
        info!(arn = %self.arn, account_id, version = self.policy_version, "Source account trusted");
        Ok(true)
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    /// Account principals in the order they were trusted.
    pub fn trusted_accounts(&self) -> Vec<String> {
        self.statements
            .iter()
            .filter_map(|statement| match statement {
                PolicyStatement::Account(account) => Some(account.principals.iter().cloned()),
                PolicyStatement::Organization(_) => None,
            })
            .flatten()
            .collect()
    }

    pub fn policy_version(&self) -> u32 {
        self.policy_version
    }

    pub fn policy_document(&self) -> Value {
        json!({
            "Version": POLICY_LANGUAGE_VERSION,
            "Statement": self
                .statements
                .iter()
                .map(PolicyStatement::to_document)
                .collect::<Vec<_>>(),
        })
    }
}
