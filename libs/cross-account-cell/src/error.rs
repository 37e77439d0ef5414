use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrossAccountError {
    #[error("Trust scope requires at least one source account id or an organization id")]
    MissingTrustScope,

    #[error("sinkArn is required")]
    MissingLinkTarget,

    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("Organizational unit ids require an organization id")]
    OrganizationalUnitsWithoutOrganization,
}
