use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("subscription id is not set")]
    EmptySubscriptionId,

    #[error("resource group name is empty")]
    EmptyResourceGroup,

    #[error("security group name is empty")]
    EmptySecurityGroupName,

    #[error("invalid pairing mode: {0}")]
    InvalidPairing(String),
}
