use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ── Identifiers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(s: impl Into<String>) -> Self {
        SubscriptionId(s.into())
    }

    /// Parse from an ambient value (e.g. `ARM_SUBSCRIPTION_ID`).
    /// Absent-or-empty is rejected before any network call is attempted.
    pub fn parse(s: Option<&str>) -> Result<Self, DomainError> {
        match s {
            Some(v) if !v.trim().is_empty() => Ok(SubscriptionId(v.trim().to_string())),
            _ => Err(DomainError::EmptySubscriptionId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceGroupName(pub String);

impl ResourceGroupName {
    pub fn new(s: impl Into<String>) -> Self {
        ResourceGroupName(s.into())
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.trim().is_empty() {
            return Err(DomainError::EmptyResourceGroup);
        }
        Ok(ResourceGroupName(s.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceGroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityGroupName(pub String);

impl SecurityGroupName {
    pub fn new(s: impl Into<String>) -> Self {
        SecurityGroupName(s.into())
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.trim().is_empty() {
            return Err(DomainError::EmptySecurityGroupName);
        }
        Ok(SecurityGroupName(s.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SecurityGroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VnetName(pub String);

impl VnetName {
    pub fn new(s: impl Into<String>) -> Self {
        VnetName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VnetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetName(pub String);

impl SubnetName {
    pub fn new(s: impl Into<String>) -> Self {
        SubnetName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubnetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Iteration mode ────────────────────────────────────────────────────────────

/// How vnet and subnet output entries are combined into checks.
///
/// `Product` pairs every vnet entry with every subnet entry — the behavior
/// existing deployments were verified with. `Paired` restricts the walk to
/// entries whose logical output keys match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    #[default]
    Product,
    Paired,
}

impl std::fmt::Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pairing::Product => write!(f, "product"),
            Pairing::Paired => write!(f, "paired"),
        }
    }
}

// ── Remote record snapshots ───────────────────────────────────────────────────

/// Read-only view of a network security group as returned by the control
/// plane. Never created or mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRecord {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
}

/// Read-only view of a subnet. `network_security_group` holds the resource id
/// of the associated NSG, when one is attached — the property under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRecord {
    pub id: String,
    pub name: String,
    pub address_prefix: Option<String>,
    pub network_security_group: Option<String>,
}

impl SubnetRecord {
    pub fn is_associated(&self) -> bool {
        self.network_security_group
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

// ── Composite identifier normalization ────────────────────────────────────────

/// Extract the subnet name from a Terraform map-output entry.
///
/// Map entries may arrive as a bracketed composite like
/// `["rg/vnet/subnet1"]`; only the final `/`-separated path segment is
/// meaningful. Surrounding `[`, `]` and quote delimiters are stripped.
pub fn extract_subnet_name(raw: &str) -> SubnetName {
    let last = raw.rsplit('/').next().unwrap_or(raw);
    let trimmed =
        last.trim_matches(|c: char| c == '[' || c == ']' || c == '"' || c.is_whitespace());
    SubnetName::new(trimmed)
}
