use async_trait::async_trait;
use nsgcheck_domain::{
    ResourceGroupName, SecurityGroupName, SecurityGroupRecord, SubnetName, SubnetRecord,
    SubscriptionId, VnetName,
};
use serde_json::Value;
use tracing::debug;

use crate::error::AzureError;
use crate::token::TokenProvider;

/// Microsoft.Network api-version for all reads.
const API_VERSION: &str = "2023-11-01";

// ── Base URLs (overridden in tests) ───────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct BaseUrls {
    pub(crate) management: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self { management: "https://management.azure.com".into() }
    }
}

// ── Reader capabilities ───────────────────────────────────────────────────────

/// Read a security group by (resource group, name). Read-only; a missing
/// resource is an error, not an empty record.
#[async_trait]
pub trait SecurityGroupReader: Send + Sync {
    async fn get_security_group(
        &self,
        resource_group: &ResourceGroupName,
        name: &SecurityGroupName,
    ) -> Result<SecurityGroupRecord, AzureError>;
}

/// Read a subnet by (resource group, vnet, subnet).
#[async_trait]
pub trait SubnetReader: Send + Sync {
    async fn get_subnet(
        &self,
        resource_group: &ResourceGroupName,
        vnet: &VnetName,
        subnet: &SubnetName,
    ) -> Result<SubnetRecord, AzureError>;
}

// ── ArmNetworkClient ──────────────────────────────────────────────────────────

/// Read-only client for Microsoft.Network resources, scoped to the public
/// cloud endpoints and one subscription.
pub struct ArmNetworkClient {
    subscription_id: SubscriptionId,
    client: reqwest::Client,
    token: Box<dyn TokenProvider>,
    base: BaseUrls,
}

impl ArmNetworkClient {
    pub fn new(
        subscription_id: SubscriptionId,
        token: Box<dyn TokenProvider>,
    ) -> Result<Self, AzureError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AzureError::ClientConstruction(e.to_string()))?;
        Ok(Self { subscription_id, client, token, base: BaseUrls::default() })
    }

    /// Create a client with a static bearer token and custom base URLs.
    /// Used exclusively in tests.
    #[cfg(test)]
    pub(crate) fn with_static_token(
        subscription_id: SubscriptionId,
        token: &str,
        base: BaseUrls,
    ) -> Self {
        Self {
            subscription_id,
            client: reqwest::Client::new(),
            token: Box::new(crate::token::StaticToken(token.to_string())),
            base,
        }
    }

    async fn bearer(&self) -> Result<String, AzureError> {
        self.token.token().await
    }

    // ── ARM error parsing ─────────────────────────────────────────────────────

    fn parse_arm_error(body: &Value) -> String {
        let err = body
            .get("error")
            .or_else(|| body.get("Error"))
            .unwrap_or(body);
        let code = err["code"].as_str().unwrap_or("Unknown");
        let message = err["message"].as_str().unwrap_or("unknown error");
        format!("{}: {}", code, message)
    }

    // ── ARM GET ───────────────────────────────────────────────────────────────

    async fn arm_get(&self, url: &str) -> Result<(u16, Value), AzureError> {
        let token = self.bearer().await?;
        debug!(url, "Azure ARM GET");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AzureError::Request { url: url.to_string(), message: e.to_string() })?;

        let status = resp.status().as_u16();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// GET a single resource; 404 and non-2xx become typed errors.
    async fn get_resource(&self, url: &str, resource: String) -> Result<Value, AzureError> {
        let (status, body) = self.arm_get(url).await?;
        if status == 404 {
            return Err(AzureError::NotFound { resource });
        }
        if !(200..300).contains(&status) {
            return Err(AzureError::Api {
                url: url.to_string(),
                status,
                message: Self::parse_arm_error(&body),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl SecurityGroupReader for ArmNetworkClient {
    async fn get_security_group(
        &self,
        resource_group: &ResourceGroupName,
        name: &SecurityGroupName,
    ) -> Result<SecurityGroupRecord, AzureError> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkSecurityGroups/{}?api-version={}",
            self.base.management, self.subscription_id, resource_group, name, API_VERSION,
        );
        let resource = format!("security group '{}'", name);
        let body = self.get_resource(&url, resource.clone()).await?;

        let record_name = body["name"].as_str().unwrap_or("");
        // A response without a name is treated as "resource does not exist".
        if record_name.is_empty() {
            return Err(AzureError::NotFound { resource });
        }

        Ok(SecurityGroupRecord {
            id: body["id"].as_str().unwrap_or("").to_string(),
            name: record_name.to_string(),
            location: body["location"].as_str().map(|s| s.to_string()),
        })
    }
}

#[async_trait]
impl SubnetReader for ArmNetworkClient {
    async fn get_subnet(
        &self,
        resource_group: &ResourceGroupName,
        vnet: &VnetName,
        subnet: &SubnetName,
    ) -> Result<SubnetRecord, AzureError> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/{}/subnets/{}?api-version={}",
            self.base.management, self.subscription_id, resource_group, vnet, subnet, API_VERSION,
        );
        let resource = format!("subnet '{}/{}'", vnet, subnet);
        let body = self.get_resource(&url, resource.clone()).await?;

        let record_name = body["name"].as_str().unwrap_or("");
        if record_name.is_empty() {
            return Err(AzureError::NotFound { resource });
        }

        let nsg_id = body["properties"]["networkSecurityGroup"]["id"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Ok(SubnetRecord {
            id: body["id"].as_str().unwrap_or("").to_string(),
            name: record_name.to_string(),
            address_prefix: body["properties"]["addressPrefix"].as_str().map(|s| s.to_string()),
            network_security_group: nsg_id,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
