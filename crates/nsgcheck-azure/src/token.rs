use std::process::Command as StdCommand;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::AzureError;

const MANAGEMENT_RESOURCE: &str = "https://management.azure.com";
const DEFAULT_LOGIN_BASE: &str = "https://login.microsoftonline.com";

// ── Token provider ────────────────────────────────────────────────────────────

/// Abstraction over Azure token acquisition — enables test injection.
/// A credential is acquired once per run (cached) and never persisted.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, AzureError>;
}

/// Explicit credential settings. All-`None` means pure ambient discovery.
#[derive(Debug, Clone, Default)]
pub struct CredentialSettings {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Build the default credential chain:
/// 1. `client_id` + `client_secret` + `tenant_id` in settings → Service Principal
/// 2. `AZURE_CLIENT_ID` + `AZURE_CLIENT_SECRET` + `AZURE_TENANT_ID` env vars → Service Principal
/// 3. `IDENTITY_ENDPOINT` env var → Managed Identity (IMDS)
/// 4. Otherwise → Azure CLI (`az account get-access-token`)
pub fn default_chain(settings: &CredentialSettings) -> Box<dyn TokenProvider> {
    let client = reqwest::Client::new();

    if let (Some(tenant), Some(cid), Some(cs)) = (
        settings.tenant_id.as_deref(),
        settings.client_id.as_deref(),
        settings.client_secret.as_deref(),
    ) {
        return Box::new(ServicePrincipalTokenProvider {
            tenant_id: tenant.to_string(),
            client_id: cid.to_string(),
            client_secret: cs.to_string(),
            login_base: DEFAULT_LOGIN_BASE.to_string(),
            client,
            cache: Mutex::new(None),
        });
    }

    if let (Ok(tenant), Ok(cid), Ok(cs)) = (
        std::env::var("AZURE_TENANT_ID"),
        std::env::var("AZURE_CLIENT_ID"),
        std::env::var("AZURE_CLIENT_SECRET"),
    ) {
        return Box::new(ServicePrincipalTokenProvider {
            tenant_id: tenant,
            client_id: cid,
            client_secret: cs,
            login_base: DEFAULT_LOGIN_BASE.to_string(),
            client,
            cache: Mutex::new(None),
        });
    }

    if std::env::var("IDENTITY_ENDPOINT").is_ok() {
        return Box::new(ManagedIdentityTokenProvider { client, cache: Mutex::new(None) });
    }

    Box::new(AzureCliTokenProvider { tenant_id: settings.tenant_id.clone() })
}

// ── Service Principal ─────────────────────────────────────────────────────────

struct ServicePrincipalTokenProvider {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    login_base: String,
    client: reqwest::Client,
    cache: Mutex<Option<(String, Instant)>>,
}

#[async_trait]
impl TokenProvider for ServicePrincipalTokenProvider {
    async fn token(&self) -> Result<String, AzureError> {
        {
            let guard = self.cache.lock().await;
            if let Some((tok, expiry)) = guard.as_ref() {
                if Instant::now() < *expiry {
                    return Ok(tok.clone());
                }
            }
        }

        let url = format!("{}/{}/oauth2/v2.0/token", self.login_base, self.tenant_id);
        let scope = format!("{}/.default", MANAGEMENT_RESOURCE);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];
        let resp: Value = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AzureError::Credential(format!("SP token request: {}", e)))?
            .json()
            .await
            .map_err(|e| AzureError::Credential(format!("SP token decode: {}", e)))?;

        let tok = resp["access_token"]
            .as_str()
            .ok_or_else(|| {
                AzureError::Credential(format!("SP token: no access_token in response: {}", resp))
            })?
            .to_string();
        let expires_in = resp["expires_in"].as_u64().unwrap_or(3600);
        let expiry = Instant::now() + Duration::from_secs(expires_in.saturating_sub(60));

        *self.cache.lock().await = Some((tok.clone(), expiry));
        Ok(tok)
    }
}

// ── Managed Identity (IMDS) ───────────────────────────────────────────────────

struct ManagedIdentityTokenProvider {
    client: reqwest::Client,
    cache: Mutex<Option<(String, Instant)>>,
}

#[async_trait]
impl TokenProvider for ManagedIdentityTokenProvider {
    async fn token(&self) -> Result<String, AzureError> {
        {
            let guard = self.cache.lock().await;
            if let Some((tok, expiry)) = guard.as_ref() {
                if Instant::now() < *expiry {
                    return Ok(tok.clone());
                }
            }
        }

        let resource = format!("{}/", MANAGEMENT_RESOURCE);
        let resp: Value = self
            .client
            .get("http://169.254.169.254/metadata/identity/oauth2/token")
            .header("Metadata", "true")
            .query(&[
                ("api-version", "2018-02-01"),
                ("resource", resource.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AzureError::Credential(format!("IMDS token request: {}", e)))?
            .json()
            .await
            .map_err(|e| AzureError::Credential(format!("IMDS token decode: {}", e)))?;

        let tok = resp["access_token"]
            .as_str()
            .ok_or_else(|| AzureError::Credential(format!("IMDS token: no access_token: {}", resp)))?
            .to_string();
        let expires_in = resp["expires_in"]
            .as_str()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(3600);
        let expiry = Instant::now() + Duration::from_secs(expires_in.saturating_sub(60));

        *self.cache.lock().await = Some((tok.clone(), expiry));
        Ok(tok)
    }
}

// ── Azure CLI ─────────────────────────────────────────────────────────────────

struct AzureCliTokenProvider {
    tenant_id: Option<String>,
}

#[async_trait]
impl TokenProvider for AzureCliTokenProvider {
    async fn token(&self) -> Result<String, AzureError> {
        let mut args = vec![
            "account",
            "get-access-token",
            "--resource",
            MANAGEMENT_RESOURCE,
            "--output",
            "json",
        ];
        if let Some(tenant) = self.tenant_id.as_deref() {
            args.push("--tenant");
            args.push(tenant);
        }

        let output = StdCommand::new("az").args(&args).output().map_err(|e| {
            AzureError::Credential(format!(
                "az CLI not found: {}. Install Azure CLI or configure service principal credentials.",
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AzureError::Credential(format!(
                "az account get-access-token failed: {}. Run 'az login' first.",
                stderr.trim()
            )));
        }

        let resp: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| AzureError::Credential(format!("az CLI output parse: {}", e)))?;
        let tok = resp["accessToken"]
            .as_str()
            .ok_or_else(|| AzureError::Credential("az CLI: no accessToken in output".into()))?
            .to_string();
        Ok(tok)
    }
}

// ── Static (tests) ────────────────────────────────────────────────────────────

pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, AzureError> {
        Ok(self.0.clone())
    }
}
