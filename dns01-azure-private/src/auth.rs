//! Authorization capabilities for Resource Manager requests
//!
//! An [`Authorizer`] is built once, handed to the provider at construction and
//! shared read-only by every request. Nothing here is process-global.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::PROVIDER_ID;
use crate::config::{AzureEnvironment, Config, ConfigError, get_required_field};
use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_secret;

pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";

/// Tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Supplies the `Authorization` header value for outbound API calls.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns a complete header value, e.g. `Bearer eyJ0...`.
    async fn authorization_header(&self) -> Result<String>;
}

/// A bearer token acquired elsewhere (managed identity sidecar, CLI, CI secret).
pub struct StaticTokenAuthorizer {
    token: String,
}

impl StaticTokenAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuthorizer")
            .field("token", &mask_secret(&self.token))
            .finish()
    }
}

#[async_trait]
impl Authorizer for StaticTokenAuthorizer {
    async fn authorization_header(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.token))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Azure AD service principal using the OAuth2 client-credentials grant.
///
/// The access token is cached and only re-acquired shortly before it expires.
pub struct ClientSecretAuthorizer {
    client: Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for ClientSecretAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretAuthorizer")
            .field("authority", &self.authority)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ClientSecretAuthorizer {
    /// Creates an authorizer scoped to `resource_manager_endpoint`.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: AzureEnvironment,
        resource_manager_endpoint: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            authority: environment.active_directory_endpoint().to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: format!("{}/.default", resource_manager_endpoint.trim_end_matches('/')),
            cached: RwLock::new(None),
        })
    }

    /// Overrides the authority host (sovereign clouds, tests).
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Reads `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`
    /// (or their `_FILE` variants) from the process environment.
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable lookup.
    pub fn from_lookup<F>(config: &Config, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let field = |key: &str| -> Result<String> {
            get_required_field(&lookup, key)
                .map_err(|e: ConfigError| e.into_provider_error(PROVIDER_ID))
        };
        Self::new(
            field(ENV_TENANT_ID)?,
            field(ENV_CLIENT_ID)?,
            field(ENV_CLIENT_SECRET)?,
            config.environment,
            &config.resource_manager_endpoint,
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            urlencoding::encode(&self.tenant_id)
        )
    }

    async fn acquire_token(&self) -> Result<CachedToken> {
        let url = self.token_url();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let request = self.client.post(&url).form(&form);

        let (status, body) = HttpUtils::execute_request(request, PROVIDER_ID, "POST", &url).await?;

        if !(200..300).contains(&status) {
            let raw_message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {desc}", e.error),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("HTTP {status}"));
            log::warn!("[{PROVIDER_ID}] Token request rejected (HTTP {status})");
            return Err(ProviderError::InvalidCredentials {
                provider: PROVIDER_ID.to_string(),
                raw_message: Some(raw_message),
            });
        }

        let token: TokenResponse = HttpUtils::parse_json(&body, PROVIDER_ID)?;
        log::debug!(
            "[{PROVIDER_ID}] Acquired access token for client {}, expires in {}s",
            self.client_id,
            token.expires_in
        );
        let expires_at = TimeDelta::try_seconds(token.expires_in)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| ProviderError::ParseError {
                provider: PROVIDER_ID.to_string(),
                detail: format!("expires_in out of range: {}", token.expires_in),
            })?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl Authorizer for ClientSecretAuthorizer {
    async fn authorization_header(&self) -> Result<String> {
        if let Some(token) = self.cached.read().await.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(format!("Bearer {}", token.access_token));
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(format!("Bearer {}", token.access_token));
        }

        let token = self.acquire_token().await?;
        let header = format!("Bearer {}", token.access_token);
        *cached = Some(token);
        Ok(header)
    }
}
