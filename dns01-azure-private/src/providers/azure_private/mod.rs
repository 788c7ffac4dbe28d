//! Azure Private DNS Provider

mod error;
mod http;
mod provider;
/// Azure Resource Manager request/response types.
pub(crate) mod types;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Authorizer, ClientSecretAuthorizer};
use crate::config::Config;
use crate::error::Result;
use crate::providers::common::create_http_client;

/// Private DNS management API version.
pub(crate) const API_VERSION: &str = "2018-09-01";

/// Azure Private DNS challenge solver.
///
/// Holds only configuration, the authorization capability and a pooled HTTP
/// client; every `present`/`cleanup` call is self-contained.
///
/// # Construction
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dns01_azure_private::{AzurePrivateDnsProvider, Config, StaticTokenAuthorizer};
///
/// # fn main() -> dns01_azure_private::Result<()> {
/// let config = Config::new("00000000-0000-0000-0000-000000000000", "dns-rg");
/// let provider = AzurePrivateDnsProvider::new(
///     config,
///     Arc::new(StaticTokenAuthorizer::new("token")),
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct AzurePrivateDnsProvider {
    pub(crate) client: Client,
    pub(crate) config: Config,
    pub(crate) authorizer: Arc<dyn Authorizer>,
    pub(crate) max_retries: u32,
}

/// Builder for [`AzurePrivateDnsProvider`].
pub struct AzurePrivateDnsProviderBuilder {
    config: Config,
    authorizer: Arc<dyn Authorizer>,
    client: Option<Client>,
    max_retries: u32,
}

impl AzurePrivateDnsProviderBuilder {
    fn new(config: Config, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            config,
            authorizer,
            client: None,
            max_retries: 0,
        }
    }

    /// Set the maximum number of automatic retries for transient errors (default: 0).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Use a preconfigured HTTP client (proxy, custom TLS roots).
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the [`AzurePrivateDnsProvider`] instance.
    pub fn build(self) -> Result<AzurePrivateDnsProvider> {
        let client = match self.client {
            Some(client) => client,
            None => create_http_client()?,
        };
        Ok(AzurePrivateDnsProvider {
            client,
            config: self.config,
            authorizer: self.authorizer,
            max_retries: self.max_retries,
        })
    }
}

impl AzurePrivateDnsProvider {
    /// Creates a provider with default settings (no retries).
    pub fn new(config: Config, authorizer: Arc<dyn Authorizer>) -> Result<Self> {
        Self::builder(config, authorizer).build()
    }

    /// Returns a builder for customizing the provider.
    pub fn builder(
        config: Config,
        authorizer: Arc<dyn Authorizer>,
    ) -> AzurePrivateDnsProviderBuilder {
        AzurePrivateDnsProviderBuilder::new(config, authorizer)
    }

    /// Loads [`Config`] and a [`ClientSecretAuthorizer`] from the environment.
    pub fn from_env() -> Result<Self> {
        let config =
            Config::from_env().map_err(|e| e.into_provider_error(crate::PROVIDER_ID))?;
        let authorizer = ClientSecretAuthorizer::from_env(&config)?;
        Self::new(config, Arc::new(authorizer))
    }

    /// The configuration this provider was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
