//! # dns01-azure-private
//!
//! ACME DNS-01 challenge solver for [Azure Private DNS](https://learn.microsoft.com/azure/dns/private-dns-overview)
//! zones, talking to the Azure Resource Manager REST API directly.
//!
//! The solver publishes `_acme-challenge.<domain>` TXT records inside a private
//! zone of one resource group and removes them once the CA has validated.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns01_azure_private::{AzurePrivateDnsProvider, ChallengeProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // AZURE_SUBSCRIPTION_ID, AZURE_RESOURCE_GROUP, AZURE_TENANT_ID,
//!     // AZURE_CLIENT_ID, AZURE_CLIENT_SECRET
//!     let provider = AzurePrivateDnsProvider::from_env()?;
//!
//!     provider.present("example.com", "token", "token.thumbprint").await?;
//!
//!     let policy = provider.timeout();
//!     // ... poll for propagation every `policy.interval`, up to `policy.timeout` ...
//!
//!     provider.cleanup("example.com", "token", "token.thumbprint").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Zone Resolution
//!
//! With `AZURE_ZONE_NAME` set the zone is taken as-is. Otherwise every parent
//! of the challenge name is probed, nearest first, until a private zone with
//! that name exists in the resource group.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`] — token rejected or not obtainable
//! - [`ProviderError::ZoneNotFound`] — no enclosing private zone
//! - [`ProviderError::RateLimited`] — API rate limit exceeded (retryable)
//! - [`ProviderError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transient errors are retried only when the provider is built with
//! [`max_retries`](AzurePrivateDnsProviderBuilder::max_retries).

/// Provider identifier used in logs and errors.
pub(crate) const PROVIDER_ID: &str = "azure-private";

mod auth;
mod config;
pub mod dns01;
mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export core trait only (internal traits are not exported)
pub use traits::ChallengeProvider;

// Re-export authorization
pub use auth::{Authorizer, ClientSecretAuthorizer, StaticTokenAuthorizer};

// Re-export configuration
pub use config::{AzureEnvironment, Config, ConfigError};

// Re-export types
pub use types::{ChallengeInfo, CleanupStrategy, TimeoutPolicy, TxtRecordSet, TxtValues};

// Re-export concrete provider
pub use providers::{AzurePrivateDnsProvider, AzurePrivateDnsProviderBuilder};
