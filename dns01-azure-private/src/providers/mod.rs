//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod azure_private;

pub use azure_private::{AzurePrivateDnsProvider, AzurePrivateDnsProviderBuilder};
