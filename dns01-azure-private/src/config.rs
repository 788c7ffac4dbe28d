//! Provider configuration
//!
//! Values come from `AZURE_*` environment variables. Every variable may instead
//! be supplied through a file named by `<VAR>_FILE` (e.g. a mounted secret),
//! whose trimmed contents are used as the value.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ProviderError;
use crate::types::{CleanupStrategy, TimeoutPolicy};

pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const ENV_RESOURCE_GROUP: &str = "AZURE_RESOURCE_GROUP";
pub const ENV_ZONE_NAME: &str = "AZURE_ZONE_NAME";
pub const ENV_ENVIRONMENT: &str = "AZURE_ENVIRONMENT";
pub const ENV_METADATA_ENDPOINT: &str = "AZURE_METADATA_ENDPOINT";
pub const ENV_TTL: &str = "AZURE_TTL";
pub const ENV_PROPAGATION_TIMEOUT: &str = "AZURE_PROPAGATION_TIMEOUT";
pub const ENV_POLLING_INTERVAL: &str = "AZURE_POLLING_INTERVAL";
pub const ENV_CLEANUP_STRATEGY: &str = "AZURE_CLEANUP_STRATEGY";

/// 默认 TTL（秒）
pub const DEFAULT_TTL: u32 = 60;
/// 默认传播等待上限
pub const DEFAULT_PROPAGATION_TIMEOUT: Duration = Duration::from_secs(120);
/// 默认轮询间隔
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(2);

/// Validation error for provider configuration.
///
/// Returned when a variable is missing, empty, or has an invalid format.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConfigError {
    /// A required variable is missing entirely.
    #[error("Missing required variable: {key}")]
    MissingField {
        /// Variable name.
        key: String,
    },
    /// A variable is present but empty/whitespace-only.
    #[error("Variable must not be empty: {key}")]
    EmptyField {
        /// Variable name.
        key: String,
    },
    /// A variable has an invalid format.
    #[error("{key}: {reason}")]
    InvalidFormat {
        /// Variable name.
        key: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl ConfigError {
    /// Wraps this error as a [`ProviderError::Configuration`].
    pub fn into_provider_error(self, provider: &str) -> ProviderError {
        ProviderError::Configuration {
            provider: provider.to_string(),
            detail: self.to_string(),
        }
    }
}

/// Azure cloud the subscription lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzureEnvironment {
    #[default]
    Public,
    UsGovernment,
    China,
}

impl AzureEnvironment {
    /// Azure Resource Manager base URL.
    pub fn resource_manager_endpoint(self) -> &'static str {
        match self {
            Self::Public => "https://management.azure.com/",
            Self::UsGovernment => "https://management.usgovcloudapi.net/",
            Self::China => "https://management.chinacloudapi.cn/",
        }
    }

    /// Azure Active Directory authority host.
    pub fn active_directory_endpoint(self) -> &'static str {
        match self {
            Self::Public => "https://login.microsoftonline.com/",
            Self::UsGovernment => "https://login.microsoftonline.us/",
            Self::China => "https://login.chinacloudapi.cn/",
        }
    }
}

impl std::str::FromStr for AzureEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "azurepubliccloud" => Ok(Self::Public),
            "usgovernment" | "azureusgovernmentcloud" => Ok(Self::UsGovernment),
            "china" | "azurechinacloud" => Ok(Self::China),
            other => Err(format!(
                "unknown environment '{other}', expected 'public', 'usgovernment' or 'china'"
            )),
        }
    }
}

/// Configuration of the Azure Private DNS challenge solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub subscription_id: String,
    pub resource_group: String,
    /// Resource Manager base URL; requests go to `{endpoint}subscriptions/...`.
    pub resource_manager_endpoint: String,
    pub environment: AzureEnvironment,
    /// Zone override. When set, zone lookup is skipped entirely.
    pub zone_name: Option<String>,
    /// TTL in seconds for the published TXT record set.
    pub ttl: u32,
    pub propagation_timeout: Duration,
    pub polling_interval: Duration,
    pub cleanup_strategy: CleanupStrategy,
}

impl Config {
    /// Creates a configuration for the public cloud with default timings.
    pub fn new(subscription_id: impl Into<String>, resource_group: impl Into<String>) -> Self {
        let environment = AzureEnvironment::default();
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            resource_manager_endpoint: environment.resource_manager_endpoint().to_string(),
            environment,
            zone_name: None,
            ttl: DEFAULT_TTL,
            propagation_timeout: DEFAULT_PROPAGATION_TIMEOUT,
            polling_interval: DEFAULT_POLLING_INTERVAL,
            cleanup_strategy: CleanupStrategy::default(),
        }
    }

    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// `<VAR>_FILE` indirection is resolved here, so `lookup` only needs to
    /// answer plain variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let subscription_id = get_required_field(&lookup, ENV_SUBSCRIPTION_ID)?;
        let resource_group = get_required_field(&lookup, ENV_RESOURCE_GROUP)?;
        let mut config = Self::new(subscription_id, resource_group);

        if let Some(environment) = get_parsed::<AzureEnvironment, _>(&lookup, ENV_ENVIRONMENT)? {
            config.environment = environment;
            config.resource_manager_endpoint = environment.resource_manager_endpoint().to_string();
        }
        if let Some(endpoint) = get_optional_field(&lookup, ENV_METADATA_ENDPOINT)? {
            config.resource_manager_endpoint = endpoint;
        }
        config.zone_name = get_optional_field(&lookup, ENV_ZONE_NAME)?;

        if let Some(ttl) = get_parsed::<u32, _>(&lookup, ENV_TTL)? {
            if ttl == 0 {
                return Err(ConfigError::InvalidFormat {
                    key: ENV_TTL.to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
            config.ttl = ttl;
        }
        if let Some(secs) = get_parsed::<u64, _>(&lookup, ENV_PROPAGATION_TIMEOUT)? {
            config.propagation_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = get_parsed::<u64, _>(&lookup, ENV_POLLING_INTERVAL)? {
            config.polling_interval = Duration::from_secs(secs);
        }
        if let Some(strategy) = get_parsed::<CleanupStrategy, _>(&lookup, ENV_CLEANUP_STRATEGY)? {
            config.cleanup_strategy = strategy;
        }

        Ok(config)
    }

    /// The propagation-check cadence handed to the caller.
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy {
            timeout: self.propagation_timeout,
            interval: self.polling_interval,
        }
    }
}

/// Reads `key`, falling back to the file named by `<key>_FILE`.
pub(crate) fn get_or_file<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // 空值视为未设置，继续查找 `_FILE`
    if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
        return Ok(Some(value));
    }

    let file_key = format!("{key}_FILE");
    let Some(path) = lookup(&file_key) else {
        return Ok(None);
    };

    std::fs::read_to_string(&path)
        .map(|content| Some(content.trim().to_string()))
        .map_err(|e| ConfigError::InvalidFormat {
            key: file_key,
            reason: format!("cannot read '{path}': {e}"),
        })
}

/// 获取必填变量并校验非空
pub(crate) fn get_required_field<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get_or_file(lookup, key)? {
        // 变量存在但为空，且没有 `_FILE` 兜底
        None if lookup(key).is_some() => Err(ConfigError::EmptyField {
            key: key.to_string(),
        }),
        None => Err(ConfigError::MissingField {
            key: key.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyField {
            key: key.to_string(),
        }),
        Some(v) => Ok(v.trim().to_string()),
    }
}

/// 获取可选变量，空字符串视为未设置
pub(crate) fn get_optional_field<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(get_or_file(lookup, key)?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

fn get_parsed<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    get_optional_field(lookup, key)?
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::InvalidFormat {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
