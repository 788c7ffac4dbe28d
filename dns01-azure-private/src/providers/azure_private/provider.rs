//! Azure Private DNS ChallengeProvider trait 实现

use async_trait::async_trait;

use crate::dns01::{extract_sub_domain, parent_zone_candidates, un_fqdn};
use crate::error::{ProviderError, Result};
use crate::traits::{ChallengeProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{ChallengeInfo, CleanupStrategy, TimeoutPolicy, TxtRecordSet, TxtValues};

use super::AzurePrivateDnsProvider;
use super::types::{PrivateZone, RecordSet, RecordSetProperties, TxtRecord};

impl AzurePrivateDnsProvider {
    // ==================== Zone 解析 ====================

    /// 获取单个 Private DNS Zone
    pub(crate) async fn get_zone(&self, zone: &str) -> Result<PrivateZone> {
        self.get(&self.zone_path(zone), ErrorContext::zone(zone)).await
    }

    /// Finds the private zone hosting `fqdn`.
    ///
    /// The configured zone wins without any API call. Otherwise the enclosing
    /// names are probed nearest first; a missing zone moves on to the next
    /// candidate, any other failure aborts the walk.
    pub(crate) async fn resolve_zone(&self, fqdn: &str) -> Result<String> {
        if let Some(zone) = self.config.zone_name.as_deref() {
            return Ok(zone.trim_end_matches('.').to_string());
        }

        for candidate in parent_zone_candidates(fqdn) {
            match self.get_zone(&candidate).await {
                Ok(zone) => {
                    let name = zone
                        .name
                        .map_or(candidate, |n| n.trim_end_matches('.').to_string());
                    log::debug!("[{}] Resolved zone '{name}' for {fqdn}", self.provider_name());
                    return Ok(name);
                }
                Err(e) if e.is_not_found() => {
                    log::debug!(
                        "[{}] No private zone '{candidate}', trying parent",
                        self.provider_name()
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(ProviderError::ZoneNotFound {
            provider: self.provider_name().to_string(),
            domain: un_fqdn(fqdn).to_string(),
            raw_message: None,
        })
    }

    /// Resolves the zone and the zone-relative record name for a challenge.
    async fn locate(&self, info: &ChallengeInfo) -> Result<(String, String)> {
        let zone = self.resolve_zone(&info.effective_fqdn).await?;
        let sub_domain = extract_sub_domain(&info.effective_fqdn, &zone, self.provider_name())?;
        Ok((zone, sub_domain))
    }

    // ==================== TXT 记录集 ====================

    /// 读取 TXT 记录集，不存在时返回 `None`
    ///
    /// Each TXT record contributes only its first character string.
    pub(crate) async fn get_txt_record_set(
        &self,
        zone: &str,
        name: &str,
    ) -> Result<Option<TxtRecordSet>> {
        let path = self.txt_record_set_path(zone, name);
        let record_set: RecordSet = match self.get(&path, ErrorContext::record(zone, name)).await {
            Ok(record_set) => record_set,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let properties = record_set.properties.unwrap_or_default();
        let mut values = TxtValues::new();
        for record in properties.txt_records.unwrap_or_default() {
            let mut strings = record.value.unwrap_or_default().into_iter();
            if let Some(first) = strings.next() {
                if strings.next().is_some() {
                    log::warn!(
                        "[{}] TXT record at '{name}' has several strings, only the first is kept",
                        self.provider_name()
                    );
                }
                values.insert(first);
            }
        }

        Ok(Some(TxtRecordSet {
            name: name.to_string(),
            ttl: properties.ttl.unwrap_or(self.config.ttl),
            values,
        }))
    }

    /// 创建或覆盖 TXT 记录集（每个值一条单字符串记录）
    pub(crate) async fn put_txt_record_set(&self, zone: &str, record_set: &TxtRecordSet) -> Result<()> {
        let body = RecordSet {
            properties: Some(RecordSetProperties {
                ttl: Some(record_set.ttl),
                txt_records: Some(
                    record_set
                        .values
                        .iter()
                        .map(|v| TxtRecord {
                            value: Some(vec![v.to_string()]),
                        })
                        .collect(),
                ),
            }),
            ..Default::default()
        };

        let path = self.txt_record_set_path(zone, &record_set.name);
        let _: RecordSet = self
            .put(&path, &body, ErrorContext::record(zone, &record_set.name))
            .await?;
        Ok(())
    }

    /// 删除 TXT 记录集；不存在视为成功
    pub(crate) async fn delete_txt_record_set(&self, zone: &str, name: &str) -> Result<()> {
        let path = self.txt_record_set_path(zone, name);
        match self.delete(&path, ErrorContext::record(zone, name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::debug!(
                    "[{}] TXT record set '{name}' in '{zone}' already gone",
                    self.provider_name()
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Adds `value` to the TXT set at `name`, keeping every existing value.
    pub(crate) async fn present_value(&self, zone: &str, name: &str, value: &str) -> Result<()> {
        let mut record_set = self
            .get_txt_record_set(zone, name)
            .await?
            .unwrap_or_else(|| TxtRecordSet {
                name: name.to_string(),
                ttl: self.config.ttl,
                values: TxtValues::new(),
            });

        record_set.values.insert(value);
        // present 使用配置的 TTL
        record_set.ttl = self.config.ttl;

        self.put_txt_record_set(zone, &record_set).await
    }

    /// Removes the challenge per the configured [`CleanupStrategy`].
    pub(crate) async fn cleanup_value(&self, zone: &str, name: &str, value: &str) -> Result<()> {
        match self.config.cleanup_strategy {
            CleanupStrategy::DeleteRecordSet => self.delete_txt_record_set(zone, name).await,
            CleanupStrategy::RetractValue => {
                let Some(mut record_set) = self.get_txt_record_set(zone, name).await? else {
                    return Ok(());
                };
                if !record_set.values.remove(value) {
                    log::debug!(
                        "[{}] Value not present in '{name}', nothing to retract",
                        self.provider_name()
                    );
                    return Ok(());
                }
                if record_set.values.is_empty() {
                    self.delete_txt_record_set(zone, name).await
                } else {
                    self.put_txt_record_set(zone, &record_set).await
                }
            }
        }
    }
}

/// 预期错误（凭证、权限、zone 不存在等）记为 warn，其余记为 error
pub(crate) fn failure_level(error: &ProviderError) -> log::Level {
    if error.is_expected() {
        log::Level::Warn
    } else {
        log::Level::Error
    }
}

impl AzurePrivateDnsProvider {
    fn log_failure(&self, operation: &str, info: &ChallengeInfo, error: &ProviderError) {
        log::log!(
            failure_level(error),
            "[{}] {operation} failed for {}: {error}",
            self.provider_name(),
            info.effective_fqdn
        );
    }
}

#[async_trait]
impl ChallengeProvider for AzurePrivateDnsProvider {
    fn id(&self) -> &'static str {
        crate::PROVIDER_ID
    }

    async fn present(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let info = ChallengeInfo::new(domain, key_auth);
        let result = async {
            let (zone, sub_domain) = self.locate(&info).await?;
            self.present_value(&zone, &sub_domain, &info.value).await?;
            Ok::<_, ProviderError>(zone)
        }
        .await;

        match result {
            Ok(zone) => {
                log::info!(
                    "[{}] Presented TXT {} in zone {zone}",
                    self.provider_name(),
                    info.effective_fqdn
                );
                Ok(())
            }
            Err(e) => {
                self.log_failure("present", &info, &e);
                Err(e)
            }
        }
    }

    async fn cleanup(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let info = ChallengeInfo::new(domain, key_auth);
        let result = async {
            let (zone, sub_domain) = self.locate(&info).await?;
            self.cleanup_value(&zone, &sub_domain, &info.value).await?;
            Ok::<_, ProviderError>(zone)
        }
        .await;

        match result {
            Ok(zone) => {
                log::info!(
                    "[{}] Cleaned up TXT {} in zone {zone}",
                    self.provider_name(),
                    info.effective_fqdn
                );
                Ok(())
            }
            Err(e) => {
                self.log_failure("cleanup", &info, &e);
                Err(e)
            }
        }
    }

    fn timeout(&self) -> TimeoutPolicy {
        self.config.timeout_policy()
    }
}
