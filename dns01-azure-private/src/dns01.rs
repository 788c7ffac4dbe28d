//! DNS-01 naming helpers
//!
//! Derives the challenge record from `(domain, key_authorization)` and converts
//! between fully-qualified names, zone names and zone-relative record names.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::error::{ProviderError, Result};
pub use crate::types::ChallengeInfo;

/// Label prepended to the validated domain.
pub const CHALLENGE_LABEL: &str = "_acme-challenge";

impl ChallengeInfo {
    /// Derives the challenge record for `domain` from the ACME key authorization.
    pub fn new(domain: &str, key_auth: &str) -> Self {
        let digest = Sha256::digest(key_auth.as_bytes());
        Self {
            effective_fqdn: format!("{CHALLENGE_LABEL}.{}", to_fqdn(domain)),
            value: URL_SAFE_NO_PAD.encode(digest),
        }
    }
}

/// Appends the root dot if missing.
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Removes the root dot if present.
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// 去掉域名末尾的点（可能有多个）并转小写
pub fn normalize_zone_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Strips the zone suffix from `fqdn`.
///
/// 如: "_acme-challenge.sub.example.com." + "example.com" -> "_acme-challenge.sub"
///
/// Fails when `fqdn` equals the zone or does not lie under it.
pub fn extract_sub_domain(fqdn: &str, zone: &str, provider: &str) -> Result<String> {
    let name = un_fqdn(fqdn);
    let zone_name = un_fqdn(zone);

    let fail = |detail: &str| ProviderError::SubDomainExtraction {
        provider: provider.to_string(),
        fqdn: fqdn.to_string(),
        zone: zone.to_string(),
        detail: detail.to_string(),
    };

    if name.eq_ignore_ascii_case(zone_name) {
        return Err(fail("the name and the zone are identical"));
    }

    let suffix_len = zone_name.len() + 1;
    if zone_name.is_empty()
        || name.len() <= suffix_len
        || !name.is_char_boundary(name.len() - suffix_len)
    {
        return Err(fail("the name is not under the zone"));
    }

    let (sub_domain, suffix) = name.split_at(name.len() - suffix_len);
    if !suffix.starts_with('.') || !suffix[1..].eq_ignore_ascii_case(zone_name) {
        return Err(fail("the name is not under the zone"));
    }

    Ok(sub_domain.to_string())
}

/// Candidate zones enclosing `fqdn`, nearest first.
///
/// The name itself is excluded: a record can't be published at a zone apex
/// here, since the relative name would be empty.
///
/// 如: "_acme-challenge.sub.example.com." -> ["sub.example.com", "example.com", "com"]
pub fn parent_zone_candidates(fqdn: &str) -> Vec<String> {
    let name = normalize_zone_name(fqdn);
    let mut candidates = Vec::new();
    let mut rest = name.as_str();

    while let Some((_, parent)) = rest.split_once('.') {
        if parent.is_empty() {
            break;
        }
        candidates.push(parent.to_string());
        rest = parent;
    }

    candidates
}
