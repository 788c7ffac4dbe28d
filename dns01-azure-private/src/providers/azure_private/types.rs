//! Azure Private DNS API type definition

use serde::{Deserialize, Serialize};

// ============ Azure Resource Manager response structure ============

/// Response payload for `PrivateZones_Get`.
#[derive(Debug, Deserialize)]
pub struct PrivateZone {
    pub name: Option<String>,
}

/// Record set as read from and written to `RecordSets_Get` / `RecordSets_CreateOrUpdate`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub properties: Option<RecordSetProperties>,
}

/// `properties` of a record set. Only the TXT-relevant fields are modelled.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecord>>,
}

/// One TXT record; `value` holds its character strings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TxtRecord {
    pub value: Option<Vec<String>>,
}

/// Error envelope returned by Azure Resource Manager.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ErrorDetail>,
}

/// Error detail inside [`ErrorResponse`].
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}
