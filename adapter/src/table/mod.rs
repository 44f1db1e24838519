use async_trait::async_trait;
use kernel::model::id::{EventId, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub mod memory;
pub mod model;
pub mod redis;

pub const SK_METADATA: &str = "METADATA";
pub const SK_REGISTRATION_PREFIX: &str = "REG#";
pub const SK_WAITLIST_PREFIX: &str = "WAIT#";
pub const INDEX_SK_REGISTERED: &str = "REGISTERED";
pub const INDEX_SK_WAITLISTED: &str = "WAITLISTED";

pub fn user_pk(user_id: &UserId) -> String {
    format!("USER#{user_id}")
}

pub fn event_pk(event_id: &EventId) -> String {
    format!("EVENT#{event_id}")
}

pub fn registration_sk(user_id: &UserId) -> String {
    format!("{SK_REGISTRATION_PREFIX}{user_id}")
}

// Zero-padded so lexicographic sk order reproduces waitlist positions.
pub fn waitlist_sk(position: usize, user_id: &UserId) -> String {
    format!("{SK_WAITLIST_PREFIX}{position:05}#{user_id}")
}

/// One row of the single registration table, addressed by a `(pk, sk)`
/// composite key. Records carrying the optional index keys are also
/// reachable through `query_index` for reverse lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    pub pk: String,
    pub sk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_pk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_sk: Option<String>,
    pub payload: serde_json::Value,
}

impl TableRecord {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
            index_pk: None,
            index_sk: None,
            payload,
        }
    }

    pub fn with_index(mut self, index_pk: impl Into<String>, index_sk: impl Into<String>) -> Self {
        self.index_pk = Some(index_pk.into());
        self.index_sk = Some(index_sk.into());
        self
    }

    pub fn payload_as<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(self.payload.clone()).map_err(AppError::from)
    }
}

/// Minimal contract a key-value backend has to offer the repositories:
/// point reads/writes plus two query shapes, a sk-ordered prefix scan
/// within one partition and a secondary-index lookup.
#[async_trait]
pub trait KvTable: Send + Sync {
    async fn put(&self, record: TableRecord) -> AppResult<()>;
    async fn get(&self, pk: &str, sk: &str) -> AppResult<Option<TableRecord>>;
    async fn delete(&self, pk: &str, sk: &str) -> AppResult<()>;
    /// Records of one partition whose sk starts with `sk_prefix`, ascending
    /// by sk.
    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> AppResult<Vec<TableRecord>>;
    /// Records whose index keys match exactly; order is unspecified.
    async fn query_index(&self, index_pk: &str, index_sk: &str) -> AppResult<Vec<TableRecord>>;
}
