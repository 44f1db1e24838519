use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::error::AppResult;
use tokio::sync::RwLock;

use crate::table::{KvTable, TableRecord};

/// BTreeMap-backed table. Key iteration order gives the sk ordering the
/// prefix query relies on; index lookups scan the whole table, which is
/// fine at the sizes tests and local runs deal with.
#[derive(Default)]
pub struct MemoryTable {
    records: RwLock<BTreeMap<(String, String), TableRecord>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvTable for MemoryTable {
    async fn put(&self, record: TableRecord) -> AppResult<()> {
        self.records
            .write()
            .await
            .insert((record.pk.clone(), record.sk.clone()), record);
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> AppResult<Option<TableRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn delete(&self, pk: &str, sk: &str) -> AppResult<()> {
        self.records
            .write()
            .await
            .remove(&(pk.to_string(), sk.to_string()));
        Ok(())
    }

    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> AppResult<Vec<TableRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((p, s), _)| p == pk && s.starts_with(sk_prefix))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn query_index(&self, index_pk: &str, index_sk: &str) -> AppResult<Vec<TableRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| {
                record.index_pk.as_deref() == Some(index_pk)
                    && record.index_sk.as_deref() == Some(index_sk)
            })
            .cloned()
            .collect())
    }
}
