use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use shared::config::RedisConfig;
use shared::error::AppResult;

use crate::table::{KvTable, TableRecord};

// Separator inside index-set members joining pk and sk; never appears in
// either key.
const KEY_SEPARATOR: char = '\u{1f}';

/// Redis rendition of the single-table layout: every record is a JSON
/// string value, each partition keeps a set of its sks, and each index key
/// keeps a set of `pk`/`sk` pairs. All keys live under the configured
/// table name.
pub struct RedisClient {
    client: Client,
    table_name: String,
}

impl RedisClient {
    pub fn new(config: &RedisConfig, table_name: &str) -> AppResult<Self> {
        let client = Client::open(format!("redis://{}:{}", config.host, config.port))?;
        Ok(Self {
            client,
            table_name: table_name.to_string(),
        })
    }

    async fn conn(&self) -> AppResult<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    fn record_key(&self, pk: &str, sk: &str) -> String {
        format!("{}:record:{pk}:{sk}", self.table_name)
    }

    fn partition_key(&self, pk: &str) -> String {
        format!("{}:partition:{pk}", self.table_name)
    }

    fn index_key(&self, index_pk: &str, index_sk: &str) -> String {
        format!("{}:index:{index_pk}:{index_sk}", self.table_name)
    }
}

#[async_trait]
impl KvTable for RedisClient {
    async fn put(&self, record: TableRecord) -> AppResult<()> {
        let mut conn = self.conn().await?;
        let value = serde_json::to_string(&record)?;
        conn.set::<_, _, ()>(self.record_key(&record.pk, &record.sk), value)
            .await?;
        conn.sadd::<_, _, ()>(self.partition_key(&record.pk), &record.sk)
            .await?;
        if let (Some(index_pk), Some(index_sk)) = (&record.index_pk, &record.index_sk) {
            conn.sadd::<_, _, ()>(
                self.index_key(index_pk, index_sk),
                format!("{}{KEY_SEPARATOR}{}", record.pk, record.sk),
            )
            .await?;
        }
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> AppResult<Option<TableRecord>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(self.record_key(pk, sk)).await?;
        value
            .map(|v| serde_json::from_str(&v).map_err(Into::into))
            .transpose()
    }

    async fn delete(&self, pk: &str, sk: &str) -> AppResult<()> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(self.record_key(pk, sk)).await?;
        let Some(value) = value else {
            return Ok(());
        };
        let record: TableRecord = serde_json::from_str(&value)?;

        conn.del::<_, ()>(self.record_key(pk, sk)).await?;
        conn.srem::<_, _, ()>(self.partition_key(pk), sk).await?;
        if let (Some(index_pk), Some(index_sk)) = (&record.index_pk, &record.index_sk) {
            conn.srem::<_, _, ()>(
                self.index_key(index_pk, index_sk),
                format!("{pk}{KEY_SEPARATOR}{sk}"),
            )
            .await?;
        }
        Ok(())
    }

    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> AppResult<Vec<TableRecord>> {
        let mut conn = self.conn().await?;
        let mut sks: Vec<String> = conn.smembers(self.partition_key(pk)).await?;
        sks.retain(|sk| sk.starts_with(sk_prefix));
        sks.sort();

        let mut records = Vec::with_capacity(sks.len());
        for sk in sks {
            let value: Option<String> = conn.get(self.record_key(pk, &sk)).await?;
            if let Some(value) = value {
                records.push(serde_json::from_str(&value)?);
            }
        }
        Ok(records)
    }

    async fn query_index(&self, index_pk: &str, index_sk: &str) -> AppResult<Vec<TableRecord>> {
        let mut conn = self.conn().await?;
        let members: Vec<String> = conn.smembers(self.index_key(index_pk, index_sk)).await?;

        let mut records = Vec::with_capacity(members.len());
        for member in members {
            let Some((pk, sk)) = member.split_once(KEY_SEPARATOR) else {
                continue;
            };
            let value: Option<String> = conn.get(self.record_key(pk, sk)).await?;
            if let Some(value) = value {
                records.push(serde_json::from_str(&value)?);
            }
        }
        Ok(records)
    }
}
