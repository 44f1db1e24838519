use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub table: TableConfig,
    pub redis: RedisConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let table = TableConfig {
            table_name: std::env::var("REGISTRATION_TABLE_NAME")
                .unwrap_or_else(|_| "registration-system".into()),
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("REDIS_PORT")
                .unwrap_or_else(|_| "6379".into())
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        Ok(Self { table, redis })
    }
}

/// Logical name of the key-value table all records live under. Backends use
/// it as a key namespace so several deployments can share one store.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub table_name: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}
