use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use sqlx::{
    mysql::{MySqlPoolOptions, MySqlRow},
    Column, MySqlPool, Row,
};

use crate::{
    errors::ExportError,
    models::connections::{ConnectionConfig, Driver},
};

use super::DbClient;

pub struct MySqlClient {
    pub pool: MySqlPool,
    driver: Driver,
}

impl MySqlClient {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ExportError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(&config.sqlx_url())
            .await
            .map_err(|e| ExportError::Connection(e.to_string()))?;

        let version: String = sqlx::query_scalar("SELECT VERSION()")
            .fetch_one(&pool)
            .await
            .map_err(ExportError::Sqlx)?;
        let driver = detect_driver(&version);
        info!("connected to {} {}", driver, version);

        Ok(Self { pool, driver })
    }
}

/// MariaDB identifies itself in the version string, e.g. `10.11.6-MariaDB`.
fn detect_driver(version: &str) -> Driver {
    if version.to_ascii_lowercase().contains("mariadb") {
        Driver::MariaDb
    } else {
        Driver::MySql
    }
}

/// Decodes one cell; information_schema mixes text, integer and binary columns.
fn decode_value(row: &MySqlRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(Some(value)) = row.try_get::<Option<i64>, _>(index) {
        return Value::from(value);
    }
    if let Ok(Some(value)) = row.try_get::<Option<u64>, _>(index) {
        return Value::from(value);
    }
    if let Ok(Some(value)) = row.try_get::<Option<f64>, _>(index) {
        return Value::from(value);
    }
    if let Ok(Some(bytes)) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Value::String(String::from_utf8_lossy(&bytes).into_owned());
    }
    Value::Null
}

#[async_trait]
impl DbClient for MySqlClient {
    fn driver(&self) -> String {
        self.driver.to_string()
    }

    async fn query(&self, query: &str) -> Result<Vec<serde_json::Value>, ExportError> {
        debug!("query: {}", query);
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(ExportError::Sqlx)?;

        let results = rows
            .iter()
            .map(|row| {
                let json_map = row
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(i, column)| (column.name().to_string(), decode_value(row, i)))
                    .collect();

                Value::Object(json_map)
            })
            .collect();

        Ok(results)
    }
}
