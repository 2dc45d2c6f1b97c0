//! Catalog queries against `information_schema`.
//!
//! The queries alias every column to the field names of the descriptor it
//! decodes into, so rows deserialize straight from the JSON objects
//! [`DbClient::query`] returns.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    errors::ExportError,
    models::schema::{TableRef, TableSchema},
};

use super::DbClient;

/// Quotes `value` as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

pub fn columns_query(table: &TableRef) -> String {
    format!(
        "SELECT COLUMN_NAME AS `name`, COLUMN_TYPE AS `raw_type`, IS_NULLABLE AS `nullable`, \
         COLUMN_DEFAULT AS `default`, COALESCE(EXTRA, '') AS `extra`, \
         COALESCE(COLUMN_COMMENT, '') AS `comment` \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {} \
         ORDER BY ORDINAL_POSITION",
        quote_literal(&table.schema),
        quote_literal(&table.name)
    )
}

pub fn indexes_query(table: &TableRef) -> String {
    format!(
        "SELECT INDEX_NAME AS `name`, INDEX_TYPE AS `index_type`, \
         CAST(NON_UNIQUE AS CHAR) AS `non_unique`, \
         COALESCE(GROUP_CONCAT(COLUMN_NAME ORDER BY SEQ_IN_INDEX), '') AS `columns` \
         FROM information_schema.STATISTICS \
         WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {} \
         GROUP BY INDEX_NAME, INDEX_TYPE, NON_UNIQUE \
         ORDER BY INDEX_NAME",
        quote_literal(&table.schema),
        quote_literal(&table.name)
    )
}

pub fn foreign_keys_query(table: &TableRef) -> String {
    format!(
        "SELECT rc.CONSTRAINT_NAME AS `name`, rc.UPDATE_RULE AS `on_update`, \
         rc.DELETE_RULE AS `on_delete`, rc.TABLE_NAME AS `table`, \
         rc.REFERENCED_TABLE_NAME AS `referenced_table`, kcu.COLUMN_NAME AS `column`, \
         kcu.REFERENCED_COLUMN_NAME AS `referenced_column` \
         FROM information_schema.REFERENTIAL_CONSTRAINTS rc \
         JOIN information_schema.KEY_COLUMN_USAGE kcu \
         ON kcu.CONSTRAINT_SCHEMA = rc.CONSTRAINT_SCHEMA \
         AND kcu.CONSTRAINT_NAME = rc.CONSTRAINT_NAME \
         AND kcu.TABLE_NAME = rc.TABLE_NAME \
         WHERE rc.CONSTRAINT_SCHEMA = {} AND rc.TABLE_NAME = {} \
         ORDER BY rc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
        quote_literal(&table.schema),
        quote_literal(&table.name)
    )
}

pub fn tables_query(schema: &str) -> String {
    format!(
        "SELECT TABLE_SCHEMA AS `schema`, TABLE_NAME AS `name`, TABLE_TYPE AS `kind` \
         FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = {} \
         ORDER BY TABLE_NAME",
        quote_literal(schema)
    )
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, ExportError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(ExportError::from))
        .collect()
}

/// Runs the three metadata queries concurrently and joins their results.
///
/// The first failing query aborts the whole fetch.
pub async fn fetch_table_schema(
    client: &dyn DbClient,
    table: &TableRef,
) -> Result<TableSchema, ExportError> {
    let columns_sql = columns_query(table);
    let indexes_sql = indexes_query(table);
    let foreign_keys_sql = foreign_keys_query(table);

    let (columns, indexes, foreign_keys) = tokio::try_join!(
        client.query(&columns_sql),
        client.query(&indexes_sql),
        client.query(&foreign_keys_sql),
    )?;

    debug!(
        "fetched {} column rows, {} index rows, {} foreign key rows for {}.{}",
        columns.len(),
        indexes.len(),
        foreign_keys.len(),
        table.schema,
        table.name
    );

    Ok(TableSchema {
        table: table.clone(),
        columns: decode_rows(columns)?,
        indexes: decode_rows(indexes)?,
        foreign_keys: decode_rows(foreign_keys)?,
    })
}

pub async fn list_tables(client: &dyn DbClient, schema: &str) -> Result<Vec<TableRef>, ExportError> {
    let rows = client.query(&tables_query(schema)).await?;
    decode_rows(rows)
}

/// Looks `name` up among the tables of `schema`.
pub async fn resolve_table(
    client: &dyn DbClient,
    schema: &str,
    name: &str,
) -> Result<TableRef, ExportError> {
    list_tables(client, schema)
        .await?
        .into_iter()
        .find(|table| table.name == name)
        .ok_or_else(|| ExportError::TableNotFound(format!("{}.{}", schema, name)))
}

/// Default schema of the connection (`SELECT DATABASE()`).
pub async fn current_schema(client: &dyn DbClient) -> Result<String, ExportError> {
    let rows = client.query("SELECT DATABASE() AS `name`").await?;

    rows.first()
        .and_then(|row| row.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ExportError::Config("no schema given and the connection has no default database".into())
        })
}
