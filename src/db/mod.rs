use crate::errors::ExportError;
use async_trait::async_trait;

pub mod catalog;
pub mod mysql;

/// Query access to a live connection.
///
/// This is the whole surface the exporter needs from a database: the engine
/// identifier and plain-text SQL returning rows as JSON objects keyed by
/// column label.
#[async_trait]
pub trait DbClient: Send + Sync {
    /// Engine identifier as reported by the server, e.g. `"MySQL"` or `"MariaDB"`.
    fn driver(&self) -> String;
    async fn query(&self, query: &str) -> Result<Vec<serde_json::Value>, ExportError>;
}
