use thiserror::Error;

/// Error type for everything that can abort a migration export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Error that occurs while running a catalog query.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// The driver reported by the connection is not MySQL or MariaDB.
    #[error("Unsupported database engine: {0}")]
    UnsupportedEngine(String),
    /// Connection error (e.g., unreachable host or bad credentials).
    #[error("Connection error: {0}")]
    Connection(String),
    /// Configuration error (e.g., missing database URL).
    #[error("Configuration error: {0}")]
    Config(String),
    /// A catalog row did not have the expected shape.
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// The metadata queries did not all complete within the timeout.
    #[error("Metadata queries timed out after {0}s")]
    Timeout(u64),
    /// Writing the generated migration failed.
    #[error("Output error: {0}")]
    Sink(String),
    /// General error with a custom message.
    #[error("Error: {0}")]
    General(String),
}
