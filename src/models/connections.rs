use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ExportError;

/// Database engines the generator knows how to introspect.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    MySql,
    MariaDb,
}

impl Driver {
    /// Parses a driver identifier as reported by a connection (`"MySQL"`, `"MariaDB"`).
    pub fn parse(identifier: &str) -> Result<Self, ExportError> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Driver::MySql),
            "mariadb" => Ok(Driver::MariaDb),
            _ => Err(ExportError::UnsupportedEngine(identifier.to_string())),
        }
    }

    /// Picks the driver from a connection URL scheme without connecting.
    pub fn from_url(database_url: &str) -> Result<Self, ExportError> {
        let scheme = database_url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| {
                ExportError::Config(format!("database URL has no scheme: {}", database_url))
            })?;
        Self::parse(scheme)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::MySql => write!(f, "MySQL"),
            Driver::MariaDb => write!(f, "MariaDB"),
        }
    }
}

/// A connection URL whose scheme names a supported engine.
///
/// The engine actually in use is read back from the server once connected.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    pub database_url: String,
}

impl ConnectionConfig {
    pub fn from_url(database_url: &str) -> Result<Self, ExportError> {
        Driver::from_url(database_url)?;
        Ok(Self {
            database_url: database_url.to_string(),
        })
    }

    /// URL sqlx understands; it only accepts the `mysql` scheme for both engines.
    pub fn sqlx_url(&self) -> String {
        match self.database_url.split_once("://") {
            Some((_, rest)) => format!("mysql://{}", rest),
            None => self.database_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_driver_identifiers() {
        assert_eq!(Driver::parse("MySQL").unwrap(), Driver::MySql);
        assert_eq!(Driver::parse("MariaDB").unwrap(), Driver::MariaDb);
        assert_eq!(Driver::parse("mariadb").unwrap(), Driver::MariaDb);
    }

    #[test]
    fn test_parse_rejects_other_engines() {
        let err = Driver::parse("PostgreSQL").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedEngine(name) if name == "PostgreSQL"));
    }

    #[test]
    fn test_from_url() {
        assert_eq!(
            Driver::from_url("mysql://root:pw@localhost/shop").unwrap(),
            Driver::MySql
        );
        assert!(matches!(
            Driver::from_url("postgres://localhost/shop"),
            Err(ExportError::UnsupportedEngine(_))
        ));
        assert!(matches!(
            Driver::from_url("localhost/shop"),
            Err(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_sqlx_url_rewrites_mariadb_scheme() {
        let config = ConnectionConfig::from_url("mariadb://root@db:3306/shop").unwrap();
        assert_eq!(config.sqlx_url(), "mysql://root@db:3306/shop");
    }

    #[test]
    fn test_connection_config_rejects_other_schemes() {
        assert!(matches!(
            ConnectionConfig::from_url("postgres://root@db:5432/shop"),
            Err(ExportError::UnsupportedEngine(name)) if name == "postgres"
        ));
        assert!(ConnectionConfig::from_url("MySQL://root@db/shop").is_ok());
    }
}
