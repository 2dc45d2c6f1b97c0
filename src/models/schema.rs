use serde::{Deserialize, Serialize};

/// A table selected for export.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
    /// Catalog `TABLE_TYPE`, e.g. `BASE TABLE` or `VIEW`.
    pub kind: String,
}

impl TableRef {
    pub fn new(schema: &str, name: &str, kind: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// One row of `information_schema.COLUMNS`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Full column type, e.g. `varchar(255)` or `int(10) unsigned`.
    pub raw_type: String,
    /// Raw `IS_NULLABLE` text.
    pub nullable: String,
    pub default: Option<String>,
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub comment: String,
}

impl ColumnDescriptor {
    pub fn is_nullable(&self) -> bool {
        self.nullable.starts_with(['y', 'Y'])
    }
}

/// One index, with its columns comma-joined in index order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IndexDescriptor {
    pub name: String,
    pub index_type: String,
    pub non_unique: String,
    pub columns: String,
}

impl IndexDescriptor {
    pub fn is_unique(&self) -> bool {
        matches!(self.non_unique.trim().parse::<i64>(), Ok(0))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForeignKeyDescriptor {
    pub name: String,
    pub on_update: String,
    pub on_delete: String,
    pub table: String,
    pub referenced_table: String,
    pub column: String,
    pub referenced_column: String,
}

/// Everything the assembler needs for one table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TableSchema {
    pub table: TableRef,
    pub columns: Vec<ColumnDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}
