use std::cell::RefCell;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use phinxgen::codegen::{GeneratorInfo, Quirks};
use phinxgen::config::ExportConfig;
use phinxgen::db::DbClient;
use phinxgen::errors::ExportError;
use phinxgen::models::schema::TableRef;
use phinxgen::sink::{LogNotifier, OutputSink};
use phinxgen::Exporter;
use pretty_assertions::assert_eq;
use serde_json::json;

mock! {
    pub DbClientMock {}

    #[async_trait]
    impl DbClient for DbClientMock {
        fn driver(&self) -> String;
        async fn query(&self, query: &str) -> Result<Vec<serde_json::Value>, ExportError>;
    }
}

#[derive(Default)]
struct MemorySink {
    text: RefCell<String>,
}

impl OutputSink for MemorySink {
    fn write(&self, text: &str) -> Result<(), ExportError> {
        self.text.borrow_mut().push_str(text);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn config(quirks: Quirks) -> ExportConfig {
    ExportConfig {
        generator: GeneratorInfo {
            name: "phinxgen".to_string(),
            version: "0.1.0".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2024, 5, 17)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        },
        quirks,
        timeout: None,
    }
}

/// `orders` with an `id`, one integer column, a two-column unique index and
/// a foreign key to `users`.
fn orders_client(index_columns: &'static str) -> MockDbClientMock {
    let mut mock_db = MockDbClientMock::new();
    mock_db.expect_driver().returning(|| "MariaDB".to_string());
    mock_db.expect_query().times(3).returning(move |sql| {
        if sql.contains("information_schema.COLUMNS") {
            Ok(vec![
                json!({
                    "name": "id",
                    "raw_type": "int(10) unsigned",
                    "nullable": "NO",
                    "default": null,
                    "extra": "auto_increment",
                    "comment": "",
                }),
                json!({
                    "name": "age",
                    "raw_type": "int(11)",
                    "nullable": "NO",
                    "default": "0",
                    "extra": "",
                    "comment": "",
                }),
            ])
        } else if sql.contains("information_schema.STATISTICS") {
            Ok(vec![
                json!({
                    "name": "PRIMARY",
                    "index_type": "BTREE",
                    "non_unique": "0",
                    "columns": "id",
                }),
                json!({
                    "name": "orders_user_age_unique",
                    "index_type": "BTREE",
                    "non_unique": "0",
                    "columns": index_columns,
                }),
            ])
        } else {
            Ok(vec![json!({
                "name": "orders_user_id_foreign",
                "on_update": "NO ACTION",
                "on_delete": "CASCADE",
                "table": "orders",
                "referenced_table": "users",
                "column": "user_id",
                "referenced_column": "id",
            })])
        }
    });
    mock_db
}

#[tokio::test]
async fn test_end_to_end_document() {
    let mock_db = orders_client("user_id,age");
    let sink = MemorySink::default();
    let table = TableRef::new("shop", "orders", "BASE TABLE");

    Exporter::new(&mock_db, &LogNotifier, config(Quirks::default()))
        .export(&table, &sink)
        .await
        .unwrap();

    let expected = r#"<?php

/**
 * Generated by phinxgen 0.1.0
 * Generated at 2024-05-17 08:00:00
 *
 * Migration class: Orders
 */

use Phinx\Migration\AbstractMigration;

class Orders extends AbstractMigration
{
    public function change()
    {
        $this->table('orders')
            // Columns
            ->addColumn('age', 'integer', ['null' => false, 'default' => 0, 'limit' => 11])
            // Indexes
            ->addIndex(['user_id', 'age'], ['name' => 'orders_user_age_unique', 'unique' => true])
            // Foreign keys
            ->addForeignKey('user_id', 'users', 'id', ['constraint' => 'orders_user_id_foreign', 'delete' => 'CASCADE', 'update' => 'NO_ACTION'])
            ->create();
    }
}
"#;
    assert_eq!(sink.text.borrow().as_str(), expected);
}

#[tokio::test]
async fn test_three_column_index_keeps_first_separator_only() {
    let mock_db = orders_client("user_id,age,status");
    let sink = MemorySink::default();
    let table = TableRef::new("shop", "orders", "BASE TABLE");

    Exporter::new(&mock_db, &LogNotifier, config(Quirks::default()))
        .export(&table, &sink)
        .await
        .unwrap();

    assert!(sink
        .text
        .borrow()
        .contains("->addIndex(['user_id', 'age,status'], ['name' => 'orders_user_age_unique', 'unique' => true])"));
}

#[tokio::test]
async fn test_three_column_index_normalized() {
    let mock_db = orders_client("user_id,age,status");
    let sink = MemorySink::default();
    let table = TableRef::new("shop", "orders", "BASE TABLE");
    let quirks = Quirks {
        first_separator_only: false,
    };

    Exporter::new(&mock_db, &LogNotifier, config(quirks))
        .export(&table, &sink)
        .await
        .unwrap();

    assert!(sink
        .text
        .borrow()
        .contains("->addIndex(['user_id', 'age', 'status'], ['name' => 'orders_user_age_unique', 'unique' => true])"));
}
