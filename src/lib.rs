use codegen::MigrationDocument;
use config::ExportConfig;
use db::{catalog, DbClient};
use errors::ExportError;
use log::info;
use models::{
    connections::Driver,
    schema::{TableRef, TableSchema},
};
use sink::{Notifier, OutputSink};

pub mod codegen;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod sink;

/// Runs the fetch → translate → write pipeline for one table at a time.
///
/// Every failure is alerted exactly once through the notifier and then
/// returned; nothing is written to the sink unless all three metadata
/// queries succeeded.
pub struct Exporter<'a> {
    client: &'a dyn DbClient,
    notifier: &'a dyn Notifier,
    config: ExportConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(client: &'a dyn DbClient, notifier: &'a dyn Notifier, config: ExportConfig) -> Self {
        Exporter {
            client,
            notifier,
            config,
        }
    }

    pub async fn export(&self, table: &TableRef, sink: &dyn OutputSink) -> Result<(), ExportError> {
        let result = self.run(table, sink).await;
        if let Err(e) = &result {
            self.notifier.alert(alert_title(e), &e.to_string());
        }
        result
    }

    async fn run(&self, table: &TableRef, sink: &dyn OutputSink) -> Result<(), ExportError> {
        let driver = Driver::parse(&self.client.driver())?;
        info!("exporting {}.{} from {}", table.schema, table.name, driver);

        let schema = self.fetch(table).await?;
        let text = MigrationDocument::new(&schema, &self.config.generator, self.config.quirks)
            .render();

        sink.write(&text)?;
        self.notifier.notify(&format!(
            "Migration for {} '{}' written to {}",
            table.kind,
            table.name,
            sink.describe()
        ));

        Ok(())
    }

    async fn fetch(&self, table: &TableRef) -> Result<TableSchema, ExportError> {
        let fetch = catalog::fetch_table_schema(self.client, table);
        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch)
                .await
                .map_err(|_| ExportError::Timeout(timeout.as_secs()))?,
            None => fetch.await,
        }
    }
}

pub fn alert_title(error: &ExportError) -> &'static str {
    match error {
        ExportError::UnsupportedEngine(_) => "Unsupported database",
        ExportError::Connection(_) => "Connection failed",
        ExportError::TableNotFound(_) => "Table not found",
        _ => "Migration export failed",
    }
}
