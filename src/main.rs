use std::process::ExitCode;

use clap::Parser;
use log::info;
use phinxgen::{
    alert_title,
    config::{Cli, ExportConfig},
    db::{catalog, mysql::MySqlClient, DbClient},
    errors::ExportError,
    models::connections::ConnectionConfig,
    sink::{FileSink, LogNotifier, Notifier, OutputSink, StdoutSink},
    Exporter,
};

fn alerted(notifier: &dyn Notifier, error: ExportError) -> ExportError {
    notifier.alert(alert_title(&error), &error.to_string());
    error
}

async fn connect(cli: &Cli) -> Result<(MySqlClient, String), ExportError> {
    // Rejects other engines from the URL scheme before anything is sent.
    let connection = ConnectionConfig::from_url(&cli.database_url)?;
    let client = MySqlClient::connect(&connection).await?;

    let schema = match &cli.schema {
        Some(schema) => schema.clone(),
        None => catalog::current_schema(&client).await?,
    };
    Ok((client, schema))
}

async fn run(cli: &Cli, notifier: &dyn Notifier) -> Result<(), ExportError> {
    let (client, schema) = connect(cli).await.map_err(|e| alerted(notifier, e))?;

    if cli.list {
        let tables = catalog::list_tables(&client, &schema)
            .await
            .map_err(|e| alerted(notifier, e))?;
        for table in tables {
            println!("{}\t{}", table.name, table.kind);
        }
        return Ok(());
    }

    let table_name = cli.table.as_deref().unwrap_or_default();
    let table = catalog::resolve_table(&client, &schema, table_name)
        .await
        .map_err(|e| alerted(notifier, e))?;
    info!("{} driver, table {}.{}", client.driver(), schema, table.name);

    let sink: Box<dyn OutputSink> = match &cli.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };

    Exporter::new(&client, notifier, ExportConfig::from_cli(cli))
        .export(&table, sink.as_ref())
        .await
}

/// Errors reaching here were already alerted.
fn exit_code(result: Result<(), ExportError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    exit_code(run(&cli, &LogNotifier).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, title: &str, _message: &str) {
            self.alerts.borrow_mut().push(title.to_string());
        }

        fn notify(&self, _message: &str) {}
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_alerted_once() {
        let cli = Cli::try_parse_from([
            "phinxgen",
            "--database-url",
            "postgres://root@localhost/shop",
            "--table",
            "users",
        ])
        .unwrap();
        let notifier = RecordingNotifier::default();

        let result = run(&cli, &notifier).await;

        assert!(matches!(result, Err(ExportError::UnsupportedEngine(_))));
        assert_eq!(notifier.alerts.borrow().as_slice(), ["Unsupported database"]);
        assert_eq!(exit_code(result), ExitCode::FAILURE);
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(Err(ExportError::Timeout(30))),
            ExitCode::FAILURE
        );
    }
}
