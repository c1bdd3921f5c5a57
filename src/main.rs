//! `hxtodos` — serve the to-do list.
//!
//! Run with:
//!   RUST_LOG=debug TABLE_NAME=todos PRIMARY_KEY=id cargo run
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl -X POST http://localhost:3000/todos -d 'text=Buy%20milk'
//!   curl http://localhost:3000/todos
//!   curl -X DELETE http://localhost:3000/todos/<id>

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hxtodos::config::{Config, LogFormat, StoreKind};
use hxtodos::{App, DynamoStore, ItemStore, MemoryStore, Server, Templates, routes};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), hxtodos::Error> {
    if config.table_name.is_empty() || config.primary_key.is_empty() {
        warn!(
            table_name = %config.table_name,
            primary_key = %config.primary_key,
            "TABLE_NAME or PRIMARY_KEY is not set; using empty names",
        );
    }

    let store_config = config.store_config();
    let store: Arc<dyn ItemStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new(store_config)),
        StoreKind::Dynamodb => Arc::new(DynamoStore::from_env(store_config).await),
    };
    info!(store = ?config.store, table = %config.table_name, "item store ready");

    let app = App::new(store, Templates::new()?);
    Server::bind(config.bind)
        .max_body_bytes(config.max_body_bytes)
        .serve(routes(app))
        .await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
