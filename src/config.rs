//! Process configuration, read from flags or the environment.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

use crate::store::StoreConfig;

/// Which [`ItemStore`](crate::store::ItemStore) backend to run against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum StoreKind {
    /// Process-local table; contents vanish on restart.
    #[default]
    Memory,
    /// An Amazon DynamoDB table, using the SDK's default credential chain.
    Dynamodb,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line and environment configuration for the `hxtodos` binary.
#[derive(Clone, Debug, Parser)]
#[command(name = "hxtodos", version, about)]
pub struct Config {
    /// Table (collection) holding the to-do items.
    #[arg(long, env = "TABLE_NAME", default_value = "")]
    pub table_name: String,

    /// Name of the table's primary-key field.
    #[arg(long, env = "PRIMARY_KEY", default_value = "")]
    pub primary_key: String,

    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Largest request body accepted, in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = crate::server::DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            table_name: self.table_name.clone(),
            primary_key: self.primary_key.clone(),
        }
    }
}
