//! Unified error type.

use std::net::SocketAddr;

/// The error type returned by hxtodos's startup and serving operations.
///
/// Request-level failures (bad input, store errors) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures that stop the process from serving at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("template registration failed: {0}")]
    Template(#[from] minijinja::Error),
}
