//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Immediately stops `listener.accept()` — no new connections are made.
//! 2. Tells every open connection to finish its current request and close.
//!    Idle keep-alive connections close at once.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::request::{BodyError, Request};
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// Default cap on a buffered request body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    max_body_bytes: usize,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr, max_body_bytes: DEFAULT_MAX_BODY_BYTES }
    }

    /// Largest request body the server buffers. Longer bodies answer `413`.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve<S>(self, router: Router<S>) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
    {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but shuts down when `signal` resolves.
    pub async fn serve_with_shutdown<S, F>(self, router: Router<S>, signal: F) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| Error::Bind { addr: self.addr, source })?;

        info!(addr = %self.addr, "hxtodos listening");

        serve_listener(listener, router, self.max_body_bytes, signal).await;
        Ok(())
    }
}

/// Accept loop over an already bound listener.
async fn serve_listener<S, F>(
    listener: TcpListener,
    router: Router<S>,
    max_body_bytes: usize,
    signal: F,
) where
    S: Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let router = Arc::new(router);
    let builder = ConnBuilder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let mut tasks = tokio::task::JoinSet::new();

    tokio::pin!(signal);

    loop {
        tokio::select! {
            // Check shutdown first so a SIGTERM immediately stops
            // accepting new connections, even if more are queued.
            biased;

            () = &mut signal => {
                info!(open = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let router = Arc::clone(&router);
                let io = TokioIo::new(stream);

                // Called once per request on the connection.
                let svc = service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move { dispatch(router, req, remote_addr, max_body_bytes).await }
                });

                let conn = graceful.watch(builder.serve_connection(io, svc).into_owned());
                tasks.spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet does not grow
            // without bound on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    graceful.shutdown().await;
    while tasks.join_next().await.is_some() {}

    info!("hxtodos stopped");
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Buffers, routes and logs one request.
///
/// The error type is [`Infallible`](std::convert::Infallible): every failure
/// becomes a status code here so hyper never sees an error.
async fn dispatch<S>(
    router: Arc<Router<S>>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
    max_body_bytes: usize,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible>
where
    S: Send + Sync + 'static,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = match Request::from_hyper(req, max_body_bytes).await {
        Ok(Some(req)) => router.dispatch(req).await,
        Ok(None) => Response::status(Status::MethodNotAllowed),
        Err(e @ BodyError::TooLarge { .. }) => {
            warn!(peer = %remote_addr, "{e}");
            Response::status(Status::ContentTooLarge)
        }
        Err(e @ BodyError::Read(_)) => {
            warn!(peer = %remote_addr, "{e}");
            Response::status(Status::BadRequest)
        }
    };

    info!(
        %method,
        path,
        status = u16::from(response.status_code()),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request",
    );

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both SIGTERM and SIGINT (Ctrl-C). If a handler
/// cannot be installed that arm never fires and the other still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::method::Method;

    async fn hello(_state: Arc<()>, _req: Request) -> Response {
        Response::text("hi")
    }

    /// Serves a one-route router on an ephemeral port until the returned
    /// sender fires.
    async fn start(max_body_bytes: usize) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new(()).on(Method::Get, "/", hello).on(Method::Post, "/", hello);
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve_listener(listener, router, max_body_bytes, async {
            let _ = stopped.await;
        }));
        (addr, stop, handle)
    }

    /// Reads until the end of the response head.
    async fn read_head(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the response head");
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn shutdown_closes_idle_keep_alive_connection() {
        let (addr, stop, server) = start(DEFAULT_MAX_BODY_BYTES).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await.unwrap();
        assert!(read_head(&mut stream).await.starts_with("HTTP/1.1 200"));

        // The connection stays open and idle while the server shuts down.
        stop.send(()).unwrap();
        let finished = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(finished.is_ok(), "server kept waiting on an idle connection");

        let mut rest = Vec::new();
        let eof = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut rest)).await;
        assert!(eof.is_ok(), "idle connection was not closed");
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let (addr, stop, server) = start(16).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let body = "text=".to_owned() + &"a".repeat(64);
        let req = format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(req.as_bytes()).await.unwrap();
        assert!(read_head(&mut stream).await.starts_with("HTTP/1.1 413"));

        drop(stream);
        stop.send(()).unwrap();
        server.await.unwrap();
    }
}
