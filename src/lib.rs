//! # hxtodos
//!
//! A to-do list service for hypermedia clients. Every endpoint answers with
//! server-rendered HTML that the browser (htmx) swaps straight into the page.
//!
//! ## Endpoints
//!
//! | Method | Path | Answer |
//! |---|---|---|
//! | `GET` | `/` | the full page, current items embedded |
//! | `GET` | `/todos` | the list fragment |
//! | `POST` | `/todos` | the row fragment of the new item (form field `text`) |
//! | `DELETE` | `/todos/{id}` | `204 No Content` |
//! | `OPTIONS` | all of the above | CORS preflight |
//!
//! ## Pipeline
//!
//! ```text
//! hyper request → Router (matchit) → handler → ItemStore → Templates → Response
//! ```
//!
//! The HTTP layer is deliberately small: a radix-tree [`Router`] that owns
//! the application state, a [`Server`] on hyper with graceful shutdown, and
//! plain [`Request`] / [`Response`] values. Handlers are
//! `async fn(Arc<App>, Request) -> impl IntoResponse`, so tests drive them
//! through [`Router::dispatch`] without a socket.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hxtodos::{App, MemoryStore, Server, StoreConfig, Templates, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hxtodos::Error> {
//!     let store = MemoryStore::new(StoreConfig {
//!         table_name: "todos".into(),
//!         primary_key: "id".into(),
//!     });
//!     let app = App::new(Arc::new(store), Templates::new()?);
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap())
//!         .serve(routes(app))
//!         .await
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod cors;
pub mod handlers;
pub mod item;
pub mod store;
pub mod templates;

pub use app::{App, routes};
pub use error::Error;
pub use handler::Handler;
pub use item::{Item, ItemView};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, Html, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{DynamoStore, ItemStore, MemoryStore, StoreConfig, StoreError};
pub use templates::Templates;
