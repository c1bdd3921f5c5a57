//! Application state and the routing table.

use std::sync::Arc;

use crate::cors;
use crate::handlers;
use crate::method::Method;
use crate::router::Router;
use crate::store::ItemStore;
use crate::templates::Templates;

/// What every handler is called with: the item store and the templates.
///
/// Holds no per-request state. The store client is created once and shared
/// by all requests on this process.
pub struct App {
    pub store: Arc<dyn ItemStore>,
    pub templates: Templates,
}

impl App {
    pub fn new(store: Arc<dyn ItemStore>, templates: Templates) -> Self {
        Self { store, templates }
    }
}

/// Builds the router for the to-do service.
///
/// `DELETE /todos` (no id) is routed to the delete handler as well so that it
/// answers `400` instead of `405`.
pub fn routes(app: App) -> Router<App> {
    Router::new(app)
        .on(Method::Get,     "/",           handlers::index)
        .on(Method::Get,     "/todos",      handlers::list)
        .on(Method::Post,    "/todos",      handlers::create)
        .on(Method::Delete,  "/todos",      handlers::delete)
        .on(Method::Delete,  "/todos/{id}", handlers::delete)
        .on(Method::Options, "/",           cors::preflight::<App>)
        .on(Method::Options, "/todos",      cors::preflight::<App>)
        .on(Method::Options, "/todos/{id}", cors::preflight::<App>)
}
