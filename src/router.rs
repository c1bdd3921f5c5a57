//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler, and every handler receives the router's shared state.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Owns the state `S` every handler is called with. Build it once at startup;
/// pass it to [`Server::serve`](crate::Server::serve), or call
/// [`Router::dispatch`] directly.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: Arc<S>,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state: Arc::new(state) }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them,
    /// percent-decoded.
    ///
    /// # Panics
    ///
    /// Panics if `path` conflicts with a route already registered for `method`.
    /// Routes are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((handler, params))
    }

    /// True if `path` is registered under any method.
    fn knows_path(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }

    /// Routes one request and produces one response.
    ///
    /// Unregistered paths answer `404`; registered paths without a handler for
    /// the request's method answer `405`.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(Arc::clone(&self.state), req).await
            }
            None if self.knows_path(req.path()) => {
                debug!(method = %req.method(), path = req.path(), "method not allowed");
                Response::status(Status::MethodNotAllowed)
            }
            None => Response::status(Status::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting(&'static str);

    async fn hello(state: Arc<Greeting>, _req: Request) -> Response {
        Response::text(state.0)
    }

    async fn echo_id(_state: Arc<Greeting>, req: Request) -> Response {
        Response::text(req.param("id").unwrap_or("none").to_owned())
    }

    fn router() -> Router<Greeting> {
        Router::new(Greeting("hi"))
            .on(Method::Get, "/", hello)
            .on(Method::Delete, "/things/{id}", echo_id)
    }

    #[tokio::test]
    async fn passes_state_to_handler() {
        let res = router().dispatch(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body_text(), "hi");
    }

    #[tokio::test]
    async fn resolves_path_params() {
        let res = router().dispatch(Request::new(Method::Delete, "/things/42")).await;
        assert_eq!(res.body_text(), "42");
    }

    #[tokio::test]
    async fn path_params_are_percent_decoded() {
        let res = router().dispatch(Request::new(Method::Delete, "/things/a%20b%2Fc")).await;
        assert_eq!(res.body_text(), "a b/c");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let res = router().dispatch(Request::new(Method::Get, "/nope")).await;
        assert_eq!(res.status_code(), Status::NotFound);
    }

    #[tokio::test]
    async fn known_path_wrong_method_is_405() {
        let res = router().dispatch(Request::new(Method::Put, "/things/1")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = router().on(Method::Get, "/", hello);
    }
}
