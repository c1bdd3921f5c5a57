#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hxtodos::store::{Operation, StoreError};
use hxtodos::{App, Item, ItemStore, MemoryStore, Method, Request, Response, Router, StoreConfig, Templates, routes};

/// A [`MemoryStore`] that counts every call made through it.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemStore for CountingStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.put(item).await
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.scan().await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}

/// A store whose every operation fails, as an unreachable table would.
pub struct FailingStore;

#[async_trait]
impl ItemStore for FailingStore {
    async fn put(&self, _item: &Item) -> Result<(), StoreError> {
        Err(StoreError::new(Operation::Put, "connection refused"))
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Err(StoreError::new(Operation::Scan, "connection refused"))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::new(Operation::Delete, "connection refused"))
    }
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::new(StoreConfig { table_name: "todos".into(), primary_key: "id".into() })
}

pub fn router_with(store: Arc<dyn ItemStore>) -> Router<App> {
    routes(App::new(store, Templates::new().unwrap()))
}

pub fn router() -> Router<App> {
    router_with(Arc::new(memory_store()))
}

pub async fn get(router: &Router<App>, path: &str) -> Response {
    router.dispatch(Request::new(Method::Get, path)).await
}

pub async fn post_form(router: &Router<App>, path: &str, body: &'static str) -> Response {
    let req = Request::new(Method::Post, path)
        .with_header("content-type", "application/x-www-form-urlencoded")
        .with_body(body);
    router.dispatch(req).await
}

pub async fn delete(router: &Router<App>, path: &str) -> Response {
    router.dispatch(Request::new(Method::Delete, path)).await
}

/// The id of the first `<li id="…">` in `html`.
pub fn first_row_id(html: &str) -> Option<String> {
    let start = html.find(r#"<li id=""#)? + r#"<li id=""#.len();
    let end = start + html[start..].find('"')?;
    Some(html[start..end].to_owned())
}

/// Number of `<li` elements in `html`.
pub fn row_count(html: &str) -> usize {
    html.matches("<li ").count()
}
