//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::method::Method;
use crate::store::BoxError;

/// Failure to buffer a request body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(BoxError),
}

/// An incoming HTTP request with its body fully buffered.
///
/// Handlers receive this after routing, so path parameters are already
/// resolved. Tests build one directly with [`Request::new`].
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Buffers a hyper request into a [`Request`], reading at most `limit`
    /// body bytes.
    ///
    /// Returns `None` if the method is not one the router dispatches.
    pub(crate) async fn from_hyper<B>(
        req: hyper::Request<B>,
        limit: usize,
    ) -> Result<Option<Self>, BodyError>
    where
        B: hyper::body::Body,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let Ok(method) = Method::try_from(&parts.method) else {
            return Ok(None);
        };
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        let body = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => return Err(BodyError::TooLarge { limit }),
            Err(e) => return Err(BodyError::Read(e)),
        };
        Ok(Some(Self {
            method,
            path: parts.uri.path().to_owned(),
            headers,
            body,
            params: HashMap::new(),
        }))
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/todos/{id}`, `req.param("id")` on `/todos/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of `key` in an `application/x-www-form-urlencoded` body.
    ///
    /// `+` and percent escapes are decoded. A missing field is `None`; a field
    /// present with no value is `Some("")`.
    pub fn form_field(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.body)
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_decodes_percent_and_plus() {
        let req = Request::new(Method::Post, "/todos").with_body("text=Buy%20milk&x=1");
        assert_eq!(req.form_field("text").as_deref(), Some("Buy milk"));

        let req = Request::new(Method::Post, "/todos").with_body("text=a+b%26c");
        assert_eq!(req.form_field("text").as_deref(), Some("a b&c"));
    }

    #[test]
    fn form_field_absent_and_empty() {
        let req = Request::new(Method::Post, "/todos").with_body("other=1");
        assert_eq!(req.form_field("text"), None);

        let req = Request::new(Method::Post, "/todos").with_body("text=");
        assert_eq!(req.form_field("text").as_deref(), Some(""));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/")
            .with_header("Content-Type", "application/x-www-form-urlencoded");
        assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.header("accept"), None);
    }

    #[tokio::test]
    async fn buffers_hyper_request() {
        let raw = hyper::Request::builder()
            .method("POST")
            .uri("/todos?ignored=1")
            .header("hx-request", "true")
            .body(http_body_util::Full::new(Bytes::from_static(b"text=hi")))
            .unwrap();

        let req = Request::from_hyper(raw, 1024).await.unwrap().unwrap();
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/todos");
        assert_eq!(req.header("HX-Request"), Some("true"));
        assert_eq!(req.body(), b"text=hi");
    }

    #[tokio::test]
    async fn unsupported_method_is_none() {
        let raw = hyper::Request::builder()
            .method("TRACE")
            .uri("/")
            .body(http_body_util::Empty::<Bytes>::new())
            .unwrap();

        assert!(Request::from_hyper(raw, 1024).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn body_over_limit_is_rejected() {
        let raw = hyper::Request::builder()
            .method("POST")
            .uri("/todos")
            .body(http_body_util::Full::new(Bytes::from(vec![b'a'; 65])))
            .unwrap();

        let err = Request::from_hyper(raw, 64).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 64 }), "{err}");
    }

    #[tokio::test]
    async fn body_at_limit_is_buffered() {
        let raw = hyper::Request::builder()
            .method("POST")
            .uri("/todos")
            .body(http_body_util::Full::new(Bytes::from(vec![b'a'; 64])))
            .unwrap();

        let req = Request::from_hyper(raw, 64).await.unwrap().unwrap();
        assert_eq!(req.body().len(), 64);
    }
}
