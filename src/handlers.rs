//! The to-do request handlers.
//!
//! | Handler | Route | Success |
//! |---|---|---|
//! | [`index`] | `GET /` | 200, full page |
//! | [`list`] | `GET /todos` | 200, list fragment |
//! | [`create`] | `POST /todos` | 200, row fragment of the new item |
//! | [`delete`] | `DELETE /todos/{id}` | 204, no body |
//!
//! Each handler is its own error boundary: missing input answers `400` with
//! an empty body, and any store or render failure answers `500` with a JSON
//! body. Nothing is retried.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use crate::app::App;
use crate::item::{self, Item, ItemView};
use crate::request::Request;
use crate::response::{Html, IntoResponse, Json, Response};
use crate::status::Status;
use crate::store::StoreError;
use crate::templates::RenderError;

/// Why a handler could not produce its success response.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("missing request input")]
    BadRequest,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::BadRequest => return Response::status(Status::BadRequest),
            Self::Store(e) => {
                error!(operation = %e.operation, "{e}");
                json!({ "error": e.to_string(), "operation": e.operation.as_str() })
            }
            Self::Render(e) => {
                error!(template = e.template, "{e}");
                json!({ "error": e.to_string() })
            }
        };
        let mut res = Json(body).into_response();
        res.status = Status::InternalServerError;
        res
    }
}

/// `GET /` — the full page with the current items.
pub async fn index(app: Arc<App>, _req: Request) -> Result<Html, Failure> {
    let items = item::views(app.store.scan().await?);
    Ok(Html(app.templates.page(&items)?))
}

/// `GET /todos` — the list fragment alone, for swapping into `#todos-list`.
pub async fn list(app: Arc<App>, _req: Request) -> Result<Html, Failure> {
    let items = item::views(app.store.scan().await?);
    Ok(Html(app.templates.list(&items)?))
}

/// `POST /todos` — stores a new item from the form field `text` and answers
/// with its row.
///
/// The id and timestamp are always generated here. A body without a `text`
/// field creates an item with empty text; an empty body is rejected.
pub async fn create(app: Arc<App>, req: Request) -> Result<Html, Failure> {
    if req.body().is_empty() {
        return Err(Failure::BadRequest);
    }

    let item = Item::new(req.form_field("text").unwrap_or_default());
    app.store.put(&item).await?;
    debug!(id = %item.id, "todo created");

    Ok(Html(app.templates.row(&ItemView::from(&item))?))
}

/// `DELETE /todos/{id}` — removes the item. Deleting an unknown id succeeds.
pub async fn delete(app: Arc<App>, req: Request) -> Result<Status, Failure> {
    let id = match req.param("id") {
        Some(id) if !id.is_empty() => id,
        _ => return Err(Failure::BadRequest),
    };

    app.store.delete(id).await?;
    debug!(id, "todo deleted");

    Ok(Status::NoContent)
}
