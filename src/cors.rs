//! CORS preflight.
//!
//! Every route also answers `OPTIONS` with the same fixed grant:
//!
//! | Header | Value |
//! |---|---|
//! | `access-control-allow-origin` | `*` |
//! | `access-control-allow-methods` | `OPTIONS,GET,PUT,POST,DELETE` |
//! | `access-control-allow-headers` | the standard SigV4 request headers |
//! | `access-control-allow-credentials` | `false` |

use std::sync::Arc;

use crate::{Request, Response};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "OPTIONS,GET,PUT,POST,DELETE";
pub const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";
pub const ALLOW_CREDENTIALS: &str = "false";

/// `OPTIONS` handler. `200 OK`, empty body, the grant above. Needs nothing
/// from the application state.
pub async fn preflight<S>(_state: Arc<S>, _req: Request) -> Response {
    Response::builder()
        .header("access-control-allow-origin", ALLOW_ORIGIN)
        .header("access-control-allow-methods", ALLOW_METHODS)
        .header("access-control-allow-headers", ALLOW_HEADERS)
        .header("access-control-allow-credentials", ALLOW_CREDENTIALS)
        .no_body()
}
