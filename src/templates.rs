//! Named HTML templates.
//!
//! Three templates are registered once at startup:
//!
//! | Name | Context | Renders |
//! |---|---|---|
//! | `row.html` | `item` | one `<li>` for an item |
//! | `list.html` | `items` | `row.html` for each entry, concatenated |
//! | `page.html` | `items` | the full document, `list.html` inside `#todos-list` |
//!
//! `list.html` and `page.html` pull rows in with `{% include %}`, so a row
//! rendered on its own is byte-for-byte the same as that row inside a list or
//! page. `.html` templates auto-escape every value, `/` included.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::item::ItemView;

pub const ROW: &str = "row.html";
pub const LIST: &str = "list.html";
pub const PAGE: &str = "page.html";

/// A rendering failure.
#[derive(Debug, thiserror::Error)]
#[error("failed to render `{template}`: {source}")]
pub struct RenderError {
    pub template: &'static str,
    #[source]
    pub source: minijinja::Error,
}

/// The template registry shared by all handlers.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Registers the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(ROW, include_str!("../templates/row.html"))?;
        env.add_template(LIST, include_str!("../templates/list.html"))?;
        env.add_template(PAGE, include_str!("../templates/page.html"))?;
        Ok(Self { env })
    }

    /// Renders the template registered as `name` against `ctx`.
    pub fn render<C: Serialize>(&self, name: &'static str, ctx: C) -> Result<String, RenderError> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|source| RenderError { template: name, source })
    }

    pub fn row(&self, item: &ItemView) -> Result<String, RenderError> {
        self.render(ROW, context! { item })
    }

    pub fn list(&self, items: &[ItemView]) -> Result<String, RenderError> {
        self.render(LIST, context! { items })
    }

    pub fn page(&self, items: &[ItemView]) -> Result<String, RenderError> {
        self.render(PAGE, context! { items })
    }
}
