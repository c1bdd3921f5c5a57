//! The to-do item, its stored shape and its display shape.

use chrono::{Local, LocalResult, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Attribute holding the item's text.
pub const TEXT_FIELD: &str = "text";
/// Attribute holding the creation time, in epoch milliseconds.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// A stored record: attribute name to value.
pub type Record = Map<String, Value>;

/// A single to-do as persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Item {
    /// A new item with a fresh random id, stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// The record written to the store, keyed by `primary_key`.
    pub fn to_record(&self, primary_key: &str) -> Record {
        let mut record = Record::new();
        record.insert(primary_key.to_owned(), Value::from(self.id.as_str()));
        record.insert(TEXT_FIELD.to_owned(), Value::from(self.text.as_str()));
        record.insert(CREATED_AT_FIELD.to_owned(), Value::from(self.created_at));
        record
    }

    /// Reads an item back from a record. `None` if any attribute is missing
    /// or has the wrong type.
    pub fn from_record(primary_key: &str, record: &Record) -> Option<Self> {
        Some(Self {
            id: record.get(primary_key)?.as_str()?.to_owned(),
            text: record.get(TEXT_FIELD)?.as_str()?.to_owned(),
            created_at: record.get(CREATED_AT_FIELD)?.as_i64()?,
        })
    }
}

/// An item as the templates see it: the timestamp already formatted.
#[derive(Clone, Debug, Serialize)]
pub struct ItemView {
    pub id: String,
    pub text: String,
    pub created_at: String,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            created_at: format_timestamp(item.created_at, &Local),
        }
    }
}

/// Maps scanned items to views, newest first (ties broken by id so the
/// order is stable across scans).
pub fn views(mut items: Vec<Item>) -> Vec<ItemView> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    items.iter().map(ItemView::from).collect()
}

/// Formats epoch milliseconds as an en-US locale string, e.g.
/// `3/14/2024, 1:05:09 PM`. Out-of-range values fall back to the raw number.
pub fn format_timestamp<Tz: TimeZone>(millis: i64, tz: &Tz) -> String {
    match tz.timestamp_millis_opt(millis) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => {
            t.naive_local().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
        }
        LocalResult::None => millis.to_string(),
    }
}
