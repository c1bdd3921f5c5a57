//! DynamoDB-backed item table.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use super::{ItemStore, Operation, StoreConfig, StoreError};
use crate::item::{CREATED_AT_FIELD, Item, TEXT_FIELD};

/// An [`ItemStore`] over one DynamoDB table whose partition key is a string
/// attribute named by [`StoreConfig::primary_key`].
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
    config: StoreConfig,
}

impl DynamoStore {
    pub fn new(client: Client, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// Builds a client from the SDK's default environment: region,
    /// credentials and `AWS_ENDPOINT_URL` (for DynamoDB Local) all come from
    /// the usual AWS variables and profiles.
    pub async fn from_env(config: StoreConfig) -> Self {
        let sdk = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk), config)
    }
}

fn to_attributes(primary_key: &str, item: &Item) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (primary_key.to_owned(), AttributeValue::S(item.id.clone())),
        (TEXT_FIELD.to_owned(), AttributeValue::S(item.text.clone())),
        (CREATED_AT_FIELD.to_owned(), AttributeValue::N(item.created_at.to_string())),
    ])
}

fn from_attributes(primary_key: &str, attrs: &HashMap<String, AttributeValue>) -> Option<Item> {
    Some(Item {
        id: attrs.get(primary_key)?.as_s().ok()?.clone(),
        text: attrs.get(TEXT_FIELD)?.as_s().ok()?.clone(),
        created_at: attrs.get(CREATED_AT_FIELD)?.as_n().ok()?.parse().ok()?,
    })
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.config.table_name)
            .set_item(Some(to_attributes(&self.config.primary_key, item)))
            .send()
            .await
            .map_err(|e| StoreError::new(Operation::Put, e))?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        // Drain every page; callers always see the whole table.
        let mut stream = self.client
            .scan()
            .table_name(&self.config.table_name)
            .into_paginator()
            .items()
            .send();

        let mut items = Vec::new();
        while let Some(attrs) = stream.next().await {
            let attrs = attrs.map_err(|e| StoreError::new(Operation::Scan, e))?;
            let item = from_attributes(&self.config.primary_key, &attrs)
                .ok_or_else(|| StoreError::malformed(&self.config.primary_key))?;
            items.push(item);
        }
        debug!(table = %self.config.table_name, count = items.len(), "scanned");
        Ok(items)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.config.table_name)
            .key(&self.config.primary_key, AttributeValue::S(id.to_owned()))
            .send()
            .await
            .map_err(|e| StoreError::new(Operation::Delete, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_round_trip() {
        let item = Item { id: "abc".into(), text: "Buy milk".into(), created_at: 1_700_000_000_000 };
        let attrs = to_attributes("pk", &item);

        assert_eq!(attrs["pk"], AttributeValue::S("abc".into()));
        assert_eq!(attrs["createdAt"], AttributeValue::N("1700000000000".into()));
        assert_eq!(from_attributes("pk", &attrs), Some(item));
    }

    #[test]
    fn wrong_attribute_type_is_rejected() {
        let attrs = HashMap::from([
            ("pk".to_owned(), AttributeValue::S("abc".into())),
            ("text".to_owned(), AttributeValue::S("x".into())),
            ("createdAt".to_owned(), AttributeValue::S("soon".into())),
        ]);
        assert_eq!(from_attributes("pk", &attrs), None);
        assert_eq!(from_attributes("id", &attrs), None);
    }
}
