//! DynamoDB store adapter
//!
//! Provides `DynamoDbStore`, which implements [`StoreAdapter`] against a
//! single DynamoDB table with one string partition key and any number of
//! global secondary indexes.

pub mod convert;

use crate::adapter::{IndexQuery, Item, Key, StoreAdapter};
use crate::error::{StoreError, StoreResult};
use crate::expression::UpdateInstruction;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::operation::update_item::builders::UpdateItemFluentBuilder;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::timeout::TimeoutConfig;
use convert::{from_attribute_map, to_attribute_map, to_attribute_value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

type AttributeMap = HashMap<String, AttributeValue>;

/// DynamoDB adapter configuration
#[derive(Debug, Clone, Default)]
pub struct DynamoDbConfig {
    /// DynamoDB table name
    pub table_name: String,
    /// AWS region (optional, uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. LocalStack)
    pub endpoint: Option<String>,
    /// Operation timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// DynamoDB-backed store
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbStore {
    /// Create a store client from the shared SDK config plus our overrides.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: DynamoDbConfig) -> Self {
        // Inherit HTTP client, retry config, credentials and sleep impl
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region));
        }

        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name,
        }
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key_attribute(key: &Key) -> (String, AttributeValue) {
        (
            key.attribute().to_string(),
            AttributeValue::S(key.value().to_string()),
        )
    }

    fn scan_request(&self, start_key: Option<AttributeMap>) -> ScanFluentBuilder {
        self.client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start_key)
    }

    fn query_request(
        &self,
        query: &IndexQuery,
        start_key: Option<AttributeMap>,
    ) -> QueryFluentBuilder {
        self.client
            .query()
            .table_name(&self.table_name)
            .index_name(&query.index_name)
            .key_condition_expression("#field = :value")
            .expression_attribute_names("#field", &query.attribute)
            .expression_attribute_values(":value", to_attribute_value(&query.value))
            .set_exclusive_start_key(start_key)
    }

    fn update_request(&self, instruction: &UpdateInstruction) -> UpdateItemFluentBuilder {
        let (name, value) = Self::key_attribute(instruction.key());
        let names: HashMap<String, String> = instruction
            .names()
            .iter()
            .map(|(token, attribute)| (token.clone(), attribute.clone()))
            .collect();
        let values: AttributeMap = instruction
            .values()
            .iter()
            .map(|(token, v)| (token.clone(), to_attribute_value(v)))
            .collect();

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(name, value)
            .update_expression(instruction.update_expression())
            .set_condition_expression(instruction.condition_expression().map(str::to_string))
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
    }

    /// Check if an UpdateItem error is a conditional check failure
    fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
        match err {
            SdkError::ServiceError(service_err) => matches!(
                service_err.err(),
                UpdateItemError::ConditionalCheckFailedException(_)
            ),
            _ => false,
        }
    }
}

/// Start key for the next page, if the last response was truncated.
fn next_page(last_evaluated_key: Option<&AttributeMap>) -> Option<AttributeMap> {
    last_evaluated_key.filter(|key| !key.is_empty()).cloned()
}

fn backend_error<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::backend(operation, DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl StoreAdapter for DynamoDbStore {
    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }

    async fn get(&self, key: &Key) -> StoreResult<Option<Item>> {
        let (name, value) = Self::key_attribute(key);
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(name, value)
            .send()
            .await
            .map_err(|e| backend_error("GetItem", e))?;

        response.item().map(from_attribute_map).transpose()
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attribute_map(&item)))
            .send()
            .await
            .map_err(|e| backend_error("PutItem", e))?;
        Ok(())
    }

    async fn delete(&self, key: &Key) -> StoreResult<()> {
        let (name, value) = Self::key_attribute(key);
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(name, value)
            .send()
            .await
            .map_err(|e| backend_error("DeleteItem", e))?;
        Ok(())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let response = self
                .scan_request(start_key.take())
                .send()
                .await
                .map_err(|e| backend_error("Scan", e))?;

            for item in response.items() {
                items.push(from_attribute_map(item)?);
            }

            match next_page(response.last_evaluated_key()) {
                Some(key) => {
                    debug!("Scan page returned {} items, continuing", response.count());
                    start_key = Some(key);
                }
                None => break,
            }
        }

        Ok(items)
    }

    async fn query_index(&self, query: &IndexQuery) -> StoreResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let response = self
                .query_request(query, start_key.take())
                .send()
                .await
                .map_err(|e| backend_error("Query", e))?;

            for item in response.items() {
                items.push(from_attribute_map(item)?);
            }

            match next_page(response.last_evaluated_key()) {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        Ok(items)
    }

    async fn update_fields(&self, instruction: &UpdateInstruction) -> StoreResult<()> {
        self.update_request(instruction)
            .send()
            .await
            .map_err(|e| {
                if Self::is_conditional_check_failed(&e) {
                    StoreError::ConditionFailed(instruction.key().to_string())
                } else {
                    backend_error("UpdateItem", e)
                }
            })?;
        Ok(())
    }
}
