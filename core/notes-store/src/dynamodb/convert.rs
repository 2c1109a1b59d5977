//! Conversion between JSON values and DynamoDB attribute values.
//!
//! JSON numbers map to `N`, strings to `S`, booleans to `BOOL`, null to
//! `NULL`, arrays to `L` and objects to `M`. On the way back, string and
//! number sets become arrays; binary attributes are not supported.

use crate::adapter::Item;
use crate::error::{StoreError, StoreResult};
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// Converts a JSON value to its DynamoDB representation.
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
    }
}

/// Converts a DynamoDB attribute value back to JSON.
pub fn from_attribute_value(value: &AttributeValue) -> StoreResult<Value> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::Ss(set) => Ok(Value::Array(
            set.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::L(items) => items
            .iter()
            .map(from_attribute_value)
            .collect::<StoreResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), from_attribute_value(v)?)))
            .collect::<StoreResult<Map<_, _>>>()
            .map(Value::Object),
        AttributeValue::B(_) | AttributeValue::Bs(_) => {
            Err(StoreError::decode("binary attributes are not supported"))
        }
        _ => Err(StoreError::decode("unrecognized attribute value type")),
    }
}

/// Converts a whole item to DynamoDB form.
pub fn to_attribute_map(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

/// Converts a whole DynamoDB item to JSON form.
pub fn from_attribute_map(item: &HashMap<String, AttributeValue>) -> StoreResult<Item> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_attribute_value(v)?)))
        .collect()
}

fn parse_number(raw: &str) -> StoreResult<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::decode(format!("invalid number `{raw}`")))
}
