//! Partial-update expression builder.
//!
//! Builds a single `SET` update expression from a key and a set of
//! attribute / value pairs. Attribute names and values only ever appear in
//! the expression as placeholder tokens (`#name`, `:name`); the real names
//! and values travel in the two side maps. Every token written into the
//! expression has exactly one entry in the matching map and every map entry
//! is referenced by the expression; [`UpdateInstruction::resolve`] checks
//! both directions.
//!
//! ```
//! use notes_store::{Key, UpdateInstruction};
//! use serde_json::json;
//!
//! let instruction = UpdateInstruction::builder(Key::new("id", "a"))
//!     .set("complete", json!(true))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(instruction.update_expression(), "SET #complete = :complete");
//! assert_eq!(instruction.condition_expression(), Some("attribute_exists(#id)"));
//! ```

use crate::adapter::Key;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

const SET_KEYWORD: &str = "SET ";
const CLAUSE_SEPARATOR: &str = ", ";
const ASSIGN: &str = " = ";
const EXISTS_OPEN: &str = "attribute_exists(";

/// Reasons an update instruction can't be built or resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUpdate {
    #[error("update touches no attributes")]
    Empty,

    #[error("key attribute `{0}` cannot be updated")]
    KeyAttribute(String),

    #[error("attribute `{0}` is assigned more than once")]
    DuplicateAttribute(String),

    #[error("attribute names must be non-empty")]
    EmptyAttributeName,

    #[error("malformed expression: {0}")]
    Malformed(String),

    #[error("placeholder `{0}` has no mapping")]
    UnresolvedToken(String),

    #[error("placeholder `{0}` is mapped but never used")]
    UnusedToken(String),
}

/// A store-native partial update for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInstruction {
    key: Key,
    update_expression: String,
    condition_expression: Option<String>,
    names: BTreeMap<String, String>,
    values: BTreeMap<String, Value>,
}

/// The attribute assignments an instruction performs, with tokens resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUpdate<'a> {
    /// Attribute name / new value, in expression order.
    pub assignments: Vec<(&'a str, &'a Value)>,
    /// Attribute that must already exist on the item, if any.
    pub requires_existing: Option<&'a str>,
}

impl UpdateInstruction {
    pub fn builder(key: Key) -> UpdateBuilder {
        UpdateBuilder {
            key,
            fields: Vec::new(),
            require_existing: true,
        }
    }

    /// Shorthand for a builder fed from an iterator of pairs.
    pub fn for_fields<I, N>(key: Key, fields: I) -> Result<Self, InvalidUpdate>
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<String>,
    {
        fields
            .into_iter()
            .fold(Self::builder(key), |b, (name, value)| b.set(name, value))
            .build()
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn update_expression(&self) -> &str {
        &self.update_expression
    }

    pub fn condition_expression(&self) -> Option<&str> {
        self.condition_expression.as_deref()
    }

    /// Placeholder → attribute name.
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Placeholder → new value.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Parses the expressions back through the side maps.
    ///
    /// Fails if any token in an expression is unmapped or if any mapped
    /// token is never referenced.
    pub fn resolve(&self) -> Result<ResolvedUpdate<'_>, InvalidUpdate> {
        let mut used_names = BTreeSet::new();
        let mut used_values = BTreeSet::new();

        let body = self
            .update_expression
            .strip_prefix(SET_KEYWORD)
            .ok_or_else(|| InvalidUpdate::Malformed(self.update_expression.clone()))?;

        let mut assignments = Vec::new();
        for clause in body.split(CLAUSE_SEPARATOR) {
            let (name_token, value_token) = clause
                .split_once(ASSIGN)
                .ok_or_else(|| InvalidUpdate::Malformed(clause.to_string()))?;
            let name = self
                .names
                .get(name_token)
                .ok_or_else(|| InvalidUpdate::UnresolvedToken(name_token.to_string()))?;
            let value = self
                .values
                .get(value_token)
                .ok_or_else(|| InvalidUpdate::UnresolvedToken(value_token.to_string()))?;
            used_names.insert(name_token);
            used_values.insert(value_token);
            assignments.push((name.as_str(), value));
        }

        let requires_existing = match &self.condition_expression {
            None => None,
            Some(condition) => {
                let token = condition
                    .strip_prefix(EXISTS_OPEN)
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| InvalidUpdate::Malformed(condition.clone()))?;
                let name = self
                    .names
                    .get(token)
                    .ok_or_else(|| InvalidUpdate::UnresolvedToken(token.to_string()))?;
                used_names.insert(token);
                Some(name.as_str())
            }
        };

        if let Some(unused) = self.names.keys().find(|t| !used_names.contains(t.as_str())) {
            return Err(InvalidUpdate::UnusedToken(unused.clone()));
        }
        if let Some(unused) = self.values.keys().find(|t| !used_values.contains(t.as_str())) {
            return Err(InvalidUpdate::UnusedToken(unused.clone()));
        }

        Ok(ResolvedUpdate {
            assignments,
            requires_existing,
        })
    }
}

/// Collects assignments for one key and emits an [`UpdateInstruction`].
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    key: Key,
    fields: Vec<(String, Value)>,
    require_existing: bool,
}

impl UpdateBuilder {
    /// Assigns `value` to `attribute`. `Value::Null` stores a null, it does
    /// not remove the attribute.
    pub fn set(mut self, attribute: impl Into<String>, value: Value) -> Self {
        self.fields.push((attribute.into(), value));
        self
    }

    /// Lets the update create the item when the key is absent.
    pub fn allow_upsert(mut self) -> Self {
        self.require_existing = false;
        self
    }

    pub fn build(self) -> Result<UpdateInstruction, InvalidUpdate> {
        if self.fields.is_empty() {
            return Err(InvalidUpdate::Empty);
        }

        let mut seen = BTreeSet::new();
        for (name, _) in &self.fields {
            if name.is_empty() {
                return Err(InvalidUpdate::EmptyAttributeName);
            }
            if name == self.key.attribute() {
                return Err(InvalidUpdate::KeyAttribute(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(InvalidUpdate::DuplicateAttribute(name.clone()));
            }
        }

        let mut stems = BTreeSet::new();
        let mut names = BTreeMap::new();
        let mut values = BTreeMap::new();

        // The key's token is reserved first so no field can take it.
        let condition_expression = if self.require_existing {
            let stem = allocate_stem(self.key.attribute(), &mut stems);
            let token = format!("#{stem}");
            names.insert(token.clone(), self.key.attribute().to_string());
            Some(format!("{EXISTS_OPEN}{token})"))
        } else {
            None
        };

        let mut clauses = Vec::with_capacity(self.fields.len());
        for (name, value) in self.fields {
            let stem = allocate_stem(&name, &mut stems);
            let name_token = format!("#{stem}");
            let value_token = format!(":{stem}");
            clauses.push(format!("{name_token}{ASSIGN}{value_token}"));
            names.insert(name_token, name);
            values.insert(value_token, value);
        }

        Ok(UpdateInstruction {
            key: self.key,
            update_expression: format!("{SET_KEYWORD}{}", clauses.join(CLAUSE_SEPARATOR)),
            condition_expression,
            names,
            values,
        })
    }
}

/// Derives a placeholder stem from an attribute name.
///
/// Placeholders may only hold ASCII alphanumerics, so everything else is
/// dropped; a stem already taken in this instruction gets a numeric suffix.
fn allocate_stem(attribute: &str, taken: &mut BTreeSet<String>) -> String {
    let base: String = attribute
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let base = if base.is_empty() { "attr".to_string() } else { base };

    let mut stem = base.clone();
    let mut suffix = 1usize;
    while taken.contains(&stem) {
        stem = format!("{base}{suffix}");
        suffix += 1;
    }
    taken.insert(stem.clone());
    stem
}
