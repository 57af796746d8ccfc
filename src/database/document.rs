use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::manager::DatabaseError;

/// Field holding the store-assigned document id
pub const ID_FIELD: &str = "_id";

/// The named collections the marketplace stores documents in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Categories,
    Classes,
    Events,
    Payments,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Categories,
        Collection::Classes,
        Collection::Events,
        Collection::Payments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Categories => "categories",
            Collection::Classes => "classes",
            Collection::Events => "events",
            Collection::Payments => "payments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DatabaseError::NotFound(format!("Unknown collection '{}'", s)))
    }
}

/// A stored document: opaque caller JSON plus the id the store assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: Uuid, body: Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Validate a caller payload for insert or update: it must be a JSON
    /// object and must not carry the id field.
    pub fn body_from_json(value: Value) -> Result<Map<String, Value>, DatabaseError> {
        match value {
            Value::Object(map) => {
                if map.contains_key(ID_FIELD) {
                    return Err(DatabaseError::InvalidDocument(format!(
                        "System field '{}' cannot be set via API",
                        ID_FIELD
                    )));
                }
                Ok(map)
            }
            other => Err(DatabaseError::InvalidDocument(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Shallow merge: top-level fields in `changes` replace those in the body.
    pub fn merge(&mut self, changes: Map<String, Value>) {
        for (key, value) in changes {
            self.body.insert(key, value);
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// API output: the body with `_id` included.
    pub fn to_json(&self) -> Value {
        let mut map = self.body.clone();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        Value::Object(map)
    }

    pub fn to_json_array(documents: Vec<Document>) -> Value {
        Value::Array(documents.iter().map(Document::to_json).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pagination window for list queries. The default window is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Page {
    /// Clamp raw query values: negatives become 0, `limit` is capped at `max_limit`.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>, max_limit: i64) -> Self {
        let max_limit = max_limit.max(0);
        Self {
            limit: Some(limit.map_or(max_limit, |l| l.clamp(0, max_limit))),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
