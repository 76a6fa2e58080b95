use std::fmt::{Display, Formatter};

use ledgerdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of one row in a resource list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// One record managed by a list console: a business, subscription or ticket.
///
/// Attributes are an arbitrary JSON object. Classification fields such as
/// `status`, `plan` or `priority` are ordinary attributes named by the list
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    attributes: Map<String, Value>,
}

impl Entity {
    /// Creates an entity from a JSON object of attributes.
    pub fn new(id: impl Into<EntityId>, attributes: Value) -> AppResult<Self> {
        let id = id.into();
        match attributes {
            Value::Object(attributes) => Ok(Self { id, attributes }),
            Value::Null => Ok(Self {
                id,
                attributes: Map::new(),
            }),
            other => Err(AppError::Validation(format!(
                "attributes for entity '{id}' must be an object, got {other}"
            ))),
        }
    }

    /// Returns the entity identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns all attributes.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Resolves a dotted attribute path such as `owner.name`.
    #[must_use]
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.attributes.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    /// Returns the attribute at `path` rendered as text, if it is a string,
    /// number or boolean.
    #[must_use]
    pub fn attribute_text(&self, path: &str) -> Option<String> {
        match self.attribute(path)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Returns the attribute at `path` as a number.
    #[must_use]
    pub fn attribute_number(&self, path: &str) -> Option<f64> {
        self.attribute(path).and_then(Value::as_f64)
    }
}
