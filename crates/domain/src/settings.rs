use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use ledgerdesk_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Leaf value of a settings tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Explicitly unset value.
    Null,
    /// Boolean switch.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Fractional number such as a percentage.
    Decimal(f64),
    /// Free text.
    Text(String),
}

impl Scalar {
    /// Returns the boolean value, if this is a switch.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the value as a number, if numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Integer(value) => Value::Number(Number::from(*value)),
            Self::Decimal(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Text(value) => Value::String(value.clone()),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(value) => Some(Self::Bool(*value)),
            Value::Number(number) => Some(
                number
                    .as_i64()
                    .map_or_else(|| Self::Decimal(number.as_f64().unwrap_or(0.0)), Self::Integer),
            ),
            Value::String(value) => Some(Self::Text(value.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Node of a settings tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsValue {
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered list of leaves, such as reminder day offsets.
    Array(Arc<Vec<Scalar>>),
    /// Nested section.
    Tree(SettingsTree),
}

impl SettingsValue {
    /// Returns whether both values are the same node.
    ///
    /// Arrays and trees compare by pointer identity, scalars by value.
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Tree(left), Self::Tree(right)) => left.ptr_eq(right),
            (Self::Array(left), Self::Array(right)) => Arc::ptr_eq(left, right),
            (Self::Scalar(left), Self::Scalar(right)) => left == right,
            _ => false,
        }
    }

    /// Returns the scalar, if this node is a leaf.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested section, if this node is a tree.
    #[must_use]
    pub fn as_tree(&self) -> Option<&SettingsTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the array elements, if this node is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Scalar]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Converts the node into JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(value) => value.to_json(),
            Self::Array(values) => Value::Array(values.iter().map(Scalar::to_json).collect()),
            Self::Tree(tree) => tree.to_json(),
        }
    }

    /// Builds a node from JSON. Arrays may only contain scalars.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        match value {
            Value::Object(_) => SettingsTree::from_json(value).map(Self::Tree),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    Scalar::from_json(item).ok_or_else(|| {
                        AppError::Validation(
                            "settings arrays may only contain scalar values".to_owned(),
                        )
                    })
                })
                .collect::<AppResult<Vec<_>>>()
                .map(|values| Self::Array(Arc::new(values))),
            scalar => Scalar::from_json(scalar).map(Self::Scalar).ok_or_else(|| {
                AppError::Internal("unsupported JSON value in settings".to_owned())
            }),
        }
    }
}

impl From<Scalar> for SettingsValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<bool> for SettingsValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for SettingsValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<f64> for SettingsValue {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Decimal(value))
    }
}

impl From<&str> for SettingsValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Text(value.to_owned()))
    }
}

impl From<String> for SettingsValue {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Text(value))
    }
}

impl From<Vec<Scalar>> for SettingsValue {
    fn from(values: Vec<Scalar>) -> Self {
        Self::Array(Arc::new(values))
    }
}

impl From<SettingsTree> for SettingsValue {
    fn from(tree: SettingsTree) -> Self {
        Self::Tree(tree)
    }
}

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Named child of a section.
    Key(String),
    /// Position inside an array.
    Index(usize),
}

/// Location of a node inside a settings tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<PathSegment>);

impl KeyPath {
    /// Builds a path from plain section keys.
    pub fn from_keys<I, S>(keys: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = keys
            .into_iter()
            .map(|key| {
                let key = key.into();
                if key.trim().is_empty() {
                    return Err(AppError::Validation(
                        "settings path keys must not be empty".to_owned(),
                    ));
                }
                Ok(PathSegment::Key(key))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::from_segments(segments)
    }

    /// Builds a path from explicit segments. The first segment must be a key.
    pub fn from_segments(segments: Vec<PathSegment>) -> AppResult<Self> {
        match segments.first() {
            Some(PathSegment::Key(_)) => Ok(Self(segments)),
            Some(PathSegment::Index(_)) => Err(AppError::Validation(
                "settings path must start with a key".to_owned(),
            )),
            None => Err(AppError::Validation(
                "settings path must not be empty".to_owned(),
            )),
        }
    }

    /// Builds the two-level path `section.key`.
    #[must_use]
    pub fn section_key(section: &str, key: &str) -> Self {
        Self(vec![
            PathSegment::Key(section.to_owned()),
            PathSegment::Key(key.to_owned()),
        ])
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl FromStr for KeyPath {
    type Err = AppError;

    /// Parses `section.key` and `section.list[2]` notation.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for part in value.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(position) => part.split_at(position),
                None => (part, ""),
            };
            if key.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "invalid settings path '{value}'"
                )));
            }
            segments.push(PathSegment::Key(key.to_owned()));

            while !rest.is_empty() {
                let Some(close) = rest.find(']') else {
                    return Err(AppError::Validation(format!(
                        "unterminated index in settings path '{value}'"
                    )));
                };
                let index = rest[1..close].parse::<usize>().map_err(|error| {
                    AppError::Validation(format!("invalid index in settings path '{value}': {error}"))
                })?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(AppError::Validation(format!(
                        "invalid settings path '{value}'"
                    )));
                }
            }
        }

        Self::from_segments(segments)
    }
}

impl Display for KeyPath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(formatter, "{key}")?,
                PathSegment::Key(key) => write!(formatter, ".{key}")?,
                PathSegment::Index(index) => write!(formatter, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Persistent nested settings map.
///
/// Clones are cheap and updates rebuild only the nodes along the updated
/// path, so untouched sections keep their identity across edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsTree(Arc<BTreeMap<String, SettingsValue>>);

impl SettingsTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from a JSON object.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        let Value::Object(object) = value else {
            return Err(AppError::Validation(
                "settings tree must be a JSON object".to_owned(),
            ));
        };

        let entries = object
            .iter()
            .map(|(key, value)| SettingsValue::from_json(value).map(|value| (key.clone(), value)))
            .collect::<AppResult<BTreeMap<_, _>>>()?;

        Ok(Self(Arc::new(entries)))
    }

    /// Converts the tree into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect::<Map<_, _>>(),
        )
    }

    /// Returns whether both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the tree has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the node at `path`. Array elements are returned as scalars.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<SettingsValue> {
        let mut current = SettingsValue::Tree(self.clone());
        for segment in path.segments() {
            current = match (segment, &current) {
                (PathSegment::Key(key), SettingsValue::Tree(tree)) => tree.0.get(key)?.clone(),
                (PathSegment::Index(index), SettingsValue::Array(values)) => {
                    SettingsValue::Scalar(values.get(*index)?.clone())
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Reads the leaf at `path`.
    #[must_use]
    pub fn scalar(&self, path: &KeyPath) -> Option<Scalar> {
        match self.get(path)? {
            SettingsValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a new tree with `value` stored at `path`.
    ///
    /// Missing sections along the path are created. Every subtree that is
    /// not on the path is shared with `self`.
    pub fn with_value(&self, path: &KeyPath, value: SettingsValue) -> AppResult<Self> {
        set_in_tree(self, path.segments(), value, path)
    }
}

fn set_in_tree(
    tree: &SettingsTree,
    segments: &[PathSegment],
    value: SettingsValue,
    full_path: &KeyPath,
) -> AppResult<SettingsTree> {
    let Some((PathSegment::Key(key), rest)) = segments.split_first() else {
        return Err(AppError::Validation(format!(
            "settings path '{full_path}' indexes into a section"
        )));
    };

    let replacement = match rest.first() {
        None => value,
        Some(PathSegment::Key(_)) => {
            let child = match tree.0.get(key) {
                Some(SettingsValue::Tree(child)) => child.clone(),
                None => SettingsTree::new(),
                Some(_) => {
                    return Err(AppError::Validation(format!(
                        "settings path '{full_path}' traverses through leaf '{key}'"
                    )));
                }
            };
            SettingsValue::Tree(set_in_tree(&child, rest, value, full_path)?)
        }
        Some(PathSegment::Index(index)) => {
            let Some(SettingsValue::Array(values)) = tree.0.get(key) else {
                return Err(AppError::Validation(format!(
                    "settings path '{full_path}' indexes into non-array '{key}'"
                )));
            };
            if rest.len() > 1 {
                return Err(AppError::Validation(format!(
                    "settings path '{full_path}' descends below an array element"
                )));
            }
            let SettingsValue::Scalar(element) = value else {
                return Err(AppError::Validation(format!(
                    "array element at '{full_path}' must be a scalar"
                )));
            };
            if *index >= values.len() {
                return Err(AppError::Validation(format!(
                    "index {index} is out of range for '{key}' with {} elements",
                    values.len()
                )));
            }

            let mut updated = values.as_ref().clone();
            updated[*index] = element;
            SettingsValue::Array(Arc::new(updated))
        }
    };

    let mut entries = tree.0.as_ref().clone();
    entries.insert(key.clone(), replacement);
    Ok(SettingsTree(Arc::new(entries)))
}

impl Serialize for SettingsTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SettingsTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
