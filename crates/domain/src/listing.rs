use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use ledgerdesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

const ALL_TAB: &str = "all";

/// Key of one mutually exclusive list partition, such as `active` or `trial`.
///
/// Keys are stored lower-cased so that partition values compare
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TabKey(String);

impl TabKey {
    /// Creates a validated tab key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = NonEmptyString::new(value)?;
        Ok(Self(value.as_str().to_lowercase()))
    }

    /// Returns the catch-all partition.
    #[must_use]
    pub fn all() -> Self {
        Self(ALL_TAB.to_owned())
    }

    /// Returns whether this is the catch-all partition.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == ALL_TAB
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for TabKey {
    fn default() -> Self {
        Self::all()
    }
}

impl Display for TabKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for TabKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TabKey> for String {
    fn from(value: TabKey) -> Self {
        value.0
    }
}

/// Fixed set of partitions over one classification attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSet {
    field: NonEmptyString,
    keys: Vec<TabKey>,
}

impl TabSet {
    /// Creates a tab set over `field`. The `all` partition is always included
    /// and listed first.
    pub fn new<I, S>(field: impl Into<String>, keys: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = NonEmptyString::new(field)?;
        let mut tab_keys = vec![TabKey::all()];
        for key in keys {
            let key = TabKey::new(key)?;
            if tab_keys.contains(&key) {
                continue;
            }
            tab_keys.push(key);
        }

        Ok(Self {
            field,
            keys: tab_keys,
        })
    }

    /// Returns the classification attribute path.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns every partition key, starting with `all`.
    #[must_use]
    pub fn keys(&self) -> &[TabKey] {
        &self.keys
    }

    /// Returns whether `tab` is one of the declared partitions.
    #[must_use]
    pub fn contains(&self, tab: &TabKey) -> bool {
        self.keys.contains(tab)
    }

    /// Looks up a declared partition by raw key.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&TabKey> {
        let normalized = raw.trim().to_lowercase();
        self.keys.iter().find(|key| key.as_str() == normalized)
    }

    /// Returns whether `entity` belongs to partition `tab`.
    ///
    /// Undeclared partitions match nothing.
    #[must_use]
    pub fn matches(&self, tab: &TabKey, entity: &Entity) -> bool {
        if tab.is_all() {
            return true;
        }
        if !self.contains(tab) {
            return false;
        }

        entity
            .attribute_text(self.field.as_str())
            .is_some_and(|value| value.to_lowercase() == tab.as_str())
    }
}

/// Attribute paths searched by the free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFields(Vec<String>);

impl SearchFields {
    /// Creates a validated list of searchable attribute paths.
    pub fn new<I, S>(fields: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|field| NonEmptyString::new(field).map(String::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self(fields))
    }

    /// Returns the searchable paths.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Case-insensitive substring match of `query` against any searchable
    /// field. An empty query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str, entity: &Entity) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.0.iter().any(|field| {
            entity
                .attribute_text(field)
                .is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
        })
    }
}

/// One enumerated auxiliary filter, such as ticket priority or business plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxFilterDefinition {
    field: NonEmptyString,
    values: Vec<String>,
}

impl AuxFilterDefinition {
    /// Creates a filter over `field` accepting the listed values.
    pub fn new<I, S>(field: impl Into<String>, values: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = NonEmptyString::new(field)?;
        let values = values
            .into_iter()
            .map(|value| NonEmptyString::new(value).map(|value| value.as_str().to_lowercase()))
            .collect::<AppResult<Vec<_>>>()?;
        if values.is_empty() {
            return Err(AppError::Validation(format!(
                "aux filter '{}' must declare at least one value",
                field.as_str()
            )));
        }

        Ok(Self { field, values })
    }

    /// Returns the filtered attribute path.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns the accepted values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the normalized form of `raw` if it is an accepted value.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let normalized = raw.trim().to_lowercase();
        self.values
            .iter()
            .find(|value| **value == normalized)
            .map(String::as_str)
    }
}

/// Current search, partition and auxiliary filter selections of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    query: String,
    tab: TabKey,
    aux: BTreeMap<String, String>,
}

impl FilterState {
    /// Returns the free-text query.
    #[must_use]
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Returns the active partition.
    #[must_use]
    pub fn tab(&self) -> &TabKey {
        &self.tab
    }

    /// Returns active auxiliary filters keyed by attribute path.
    #[must_use]
    pub fn aux(&self) -> &BTreeMap<String, String> {
        &self.aux
    }

    /// Replaces the free-text query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Replaces the active partition without validation.
    pub fn set_tab(&mut self, tab: TabKey) {
        self.tab = tab;
    }

    /// Sets or clears one auxiliary filter without validation.
    pub fn set_aux(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match value {
            Some(value) => {
                self.aux.insert(field, value);
            }
            None => {
                self.aux.remove(field.as_str());
            }
        }
    }
}

/// Static shape of one list console: partitions, search and aux filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDefinition {
    tabs: TabSet,
    search_fields: SearchFields,
    aux_filters: Vec<AuxFilterDefinition>,
}

impl ListDefinition {
    /// Creates a validated list definition.
    pub fn new(
        tabs: TabSet,
        search_fields: SearchFields,
        aux_filters: Vec<AuxFilterDefinition>,
    ) -> AppResult<Self> {
        for (index, filter) in aux_filters.iter().enumerate() {
            if aux_filters[..index]
                .iter()
                .any(|previous| previous.field() == filter.field())
            {
                return Err(AppError::Validation(format!(
                    "duplicate aux filter '{}'",
                    filter.field()
                )));
            }
            if filter.field() == tabs.field() {
                return Err(AppError::Validation(format!(
                    "aux filter '{}' duplicates the tab field",
                    filter.field()
                )));
            }
        }

        Ok(Self {
            tabs,
            search_fields,
            aux_filters,
        })
    }

    /// Returns the partition set.
    #[must_use]
    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    /// Returns the searchable fields.
    #[must_use]
    pub fn search_fields(&self) -> &SearchFields {
        &self.search_fields
    }

    /// Returns the declared auxiliary filters.
    #[must_use]
    pub fn aux_filters(&self) -> &[AuxFilterDefinition] {
        &self.aux_filters
    }

    /// Finds the auxiliary filter declared for `field`.
    #[must_use]
    pub fn aux_filter(&self, field: &str) -> Option<&AuxFilterDefinition> {
        self.aux_filters
            .iter()
            .find(|filter| filter.field() == field)
    }

    /// Conjunction of partition, query and every active auxiliary filter.
    #[must_use]
    pub fn matches(&self, filter: &FilterState, entity: &Entity) -> bool {
        self.tabs.matches(filter.tab(), entity)
            && self.search_fields.matches(filter.query(), entity)
            && filter.aux().iter().all(|(field, expected)| {
                entity
                    .attribute_text(field)
                    .is_some_and(|value| value.to_lowercase() == *expected)
            })
    }
}
