use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ledgerdesk_core::{AppError, AppResult, NonEmptyString};
use ledgerdesk_domain::{Entity, EntityId, FilterState, ListDefinition, TabKey};
use tracing::debug;

use crate::console_ports::{ActionExecutor, NotificationSink};

mod dispatch;
mod selection;
mod summary;


pub use dispatch::{ActionResult, ActionSkipReason};
pub use summary::ListSummary;

/// Singular and plural nouns used in notifications, e.g. business/businesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLabel {
    singular: NonEmptyString,
    plural: NonEmptyString,
}

impl ResourceLabel {
    /// Creates a validated resource label.
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            singular: NonEmptyString::new(singular)?,
            plural: NonEmptyString::new(plural)?,
        })
    }

    /// Renders `count` with the matching noun, e.g. `3 businesses`.
    #[must_use]
    pub fn count(&self, count: usize) -> String {
        if count == 1 {
            format!("1 {}", self.singular)
        } else {
            format!("{count} {}", self.plural)
        }
    }
}

/// Static configuration of one list console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListConfig {
    label: ResourceLabel,
    definition: ListDefinition,
}

impl ResourceListConfig {
    /// Creates a list configuration.
    #[must_use]
    pub fn new(label: ResourceLabel, definition: ListDefinition) -> Self {
        Self { label, definition }
    }

    /// Returns the resource label.
    #[must_use]
    pub fn label(&self) -> &ResourceLabel {
        &self.label
    }

    /// Returns the list definition.
    #[must_use]
    pub fn definition(&self) -> &ListDefinition {
        &self.definition
    }
}

#[derive(Debug, Default)]
struct ResourceListState {
    entities: Vec<Entity>,
    filter: FilterState,
    selection: BTreeSet<EntityId>,
    action_pending: bool,
}

/// Filtered, searchable and selectable view over one entity collection.
///
/// All methods take `&self`; state lives behind a mutex that is never held
/// across an `.await`, so calls are applied in the order they are made.
pub struct ResourceListController {
    config: ResourceListConfig,
    executor: Arc<dyn ActionExecutor>,
    notifications: Arc<dyn NotificationSink>,
    state: Mutex<ResourceListState>,
}

impl ResourceListController {
    /// Creates an empty list controller.
    #[must_use]
    pub fn new(
        config: ResourceListConfig,
        executor: Arc<dyn ActionExecutor>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            executor,
            notifications,
            state: Mutex::new(ResourceListState::default()),
        }
    }

    /// Returns the list configuration.
    #[must_use]
    pub fn config(&self) -> &ResourceListConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, ResourceListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the backing collection.
    ///
    /// Duplicate ids collapse to the last occurrence, kept at the position of
    /// the first. Selected ids that no longer exist are dropped.
    pub fn set_entities(&self, entities: Vec<Entity>) {
        let mut positions: HashMap<EntityId, usize> = HashMap::with_capacity(entities.len());
        let mut collected: Vec<Entity> = Vec::with_capacity(entities.len());
        for entity in entities {
            match positions.get(entity.id()) {
                Some(position) => collected[*position] = entity,
                None => {
                    positions.insert(entity.id().clone(), collected.len());
                    collected.push(entity);
                }
            }
        }

        let mut state = self.state();
        let before = state.selection.len();
        state
            .selection
            .retain(|selected| positions.contains_key(selected));
        if state.selection.len() != before {
            debug!(
                pruned = before - state.selection.len(),
                "dropped selected ids missing from refreshed collection"
            );
        }
        state.entities = collected;
    }

    /// Replaces the free-text query.
    pub fn set_query(&self, text: impl Into<String>) {
        self.state().filter.set_query(text);
    }

    /// Switches to partition `tab`. Undeclared partitions are ignored and
    /// `false` is returned.
    pub fn set_tab(&self, tab: &str) -> bool {
        let Some(key) = self.config.definition().tabs().resolve(tab).cloned() else {
            debug!(tab, "ignored unknown tab");
            return false;
        };

        self.state().filter.set_tab(key);
        true
    }

    /// Sets or clears one auxiliary filter. `None` or `all` clears it.
    ///
    /// Unknown fields or values are ignored and `false` is returned.
    pub fn set_aux_filter(&self, field: &str, value: Option<&str>) -> bool {
        let Some(definition) = self.config.definition().aux_filter(field) else {
            debug!(field, "ignored unknown aux filter");
            return false;
        };

        let resolved = match value.map(str::trim) {
            None => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => match definition.resolve(raw) {
                Some(resolved) => Some(resolved.to_owned()),
                None => {
                    debug!(field, value = raw, "ignored unknown aux filter value");
                    return false;
                }
            },
        };

        self.state()
            .filter
            .set_aux(definition.field().to_owned(), resolved);
        true
    }

    /// Returns a copy of the current filter selections.
    #[must_use]
    pub fn filter(&self) -> FilterState {
        self.state().filter.clone()
    }

    /// Returns the active partition.
    #[must_use]
    pub fn tab(&self) -> TabKey {
        self.state().filter.tab().clone()
    }

    /// Returns a copy of the whole backing collection.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.state().entities.clone()
    }

    /// Looks up one entity of the backing collection.
    pub fn entity(&self, id: &EntityId) -> AppResult<Entity> {
        self.state()
            .entities
            .iter()
            .find(|entity| entity.id() == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("entity '{id}' does not exist")))
    }

    /// Entities matching the active partition, query and auxiliary filters,
    /// in collection order. Recomputed on every call.
    #[must_use]
    pub fn filtered_view(&self) -> Vec<Entity> {
        let state = self.state();
        self.visible(&state).cloned().collect()
    }

    fn visible<'a>(&'a self, state: &'a ResourceListState) -> impl Iterator<Item = &'a Entity> {
        let definition = self.config.definition();
        state
            .entities
            .iter()
            .filter(move |entity| definition.matches(&state.filter, entity))
    }
}
