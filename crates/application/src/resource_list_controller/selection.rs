use std::collections::BTreeSet;

use ledgerdesk_domain::EntityId;
use tracing::debug;

use super::ResourceListController;

impl ResourceListController {
    /// Flips the selection of `id`.
    ///
    /// Returns whether `id` is selected afterwards. Ids missing from the
    /// backing collection are ignored.
    pub fn toggle_select(&self, id: &EntityId) -> bool {
        let mut state = self.state();
        if state.selection.remove(id) {
            return false;
        }

        if !state.entities.iter().any(|entity| entity.id() == id) {
            debug!(id = %id, "ignored selection of unknown row");
            return false;
        }

        state.selection.insert(id.clone());
        true
    }

    /// Selects exactly the filtered view, or clears the selection when every
    /// filtered row is already selected.
    pub fn select_all(&self) {
        let mut state = self.state();
        let visible: BTreeSet<EntityId> = self
            .visible(&state)
            .map(|entity| entity.id().clone())
            .collect();

        if visible.is_subset(&state.selection) {
            state.selection.clear();
        } else {
            state.selection = visible;
        }
    }

    /// Empties the selection.
    pub fn clear_selection(&self) {
        self.state().selection.clear();
    }

    /// Returns the selected ids in ascending order.
    #[must_use]
    pub fn selection(&self) -> Vec<EntityId> {
        self.state().selection.iter().cloned().collect()
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.state().selection.contains(id)
    }

    /// Returns the number of selected rows.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.state().selection.len()
    }
}
