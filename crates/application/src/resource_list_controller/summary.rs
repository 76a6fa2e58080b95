use ledgerdesk_domain::TabKey;
use serde::Serialize;

use super::ResourceListController;

/// Headline counts shown above a list: totals, per-tab counts and selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    /// Rows in the backing collection.
    pub total: usize,
    /// Rows in the filtered view.
    pub filtered: usize,
    /// Selected rows.
    pub selected: usize,
    /// Rows per partition, ignoring query and auxiliary filters.
    pub per_tab: Vec<(TabKey, usize)>,
}

impl ResourceListController {
    /// Computes the headline counts for the current state.
    #[must_use]
    pub fn summary(&self) -> ListSummary {
        let state = self.state();
        let tabs = self.config.definition().tabs();
        let per_tab = tabs
            .keys()
            .iter()
            .map(|tab| {
                let count = state
                    .entities
                    .iter()
                    .filter(|entity| tabs.matches(tab, entity))
                    .count();
                (tab.clone(), count)
            })
            .collect();

        ListSummary {
            total: state.entities.len(),
            filtered: self.visible(&state).count(),
            selected: state.selection.len(),
            per_tab,
        }
    }

    /// Sums a numeric attribute over the filtered view, such as monthly
    /// revenue. Rows without a numeric value are skipped.
    #[must_use]
    pub fn numeric_total(&self, field: &str) -> f64 {
        let state = self.state();
        self.visible(&state)
            .filter_map(|entity| entity.attribute_number(field))
            .sum()
    }
}
