//! Recent search queries.

use std::sync::Arc;

use tracing::warn;

use crate::storage::{self, KeyValueStore, keys};

/// Entries kept in the history.
pub const MAX_HISTORY: usize = 5;

/// Recent catalog searches, most recent first, stored under
/// [`keys::SEARCH_HISTORY`].
///
/// Like the cart, history is best-effort: storage failures are logged and
/// read as an empty history.
#[derive(Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistory {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored queries, most recent first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match storage::get_json::<Vec<String>>(self.store.as_ref(), keys::SEARCH_HISTORY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Search history unreadable");
                Vec::new()
            }
        }
    }

    /// Record a submitted query. Blank queries are ignored; repeating a query
    /// moves it to the front.
    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut entries = self.entries();
        entries.retain(|q| q != query);
        entries.insert(0, query.to_string());
        entries.truncate(MAX_HISTORY);

        if let Err(e) = storage::set_json(self.store.as_ref(), keys::SEARCH_HISTORY, &entries) {
            warn!(error = %e, "Failed to save search history");
        }
    }

    /// Forget every stored query.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::SEARCH_HISTORY) {
            warn!(error = %e, "Failed to clear search history");
        }
    }
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_most_recent_first_unique_capped() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()));
        for q in ["dior", "chanel", "byredo", "tom ford", "versace", "montale"] {
            history.record(q);
        }
        assert_eq!(
            history.entries(),
            vec!["montale", "versace", "tom ford", "byredo", "chanel"]
        );

        history.record(" byredo ");
        assert_eq!(
            history.entries(),
            vec!["byredo", "montale", "versace", "tom ford", "chanel"]
        );
    }

    #[test]
    fn test_blank_query_ignored() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()));
        history.record("   ");
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SEARCH_HISTORY, "{}").unwrap();
        let history = SearchHistory::new(store);
        assert!(history.entries().is_empty());

        history.record("dior");
        assert_eq!(history.entries(), vec!["dior"]);

        history.clear();
        assert!(history.entries().is_empty());
    }
}
