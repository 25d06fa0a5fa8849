use paging_common::models::PagingEntry;
use paging_common::retrieve::ArrivalsFeed;
use std::sync::Arc;
use tracing::warn;

use super::store::Store;

/// Shared handler state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    api_key: Arc<str>,
    // None when no feed credentials are configured
    pub arrivals: Option<Arc<ArrivalsFeed>>,
}

impl AppState {
    pub fn new(store: Store, api_key: &str, arrivals: Option<ArrivalsFeed>) -> Self {
        Self {
            store: Arc::new(store),
            api_key: Arc::from(api_key),
            arrivals: arrivals.map(Arc::new),
        }
    }

    pub fn api_key_matches(&self, presented: Option<&str>) -> bool {
        presented.is_some_and(|key| key == &*self.api_key)
    }

    /// Writes an audit row. A failure is logged and swallowed.
    pub async fn audit(&self, entry: &PagingEntry) {
        if let Err(e) = self.store.insert_log(entry).await {
            warn!(paging_id = entry.id, error = %e, "Failed to write paging audit log");
        }
    }
}
