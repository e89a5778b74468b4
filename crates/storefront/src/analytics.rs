//! Anonymous page-view tracking.
//!
//! Each browser profile gets a random visitor id, kept in local storage under
//! [`keys::VISITOR_ID`]. Page views are posted in the background and never
//! block or fail the page.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use little_oat_core::VisitorId;

use crate::storage::{KeyValueStore, keys};

#[derive(Debug, Serialize)]
struct TrackRequest<'a> {
    visitor_id: &'a str,
    page: &'a str,
}

/// Fire-and-forget page-view tracker.
#[derive(Clone)]
pub struct AnalyticsTracker {
    client: reqwest::Client,
    endpoint: String,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for AnalyticsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsTracker")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl AnalyticsTracker {
    /// Create a tracker posting to `{base_url}/api/analytics/track`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/api/analytics/track",
                base_url.as_str().trim_end_matches('/')
            ),
            storage,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The stored visitor id, generating and saving one on first use.
    ///
    /// If storage is unavailable a fresh id is returned for this call only.
    #[must_use]
    pub fn visitor_id(&self) -> VisitorId {
        match self.storage.get(keys::VISITOR_ID) {
            Ok(Some(existing)) if !existing.trim().is_empty() => return VisitorId::new(existing),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to read visitor id"),
        }

        let id = VisitorId::generate();
        if let Err(e) = self.storage.set(keys::VISITOR_ID, id.as_str()) {
            warn!(error = %e, "Failed to persist visitor id");
        }
        id
    }

    /// Record a page view in the background.
    ///
    /// The returned handle may be dropped; failures are logged at debug level
    /// and otherwise ignored.
    pub fn track_page_view(&self, page: &str) -> JoinHandle<()> {
        let visitor_id = self.visitor_id();
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let page = page.to_string();

        tokio::spawn(async move {
            let body = TrackRequest {
                visitor_id: visitor_id.as_str(),
                page: &page,
            };
            match client.post(&endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(page = %page, "Page view tracked");
                }
                Ok(response) => {
                    debug!(page = %page, status = response.status().as_u16(), "Analytics rejected page view");
                }
                Err(e) => debug!(page = %page, error = %e, "Analytics request failed"),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tracker(storage: Arc<MemoryStore>) -> AnalyticsTracker {
        AnalyticsTracker::new(
            reqwest::Client::new(),
            &Url::parse("http://127.0.0.1:9/").unwrap(),
            storage,
        )
    }

    #[test]
    fn test_endpoint() {
        let tracker = tracker(Arc::new(MemoryStore::new()));
        assert_eq!(tracker.endpoint(), "http://127.0.0.1:9/api/analytics/track");
    }

    #[test]
    fn test_visitor_id_is_created_once() {
        let storage = Arc::new(MemoryStore::new());
        let tracker = tracker(storage.clone());

        let first = tracker.visitor_id();
        let second = tracker.visitor_id();

        assert_eq!(first, second);
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.peek(keys::VISITOR_ID).as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_existing_visitor_id_is_reused() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::VISITOR_ID, "visitor-42")]));
        let tracker = tracker(storage.clone());

        assert_eq!(tracker.visitor_id().as_str(), "visitor-42");
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_post_is_swallowed() {
        let tracker = tracker(Arc::new(MemoryStore::new()));
        tracker.track_page_view("/shop").await.unwrap();
    }
}
