//! Search controller: owns the [`SearchState`] and runs lookups.
//!
//! A submit validates the username and spawns the lookup as a background
//! task. The task writes the shared state exactly twice: once when it enters
//! the loading state and once with its terminal result. Each lookup is tagged
//! with a generation number under the same lock that records its query; a
//! lookup whose generation is no longer current neither enters loading nor
//! publishes, so a superseded lookup can never overwrite a newer one even if
//! the tasks start out of order.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::analysis::analyze_profile;
use crate::error::AnalyzeError;
use crate::model::{Profile, SearchState};
use crate::provider::ProfileProvider;

/// Shared handle to the search state and the provider used for lookups.
#[derive(Clone)]
pub struct SearchController {
    state: Arc<RwLock<SearchState>>,
    provider: Arc<dyn ProfileProvider>,
}

impl SearchController {
    /// Create a controller with an idle state.
    pub fn new(provider: Arc<dyn ProfileProvider>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SearchState::default())),
            provider,
        }
    }

    /// Read access to the current state.
    pub async fn state(&self) -> RwLockReadGuard<'_, SearchState> {
        self.state.read().await
    }

    /// Owned copy of the current state.
    pub async fn snapshot(&self) -> SearchState {
        self.state.read().await.clone()
    }

    /// Submit a username for analysis.
    ///
    /// Blank input is rejected immediately: the error message is set, any
    /// displayed profile is left alone and no lookup starts. Otherwise the
    /// trimmed username becomes the query and a lookup is spawned; the
    /// returned handle completes once its result has been published (or
    /// discarded as stale).
    pub async fn submit(&self, raw_username: &str) -> Result<JoinHandle<()>, AnalyzeError> {
        let username = raw_username.trim();

        if username.is_empty() {
            let err = AnalyzeError::EmptyInput;
            self.state.write().await.error_message = Some(err.user_message().to_string());
            info!("Rejected empty username");
            return Err(err);
        }

        let generation = self.record_query(username).await;
        info!(username, generation, "Search submitted");

        let controller = self.clone();
        let username = username.to_string();
        Ok(tokio::spawn(async move {
            controller.fetch_profile(username, generation).await;
        }))
    }

    /// Set the query and claim the next generation in one write.
    async fn record_query(&self, username: &str) -> u64 {
        let mut state = self.state.write().await;
        state.query = username.to_string();
        state.generation += 1;
        state.generation
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self, username: String, generation: u64) {
        if !self.enter_loading(generation).await {
            debug!(username, generation, "Skipping superseded lookup");
            return;
        }
        let result = analyze_profile(self.provider.as_ref(), &username).await;
        self.publish(generation, &username, result).await;
    }

    /// Clear the previous result and mark the lookup as in flight.
    ///
    /// Returns `false` without touching the state if a newer lookup has
    /// already been submitted.
    async fn enter_loading(&self, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.is_loading = true;
        state.error_message = None;
        state.profile = None;
        true
    }

    /// Apply a terminal result if it belongs to the newest lookup.
    async fn publish(&self, generation: u64, username: &str, result: Result<Profile, AnalyzeError>) {
        match &result {
            Ok(profile) => info!(
                username,
                posts_sampled = profile.recent_posts.len(),
                engagement_rate = profile.engagement_rate_percent,
                "Profile fetched"
            ),
            Err(AnalyzeError::ProviderFailure(e)) => {
                error!(username, error = ?e, "Error fetching profile");
            }
            Err(e) => info!(username, reason = %e, "Profile not analyzed"),
        }

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                username,
                generation,
                current = state.generation,
                "Discarding result of superseded lookup"
            );
            return;
        }

        match result {
            Ok(profile) => {
                state.profile = Some(profile);
                state.error_message = None;
            }
            Err(e) => {
                state.error_message = Some(e.user_message().to_string());
            }
        }
        state.is_loading = false;
    }
}
