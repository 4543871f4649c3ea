//! Application state.

use std::sync::Arc;

use ecocollect_core::{FixedReward, RewardPolicy};
use ecocollect_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Reward policy consulted by the completion handler.
    pub reward_policy: Arc<dyn RewardPolicy>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The reward policy is the flat rate from `config.reward_points`;
    /// swap in a different `RewardPolicy` with [`AppState::with_policy`]
    /// if scoring ever stops being flat.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let policy = FixedReward::new(config.reward_points);
        tracing::info!(reward_points = policy.points(), "Reward policy configured");

        if config.service_api_key.is_none() {
            tracing::warn!("Service API key not configured - trigger endpoints will reject requests");
        }

        Self {
            store,
            config,
            reward_policy: Arc::new(policy),
        }
    }

    /// Replace the reward policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn RewardPolicy>) -> Self {
        self.reward_policy = policy;
        self
    }
}
