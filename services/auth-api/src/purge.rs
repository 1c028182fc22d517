//! Periodic refresh token registry cleanup

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::TokenServiceImpl;

/// Spawn a task that drops expired and revoked refresh tokens every
/// `interval`. The first purge runs one interval after startup.
pub fn spawn_registry_purge(tokens: Arc<TokenServiceImpl>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match tokens.purge_expired().await {
                Ok(removed) => tracing::debug!(removed, "Refresh token purge finished"),
                Err(e) => tracing::warn!(error = %e, "Refresh token purge failed"),
            }
        }
    })
}
