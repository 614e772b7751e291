use crate::config::reaper::ReaperConfig;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

/// Deletes accounts whose last activity is older than the configured
/// threshold. Runs as a background task on an interval, independent of
/// request handling; owned data goes with each account via the schema's
/// cascades.
pub struct Reaper {
    user_repository: Arc<dyn UserRepository>,
    config: ReaperConfig,
}

impl Reaper {
    pub fn new(user_repository: Arc<dyn UserRepository>, config: ReaperConfig) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// One pass: purge everyone inactive for longer than the threshold.
    /// Returns the number of accounts removed.
    pub async fn sweep(&self) -> Result<u64, RepositoryError> {
        let cutoff = (chrono::Utc::now() - chrono::Duration::days(self.config.max_idle_days))
            .timestamp();
        let purged = self.user_repository.delete_inactive_before(cutoff).await?;

        if purged > 0 {
            tracing::info!(purged, "removed inactive accounts");
        }

        Ok(purged)
    }

    /// Sweep loop; the first tick fires immediately, then every interval.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep().await {
                tracing::warn!("inactive account sweep failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;

    #[tokio::test]
    async fn sweep_reports_the_purge_count() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete_inactive_before()
            .times(1)
            .returning(|_| Box::pin(async { Ok(3) }));

        let reaper = Reaper::new(Arc::new(mock_repo), ReaperConfig::default());

        assert_eq!(reaper.sweep().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn sweep_cutoff_is_in_the_past() {
        let mut mock_repo = MockUserRepository::new();
        let now = chrono::Utc::now().timestamp();
        mock_repo
            .expect_delete_inactive_before()
            .withf(move |cutoff| {
                let thirty_days = 30 * 24 * 60 * 60;
                (now - cutoff - thirty_days).abs() < 5
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(0) }));

        let reaper = Reaper::new(Arc::new(mock_repo), ReaperConfig::default());
        reaper.sweep().await.unwrap();
    }
}
