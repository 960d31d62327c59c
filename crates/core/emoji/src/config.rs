use std::time::Duration;

#[derive(Clone, PartialEq, Eq, Debug)]
/// Config values for [`FetchCoordinator`](crate::FetchCoordinator).
pub struct FetchConfig {
    /// How long a batch window stays open before it flushes
    pub batch_window: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_window: Duration::from_millis(20),
        }
    }
}

impl FetchConfig {
    /// Read values from the global configuration
    pub async fn from_settings() -> Self {
        let config = ember_config::config().await;

        Self {
            batch_window: Duration::from_millis(config.emoji.batch_window_ms),
        }
    }
}
