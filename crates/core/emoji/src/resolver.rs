use std::sync::Arc;

use tokio::sync::broadcast;
use validator::Validate;

use ember_models::v0::{CustomEmoji, DataCreateEmoji, Emoji};
use ember_result::{ErrorType, Result};
use ember_store::{EmojiEvent, EmojiMap, EmojiStore};

use crate::config::FetchConfig;
use crate::coordinator::FetchCoordinator;
use crate::source::{AbstractEmojiSource, EmojiSource, HttpSource};

/// Synchronous-read, asynchronous-fill lookup surface for consumers
///
/// `resolve` answers from the current snapshot; a miss queues the name with
/// the fetch coordinator as a side effect. Consumers subscribe to the change
/// stream and re-read once the store publishes, rather than awaiting any
/// particular fetch.
#[derive(Clone)]
pub struct EmojiResolver {
    store: EmojiStore,
    coordinator: FetchCoordinator,
    source: EmojiSource,
}

impl EmojiResolver {
    pub fn new(store: EmojiStore, source: EmojiSource) -> Self {
        Self::from_config(FetchConfig::default(), store, source)
    }

    pub fn from_config(config: FetchConfig, store: EmojiStore, source: EmojiSource) -> Self {
        EmojiResolver {
            coordinator: FetchCoordinator::from_config(config, store.clone(), source.clone()),
            store,
            source,
        }
    }

    /// Create a resolver against the configured workspace API
    pub async fn from_settings() -> Self {
        let config = FetchConfig::from_settings().await;
        let source = EmojiSource::Http(HttpSource::from_config().await);

        Self::from_config(config, EmojiStore::new(), source)
    }

    /// Look up an emoji by name
    ///
    /// Misses queue a batched fetch as a side effect; repeated calls for the
    /// same name do not amplify network traffic.
    pub async fn resolve(&self, name: &str) -> Option<Emoji> {
        let emoji = self.store.emoji_map().await.get(name);

        if emoji.is_none() {
            self.coordinator.request_by_name(name).await;
        }

        emoji
    }

    /// Current point-in-time snapshot for bulk consumers
    pub async fn snapshot(&self) -> Arc<EmojiMap> {
        self.store.emoji_map().await
    }

    /// Subscribe to emoji state changes
    pub fn subscribe(&self) -> broadcast::Receiver<EmojiEvent> {
        self.store.subscribe()
    }

    /// Close the current batch window immediately
    pub async fn flush(&self) {
        self.coordinator.flush().await;
    }

    /// Create a custom emoji and reflect the confirmed record locally
    pub async fn create_emoji(&self, data: DataCreateEmoji) -> Result<CustomEmoji> {
        data.validate().map_err(|error| {
            create_error!(FailedValidation {
                error: error.to_string()
            })
        })?;

        let emoji = self.source.create_emoji(data).await?;
        self.store.receive_emoji(emoji.clone()).await;

        Ok(emoji)
    }

    /// Delete a custom emoji and drop it from the cache
    ///
    /// The name is not marked absent; only a fetch miss confirms absence.
    pub async fn delete_emoji(&self, id: &str) -> Result<()> {
        self.source.delete_emoji(id).await?;

        // The record may never have been cached locally
        match self.store.delete_emoji(id).await {
            Err(error) if matches!(error.error_type, ErrorType::UnknownEmoji) => Ok(()),
            result => result,
        }
    }

    /// Fetch an emoji by id, reading through the cache
    pub async fn fetch_emoji(&self, id: &str) -> Result<Emoji> {
        if let Some(emoji) = self.store.emoji_map().await.get_by_id(id) {
            return Ok(emoji);
        }

        let emoji = self.source.fetch_emoji(id).await?;
        self.store.receive_emoji(emoji.clone()).await;

        Ok(emoji.into())
    }
}
