use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use tokio::sync::Mutex;

use ember_store::EmojiStore;

use crate::config::FetchConfig;
use crate::source::{AbstractEmojiSource, EmojiSource};

/// Deduplicates and batches outstanding lookups-by-name into remote calls
///
/// Names requested while a batch window is open join that window; a name
/// already awaiting a response is never requested twice. Many misses within
/// one window become a single remote call. Completion is observed through
/// the store's change stream, not a return value.
#[derive(Clone)]
pub struct FetchCoordinator {
    config: Arc<FetchConfig>,
    store: EmojiStore,
    source: EmojiSource,
    /// Names awaiting a remote response
    pending: Arc<Mutex<HashSet<String>>>,
    /// Names accumulated for the next flush
    batch: Arc<Mutex<IndexSet<String>>>,
}

impl FetchCoordinator {
    pub fn new(store: EmojiStore, source: EmojiSource) -> Self {
        Self::from_config(FetchConfig::default(), store, source)
    }

    pub fn from_config(config: FetchConfig, store: EmojiStore, source: EmojiSource) -> Self {
        FetchCoordinator {
            config: Arc::new(config),
            store,
            source,
            pending: Arc::new(Mutex::new(HashSet::new())),
            batch: Arc::new(Mutex::new(IndexSet::new())),
        }
    }

    /// Queue a name for resolution
    ///
    /// No-op when the name already resolves, is confirmed absent, or is
    /// already awaiting a response. Fire and forget: consumers observe the
    /// outcome through the store's change stream.
    pub async fn request_by_name(&self, name: &str) {
        if self.store.emoji_map().await.has(name) || self.store.is_non_existent(name).await {
            return;
        }

        {
            let mut pending = self.pending.lock().await;
            if !pending.insert(name.to_string()) {
                // Already in flight or waiting for the next flush
                return;
            }
        }

        let mut batch = self.batch.lock().await;
        let opened_window = batch.is_empty();
        batch.insert(name.to_string());
        drop(batch);

        // The first name of a window schedules its flush
        if opened_window {
            let coordinator = self.clone();
            let window = self.config.batch_window;

            tokio::spawn(async move {
                tokio::time::sleep(window).await;
                coordinator.flush().await;
            });
        }
    }

    /// Close the current batch window and resolve it with one remote call
    ///
    /// All names queued before this point are part of the call; names
    /// queued afterwards open a new window. Flushing an empty window is a
    /// no-op.
    pub async fn flush(&self) {
        let names: Vec<String> = {
            let mut batch = self.batch.lock().await;
            batch.drain(..).collect()
        };

        if names.is_empty() {
            return;
        }

        debug!("Resolving a batch of {} emoji name(s).", names.len());

        match self.source.fetch_emojis_by_names(&names).await {
            Ok(response) => {
                let requested: HashSet<&String> = names.iter().collect();

                // Drop records for names nobody asked about
                let (found, unsolicited): (Vec<_>, Vec<_>) = response
                    .found
                    .into_iter()
                    .partition(|emoji| requested.contains(&emoji.name));

                for emoji in unsolicited {
                    warn!(
                        "Dropping record for \"{}\", it was not part of the batch.",
                        emoji.name
                    );
                }

                let missing: Vec<String> = response
                    .not_found
                    .into_iter()
                    .filter(|name| requested.contains(name))
                    .collect();

                self.store.receive_fetch_result(found, missing).await;
            }
            Err(error) => {
                // Failure is not evidence of non-existence; nothing is
                // marked absent and a later lookup retries these names
                warn!("Failed to resolve emoji batch: {error:?}");
            }
        }

        // Whatever the outcome, the batch is no longer in flight
        let mut pending = self.pending.lock().await;
        for name in &names {
            pending.remove(name);
        }
    }

    /// Number of names currently awaiting a remote response
    pub async fn current_pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ember_models::v0::CustomEmoji;
    use ember_store::EmojiStore;

    use crate::source::{EmojiSource, ReferenceSource};
    use crate::{FetchConfig, FetchCoordinator};

    fn custom(name: &str) -> CustomEmoji {
        CustomEmoji {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            creator_id: ulid::Ulid::new().to_string(),
            image_url: format!("https://cdn.example.com/{name}.png"),
            animated: false,
        }
    }

    fn setup() -> (EmojiStore, ReferenceSource, FetchCoordinator) {
        let store = EmojiStore::new();
        let reference = ReferenceSource::default();
        let coordinator =
            FetchCoordinator::new(store.clone(), EmojiSource::Reference(reference.clone()));

        (store, reference, coordinator)
    }

    #[tokio::test]
    async fn batches_many_misses_into_one_call() {
        let (store, reference, coordinator) = setup();
        reference.seed(custom("blob_a")).await;
        reference.seed(custom("blob_b")).await;

        coordinator.request_by_name("blob_a").await;
        coordinator.request_by_name("blob_b").await;
        coordinator.request_by_name("blob_a").await;
        coordinator.flush().await;

        assert_eq!(
            reference.request_log().await,
            vec![vec!["blob_a".to_string(), "blob_b".to_string()]]
        );

        let map = store.emoji_map().await;
        assert!(map.has("blob_a"));
        assert!(map.has("blob_b"));
    }

    #[tokio::test]
    async fn resolved_names_are_never_requested() {
        let (store, reference, coordinator) = setup();
        store.receive_emoji(custom("blob_known")).await;

        coordinator.request_by_name("apple").await;
        coordinator.request_by_name("blob_known").await;
        coordinator.flush().await;

        assert_eq!(coordinator.current_pending_count().await, 0);
        assert!(reference.request_log().await.is_empty());
    }

    #[tokio::test]
    async fn flushing_an_empty_window_is_a_noop() {
        let (_, reference, coordinator) = setup();

        coordinator.flush().await;

        assert!(reference.request_log().await.is_empty());
    }

    #[tokio::test]
    async fn confirmed_absence_prevents_refetching() {
        let (store, reference, coordinator) = setup();

        coordinator.request_by_name("blob_ghost").await;
        coordinator.flush().await;

        assert!(store.is_non_existent("blob_ghost").await);

        coordinator.request_by_name("blob_ghost").await;
        coordinator.flush().await;

        assert_eq!(reference.request_log().await.len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_leaves_names_retryable() {
        let (store, reference, coordinator) = setup();
        reference.seed(custom("blob_flaky")).await;
        reference.set_offline(true).await;

        coordinator.request_by_name("blob_flaky").await;
        coordinator.flush().await;

        // Failure is not absence, and the name is free to be retried
        assert!(!store.is_non_existent("blob_flaky").await);
        assert_eq!(coordinator.current_pending_count().await, 0);

        reference.set_offline(false).await;
        coordinator.request_by_name("blob_flaky").await;
        coordinator.flush().await;

        assert_eq!(reference.request_log().await.len(), 2);
        assert!(store.emoji_map().await.has("blob_flaky"));
    }

    #[tokio::test]
    async fn unsolicited_records_are_dropped() {
        let (store, reference, coordinator) = setup();
        reference.seed(custom("blob_real")).await;
        reference
            .unsolicited
            .lock()
            .await
            .push(custom("blob_extra"));

        coordinator.request_by_name("blob_real").await;
        coordinator.flush().await;

        let map = store.emoji_map().await;
        assert!(map.has("blob_real"));
        assert!(!map.has("blob_extra"));
    }

    #[tokio::test]
    async fn requests_after_a_flush_open_a_new_batch() {
        let (_, reference, coordinator) = setup();
        reference.seed(custom("blob_a")).await;
        reference.seed(custom("blob_b")).await;

        coordinator.request_by_name("blob_a").await;
        coordinator.flush().await;
        coordinator.request_by_name("blob_b").await;
        coordinator.flush().await;

        assert_eq!(
            reference.request_log().await,
            vec![vec!["blob_a".to_string()], vec!["blob_b".to_string()]]
        );
    }

    #[tokio::test]
    async fn scheduled_flush_resolves_without_an_explicit_trigger() {
        let store = EmojiStore::new();
        let reference = ReferenceSource::default();
        let coordinator = FetchCoordinator::from_config(
            FetchConfig {
                batch_window: Duration::from_millis(5),
            },
            store.clone(),
            EmojiSource::Reference(reference.clone()),
        );

        reference.seed(custom("blob_timed")).await;

        let mut events = store.subscribe();
        coordinator.request_by_name("blob_timed").await;

        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("scheduled flush should publish a change")
            .expect("event stream should stay open");

        assert!(store.emoji_map().await.has("blob_timed"));
        assert_eq!(reference.request_log().await.len(), 1);
    }
}
