use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use ember_models::v0::CustomEmoji;
use ember_result::Result;
use tokio::sync::{broadcast, RwLock};

use crate::catalogue;
use crate::events::EmojiEvent;
use crate::map::EmojiMap;

/// Events buffered per subscriber before a slow one starts missing some
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct State {
    /// Custom emoji by id
    custom: HashMap<String, CustomEmoji>,
    /// Name index into `custom`
    names: HashMap<String, String>,
    /// Names the remote source confirmed absent
    non_existent: HashSet<String>,
    /// Current snapshot, rebuilt once per mutation batch
    map: Arc<EmojiMap>,
}

impl State {
    /// Whether a name currently resolves positively
    fn resolves(&self, name: &str) -> bool {
        self.names.contains_key(name) || catalogue::is_system_emoji(name)
    }

    fn insert(&mut self, emoji: CustomEmoji) -> EmojiEvent {
        // A stale negative entry must never mask the record being added
        self.non_existent.remove(&emoji.name);

        // Names are unique among existing custom emoji; after a
        // delete-then-recreate the newest id owns the name
        if let Some(old_id) = self.names.insert(emoji.name.clone(), emoji.id.clone()) {
            if old_id != emoji.id {
                self.custom.remove(&old_id);
            }
        }

        self.custom.insert(emoji.id.clone(), emoji.clone());
        EmojiEvent::EmojiCreate(emoji)
    }

    fn mark_absent(&mut self, names: Vec<String>) -> Option<EmojiEvent> {
        let mut marked = Vec::new();

        for name in names {
            if self.resolves(&name) {
                warn!("Not marking \"{name}\" as non-existent, it currently resolves.");
                continue;
            }

            if self.non_existent.insert(name.clone()) {
                marked.push(name);
            }
        }

        if marked.is_empty() {
            None
        } else {
            Some(EmojiEvent::EmojiAbsent { names: marked })
        }
    }

    fn rebuild(&mut self) {
        self.map = Arc::new(EmojiMap::build(self.custom.values()));
    }
}

database_derived!(
    /// Canonical emoji state for the session
    ///
    /// Owns the custom emoji collection and the set of names confirmed
    /// absent. Every mutation batch rebuilds the [`EmojiMap`] snapshot once
    /// and publishes a single event on the change stream, so subscribers
    /// react once no matter how many records arrived together.
    pub struct EmojiStore {
        state: Arc<RwLock<State>>,
        events: broadcast::Sender<EmojiEvent>,
    }
);

impl Default for EmojiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        EmojiStore {
            state: Arc::new(RwLock::new(State::default())),
            events,
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> broadcast::Receiver<EmojiEvent> {
        self.events.subscribe()
    }

    /// Current point-in-time snapshot
    pub async fn emoji_map(&self) -> Arc<EmojiMap> {
        self.state.read().await.map.clone()
    }

    /// Whether the remote source has confirmed this name absent
    pub async fn is_non_existent(&self, name: &str) -> bool {
        self.state.read().await.non_existent.contains(name)
    }

    /// Insert a single confirmed emoji (a create, or a by-id fetch)
    pub async fn receive_emoji(&self, emoji: CustomEmoji) {
        let mut state = self.state.write().await;
        let event = state.insert(emoji);
        state.rebuild();
        drop(state);

        self.publish(event);
    }

    /// Insert a batch of confirmed emoji, rebuilding the snapshot once
    pub async fn receive_emojis(&self, emojis: Vec<CustomEmoji>) {
        if emojis.is_empty() {
            return;
        }

        let mut state = self.state.write().await;
        let events: Vec<EmojiEvent> = emojis.into_iter().map(|e| state.insert(e)).collect();
        state.rebuild();
        drop(state);

        self.publish_batch(events);
    }

    /// Apply the outcome of a fetch-by-names batch
    ///
    /// Confirmed records enter the custom table and names with no match
    /// enter the negative cache, under one write lock: one rebuild, one
    /// event, and no window where a stale negative masks a new record.
    pub async fn receive_fetch_result(&self, found: Vec<CustomEmoji>, missing: Vec<String>) {
        if found.is_empty() && missing.is_empty() {
            return;
        }

        let mut state = self.state.write().await;
        let inserted = !found.is_empty();
        let mut events: Vec<EmojiEvent> = found.into_iter().map(|e| state.insert(e)).collect();

        if let Some(event) = state.mark_absent(missing) {
            events.push(event);
        }

        if inserted {
            state.rebuild();
        }
        drop(state);

        self.publish_batch(events);
    }

    /// Record names the remote source confirmed absent
    pub async fn mark_non_existent(&self, names: Vec<String>) {
        let mut state = self.state.write().await;
        let event = state.mark_absent(names);
        drop(state);

        if let Some(event) = event {
            self.publish(event);
        }
    }

    /// Remove a custom emoji by id
    ///
    /// Deletion is not evidence of non-existence: the name does not enter
    /// the negative cache and a later lookup may refetch it.
    pub async fn delete_emoji(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let emoji = state
            .custom
            .remove(id)
            .ok_or_else(|| create_error!(UnknownEmoji))?;
        state.names.remove(&emoji.name);
        state.rebuild();
        drop(state);

        self.publish(EmojiEvent::EmojiDelete {
            id: emoji.id,
            name: emoji.name,
        });

        Ok(())
    }

    fn publish(&self, event: EmojiEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }

    fn publish_batch(&self, mut events: Vec<EmojiEvent>) {
        match events.len() {
            0 => {}
            1 => self.publish(events.remove(0)),
            _ => self.publish(EmojiEvent::Bulk { v: events }),
        }
    }
}
