use std::collections::HashMap;
use std::sync::Arc;

use futures::lock::Mutex;

use ember_models::v0::{CustomEmoji, DataCreateEmoji};
use ember_result::Result;

use super::{AbstractEmojiSource, EmojiFetchResponse};

/// Reference implementation backed by in-memory collections
///
/// Keeps a journal of every fetch-by-names batch it serves so tests can
/// assert on the network traffic a scenario produced.
#[derive(Clone, Default)]
pub struct ReferenceSource {
    /// Custom emoji by id
    pub emojis: Arc<Mutex<HashMap<String, CustomEmoji>>>,
    /// Every batch of names requested so far, in order
    pub requests: Arc<Mutex<Vec<Vec<String>>>>,
    /// When set, fetch operations fail as if the network were down
    pub offline: Arc<Mutex<bool>>,
    /// Records appended to every batch response regardless of the request
    pub unsolicited: Arc<Mutex<Vec<CustomEmoji>>>,
}

impl ReferenceSource {
    /// Make an emoji known to the remote side
    pub async fn seed(&self, emoji: CustomEmoji) {
        self.emojis.lock().await.insert(emoji.id.clone(), emoji);
    }

    /// Simulate losing or regaining connectivity
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.lock().await = offline;
    }

    /// Batches served so far
    pub async fn request_log(&self) -> Vec<Vec<String>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl AbstractEmojiSource for ReferenceSource {
    /// Fetch custom emoji matching the given names
    async fn fetch_emojis_by_names(&self, names: &[String]) -> Result<EmojiFetchResponse> {
        self.requests.lock().await.push(names.to_vec());

        if *self.offline.lock().await {
            return Err(create_error!(TransportFailed));
        }

        let emojis = self.emojis.lock().await;
        let mut found: Vec<CustomEmoji> = names
            .iter()
            .filter_map(|name| emojis.values().find(|emoji| &emoji.name == name))
            .cloned()
            .collect();

        let not_found = names
            .iter()
            .filter(|name| !found.iter().any(|emoji| emoji.name == **name))
            .cloned()
            .collect();

        found.extend(self.unsolicited.lock().await.iter().cloned());

        Ok(EmojiFetchResponse { found, not_found })
    }

    /// Fetch a custom emoji by its id
    async fn fetch_emoji(&self, id: &str) -> Result<CustomEmoji> {
        if *self.offline.lock().await {
            return Err(create_error!(TransportFailed));
        }

        let emojis = self.emojis.lock().await;
        emojis
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(UnknownEmoji))
    }

    /// Create a custom emoji
    async fn create_emoji(&self, data: DataCreateEmoji) -> Result<CustomEmoji> {
        let mut emojis = self.emojis.lock().await;
        if emojis.values().any(|emoji| emoji.name == data.name) {
            return Err(create_database_error!("insert", "emoji"));
        }

        let emoji = CustomEmoji {
            id: ulid::Ulid::new().to_string(),
            name: data.name,
            creator_id: ulid::Ulid::new().to_string(),
            image_url: data.image_url,
            animated: data.animated,
        };

        emojis.insert(emoji.id.clone(), emoji.clone());
        Ok(emoji)
    }

    /// Delete a custom emoji by its id
    async fn delete_emoji(&self, id: &str) -> Result<()> {
        let mut emojis = self.emojis.lock().await;
        if emojis.remove(id).is_none() {
            return Err(create_error!(UnknownEmoji));
        }

        Ok(())
    }
}
