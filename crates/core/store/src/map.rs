use std::collections::HashMap;

use ember_models::v0::{CustomEmoji, Emoji};

use crate::catalogue;

/// Point-in-time view over custom and built-in emoji
///
/// Lookups are pure and never touch the store; a map stays valid (and
/// stale) until its holder picks up a fresh snapshot. Custom emoji shadow
/// built-in emoji of the same name since the workspace catalogue is
/// authoritative.
#[derive(Debug, Default, Clone)]
pub struct EmojiMap {
    by_name: HashMap<String, CustomEmoji>,
    by_id: HashMap<String, CustomEmoji>,
}

impl EmojiMap {
    pub(crate) fn build<'a>(custom: impl Iterator<Item = &'a CustomEmoji>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();

        for emoji in custom {
            by_name.insert(emoji.name.clone(), emoji.clone());
            by_id.insert(emoji.id.clone(), emoji.clone());
        }

        EmojiMap { by_name, by_id }
    }

    /// Look up an emoji by name
    pub fn get(&self, name: &str) -> Option<Emoji> {
        self.by_name
            .get(name)
            .cloned()
            .map(Emoji::Custom)
            .or_else(|| catalogue::system_emoji(name))
    }

    /// Look up a custom emoji by id
    ///
    /// Built-in emoji carry no id and are only addressable by name.
    pub fn get_by_id(&self, id: &str) -> Option<Emoji> {
        self.by_id.get(id).cloned().map(Emoji::Custom)
    }

    /// Check whether a name currently resolves
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name) || catalogue::is_system_emoji(name)
    }

    /// Number of custom emoji in this snapshot
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
