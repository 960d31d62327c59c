use ember_models::v0::{CustomEmoji, DataCreateEmoji};
use ember_result::Result;

mod http;
mod reference;

pub use self::http::*;
pub use self::reference::*;

/// Outcome of a fetch-by-names batch
#[derive(Debug, Clone, Default)]
pub struct EmojiFetchResponse {
    /// Records that matched a requested name
    pub found: Vec<CustomEmoji>,
    /// Requested names with no match
    pub not_found: Vec<String>,
}

#[async_trait]
pub trait AbstractEmojiSource: Sync + Send {
    /// Fetch custom emoji matching the given names
    async fn fetch_emojis_by_names(&self, names: &[String]) -> Result<EmojiFetchResponse>;

    /// Fetch a custom emoji by its id
    async fn fetch_emoji(&self, id: &str) -> Result<CustomEmoji>;

    /// Create a custom emoji
    async fn create_emoji(&self, data: DataCreateEmoji) -> Result<CustomEmoji>;

    /// Delete a custom emoji by its id
    async fn delete_emoji(&self, id: &str) -> Result<()>;
}

/// Remote emoji source
#[derive(Clone)]
pub enum EmojiSource {
    /// Mock source
    Reference(ReferenceSource),
    /// Workspace HTTP API
    Http(HttpSource),
}

impl std::ops::Deref for EmojiSource {
    type Target = dyn AbstractEmojiSource;

    fn deref(&self) -> &Self::Target {
        match &self {
            EmojiSource::Reference(reference) => reference,
            EmojiSource::Http(http) => http,
        }
    }
}
