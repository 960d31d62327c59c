use ember_models::v0::CustomEmoji;

auto_derived!(
    /// Emoji state events
    ///
    /// Published on the store's change stream whenever custom emoji or the
    /// set of confirmed-absent names change.
    #[serde(tag = "type")]
    pub enum EmojiEvent {
        /// Multiple events applied as one mutation batch
        Bulk { v: Vec<EmojiEvent> },

        /// New custom emoji
        EmojiCreate(CustomEmoji),

        /// Custom emoji deleted
        EmojiDelete { id: String, name: String },

        /// Names the remote source confirmed absent
        EmojiAbsent { names: Vec<String> },
    }
);
