use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

/// Regex for valid emoji names
///
/// Lowercase alphanumeric, underscores and dashes
pub static RE_EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_\-]+$").unwrap());

auto_derived!(
    /// Emoji
    #[serde(tag = "type")]
    pub enum Emoji {
        /// Built-in unicode emoji
        Unicode {
            /// Emoji name
            name: String,
            /// Lowercase hex codepoint sequence addressing the glyph asset
            codepoint: String,
        },
        /// Custom emoji uploaded to the workspace
        Custom(CustomEmoji),
    }

    /// Custom emoji
    pub struct CustomEmoji {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Emoji name
        pub name: String,
        /// Uploader user id
        pub creator_id: String,
        /// Where the uploaded image is served from
        pub image_url: String,
        /// Whether the emoji is animated
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub animated: bool,
    }

    /// Create a new emoji
    #[derive(Validate)]
    pub struct DataCreateEmoji {
        /// Emoji name
        #[validate(length(min = 1, max = 32), regex = "RE_EMOJI")]
        pub name: String,
        /// Where the uploaded image is served from
        #[validate(length(min = 1, max = 256))]
        pub image_url: String,
        /// Whether the emoji is animated
        #[serde(default)]
        pub animated: bool,
    }
);

impl Emoji {
    /// Name this emoji resolves under
    pub fn name(&self) -> &str {
        match self {
            Emoji::Unicode { name, .. } => name,
            Emoji::Custom(emoji) => &emoji.name,
        }
    }

    /// Id of the underlying custom emoji, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Emoji::Unicode { .. } => None,
            Emoji::Custom(emoji) => Some(&emoji.id),
        }
    }
}

impl From<CustomEmoji> for Emoji {
    fn from(emoji: CustomEmoji) -> Self {
        Emoji::Custom(emoji)
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::{CustomEmoji, DataCreateEmoji, Emoji, RE_EMOJI};

    #[test]
    fn name_regex_accepts_valid_names() {
        for name in ["thumbsup", "blob_wave", "custom-emoji", "100"] {
            assert!(RE_EMOJI.is_match(name), "{name} should be valid");
        }
    }

    #[test]
    fn name_regex_rejects_invalid_names() {
        for name in ["Thumbsup", "with space", ":colons:", ""] {
            assert!(!RE_EMOJI.is_match(name), "{name} should be invalid");
        }
    }

    #[test]
    fn validate_create_data() {
        let data = DataCreateEmoji {
            name: "blob_wave".to_string(),
            image_url: "https://cdn.example.com/blob_wave.png".to_string(),
            animated: false,
        };

        assert!(data.validate().is_ok());

        let data = DataCreateEmoji {
            name: "Not A Name".to_string(),
            ..data
        };

        assert!(data.validate().is_err());
    }

    #[test]
    fn custom_emoji_serialise_with_their_id_field() {
        let emoji = Emoji::Custom(CustomEmoji {
            id: "01H0EMOJIEMOJIEMOJIEMOJIEM".to_string(),
            name: "blob_wave".to_string(),
            creator_id: "01H0USERUSERUSERUSERUSERUS".to_string(),
            image_url: "https://cdn.example.com/blob_wave.png".to_string(),
            animated: false,
        });

        let value = serde_json::to_value(&emoji).unwrap();
        assert_eq!(value["type"], "Custom");
        assert_eq!(value["_id"], "01H0EMOJIEMOJIEMOJIEMOJIEM");
        assert_eq!(value["name"], "blob_wave");
    }

    #[test]
    fn unicode_emoji_have_no_id() {
        let emoji = Emoji::Unicode {
            name: "apple".to_string(),
            codepoint: "1f34e".to_string(),
        };

        assert_eq!(emoji.name(), "apple");
        assert_eq!(emoji.id(), None);
    }
}
