use std::collections::HashMap;

use ember_models::v0::Emoji;
use once_cell::sync::Lazy;

/// Built-in unicode emoji, keyed by name
///
/// Loaded once at process start; the table ships with the client and never
/// changes within a session.
static SYSTEM_EMOJIS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    include_str!("unicode_emoji.tsv")
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_once('\t')
                .expect("malformed system emoji catalogue")
        })
        .collect()
});

/// Look up a built-in emoji by name
pub fn system_emoji(name: &str) -> Option<Emoji> {
    SYSTEM_EMOJIS.get(name).map(|codepoint| Emoji::Unicode {
        name: name.to_string(),
        codepoint: codepoint.to_string(),
    })
}

/// Check whether a name refers to a built-in emoji
pub fn is_system_emoji(name: &str) -> bool {
    SYSTEM_EMOJIS.contains_key(name)
}

/// Number of built-in emoji in the catalogue
pub fn system_emoji_count() -> usize {
    SYSTEM_EMOJIS.len()
}
