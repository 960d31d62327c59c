mod emojis;

pub use emojis::*;
