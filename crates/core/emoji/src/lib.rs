#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

#[macro_use]
extern crate ember_result;

mod config;
mod coordinator;
mod resolver;
mod source;

pub use config::FetchConfig;
pub use coordinator::FetchCoordinator;
pub use resolver::EmojiResolver;
pub use source::*;
