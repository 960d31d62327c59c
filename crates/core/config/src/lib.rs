use cached::proc_macro::cached;
use config::{Config, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Ember.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Ember.toml").exists() {
            builder = builder.add_source(File::new("Ember.toml", FileFormat::Toml));
        }

        builder.build().unwrap()
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Hosts {
    pub api: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Emoji {
    /// How long the fetch coordinator holds a batch window open, in milliseconds
    pub batch_window_ms: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub production: bool,
    pub hosts: Hosts,
    pub emoji: Emoji,
}

pub async fn init() {
    println!(
        ":: Ember Configuration ::\n\x1b[32m{:?}\x1b[0m",
        config().await
    );
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read().await.try_deserialize::<Settings>().unwrap()
}
