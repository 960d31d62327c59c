use std::sync::Arc;

use reqwest::{Client, StatusCode};

use ember_models::v0::{CustomEmoji, DataCreateEmoji};
use ember_result::Result;

use super::{AbstractEmojiSource, EmojiFetchResponse};

/// Emoji source backed by the workspace HTTP API
#[derive(Clone)]
pub struct HttpSource {
    pub host: Arc<str>,
    pub client: Client,
}

impl HttpSource {
    pub fn new(host: &str) -> Self {
        Self {
            host: Arc::from(host),
            client: Client::new(),
        }
    }

    /// Create a source pointing at the configured workspace API
    pub async fn from_config() -> Self {
        let config = ember_config::config().await;
        Self::new(&config.hosts.api)
    }
}

#[async_trait]
impl AbstractEmojiSource for HttpSource {
    /// Fetch custom emoji matching the given names
    async fn fetch_emojis_by_names(&self, names: &[String]) -> Result<EmojiFetchResponse> {
        let response = self
            .client
            .post(format!("{}/emoji/names", self.host))
            .json(&names)
            .send()
            .await
            .map_err(|err| {
                warn!("Failed to reach the emoji endpoint: {err}");
                create_error!(TransportFailed)
            })?;

        if !response.status().is_success() {
            warn!("Emoji endpoint returned {}.", response.status());
            return Err(create_error!(TransportFailed));
        }

        let found: Vec<CustomEmoji> = response.json().await.map_err(|err| {
            create_error!(MalformedData {
                msg: err.to_string()
            })
        })?;

        // The endpoint only returns matches; everything else was a miss
        let not_found = names
            .iter()
            .filter(|name| !found.iter().any(|emoji| emoji.name == **name))
            .cloned()
            .collect();

        Ok(EmojiFetchResponse { found, not_found })
    }

    /// Fetch a custom emoji by its id
    async fn fetch_emoji(&self, id: &str) -> Result<CustomEmoji> {
        let response = self
            .client
            .get(format!("{}/emoji/{id}", self.host))
            .send()
            .await
            .map_err(|_| create_error!(TransportFailed))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(create_error!(UnknownEmoji)),
            status if status.is_success() => response.json().await.map_err(|err| {
                create_error!(MalformedData {
                    msg: err.to_string()
                })
            }),
            status => {
                warn!("Emoji endpoint returned {status}.");
                Err(create_error!(TransportFailed))
            }
        }
    }

    /// Create a custom emoji
    async fn create_emoji(&self, data: DataCreateEmoji) -> Result<CustomEmoji> {
        let response = self
            .client
            .post(format!("{}/emoji", self.host))
            .json(&data)
            .send()
            .await
            .map_err(|_| create_error!(TransportFailed))?;

        if !response.status().is_success() {
            warn!("Emoji endpoint returned {}.", response.status());
            return Err(create_error!(TransportFailed));
        }

        response.json().await.map_err(|err| {
            create_error!(MalformedData {
                msg: err.to_string()
            })
        })
    }

    /// Delete a custom emoji by its id
    async fn delete_emoji(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/emoji/{id}", self.host))
            .send()
            .await
            .map_err(|_| create_error!(TransportFailed))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(create_error!(UnknownEmoji)),
            status if status.is_success() => Ok(()),
            status => {
                warn!("Emoji endpoint returned {status}.");
                Err(create_error!(TransportFailed))
            }
        }
    }
}
