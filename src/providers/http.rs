//! HTTP Provider
//!
//! Primary tier: fetches advertisements from a remote service over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{PrimaryProvider, ProviderError};
use crate::error::LookupError;
use crate::models::Advertisement;

// == HTTP Provider ==
/// Fetches `GET {base_url}/adv/{id}`.
///
/// 200 decodes the body, 404 means not found, anything else is a failure.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    /// Creates a provider for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LookupError::InvalidConfig(format!("primary url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidConfig(format!(
                "primary url '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, id: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Connection(format!("bad base url {}", self.base_url)))?
            .pop_if_empty()
            .push("adv")
            .push(id);
        Ok(url)
    }
}

fn classify(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_decode() {
        ProviderError::Decode(e.to_string())
    } else {
        ProviderError::Connection(e.to_string())
    }
}

#[async_trait]
impl PrimaryProvider<Advertisement> for HttpProvider {
    async fn fetch(&self, id: &str) -> Result<Option<Advertisement>, ProviderError> {
        let url = self.url_for(id)?;
        debug!("Primary fetch {}", url);

        let response = self.client.get(url).send().await.map_err(classify)?;

        match response.status() {
            StatusCode::OK => response.json().await.map(Some).map_err(classify),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(ProviderError::UnexpectedStatus(status.as_u16())),
        }
    }
}
