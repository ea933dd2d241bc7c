use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::api::{Endpoint, FetchError};

/// Default upstream aggregation API.
pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

/// Something that can answer an endpoint with a raw JSON body.
pub trait Source: Send + Sync + 'static {
    fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP client for the aggregation API.
///
/// One attempt per call: no retries, no backoff, and no request timeout.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Url(format!("{base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(None::<Duration>)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Source for ApiClient {
    fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError> {
        let url = endpoint.url(&self.base_url)?;
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}
