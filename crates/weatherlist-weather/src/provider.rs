//! Icon sources: where icon bytes come from.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::types::IconError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("WeatherList/", env!("CARGO_PKG_VERSION"));

/// Fetches raw icon payloads by URL
pub trait IconSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, IconError>> + Send;
}

/// Plain HTTP GET icon source
#[derive(Debug, Clone)]
pub struct HttpIconSource {
    client: Arc<Client>,
}

impl HttpIconSource {
    pub fn new(timeout: Duration) -> Result<Self, IconError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl IconSource for HttpIconSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconError> {
        let parsed = Url::parse(url).map_err(|e| IconError::InvalidUrl(format!("{url}: {e}")))?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IconError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        tracing::trace!("Fetched {} icon bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
