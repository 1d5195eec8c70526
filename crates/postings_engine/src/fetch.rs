use std::time::Duration;

use futures_util::StreamExt;
use ingest_logging::{ingest_debug, ingest_trace, ingest_warn};
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_html;
use crate::{FailureKind, FetchError, RawDocument};

/// Transport settings. Timeouts default to the transport's own behaviour.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            max_bytes: 10 * 1024 * 1024,
            user_agent: concat!("postings/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Performs one GET per call. No retries.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new("", FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn too_large(&self, url: &str, actual: u64) -> FetchError {
        FetchError::new(
            url,
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(url, FailureKind::InvalidUrl, err.to_string()))?;

        ingest_debug!("GET {}", parsed);
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|err| map_reqwest_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                url,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(url, content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        ingest_trace!("{} answered {} ({:?})", final_url, status, content_type);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(url, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(url, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_html(&bytes, content_type.as_deref());
        if decoded.lossy {
            ingest_warn!(
                "{} is not valid {}; malformed bytes replaced",
                final_url,
                decoded.encoding_label
            );
        }
        ingest_debug!(
            "fetched {} ({} bytes, {})",
            final_url,
            bytes.len(),
            decoded.encoding_label
        );

        Ok(RawDocument {
            url: url.to_string(),
            final_url,
            content_type,
            encoding_label: decoded.encoding_label,
            html: decoded.html,
        })
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(url, FailureKind::Timeout, err.to_string());
    }
    FetchError::new(url, FailureKind::Network, err.to_string())
}
