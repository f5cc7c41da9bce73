//! Jolokia source using the agent's HTTP read API.
//!
//! The monitored server exposes its tick ring buffer as the `tickTimes`
//! attribute of the `net.minecraft.server:type=Server` MBean. A Jolokia agent
//! attached to the JVM makes it readable with a single POST.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tickwatch::{JolokiaSource, SnapshotSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut source = JolokiaSource::builder()
//!         .endpoint("http://127.0.0.1:8778/jolokia")
//!         .build()?;
//!
//!     let snapshot = source.fetch().await?;
//!     println!("slot 0 took {} ns", snapshot[0]);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::trace;

use super::snapshot::ReadResponse;
use super::{CircularSnapshot, SnapshotSource};
use crate::error::FetchError;

/// Default Jolokia agent endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8778/jolokia";

/// MBean holding the server's tick statistics.
pub const DEFAULT_MBEAN: &str = "net.minecraft.server:type=Server";

/// Attribute holding the 100-slot tick duration buffer.
pub const DEFAULT_ATTRIBUTE: &str = "tickTimes";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot source reading the tick buffer through a Jolokia agent.
#[derive(Debug, Clone)]
pub struct JolokiaSource {
    client: Client,
    url: String,
    body: Vec<u8>,
    description: String,
}

impl JolokiaSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> JolokiaSourceBuilder {
        JolokiaSourceBuilder::default()
    }

    /// Returns the normalized request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for JolokiaSource {
    async fn fetch(&mut self) -> Result<CircularSnapshot, FetchError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(self.body.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        trace!(bytes = body.len(), "read response");
        ReadResponse::parse(&body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for JolokiaSource.
#[derive(Debug, Default)]
pub struct JolokiaSourceBuilder {
    endpoint: Option<String>,
    mbean: Option<String>,
    attribute: Option<String>,
    timeout: Option<Duration>,
}

impl JolokiaSourceBuilder {
    /// Set the Jolokia base URL (default: "http://127.0.0.1:8778/jolokia").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the MBean to read (default: "net.minecraft.server:type=Server").
    pub fn mbean(mut self, mbean: impl Into<String>) -> Self {
        self.mbean = Some(mbean.into());
        self
    }

    /// Set the attribute to read (default: "tickTimes").
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Set the request timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<JolokiaSource, FetchError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(format!("failed to build HTTP client: {}", e)))?;

        let url = normalize_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT));
        let request = ReadRequest {
            kind: "read",
            mbean: self.mbean.as_deref().unwrap_or(DEFAULT_MBEAN),
            attribute: self.attribute.as_deref().unwrap_or(DEFAULT_ATTRIBUTE),
            path: "",
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| FetchError::Http(format!("failed to encode request: {}", e)))?;

        Ok(JolokiaSource {
            client,
            description: format!("jolokia: {}", url),
            url,
            body,
        })
    }
}

// Jolokia wants the agent root with exactly one trailing slash
fn normalize_endpoint(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_end_matches('/'))
}

/// Body of a Jolokia `read` request.
#[derive(Debug, Serialize)]
struct ReadRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    mbean: &'a str,
    attribute: &'a str,
    path: &'a str,
}
