use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::api_types::ApiEnvelope;

/// Rate-limited GraphQL transport.
///
/// Every request is followed by a fixed pause. A 429 answer is retried once
/// after a longer backoff; any other failure is returned as is.
#[derive(Clone)]
pub struct AnilistClient {
  http: reqwest::Client,
  endpoint: String,
  pause: Duration,
  backoff: Duration,
}

impl AnilistClient {
  pub fn new(endpoint: impl Into<String>) -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("medialist/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      endpoint: endpoint.into(),
      pause: Duration::from_millis(500),
      backoff: Duration::from_secs(60),
    })
  }

  pub fn with_rate_limit(mut self, pause: Duration, backoff: Duration) -> Self {
    self.pause = pause;
    self.backoff = backoff;
    self
  }

  /// Run a query. `None` when AniList answers with errors, which is how it
  /// reports entries that do not exist.
  pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<Option<T>> {
    let body = json!({ "query": query, "variables": variables });

    let mut response = self.post(&body).await?;
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
      warn!(backoff_secs = self.backoff.as_secs_f64(), "Rate limited by AniList, backing off");
      tokio::time::sleep(self.backoff).await;
      response = self.post(&body).await?;
      if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(eyre!("Still rate limited by AniList after backing off"));
      }
    }

    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|e| eyre!("Failed to read AniList response: {}", e))?;
    let envelope: ApiEnvelope = serde_json::from_str(&text)
      .map_err(|e| eyre!("Failed to parse AniList response ({}): {}", status, e))?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
      debug!(%status, ?errors, "AniList returned errors");
      return Ok(None);
    }
    let Some(data) = envelope.data else {
      return Ok(None);
    };

    let parsed = serde_path_to_error::deserialize(data)
      .map_err(|e| eyre!("Failed to parse AniList data at {}: {}", e.path(), e.inner()))?;
    Ok(Some(parsed))
  }

  async fn post(&self, body: &Value) -> Result<reqwest::Response> {
    let response = self
      .http
      .post(&self.endpoint)
      .json(body)
      .send()
      .await
      .map_err(|e| eyre!("AniList request failed: {}", e))?;
    tokio::time::sleep(self.pause).await;
    Ok(response)
  }
}
