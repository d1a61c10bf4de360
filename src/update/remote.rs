//! HTTP client for the license server REST API

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::update::client::{InfoResponse, RemoteInfoClient};
use crate::update::error::RemoteError;
use crate::update::types::LicenseState;

/// Response envelope used by every license server endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
}

/// RemoteInfoClient implementation over HTTP
#[derive(Clone)]
pub struct HttpInfoClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInfoClient {
    /// Creates a new HttpInfoClient for the configured API
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("plugin-update-checker/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build an endpoint URL, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Interpret a PHP-style truthy value (bool, 0/1, "0"/"1")
    fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Null => false,
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    fn license_state(data: &Value) -> LicenseState {
        let license = data.get("license");

        // A payload without an explicit flag is treated as expired
        let is_expired = license
            .and_then(|l| l.get("is_expired"))
            .is_none_or(Self::is_truthy);

        let expires_at = license
            .and_then(|l| l.get("expires_at"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        LicenseState {
            is_expired,
            expires_at,
        }
    }
}

#[async_trait::async_trait]
impl RemoteInfoClient for HttpInfoClient {
    async fn fetch_info(
        &self,
        product_id: &str,
        token: Option<&str>,
        channel: &str,
        detailed: bool,
    ) -> Result<InfoResponse, RemoteError> {
        let mut url = self.endpoint(&["software", product_id])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(token) = token {
                query.append_pair("activation_token", token);
            }
            query.append_pair("channel", channel);
            query.append_pair("detailed", if detailed { "1" } else { "0" });
        }

        debug!("Fetching product info for {}", product_id);
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("License server returned status {} for product {}", status, product_id);
            let data = response
                .json::<Envelope>()
                .await
                .map(|envelope| envelope.data)
                .unwrap_or(Value::Null);
            return Ok(InfoResponse::error(data));
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            warn!("Failed to parse product info response: {}", e);
            RemoteError::InvalidResponse(e.to_string())
        })?;

        Ok(InfoResponse {
            is_error: !envelope.success,
            data: envelope.data,
        })
    }

    async fn fetch_license(&self, token: &str) -> Result<LicenseState, RemoteError> {
        let url = self.endpoint(&["licenses", "validate", token])?;

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RemoteError::Unauthorized(format!(
                "License lookup rejected with status {}",
                status
            )));
        }

        if !status.is_success() {
            warn!("License server returned status {} for license lookup", status);
            return Err(RemoteError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            return Err(RemoteError::InvalidResponse(
                "License lookup was not successful".to_string(),
            ));
        }

        Ok(Self::license_state(&envelope.data))
    }
}
