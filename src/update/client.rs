//! Remote info client trait for querying the license server

use serde_json::Value;

use crate::update::error::RemoteError;
use crate::update::types::LicenseState;

/// Response returned by the license server's product info endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoResponse {
    /// The server signaled failure (non-success status or envelope)
    pub is_error: bool,
    /// Payload of the response envelope
    pub data: Value,
}

impl InfoResponse {
    pub fn success(data: Value) -> Self {
        Self {
            is_error: false,
            data,
        }
    }

    pub fn error(data: Value) -> Self {
        Self {
            is_error: true,
            data,
        }
    }

    /// Look up a value in the payload
    ///
    /// `path` is dot-separated (e.g., `"details.stable_tag"`); `None` returns
    /// the whole payload. Missing keys and null values yield `None`.
    pub fn get(&self, path: Option<&str>) -> Option<&Value> {
        let value = match path {
            None => &self.data,
            Some(path) => path
                .split('.')
                .try_fold(&self.data, |value, key| value.get(key))?,
        };
        (!value.is_null()).then_some(value)
    }

    /// Look up a string value in the payload
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(Some(path)).and_then(Value::as_str)
    }
}

/// Trait for fetching product info and license state from the license server
#[async_trait::async_trait]
pub trait RemoteInfoClient: Send + Sync {
    /// Fetch product info
    ///
    /// # Arguments
    /// * `product_id` - Identifier of the product on the license server
    /// * `token` - Activation token, when the product has one
    /// * `channel` - Calling ecosystem, passed through unchanged
    /// * `detailed` - Request the full `details` payload
    ///
    /// # Returns
    /// * `Ok(InfoResponse)` - The server answered; `is_error` may still be set
    /// * `Err(RemoteError)` - The request could not be completed
    async fn fetch_info(
        &self,
        product_id: &str,
        token: Option<&str>,
        channel: &str,
        detailed: bool,
    ) -> Result<InfoResponse, RemoteError>;

    /// Fetch the license state for an activation token
    async fn fetch_license(&self, token: &str) -> Result<LicenseState, RemoteError>;
}
