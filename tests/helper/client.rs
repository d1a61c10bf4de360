//! Remote client and hook registry test doubles

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use plugin_update_checker::host::{Hook, HookRegistry};
use plugin_update_checker::update::client::{InfoResponse, RemoteInfoClient};
use plugin_update_checker::update::error::RemoteError;
use plugin_update_checker::update::types::LicenseState;

/// Arguments of one `fetch_info` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoCall {
    pub product_id: String,
    pub token: Option<String>,
    pub channel: String,
    pub detailed: bool,
}

#[derive(Debug, Clone)]
enum InfoReply {
    Data(Value),
    ServerError,
    Unreachable,
}

/// Mock license server that records every call
pub struct MockClient {
    info: Mutex<InfoReply>,
    license: Option<LicenseState>,
    info_calls: Mutex<Vec<InfoCall>>,
    license_calls: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            info: Mutex::new(InfoReply::Data(json!({}))),
            license: None,
            info_calls: Mutex::new(Vec::new()),
            license_calls: AtomicUsize::new(0),
        }
    }

    /// Reply with a payload advertising `stable_tag` and a download URL
    pub fn with_stable_tag(self, stable_tag: &str) -> Self {
        self.with_info(json!({
            "details": { "stable_tag": stable_tag, "tested": "6.4" },
            "download_url": "https://acme.test/download/42"
        }))
    }

    pub fn with_info(self, data: Value) -> Self {
        self.set_info(data);
        self
    }

    /// Reply with `is_error` set
    pub fn failing(self) -> Self {
        *self.info.lock().unwrap() = InfoReply::ServerError;
        self
    }

    /// Fail before the server answers
    pub fn unreachable(self) -> Self {
        *self.info.lock().unwrap() = InfoReply::Unreachable;
        self
    }

    pub fn with_license(mut self, license: LicenseState) -> Self {
        self.license = Some(license);
        self
    }

    /// Change the payload returned by subsequent calls
    pub fn set_info(&self, data: Value) {
        *self.info.lock().unwrap() = InfoReply::Data(data);
    }

    pub fn set_failing(&self) {
        *self.info.lock().unwrap() = InfoReply::ServerError;
    }

    pub fn info_calls(&self) -> Vec<InfoCall> {
        self.info_calls.lock().unwrap().clone()
    }

    pub fn info_call_count(&self) -> usize {
        self.info_calls.lock().unwrap().len()
    }

    pub fn license_call_count(&self) -> usize {
        self.license_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteInfoClient for MockClient {
    async fn fetch_info(
        &self,
        product_id: &str,
        token: Option<&str>,
        channel: &str,
        detailed: bool,
    ) -> Result<InfoResponse, RemoteError> {
        self.info_calls.lock().unwrap().push(InfoCall {
            product_id: product_id.to_string(),
            token: token.map(str::to_string),
            channel: channel.to_string(),
            detailed,
        });

        match self.info.lock().unwrap().clone() {
            InfoReply::Data(data) => Ok(InfoResponse::success(data)),
            InfoReply::ServerError => Ok(InfoResponse::error(json!({ "message": "error" }))),
            InfoReply::Unreachable => Err(RemoteError::InvalidResponse(
                "connection refused".to_string(),
            )),
        }
    }

    async fn fetch_license(&self, _token: &str) -> Result<LicenseState, RemoteError> {
        self.license_calls.fetch_add(1, Ordering::SeqCst);
        self.license
            .clone()
            .ok_or_else(|| RemoteError::InvalidResponse("license not found".to_string()))
    }
}

/// Hook registry that records registrations
pub struct RecordingHooks {
    pub available: bool,
    pub registered: Vec<(Hook, i32, u8)>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self {
            available: true,
            registered: Vec::new(),
        }
    }
}

impl HookRegistry for RecordingHooks {
    fn supports_hooks(&self) -> bool {
        self.available
    }

    fn add_hook(&mut self, hook: &Hook, priority: i32, accepted_args: u8) {
        self.registered.push((hook.clone(), priority, accepted_args));
    }
}
