//! Hook descriptors and the registry the host exposes for them

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::update::notice::Notice;
use crate::update::types::HostEnvironment;

/// Priority every hook is registered with
pub const HOOK_PRIORITY: i32 = 10;

/// Host lifecycle points the updater attaches to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hook {
    /// The host is saving its update-check transient
    UpdateCheck,
    /// The host asks for the "view details" payload of a plugin
    PluginDetails,
    /// The host renders the message under a plugin's update row
    UpdateMessage { basename: String },
}

impl Hook {
    /// Host-side name of the hook
    pub fn name(&self) -> String {
        match self {
            Hook::UpdateCheck => "pre_set_site_transient_update_plugins".to_string(),
            Hook::PluginDetails => "plugins_api".to_string(),
            Hook::UpdateMessage { basename } => format!("in_plugin_update_message-{}", basename),
        }
    }

    /// Number of arguments the host passes to the handler
    pub fn accepted_args(&self) -> u8 {
        match self {
            Hook::UpdateCheck => 1,
            Hook::PluginDetails => 3,
            Hook::UpdateMessage { .. } => 2,
        }
    }
}

/// Registration surface provided by the host
#[cfg_attr(test, automock)]
pub trait HookRegistry {
    /// Whether the host can accept hook registrations at all
    fn supports_hooks(&self) -> bool;

    /// Register the updater for a hook
    fn add_hook(&mut self, hook: &Hook, priority: i32, accepted_args: u8);
}

/// The host's update-check transient
///
/// Only `response` is touched; every other field passes through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransient {
    /// Pending updates keyed by plugin basename. Absent when the host's own
    /// check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-request values the host supplies to every entry point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// The user explicitly asked for a fresh update check
    pub force_check: bool,
    pub environment: HostEnvironment,
}

impl RequestContext {
    /// Build the context from the request's query parameters
    ///
    /// A forced check is requested with `force-check=1`.
    pub fn from_query(params: &HashMap<String, String>, environment: HostEnvironment) -> Self {
        let force_check = params
            .get("force-check")
            .and_then(|value| value.trim().parse::<i64>().ok())
            == Some(1);

        Self {
            force_check,
            environment,
        }
    }
}

/// Invocation of one of the updater's hooks
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    UpdateCheck(UpdateTransient),
    PluginDetails {
        action: String,
        slug: Option<String>,
    },
    UpdateMessage,
}

/// Result handed back to the host for a [`HostEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutput {
    Transient(UpdateTransient),
    /// `None` means the host keeps its own result
    Details(Option<Map<String, Value>>),
    Notice(Notice),
}
