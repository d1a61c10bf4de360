use serde_json::{Map, Value};

use crate::update::client::InfoResponse;

/// Extract the `details` payload shown in the host's "view details" dialog
///
/// Returns `None` when the payload is empty or `details` is missing, not an
/// object, or an empty object.
pub fn format_details(response: &InfoResponse) -> Option<Map<String, Value>> {
    response.get(None)?;

    match response.get(Some("details"))? {
        Value::Object(details) if !details.is_empty() => Some(details.clone()),
        _ => None,
    }
}
