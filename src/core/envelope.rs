//! Envelope classification: tells notifications apart from requests before dispatch.

use serde_json::Value as J;

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// No `id` key: the caller expects no response body.
    Notification { method: Option<String> },
    /// `id` key present (an explicit `null` counts as present). Non-object
    /// messages land here too, with a `null` id and no method.
    Request { id: J, method: Option<String>, params: J },
}

impl Envelope {
    pub fn method(&self) -> Option<&str> {
        match self {
            Envelope::Notification { method } | Envelope::Request { method, .. } => method.as_deref(),
        }
    }
}

/// Non-string methods are kept in their raw JSON rendering so errors can name them.
fn method_of(obj: &serde_json::Map<String, J>) -> Option<String> {
    match obj.get("method")? {
        J::String(s) => Some(s.clone()),
        J::Null => None,
        other => Some(other.to_string()),
    }
}

pub fn classify(msg: &J) -> Envelope {
    let Some(obj) = msg.as_object() else {
        return Envelope::Request { id: J::Null, method: None, params: J::Null };
    };
    let method = method_of(obj);
    match obj.get("id") {
        None => Envelope::Notification { method },
        Some(id) => Envelope::Request {
            id: id.clone(),
            method,
            params: obj.get("params").cloned().unwrap_or(J::Null),
        },
    }
}
