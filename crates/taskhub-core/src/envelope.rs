use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Key under which non-fatal advisories are reported in `additional_properties`.
pub const ADVISORY_KEY: &str = "error";

/// Uniform success body returned by every API handler.
///
/// ```json
/// { "success": true, "message": "...", "payload": ..., "additional_properties": { "error": ["..."] } }
/// ```
///
/// `additional_properties` carries notes about requests that succeeded after a
/// silent correction; it is omitted when empty.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
            additional_properties: BTreeMap::new(),
            status: StatusCode::OK,
        }
    }

    pub fn created(message: impl Into<String>, payload: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(message, payload)
        }
    }

    /// Attach advisories under [`ADVISORY_KEY`]. Empty lists are dropped.
    pub fn with_advisories(mut self, advisories: Vec<String>) -> Self {
        if !advisories.is_empty() {
            self.additional_properties
                .entry(ADVISORY_KEY.to_owned())
                .or_default()
                .extend(advisories);
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self)).into_response()
    }
}

/// Failure body shared by every service error type.
pub fn failure_body(kind: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "kind": kind,
        "message": message,
    })
}
