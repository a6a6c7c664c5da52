use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const DEFAULT_STATUS: u16 = 200;
const CONTENT_TYPE: &str = "Content-Type";
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A partial response under construction by a handler.
///
/// Every field is optional. Defaults are applied when the adapter emits the
/// wire document: status 200, a `Content-Type: application/json` header when
/// the handler set none, empty body.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: Option<u16>,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP status code.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets one response header, replacing any previous value for the name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a JSON body; it is encoded into the wire document's body string.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a plain text body, passed through to the wire verbatim.
    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Value::String(body.into()));
        self
    }

    pub(crate) fn into_wire(self) -> Result<WireResponse> {
        let Response {
            status,
            mut headers,
            body,
        } = self;
        headers
            .entry(CONTENT_TYPE.to_string())
            .or_insert_with(|| DEFAULT_CONTENT_TYPE.to_string());
        let body = match body {
            None => String::new(),
            Some(Value::String(text)) => text,
            Some(value) => serde_json::to_string(&value)?,
        };
        Ok(WireResponse {
            status: status.unwrap_or(DEFAULT_STATUS),
            headers,
            body,
        })
    }
}

/// The exact document written to the output stream, one per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl WireResponse {
    /// Serializes to the single-document output form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
