use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

pub(crate) const DEFAULT_METHOD: &str = "GET";
pub(crate) const UNDECODABLE_METHOD: &str = "UNKNOWN";

/// One decoded request document, as handed over by the host.
///
/// The document is kept raw: decoding applies no schema, and each accessor
/// validates only the field it reads. A top-level array or scalar is a valid
/// document; its object-shaped accessors fail when called.
#[derive(Debug, Clone)]
pub struct Request {
    document: Value,
}

impl Request {
    /// Builds the request for one invocation from the raw input bytes.
    ///
    /// Empty input stands in for a bare GET. Input that does not decode as
    /// JSON is preserved verbatim in `body` under method `UNKNOWN`, so the
    /// handler still runs and can inspect it.
    pub fn from_raw_input(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        if text.is_empty() {
            return Self::synthetic(DEFAULT_METHOD, Value::String(String::new()));
        }
        match serde_json::from_str(&text) {
            Ok(document) => Self { document },
            Err(_) => Self::synthetic(UNDECODABLE_METHOD, Value::String(text.into_owned())),
        }
    }

    fn synthetic(method: &str, body: Value) -> Self {
        let mut document = Map::new();
        document.insert("method".into(), Value::String(method.into()));
        document.insert("headers".into(), Value::Object(Map::new()));
        document.insert("body".into(), body);
        Self {
            document: Value::Object(document),
        }
    }

    /// HTTP method token, e.g. `"GET"`.
    pub fn method(&self) -> Result<&str> {
        self.text_field("method")
    }

    /// Request path as sent by the host.
    pub fn uri(&self) -> Result<&str> {
        self.text_field("uri")
    }

    /// Correlation token attached by newer hosts; absent otherwise.
    pub fn trace_id(&self) -> Option<&str> {
        self.document.get("trace_id").and_then(Value::as_str)
    }

    /// View over the header map.
    pub fn headers(&self) -> Result<Headers<'_>> {
        self.field("headers")?
            .as_object()
            .map(|map| Headers { map })
            .ok_or_else(|| anyhow!("request \"headers\" field is not an object"))
    }

    /// The request body, verbatim.
    pub fn body(&self) -> Result<&Value> {
        self.field("body")
    }

    /// The whole decoded document, unvalidated.
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    fn field(&self, name: &str) -> Result<&Value> {
        let object = self
            .document
            .as_object()
            .ok_or_else(|| anyhow!("request document is not a JSON object"))?;
        object
            .get(name)
            .ok_or_else(|| anyhow!("request has no \"{name}\" field"))
    }

    fn text_field(&self, name: &str) -> Result<&str> {
        self.field(name)?
            .as_str()
            .ok_or_else(|| anyhow!("request \"{name}\" field is not a string"))
    }
}

/// Borrowed view over a request's header map.
///
/// The host sends headers as `{name: [value, ...]}`. Lookups return the first
/// value and tolerate a bare string; `raw` exposes the map exactly as
/// decoded.
#[derive(Debug, Clone, Copy)]
pub struct Headers<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Headers<'a> {
    /// First value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        match self.map.get(name)? {
            Value::String(value) => Some(value),
            Value::Array(values) => values.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Every value for `name`.
    pub fn get_all(&self, name: &str) -> Vec<&'a str> {
        match self.map.get(name) {
            Some(Value::String(value)) => vec![value],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The header map exactly as decoded, multi-value shape and all.
    pub fn raw(&self) -> &'a Map<String, Value> {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_synthesizes_a_get() {
        let request = Request::from_raw_input(b"");
        assert_eq!("GET", request.method().unwrap());
        assert!(request.headers().unwrap().is_empty());
        assert_eq!(&json!(""), request.body().unwrap());
    }

    #[test]
    fn undecodable_input_keeps_the_raw_text() {
        let request = Request::from_raw_input(b"not json");
        assert_eq!("UNKNOWN", request.method().unwrap());
        assert_eq!(&json!("not json"), request.body().unwrap());
        assert!(request.headers().unwrap().is_empty());
    }

    #[test]
    fn undecodable_bytes_are_replaced_not_rejected() {
        let request = Request::from_raw_input(b"\xff\xfe not json");
        assert_eq!("UNKNOWN", request.method().unwrap());
        assert!(request
            .body()
            .unwrap()
            .as_str()
            .unwrap()
            .ends_with(" not json"));
    }

    #[test]
    fn decoded_documents_pass_through_unchanged() {
        let document = json!({
            "method": "POST",
            "uri": "/contact",
            "headers": {"User-Agent": ["curl/8.5"]},
            "body": {"name": "world"},
            "trace_id": "abc-123",
        });
        let request = Request::from_raw_input(document.to_string().as_bytes());

        assert_eq!(&document, request.as_value());
        assert_eq!("POST", request.method().unwrap());
        assert_eq!("/contact", request.uri().unwrap());
        assert_eq!(Some("abc-123"), request.trace_id());
        assert_eq!(&json!({"name": "world"}), request.body().unwrap());
    }

    #[test]
    fn non_object_documents_are_accepted_but_fail_on_access() {
        let request = Request::from_raw_input(b"[1, 2, 3]");
        assert_eq!(&json!([1, 2, 3]), request.as_value());

        let error = request.method().unwrap_err();
        assert!(error.to_string().contains("not a JSON object"));
    }

    #[test]
    fn missing_fields_fail_only_when_accessed() {
        let request = Request::from_raw_input(b"{\"method\": \"GET\"}");
        assert_eq!("GET", request.method().unwrap());
        assert!(request.body().unwrap_err().to_string().contains("body"));
    }

    #[test]
    fn header_lookup_takes_the_first_value() {
        let request = Request::from_raw_input(
            json!({"headers": {"Accept": ["text/html", "application/json"], "Host": "example"}})
                .to_string()
                .as_bytes(),
        );
        let headers = request.headers().unwrap();

        assert_eq!(Some("text/html"), headers.get("Accept"));
        assert_eq!(
            vec!["text/html", "application/json"],
            headers.get_all("Accept")
        );
        assert_eq!(Some("example"), headers.get("Host"));
        assert_eq!(None, headers.get("Cookie"));
    }
}
