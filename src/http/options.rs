// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-call request options
//!
//! Recognized keys and their effect on a call:
//!
//! - `headers`: written into the session's header store before dispatch
//!   (`None` values remove the header). This mutates shared session state.
//! - `data`: form payload, URL-encoded as the body. Sets the form content type.
//! - `json`: structured payload serialized as the body. Sets the JSON content type
//!   and takes precedence over `data`.
//! - `body`: raw body, used when neither `json` nor `data` is set.
//! - `query`: pairs appended to the URL query string.
//! - `timeout`: overrides the session default for this call only.
//! - `debug`: capture this exchange with the session's recorder, if one is attached.
//! - `extensions`: transport-specific passthrough, applied to the outgoing request.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Version;
use serde_json::{Map, Value};

/// Transport-specific passthrough option
pub trait Extension: fmt::Debug + Send + Sync {
    /// Apply to the outgoing reqwest request
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder;

    /// JSON rendering for debug snapshots. `None` falls back to the `Debug` text.
    fn to_json(&self) -> Option<Value> {
        None
    }
}

/// HTTP basic authentication
#[derive(Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicAuth({}:***)", self.username)
    }
}

impl Extension for BasicAuth {
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, self.password.as_ref())
    }
}

/// Bearer token authentication
#[derive(Clone)]
pub struct BearerAuth(pub String);

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerAuth(***)")
    }
}

impl Extension for BearerAuth {
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.0)
    }
}

/// Pin the HTTP protocol version
#[derive(Debug, Clone, Copy)]
pub struct HttpVersion(pub Version);

impl Extension for HttpVersion {
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.version(self.0)
    }

    fn to_json(&self) -> Option<Value> {
        Some(Value::String(format!("{:?}", self.0)))
    }
}

/// Options for a single call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Header overrides applied to the session store
    pub headers: Option<BTreeMap<String, Option<String>>>,
    /// Form payload
    pub data: Option<Vec<(String, String)>>,
    /// JSON payload
    pub json: Option<Value>,
    /// Raw body
    pub body: Option<Bytes>,
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// Timeout override
    pub timeout: Option<Duration>,
    /// Capture this exchange
    pub debug: bool,
    /// Transport-specific passthrough
    pub extensions: BTreeMap<String, Arc<dyn Extension>>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header override
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), Some(value.into()));
        self
    }

    /// Remove a header from the session before this call
    pub fn remove_header(mut self, name: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), None);
        self
    }

    /// Set the form payload
    pub fn data<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.data = Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set the JSON payload
    pub fn json(mut self, value: Value) -> Self {
        self.json = Some(value);
        self
    }

    /// Set a raw body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a query pair
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable debug capture
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Add a passthrough extension under `key`
    pub fn extension(mut self, key: impl Into<String>, ext: impl Extension + 'static) -> Self {
        self.extensions.insert(key.into(), Arc::new(ext));
        self
    }

    /// Render the set options as a JSON object for debug snapshots.
    ///
    /// Values without a JSON form are stored as their string representation.
    pub fn snapshot(&self) -> Map<String, Value> {
        let mut map = Map::new();

        if let Some(ref headers) = self.headers {
            let headers = headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().map_or(Value::Null, Value::String)))
                .collect();
            map.insert("headers".into(), Value::Object(headers));
        }
        if let Some(ref data) = self.data {
            let data = data
                .iter()
                .map(|(k, v)| Value::Array(vec![k.clone().into(), v.clone().into()]))
                .collect();
            map.insert("data".into(), Value::Array(data));
        }
        if let Some(ref json) = self.json {
            map.insert("json".into(), json.clone());
        }
        if let Some(ref body) = self.body {
            let body = match std::str::from_utf8(body) {
                Ok(text) => text.to_string(),
                Err(_) => format!("{:?}", body),
            };
            map.insert("body".into(), Value::String(body));
        }
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| Value::Array(vec![k.clone().into(), v.clone().into()]))
                .collect();
            map.insert("query".into(), Value::Array(query));
        }
        if let Some(timeout) = self.timeout {
            map.insert("timeout".into(), Value::from(timeout.as_secs_f64()));
        }
        for (key, ext) in &self.extensions {
            let value = ext
                .to_json()
                .unwrap_or_else(|| Value::String(format!("{:?}", ext)));
            map.insert(key.clone(), value);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_only_set_keys() {
        let options = RequestOptions::new()
            .header("Accept", "application/json")
            .remove_header("Referer")
            .query("page", "2");

        let snap = options.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["headers"]["Accept"], "application/json");
        assert_eq!(snap["headers"]["Referer"], Value::Null);
        assert_eq!(snap["query"], json!([["page", "2"]]));
        assert!(!snap.contains_key("debug"));
    }

    #[test]
    fn test_snapshot_stringifies_opaque_values() {
        let options = RequestOptions::new()
            .body(vec![0xff_u8, 0xfe])
            .extension("auth", BearerAuth("secret".into()))
            .extension("version", HttpVersion(Version::HTTP_11));

        let snap = options.snapshot();
        assert!(snap["body"].as_str().unwrap().contains("xff"));
        assert_eq!(snap["auth"], "BearerAuth(***)");
        assert_eq!(snap["version"], "HTTP/1.1");
    }

    #[test]
    fn test_snapshot_payloads() {
        let options = RequestOptions::new()
            .data([("user", "ben"), ("tag", "a"), ("tag", "b")])
            .json(json!({"a": 1}))
            .timeout(Duration::from_millis(1500));

        let snap = options.snapshot();
        assert_eq!(
            snap["data"],
            json!([["user", "ben"], ["tag", "a"], ["tag", "b"]])
        );
        assert_eq!(snap["json"], json!({"a": 1}));
        assert_eq!(snap["timeout"], json!(1.5));
    }
}
