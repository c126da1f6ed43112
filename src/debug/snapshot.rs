// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captured request/response exchanges

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::Response;
use crate::timer::Timer;

/// One captured exchange.
///
/// Built in two phases: [`Snapshot::begin`] fills the request side before
/// dispatch, [`Snapshot::complete`] adds the response. A persisted snapshot
/// with `response: null` is a call that never got a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Recorder-assigned id
    pub id: u64,
    /// Epoch seconds at capture start
    pub timestamp: i64,
    /// Formatted capture start time
    pub timestamp_text: String,
    /// Request phase
    pub request: RequestSnapshot,
    /// Response phase
    pub response: Option<ResponseSnapshot>,
}

/// Request side of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub options: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

/// Response side of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status_code: u16,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub text: String,
    /// Decoded body, or an empty object when the body is not JSON
    pub json: Value,
}

impl Snapshot {
    /// Start a snapshot for exchange `id`
    pub fn begin(id: u64, timer: &Timer, request: RequestSnapshot) -> Self {
        Self {
            id,
            timestamp: timer.to_ts(),
            timestamp_text: timer.to_str(""),
            request,
            response: None,
        }
    }

    /// Attach the response phase
    pub fn complete(&mut self, response: &Response) {
        let text = response.text_lossy();
        self.response = Some(ResponseSnapshot {
            status_code: response.status_code(),
            url: response.url_str().to_string(),
            headers: flatten_headers(&response.headers),
            cookies: response.cookies(),
            json: try_decode_json(&text),
            text,
        });
    }

    /// Whether the response phase was captured
    pub fn is_complete(&self) -> bool {
        self.response.is_some()
    }
}

/// Decode `text` as JSON, or return an empty object
pub fn try_decode_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Header map as name -> value; repeated headers are joined with `, `
pub fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut result: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        match result.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                result.insert(name.as_str().to_string(), value.into_owned());
            }
        }
    }
    result
}
