// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::cookie::Cookie;
use super::headers::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use crate::error::{Error, Result};

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Final URL (after redirects)
    pub url: Url,
    /// Whether this was a redirect
    pub redirected: bool,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        redirected: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            redirected,
            response_time_ms,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get body as text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Cookies set by this response, name -> value
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.header_all(SET_COOKIE)
            .into_iter()
            .filter_map(|h| Cookie::parse(h, &self.url))
            .map(|c| (c.name, c.value))
            .collect()
    }

    /// Absolute target of a followable redirect (301, 302, 303, 307, 308)
    ///
    /// A missing or unparseable Location means the response is final.
    pub fn redirect_target(&self) -> Option<Url> {
        match self.status {
            StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT => {}
            _ => return None,
        }
        let location = self.header(LOCATION)?;
        self.url.join(location).ok()
    }

    /// Get the final URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response(headers: HeaderMap, body: &'static str) -> Response {
        Response::new(
            StatusCode::OK,
            headers,
            Bytes::from(body),
            Url::parse("https://example.com").unwrap(),
            false,
            100,
        )
    }

    #[test]
    fn test_response_status() {
        let resp = response(HeaderMap::new(), "");
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.body_len(), 0);
    }

    #[test]
    fn test_response_text() {
        let resp = response(HeaderMap::new(), "Hello, World!");
        assert_eq!(resp.text().unwrap(), "Hello, World!");
        assert!(resp.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_redirect_target() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("/home?tab=1"));

        let mut resp = response(headers, "");
        assert_eq!(resp.redirect_target(), None);

        resp.status = StatusCode::FOUND;
        assert_eq!(
            resp.redirect_target().unwrap().as_str(),
            "https://example.com/home?tab=1"
        );

        resp.status = StatusCode::NOT_MODIFIED;
        assert_eq!(resp.redirect_target(), None);

        resp.status = StatusCode::SEE_OTHER;
        resp.headers.remove(LOCATION);
        assert_eq!(resp.redirect_target(), None);
    }

    #[test]
    fn test_response_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("sid=abc; HttpOnly"));
        headers.append(SET_COOKIE, HeaderValue::from_static("lang=en"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let resp = response(headers, "");
        let cookies = resp.cookies();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["sid"], "abc");
        assert_eq!(resp.content_type(), Some("text/plain"));
    }
}
