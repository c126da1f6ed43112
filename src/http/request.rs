// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Merged request handed to a transport

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use url::Url;

use super::headers::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE};
use super::options::Extension;
use crate::error::{Error, Result};

/// HTTP request after session headers, cookies and call options are merged
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Query pairs appended to the URL
    pub query: Vec<(String, String)>,
    /// Request timeout
    pub timeout: Duration,
    /// Transport-specific passthrough
    pub extensions: Vec<Arc<dyn Extension>>,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            query: Vec::new(),
            timeout,
            extensions: Vec::new(),
        })
    }

    /// Merge a Cookie header value into any caller-supplied one
    pub fn add_cookies(&mut self, cookie_header: &str) -> Result<()> {
        let merged = match self.headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.is_empty() => format!("{}; {}", existing, cookie_header),
            _ => cookie_header.to_string(),
        };
        let value = HeaderValue::try_from(merged).map_err(|e| Error::invalid_header(COOKIE, e))?;
        self.headers.insert(COOKIE, value);
        Ok(())
    }

    /// Turn this request into the next hop of a redirect chain.
    ///
    /// 307 and 308 keep the method and body. Other redirects switch to GET
    /// (HEAD stays HEAD) and drop the payload. Credentials are dropped when
    /// the origin changes.
    pub fn redirect_to(&mut self, status: StatusCode, location: Url) {
        let keeps_payload = matches!(
            status,
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
        );
        if !keeps_payload {
            if self.method != Method::HEAD {
                self.method = Method::GET;
            }
            self.body = None;
            self.headers.remove(CONTENT_TYPE);
            self.headers.remove(CONTENT_LENGTH);
        }

        if self.url.origin() != location.origin() {
            self.headers.remove(AUTHORIZATION);
        }

        // Location is a complete target; the original query pairs do not carry over.
        self.query.clear();
        self.url = location;
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::new(Method::GET, "https://example.com/path", Duration::from_secs(5))
            .unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.host(), Some("example.com"));
        assert!(Request::new(Method::GET, "not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_redirect_see_other_becomes_get() {
        let mut req =
            Request::new(Method::POST, "https://example.com/login", Duration::from_secs(5))
                .unwrap();
        req.body = Some(Bytes::from_static(b"user=ben"));
        req.query.push(("next".into(), "home".into()));
        req.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        req.redirect_to(
            StatusCode::FOUND,
            Url::parse("https://example.com/home").unwrap(),
        );
        assert_eq!(req.method, Method::GET);
        assert!(req.body.is_none());
        assert!(req.query.is_empty());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
        assert!(req.headers.get(AUTHORIZATION).is_some());
        assert_eq!(req.url_str(), "https://example.com/home");

        req.redirect_to(
            StatusCode::SEE_OTHER,
            Url::parse("https://other.example/").unwrap(),
        );
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_redirect_temporary_keeps_payload() {
        let mut req =
            Request::new(Method::PUT, "https://example.com/a", Duration::from_secs(5)).unwrap();
        req.body = Some(Bytes::from_static(b"{}"));

        req.redirect_to(
            StatusCode::TEMPORARY_REDIRECT,
            Url::parse("https://example.com/b").unwrap(),
        );
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_cookie_merge() {
        let mut req =
            Request::new(Method::GET, "https://example.com", Duration::from_secs(5)).unwrap();
        req.add_cookies("a=1").unwrap();
        req.add_cookies("b=2").unwrap();
        assert_eq!(req.headers.get(COOKIE).unwrap(), "a=1; b=2");
    }
}
