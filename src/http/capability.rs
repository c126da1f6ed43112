// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session-scoped header and cookie state

use std::path::Path;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::content_type::{self, with_charset};
use super::cookie::CookieJar;
use super::headers;
use super::options::RequestOptions;
use crate::error::Result;

/// Headers and cookies shared by every call on one session.
///
/// Header names are case-insensitive. Nothing here adds a header on its own;
/// every change goes through [`set_header`](Self::set_header) or one of its aliases.
#[derive(Debug, Default)]
pub struct CapabilityStore {
    headers: RwLock<HeaderMap>,
    cookies: CookieJar,
}

impl CapabilityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a header, or remove it when `value` is None
    pub fn set_header(&self, name: &str, value: Option<&str>) {
        write_header(&mut self.headers.write(), name, value);
    }

    /// Header value, or an empty string when unset
    pub fn get_header(&self, name: &str) -> String {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            return String::new();
        };
        self.headers
            .read()
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default()
    }

    /// Copy of the current headers
    pub fn headers(&self) -> HeaderMap {
        self.headers.read().clone()
    }

    /// `Accept`, default `*/*`
    pub fn accept(&self, value: Option<&str>) {
        self.set_header(headers::ACCEPT, Some(value.unwrap_or("*/*")));
    }

    /// `Accept-Encoding`, default `gzip, deflate, br`
    pub fn accept_encoding(&self, value: Option<&str>) {
        self.set_header(
            headers::ACCEPT_ENCODING,
            Some(value.unwrap_or("gzip, deflate, br")),
        );
    }

    /// `Accept-Language`, default `en-US,en;q=0.5`
    pub fn accept_language(&self, value: Option<&str>) {
        self.set_header(
            headers::ACCEPT_LANGUAGE,
            Some(value.unwrap_or("en-US,en;q=0.5")),
        );
    }

    /// `Origin`; None removes it
    pub fn origin(&self, value: Option<&str>) {
        self.set_header(headers::ORIGIN, value);
    }

    /// `Referer`; None removes it
    pub fn referer(&self, value: Option<&str>) {
        self.set_header(headers::REFERER, value);
    }

    /// `Content-Type`; None removes it
    pub fn content_type(&self, value: Option<&str>) {
        self.set_header(headers::CONTENT_TYPE, value);
    }

    /// `X-Requested-With`, default `XMLHttpRequest`
    pub fn requested_with(&self, value: Option<&str>) {
        self.set_header(
            headers::X_REQUESTED_WITH,
            Some(value.unwrap_or("XMLHttpRequest")),
        );
    }

    /// Content type for form submits
    pub fn form_content_type(&self, utf8: bool) {
        let value = with_charset(content_type::FORM, utf8);
        self.set_header(headers::CONTENT_TYPE, Some(&value));
    }

    /// Content type for JSON payloads
    pub fn json_content_type(&self, utf8: bool) {
        let value = with_charset(content_type::JSON, utf8);
        self.set_header(headers::CONTENT_TYPE, Some(&value));
    }

    /// The session cookie jar
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Set a cookie, or remove it when `value` is None
    pub fn set_cookie(&self, name: &str, value: Option<&str>) {
        self.cookies.set(name, value);
    }

    /// Load cookies from a flat JSON file; a missing file is a no-op
    pub fn load_cookies(&self, path: &Path) -> Result<()> {
        self.cookies.load(path)
    }

    /// Save cookies as a flat JSON file
    pub fn save_cookies(&self, path: &Path) -> Result<()> {
        self.cookies.save(path)
    }

    /// Apply the content-type preset and header overrides of `options`,
    /// returning the resulting headers.
    ///
    /// Runs under one write lock so concurrent calls see whole updates.
    pub fn prepare(&self, options: &RequestOptions) -> HeaderMap {
        let mut current = self.headers.write();

        // Overrides are applied last, so an explicit Content-Type wins over the preset.
        if options.json.is_some() {
            let value = with_charset(content_type::JSON, true);
            write_header(&mut current, headers::CONTENT_TYPE, Some(&value));
        } else if options.data.is_some() {
            let value = with_charset(content_type::FORM, true);
            write_header(&mut current, headers::CONTENT_TYPE, Some(&value));
        }

        if let Some(ref overrides) = options.headers {
            for (name, value) in overrides {
                write_header(&mut current, name, value.as_deref());
            }
        }

        current.clone()
    }
}

fn write_header(headers: &mut HeaderMap, name: &str, value: Option<&str>) {
    let header = match HeaderName::from_bytes(name.as_bytes()) {
        Ok(header) => header,
        Err(e) => {
            tracing::warn!(header = name, error = %e, "Rejected header name");
            return;
        }
    };

    match value {
        Some(value) => match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(header, value);
            }
            Err(e) => {
                tracing::warn!(header = name, error = %e, "Rejected header value");
            }
        },
        None => {
            headers.remove(header);
        }
    }
}
