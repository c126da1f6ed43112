// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP session layer
//!
//! Provides a session client with persistent headers and cookies over a
//! pluggable transport, with optional debug capture of every exchange.

mod capability;
mod client;
mod cookie;
mod options;
mod request;
mod response;
mod transport;

pub use capability::CapabilityStore;
pub use client::HttpSession;
pub use cookie::{Cookie, CookieJar, SameSite};
pub use options::{BasicAuth, BearerAuth, Extension, HttpVersion, RequestOptions};
pub use request::Request;
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

pub use reqwest::Method;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const LOCATION: &str = "location";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const ACCEPT_ENCODING: &str = "accept-encoding";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const REFERER: &str = "referer";
    pub const ORIGIN: &str = "origin";
    pub const X_REQUESTED_WITH: &str = "x-requested-with";
}

/// Content-type presets
pub mod content_type {
    pub const FORM: &str = "application/x-www-form-urlencoded";
    pub const JSON: &str = "application/json";
    pub const UTF8_SUFFIX: &str = "; charset=UTF-8";

    /// Build a preset value, optionally with the UTF-8 charset suffix
    pub fn with_charset(base: &str, utf8: bool) -> String {
        if utf8 {
            format!("{}{}", base, UTF8_SUFFIX)
        } else {
            base.to_string()
        }
    }
}
