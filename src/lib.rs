// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # sessionkit - Session HTTP Client
//!
//! A long-lived HTTP client that keeps headers and cookies across calls and can
//! capture every exchange to disk for offline inspection.
//!
//! ## Features
//!
//! - Session headers: case-insensitive store with presets for common headers
//! - Cookie jar: domain-scoped, accumulates `Set-Cookie`, saves/loads flat JSON
//! - Fail-soft calls: a failed request is logged and returns `None`
//! - Debug capture: numbered two-phase request/response snapshots
//! - Pluggable transport: reqwest by default, any [`Transport`] for tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sessionkit::{DebugRecorder, HttpSession, RequestOptions, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recorder = Arc::new(DebugRecorder::new("debug", "example")?);
//!     let client = HttpSession::new(SessionConfig::default())?.with_recorder(recorder);
//!
//!     client.store().accept(Some("application/json"));
//!
//!     if let Some(response) = client
//!         .get("https://example.com/", RequestOptions::new().debug(true))
//!         .await
//!     {
//!         println!("{} {}", response.status_code(), response.url_str());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod debug;
pub mod error;
pub mod http;
pub mod io;
pub mod logging;
pub mod timer;

// Re-exports for convenience

// Configuration
pub use config::SessionConfig;

// Debug capture
pub use debug::{DebugRecorder, RequestSnapshot, ResponseSnapshot, Snapshot};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{
    BasicAuth, BearerAuth, CapabilityStore, Cookie, CookieJar, Extension, HttpSession,
    HttpVersion, Method, ReqwestTransport, Request, RequestOptions, Response, Transport,
};

// Helpers
pub use logging::init_tracing;
pub use timer::Timer;

/// sessionkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
