// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::DEFAULT_USER_AGENT;
use crate::io;

/// Configuration shared by every call on one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// User agent string; empty leaves `User-Agent` unset
    pub user_agent: String,
    /// Proxy URL for both http and https; empty means direct connection
    pub proxy_url: String,
    /// Timeout used when a call does not override it
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: String::new(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
        }
    }
}

impl SessionConfig {
    /// Create a new session config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON object file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let map = io::load_map(path)?;
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Proxy URL, if one is configured
    pub fn proxy_url(&self) -> Option<&str> {
        if self.proxy_url.is_empty() {
            None
        } else {
            Some(&self.proxy_url)
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
