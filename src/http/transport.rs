// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam between the session client and the network

use std::time::Instant;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;

use super::request::Request;
use super::response::Response;
use crate::config::SessionConfig;
use crate::error::{Error, Result};

/// Performs the actual network exchange for a merged request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the full response body
    async fn send(&self, request: Request) -> Result<Response>;
}

/// reqwest-backed transport
///
/// Cookies and default headers are owned by the session, so the underlying
/// client keeps neither. Redirects are not followed here: each call is a
/// single hop and the session walks the redirect chain.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the proxy settings of `config`
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .cookie_store(false);

        // No configured proxy means a direct connection, not the system proxy.
        builder = match config.proxy_url() {
            Some(proxy_url) => builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            ),
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let timeout = request.timeout;
        let url = request.url.clone();

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        for ext in &request.extensions {
            builder = ext.apply(builder);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, &url, timeout.as_millis() as u64))?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, &url, timeout.as_millis() as u64))?;
        let response_time = start.elapsed().as_millis() as u64;

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            false,
            response_time,
        ))
    }
}

fn transport_error(err: reqwest::Error, url: &url::Url, timeout_ms: u64) -> Error {
    if err.is_timeout() {
        Error::timeout_with_url("request", timeout_ms, url.as_str())
    } else {
        Error::Http(err)
    }
}
