// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP session client

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::Method;

use super::capability::CapabilityStore;
use super::headers::USER_AGENT;
use super::options::RequestOptions;
use super::request::Request;
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use crate::config::SessionConfig;
use crate::debug::{flatten_headers, DebugRecorder, RequestSnapshot, Snapshot};
use crate::error::{Error, Result};
use crate::timer::Timer;

/// Long-lived HTTP client holding header and cookie state across calls.
///
/// Per call: session headers are prepared from the options, the request phase
/// is captured (when debugging), the transport is invoked, then the response
/// phase is captured. [`request`](Self::request) and the verb aliases never
/// return an error: a failed call is logged and yields `None`.
pub struct HttpSession {
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    store: CapabilityStore,
    recorder: Option<Arc<DebugRecorder>>,
    last_exchange: Mutex<Option<Snapshot>>,
}

impl HttpSession {
    /// Create a session backed by a reqwest transport
    pub fn new(config: SessionConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a session over a custom transport
    pub fn with_transport(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        let store = CapabilityStore::new();
        if !config.user_agent.is_empty() {
            store.set_header(USER_AGENT, Some(&config.user_agent));
        }

        Self {
            config,
            transport,
            store,
            recorder: None,
            last_exchange: Mutex::new(None),
        }
    }

    /// Attach a debug recorder
    pub fn with_recorder(mut self, recorder: Arc<DebugRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Get session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.config.proxy_url()
    }

    /// Default timeout for calls that do not set one
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Header and cookie state
    pub fn store(&self) -> &CapabilityStore {
        &self.store
    }

    pub fn recorder(&self) -> Option<&DebugRecorder> {
        self.recorder.as_deref()
    }

    /// Upsert a session header, or remove it when `value` is None
    pub fn set_header(&self, name: &str, value: Option<&str>) {
        self.store.set_header(name, value);
    }

    /// Session header value, or an empty string when unset
    pub fn get_header(&self, name: &str) -> String {
        self.store.get_header(name)
    }

    /// Set a session cookie, or remove it when `value` is None
    pub fn set_cookie(&self, name: &str, value: Option<&str>) {
        self.store.set_cookie(name, value);
    }

    /// Load cookies from a flat JSON file; a missing file is a no-op
    pub fn load_cookies(&self, path: &Path) -> Result<()> {
        self.store.load_cookies(path)
    }

    /// Save cookies as a flat JSON file
    pub fn save_cookies(&self, path: &Path) -> Result<()> {
        self.store.save_cookies(path)
    }

    /// Snapshot of the most recent captured exchange
    pub fn last_exchange(&self) -> Option<Snapshot> {
        self.last_exchange.lock().clone()
    }

    /// Perform a request, logging and swallowing any failure
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Option<Response> {
        match self.execute(method.clone(), url, options).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::error!(method = %method, url, error = %err, "Request failed");
                None
            }
        }
    }

    /// Perform a request, returning the failure to the caller
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let headers = self.store.prepare(&options);

        let mut exchange = if options.debug {
            self.capture_request(&method, url, &options, &headers)
        } else {
            None
        };

        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let request = self.build_request(method, url, headers, options, timeout)?;
        let response = self.follow_redirects(request).await?;

        tracing::info!(
            status = response.status_code(),
            length = response.body_len(),
            url = %response.url,
            "Response"
        );

        if let Some(ref mut snapshot) = exchange {
            snapshot.complete(&response);
            self.persist(snapshot);
        }

        Ok(response)
    }

    /// HTTP GET
    pub async fn get(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::GET, url, options).await
    }

    /// HTTP POST
    pub async fn post(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::POST, url, options).await
    }

    /// HTTP PUT
    pub async fn put(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::PUT, url, options).await
    }

    /// HTTP PATCH
    pub async fn patch(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::PATCH, url, options).await
    }

    /// HTTP DELETE
    pub async fn delete(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::DELETE, url, options).await
    }

    /// HTTP HEAD
    pub async fn head(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::HEAD, url, options).await
    }

    /// HTTP OPTIONS
    pub async fn options(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::OPTIONS, url, options).await
    }

    /// HTTP CONNECT
    pub async fn connect(&self, url: &str, options: RequestOptions) -> Option<Response> {
        self.request(Method::CONNECT, url, options).await
    }

    fn capture_request(
        &self,
        method: &Method,
        url: &str,
        options: &RequestOptions,
        headers: &HeaderMap,
    ) -> Option<Snapshot> {
        let recorder = self.recorder.as_ref()?;
        let id = recorder.begin_exchange();

        let request = RequestSnapshot {
            method: method.to_string(),
            url: url.to_string(),
            options: options.snapshot(),
            headers: flatten_headers(headers),
            cookies: self.store.cookies().to_map(),
        };
        let snapshot = Snapshot::begin(id, &Timer::local(), request);
        self.persist(&snapshot);

        Some(snapshot)
    }

    fn persist(&self, snapshot: &Snapshot) {
        if let Some(ref recorder) = self.recorder {
            if let Err(err) = recorder.record(snapshot) {
                tracing::warn!(id = snapshot.id, error = %err, "Failed to persist snapshot");
            }
        }
        *self.last_exchange.lock() = Some(snapshot.clone());
    }

    /// Send `request`, following redirects up to the configured limit.
    ///
    /// Every hop absorbs its Set-Cookie headers before the next hop's Cookie
    /// header is built from the jar.
    async fn follow_redirects(&self, mut request: Request) -> Result<Response> {
        let start = request.url.clone();
        let mut hops = 0;

        loop {
            let mut hop = request.clone();
            if let Some(cookie_header) = self.store.cookies().get_cookie_header(&hop.url) {
                hop.add_cookies(&cookie_header)?;
            }

            let mut response = self.transport.send(hop).await?;
            self.store
                .cookies()
                .absorb(&response.headers, &response.url);

            let target = match response.redirect_target() {
                Some(target) => target,
                None => {
                    response.redirected = hops > 0;
                    return Ok(response);
                }
            };
            if hops >= self.config.max_redirects {
                return Err(Error::network(format!(
                    "Too many redirects ({}) starting at {}",
                    hops, start
                )));
            }

            tracing::debug!(status = response.status_code(), to = %target, "Following redirect");
            request.redirect_to(response.status, target);
            hops += 1;
        }
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        options: RequestOptions,
        timeout: Duration,
    ) -> Result<Request> {
        let mut request = Request::new(method, url, timeout)?;
        request.headers = headers;

        request.body = if let Some(ref json) = options.json {
            Some(Bytes::from(serde_json::to_vec(json)?))
        } else if let Some(ref data) = options.data {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(data)
                .finish();
            Some(Bytes::from(encoded))
        } else {
            options.body
        };
        request.query = options.query;
        request.extensions = options.extensions.into_values().collect();

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use async_trait::async_trait;
    use reqwest::header::HeaderValue;
    use reqwest::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    /// Echoes the request URL as JSON and remembers every request it saw
    #[derive(Default)]
    struct EchoTransport {
        seen: Mutex<Vec<Request>>,
        set_cookie: Option<&'static str>,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(&self, request: Request) -> Result<Response> {
            let mut headers = HeaderMap::new();
            if let Some(cookie) = self.set_cookie {
                headers.insert(SET_COOKIE, HeaderValue::from_static(cookie));
            }
            let body = json!({"url": request.url_str()}).to_string();
            let url = request.url.clone();
            self.seen.lock().push(request);
            Ok(Response::new(
                StatusCode::OK,
                headers,
                Bytes::from(body),
                url,
                false,
                1,
            ))
        }
    }

    struct TimeoutTransport;

    #[async_trait]
    impl Transport for TimeoutTransport {
        async fn send(&self, request: Request) -> Result<Response> {
            Err(Error::timeout_with_url(
                "request",
                request.timeout.as_millis() as u64,
                request.url_str(),
            ))
        }
    }

    /// Redirects `/login` to `/home` with a session cookie, and `/loop` to itself
    #[derive(Default)]
    struct RedirectTransport {
        seen: Mutex<Vec<Request>>,
    }

    #[async_trait]
    impl Transport for RedirectTransport {
        async fn send(&self, request: Request) -> Result<Response> {
            let mut headers = HeaderMap::new();
            let status = match request.url.path() {
                "/login" => {
                    headers.insert(SET_COOKIE, HeaderValue::from_static("sid=abc; Path=/"));
                    headers.insert(LOCATION, HeaderValue::from_static("/home"));
                    StatusCode::FOUND
                }
                "/loop" => {
                    headers.insert(LOCATION, HeaderValue::from_static("/loop"));
                    StatusCode::TEMPORARY_REDIRECT
                }
                _ => StatusCode::OK,
            };
            let url = request.url.clone();
            self.seen.lock().push(request);
            Ok(Response::new(status, headers, Bytes::new(), url, false, 1))
        }
    }

    fn session(transport: Arc<dyn Transport>) -> HttpSession {
        HttpSession::with_transport(SessionConfig::default().user_agent("tester/1.0"), transport)
    }

    #[test]
    fn test_user_agent_installed() {
        let client = session(Arc::new(EchoTransport::default()));
        assert_eq!(client.get_header("User-Agent"), "tester/1.0");

        let bare = HttpSession::with_transport(
            SessionConfig::default().user_agent(""),
            Arc::new(EchoTransport::default()),
        );
        assert!(bare.store().headers().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_debug_capture() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(DebugRecorder::new(dir.path(), "test").unwrap());
        let client =
            session(Arc::new(EchoTransport::default())).with_recorder(Arc::clone(&recorder));

        let url = "https://example.test/get";
        let response = client
            .get(url, RequestOptions::new().debug(true))
            .await
            .unwrap();
        assert_eq!(response.status_code(), 200);

        let snapshot = recorder.load(recorder.current_id()).unwrap();
        assert_eq!(snapshot.request.method, "GET");
        assert_eq!(snapshot.request.url, url);
        assert_eq!(snapshot.request.headers["user-agent"], "tester/1.0");

        let res = snapshot.response.as_ref().unwrap();
        assert_eq!(res.status_code, 200);
        assert_eq!(res.url, url);
        assert_eq!(res.json["url"], url);
        assert_eq!(client.last_exchange(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_post_form_sets_content_type() {
        let transport = Arc::new(EchoTransport::default());
        let client = session(transport.clone());

        let response = client
            .post(
                "https://example.test/post",
                RequestOptions::new().data(Vec::<(String, String)>::new()),
            )
            .await;
        assert!(response.is_some());
        assert!(client
            .get_header("Content-Type")
            .contains("application/x-www-form-urlencoded"));

        let seen = transport.seen.lock();
        assert!(seen[0]
            .headers
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/x-www-form-urlencoded"));
    }

    #[tokio::test]
    async fn test_payload_encoding() {
        let transport = Arc::new(EchoTransport::default());
        let client = session(transport.clone());

        client
            .post(
                "https://example.test/post",
                RequestOptions::new().data([("q", "a b"), ("x", "&")]),
            )
            .await
            .unwrap();
        client
            .put(
                "https://example.test/put",
                RequestOptions::new().json(json!({"id": 1})),
            )
            .await
            .unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].body.as_deref(), Some(&b"q=a+b&x=%26"[..]));
        assert_eq!(seen[1].body.as_deref(), Some(&br#"{"id":1}"#[..]));
        assert!(client.get_header("Content-Type").contains("application/json"));
    }

    #[tokio::test]
    async fn test_no_payload_leaves_content_type_unset() {
        let client = session(Arc::new(EchoTransport::default()));
        client
            .get("https://example.test/get", RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(client.get_header("Content-Type"), "");
    }

    #[tokio::test]
    async fn test_timeout_default_and_override() {
        let transport = Arc::new(EchoTransport::default());
        let client = session(transport.clone());

        client
            .get("https://example.test/a", RequestOptions::new())
            .await
            .unwrap();
        client
            .get(
                "https://example.test/b",
                RequestOptions::new().timeout(Duration::from_secs(3)),
            )
            .await
            .unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].timeout, Duration::from_secs(30));
        assert_eq!(seen[1].timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_cookies_accumulate() {
        let transport = Arc::new(EchoTransport {
            set_cookie: Some("sid=abc; Path=/"),
            ..Default::default()
        });
        let client = session(transport.clone());
        client.set_cookie("pref", Some("1"));

        client
            .get("https://example.test/login", RequestOptions::new())
            .await
            .unwrap();
        client
            .get("https://example.test/home", RequestOptions::new())
            .await
            .unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].headers.get(COOKIE).unwrap(), "pref=1");
        let second = seen[1].headers.get(COOKIE).unwrap().to_str().unwrap();
        assert!(second.contains("sid=abc"));
        assert!(second.contains("pref=1"));
        assert_eq!(client.store().cookies().get("sid").as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_redirect_hop_cookies_are_kept() {
        let transport = Arc::new(RedirectTransport::default());
        let client = session(transport.clone());

        let response = client
            .post(
                "https://example.test/login",
                RequestOptions::new().data([("user", "ben")]),
            )
            .await
            .unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.url_str(), "https://example.test/home");
        assert!(response.redirected);
        assert_eq!(client.store().cookies().get("sid").as_deref(), Some("abc"));

        let seen = transport.seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].headers.get(COOKIE).is_none());
        assert_eq!(seen[1].method, Method::GET);
        assert!(seen[1].body.is_none());
        assert_eq!(seen[1].headers.get(COOKIE).unwrap(), "sid=abc");
    }

    #[tokio::test]
    async fn test_redirect_limit() {
        let transport = Arc::new(RedirectTransport::default());
        let client = HttpSession::with_transport(
            SessionConfig::default().max_redirects(3),
            transport.clone(),
        );

        let err = client
            .execute(Method::PUT, "https://example.test/loop", RequestOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert_eq!(transport.seen.lock().len(), 4);
        assert!(client
            .get("https://example.test/loop", RequestOptions::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_fail_soft() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(DebugRecorder::new(dir.path(), "test").unwrap());
        let client = session(Arc::new(TimeoutTransport)).with_recorder(Arc::clone(&recorder));

        let response = client
            .get("https://example.test/slow", RequestOptions::new().debug(true))
            .await;
        assert!(response.is_none());

        let partial = recorder.load(1).unwrap();
        assert_eq!(partial.request.url, "https://example.test/slow");
        assert!(!partial.is_complete());

        let err = client
            .execute(Method::GET, "https://example.test/slow", RequestOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_invalid_url_is_fail_soft() {
        let client = session(Arc::new(EchoTransport::default()));
        assert!(client.get("not a url", RequestOptions::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_debug_without_recorder_does_nothing() {
        let client = session(Arc::new(EchoTransport::default()));
        client
            .get("https://example.test/get", RequestOptions::new().debug(true))
            .await
            .unwrap();
        assert!(client.last_exchange().is_none());
    }

    #[tokio::test]
    async fn test_each_call_gets_new_snapshot() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(DebugRecorder::new(dir.path(), "test").unwrap());
        let client =
            session(Arc::new(EchoTransport::default())).with_recorder(Arc::clone(&recorder));

        for verb in [Method::DELETE, Method::PATCH, Method::HEAD] {
            client
                .request(verb, "https://example.test/x", RequestOptions::new().debug(true))
                .await
                .unwrap();
        }

        assert_eq!(recorder.current_id(), 3);
        assert_eq!(recorder.load(1).unwrap().request.method, "DELETE");
        assert_eq!(recorder.load(3).unwrap().request.method, "HEAD");
        assert_eq!(client.last_exchange().unwrap().id, 3);
    }
}
