//! Minimal HTTP request/response model and the transports that carry it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store only talks to [`Transport`]. In the browser that is
//! [`BrowserTransport`] (gloo-net fetch); native builds can use
//! [`NativeTransport`] (reqwest). Tests substitute a scripted fake.
//!
//! TIMEOUTS
//! ========
//! Every request carries `timeout_ms`. The browser transport aborts the fetch
//! through an `AbortController` when the timer wins; the native transport
//! drops the reqwest future under `tokio::time::timeout`.

#![allow(async_fn_in_trait)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::MessageBody;
use crate::error::TransportError;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// `None` lets the session store apply its configured default.
    pub timeout_ms: Option<u32>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None, timeout_ms: None }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Serialize `value` as the request body.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `value` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(self)
    }

    /// Set a header, replacing any existing value with the same (case-insensitive) name.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Non-blank `message` field of a JSON body, if there is one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.json::<MessageBody>()
            .ok()
            .and_then(|body| body.message)
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
    }

    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or_else(|| fallback.to_owned())
    }
}

/// Carries one request to the backend and returns whatever status came back.
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Browser fetch via gloo-net. Outside a `hydrate` build it reports
/// [`TransportError::Unavailable`] so SSR renders never touch the network.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        #[cfg(feature = "hydrate")]
        {
            browser::send(request).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(TransportError::Unavailable)
        }
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use futures::future::{Either, select};
    use gloo_net::http::RequestBuilder;

    use super::{ApiRequest, ApiResponse, Method};
    use crate::error::TransportError;

    pub(super) async fn send(request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let controller = web_sys::AbortController::new().map_err(|e| TransportError::Network(format!("{e:?}")))?;
        let signal = controller.signal();

        let mut builder = match request.method {
            Method::Get => RequestBuilder::new(&request.url).method(gloo_net::http::Method::GET),
            Method::Post => RequestBuilder::new(&request.url).method(gloo_net::http::Method::POST),
            Method::Put => RequestBuilder::new(&request.url).method(gloo_net::http::Method::PUT),
            Method::Delete => RequestBuilder::new(&request.url).method(gloo_net::http::Method::DELETE),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = builder.abort_signal(Some(&signal));

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let fetch = Box::pin(async move {
            let resp = prepared.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(ApiResponse { status, body })
        });

        let Some(timeout_ms) = request.timeout_ms else {
            return fetch.await;
        };
        let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(timeout_ms));
        match select(fetch, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                controller.abort();
                Err(TransportError::Timeout(timeout_ms))
            }
        }
    }
}

/// reqwest-backed transport for native hosts. Requires a tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug, Default)]
pub struct NativeTransport {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl NativeTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Transport for NativeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async move {
            let resp = builder.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
            Ok(ApiResponse { status, body })
        };

        match request.timeout_ms {
            Some(ms) => tokio::time::timeout(std::time::Duration::from_millis(u64::from(ms)), exchange)
                .await
                .map_err(|_| TransportError::Timeout(ms))?,
            None => exchange.await,
        }
    }
}
