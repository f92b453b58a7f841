//! HTTP transport seam.
//!
//! The API client builds a complete [`ApiRequest`] (URL, merged headers,
//! body) and hands it to an [`HttpTransport`]. Native builds send it with
//! `reqwest`; browser builds with `gloo-net`. Tests script responses.
//!
//! The trait is `?Send` because the browser event loop is single-threaded
//! and `gloo-net` futures are not `Send`.

use http::{HeaderMap, Method};

use super::error::ApiError;

/// A fully prepared outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Status and raw body text of an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// Send `request` and collect the full response body.
    ///
    /// Only failures to obtain a response are errors here; HTTP error
    /// statuses come back as an ordinary [`RawResponse`].
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

// =============================================================================
// NATIVE
// =============================================================================

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
impl ReqwestTransport {
    /// Build a transport honoring the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &crate::config::ClientConfig) -> Result<Self, ApiError> {
        use std::time::Duration;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http })
    }
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
#[async_trait::async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let mut builder = self.http.request(request.method, &request.url).headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let mut builder = gloo_net::http::RequestBuilder::new(&request.url).method(request.method);
        for (name, value) in &request.headers {
            let value = value.to_str().map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
            builder = builder.header(name.as_str(), value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = prepared.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
